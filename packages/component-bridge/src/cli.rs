//! Command-line interface for the component bridge.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use url::Url;

use crate::beans::XmlConfigCreator;
use crate::config::{EmitterConfig, ReaderConfig};
use crate::error::{ResourceError, Result};
use crate::inspector::{StaticTypeInspector, TypeCapability};
use crate::reader::ConfigReader;
use crate::resource::FileResourceResolver;

/// Component Bridge - Convert component configurations into bean definitions.
#[derive(Parser)]
#[command(name = "component-bridge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a component configuration and write the bean document.
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Root component document
    pub root: PathBuf,

    /// Role document applied before the root
    #[arg(short, long)]
    pub roles: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Type to treat as thread-safe when inferring models
    #[arg(long = "thread-safe", value_name = "TYPE")]
    pub thread_safe: Vec<String>,

    /// Type to treat as poolable when inferring models
    #[arg(long, value_name = "TYPE")]
    pub poolable: Vec<String>,

    /// Capability assumed for types not listed
    #[arg(long, value_enum, value_name = "CAPABILITY")]
    pub fallback: Option<Capability>,

    /// Property for ${name} expansion
    #[arg(short = 'D', long = "property", value_name = "KEY=VALUE", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,

    /// Load directory includes sorted by file name
    #[arg(long)]
    pub sort_includes: bool,

    /// Fail on selector entries without a class
    #[arg(long)]
    pub strict: bool,
}

/// Capability names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Capability {
    ThreadSafe,
    Poolable,
    Plain,
}

impl From<Capability> for TypeCapability {
    fn from(capability: Capability) -> Self {
        match capability {
            Capability::ThreadSafe => Self::ThreadSafe,
            Capability::Poolable => Self::Poolable,
            Capability::Plain => Self::Plain,
        }
    }
}

impl ConvertArgs {
    fn reader_config(&self) -> ReaderConfig {
        let mut config = ReaderConfig::new()
            .with_sorted_directory_includes(self.sort_includes)
            .with_strict_selector_children(self.strict);
        for (name, value) in &self.properties {
            config = config.with_property(name, value);
        }
        config
    }

    fn inspector(&self) -> StaticTypeInspector {
        let mut inspector = StaticTypeInspector::new();
        for class_name in &self.thread_safe {
            inspector.insert(class_name, TypeCapability::ThreadSafe);
        }
        for class_name in &self.poolable {
            inspector.insert(class_name, TypeCapability::Poolable);
        }
        match self.fallback {
            Some(capability) => inspector.with_fallback(capability.into()),
            None => inspector,
        }
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert(args) => convert_command(&args),
    }
}

/// Execute the convert command.
fn convert_command(args: &ConvertArgs) -> Result<()> {
    let resolver = FileResourceResolver::new(".")?;
    let config = args.reader_config();

    let mut reader = ConfigReader::new(&resolver, &config);
    if let Some(roles) = &args.roles {
        reader.read_roles(&path_uri(roles)?)?;
    }
    let mut info = reader.read_configuration(&path_uri(&args.root)?)?;

    let inspector = args.inspector();
    let creator = XmlConfigCreator::new(&inspector, EmitterConfig::default());
    let document = creator.create_config(&mut info)?;

    let Some(output) = &args.output else {
        print!("{document}");
        return Ok(());
    };
    fs::write(output, &document)?;

    println!(
        "{} {}",
        style("Converted").bold(),
        style(args.root.display()).cyan()
    );
    println!("  Components: {}", info.components().len());
    println!("  Imports: {}", info.imports().len());
    if let Some(logger) = info.root_logger() {
        println!("  Root logger: {logger}");
    }
    println!();
    println!("{} {}", style("Saved to:").green().bold(), output.display());

    Ok(())
}

/// Absolute `file:` URI of a path.
fn path_uri(path: &Path) -> Result<String> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let url = Url::from_file_path(&absolute)
        .map_err(|()| ResourceError::UnsupportedUri(absolute.display().to_string()))?;
    Ok(url.to_string())
}

fn parse_property(value: &str) -> std::result::Result<(String, String), String> {
    match value.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, found '{value}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert_args(args: &[&str]) -> ConvertArgs {
        let cli = Cli::parse_from(["component-bridge", "convert"].iter().chain(args));
        let Commands::Convert(args) = cli.command;
        args
    }

    #[test]
    fn test_cli_parse_convert() {
        let args = convert_args(&["app/cocoon.xconf"]);

        assert_eq!(args.root, PathBuf::from("app/cocoon.xconf"));
        assert!(args.roles.is_none());
        assert!(args.output.is_none());
        assert!(args.properties.is_empty());
        assert!(!args.sort_includes);
        assert!(!args.strict);
    }

    #[test]
    fn test_cli_parse_convert_with_options() {
        let args = convert_args(&[
            "app/cocoon.xconf",
            "--roles",
            "roles.xml",
            "-o",
            "beans.xml",
            "--thread-safe",
            "impl.Cache",
            "--thread-safe",
            "impl.Store",
            "--poolable",
            "impl.Parser",
            "--fallback",
            "plain",
            "-D",
            "home=/srv",
            "--sort-includes",
            "--strict",
        ]);

        assert_eq!(args.roles, Some(PathBuf::from("roles.xml")));
        assert_eq!(args.output, Some(PathBuf::from("beans.xml")));
        assert_eq!(args.thread_safe, vec!["impl.Cache", "impl.Store"]);
        assert_eq!(args.poolable, vec!["impl.Parser"]);
        assert_eq!(args.fallback, Some(Capability::Plain));
        assert_eq!(args.properties, vec![("home".to_string(), "/srv".to_string())]);
        assert!(args.sort_includes);
        assert!(args.strict);

        let config = args.reader_config();
        assert_eq!(config.properties.get("home").map(String::as_str), Some("/srv"));
        assert!(config.sort_directory_includes);

        let inspector = args.inspector();
        use crate::inspector::TypeInspector;
        assert_eq!(inspector.inspect("impl.Parser"), Some(TypeCapability::Poolable));
        assert_eq!(inspector.inspect("impl.Other"), Some(TypeCapability::Plain));
    }

    #[test]
    fn test_parse_property() {
        assert_eq!(
            parse_property("a=b=c"),
            Ok(("a".to_string(), "b=c".to_string()))
        );
        assert_eq!(parse_property("empty="), Ok(("empty".to_string(), String::new())));
        assert!(parse_property("novalue").is_err());
        assert!(parse_property("=x").is_err());
    }

    #[test]
    fn test_convert_command_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("roles.xml"),
            r#"<role-list><role name="org.x.Greeter" shorthand="greeter" default-class="impl.Greeter"/></role-list>"#,
        )
        .unwrap();
        fs::write(dir.path().join("app.xconf"), r#"<components><greeter/></components>"#).unwrap();
        let output = dir.path().join("beans.xml");

        let args = ConvertArgs {
            root: dir.path().join("app.xconf"),
            roles: Some(dir.path().join("roles.xml")),
            output: Some(output.clone()),
            thread_safe: vec!["impl.Greeter".to_string()],
            poolable: Vec::new(),
            fallback: None,
            properties: Vec::new(),
            sort_includes: false,
            strict: false,
        };
        convert_command(&args).unwrap();

        let document = fs::read_to_string(output).unwrap();
        assert!(document.contains(
            r#"<bean name="org.x.Greeter" class="impl.Greeter" singleton="true"/>"#
        ));
        assert!(document.contains(r#"<alias name="org.x.Greeter" alias="greeter"/>"#));
    }
}
