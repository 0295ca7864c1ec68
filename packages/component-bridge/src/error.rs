//! Error types for the component bridge.
//!
//! Uses the dual-error pattern: `ResourceError` for failures reported by the
//! resource and document collaborators, and `ConfigError` for everything the
//! reader and the bean emitter detect while resolving a registry.

use thiserror::Error;

use crate::xml::Location;

/// Failure to locate, read or parse a resource.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// URI could not be parsed or joined onto its context.
    #[error("Invalid URI '{uri}': {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    /// URI does not use a scheme this resolver can serve.
    #[error("Unsupported URI '{0}'")]
    UnsupportedUri(String),

    /// Resource does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// IO error while reading the resource.
    #[error("IO error reading {uri}: {source}")]
    Io {
        uri: String,
        #[source]
        source: std::io::Error,
    },

    /// Resource content is not well-formed XML.
    #[error("XML parsing failed for {uri}: {source}")]
    Parse {
        uri: String,
        #[source]
        source: roxmltree::Error,
    },
}

/// Main error type for reading and emitting component configurations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Component element whose tag is not a known shorthand.
    #[error("Unknown component type '{tag}' at {location}")]
    UnknownComponentType { tag: String, location: Location },

    /// No explicit class and no default class declared for the role.
    #[error("Cannot find a class for role {role} at {location}")]
    MissingClass { role: String, location: Location },

    /// A finalized component already occupies the role.
    #[error("Duplicate component definition for role {role} at {location}")]
    DuplicateDefinition { role: String, location: Location },

    /// Shorthand rebound to a different role.
    #[error("Shorthand '{shorthand}' already used for role {previous}: inconsistent declaration of {role} at {location}")]
    InconsistentShorthand {
        shorthand: String,
        previous: String,
        role: String,
        location: Location,
    },

    /// Default class redeclared with a different class name.
    #[error("Invalid redeclaration: default class already set to {existing} for role {role}, found {declared} at {location}")]
    InconsistentDefaultClass {
        role: String,
        existing: String,
        declared: String,
        location: Location,
    },

    /// Hint redeclared with a different class name.
    #[error("Invalid redeclaration: class already set to {existing} for hint '{hint}' of role {role}, found {declared} at {location}")]
    InconsistentHint {
        role: String,
        hint: String,
        existing: String,
        declared: String,
        location: Location,
    },

    /// Include statement without `src` or `dir`.
    #[error("Include statement must either have a 'src' or 'dir' attribute, at {location}")]
    MissingIncludeTarget { location: Location },

    /// Directory include pointing at something that cannot be traversed.
    #[error("Include directory '{uri}' is not a collection, at {location}")]
    NotACollection { uri: String, location: Location },

    /// Included document with an unsupported root element.
    #[error("Unknown document '{kind}' included at {location}")]
    UnknownDocumentKind { kind: String, location: Location },

    /// Element other than `role` or `alias` inside a role document.
    #[error("Unexpected '{element}' element at {location}")]
    UnexpectedElement { element: String, location: Location },

    /// Required attribute absent from a declaration.
    #[error("Missing attribute '{attribute}' on <{element}> at {location}")]
    MissingAttribute {
        element: String,
        attribute: String,
        location: Location,
    },

    /// Selector child that resolves to no class (strict mode only).
    #[error("No class for selector entry '{role}' at {location}")]
    SelectorChildWithoutClass { role: String, location: Location },

    /// Resource behind a document or include could not be loaded.
    #[error("Cannot load '{uri}'{}: {source}", .location.as_ref().map(|l| format!(" at {l}")).unwrap_or_default())]
    Load {
        uri: String,
        location: Option<Location>,
        #[source]
        source: ResourceError,
    },

    /// `pool-max` that is not a non-negative integer.
    #[error("Invalid pool-max '{value}' for role {role}")]
    InvalidPoolMax { role: String, value: String },

    /// Emitter cannot infer the model of a type it knows nothing about.
    #[error("Cannot determine component model of class {class_name} for role {role}")]
    UnknownType { role: String, class_name: String },

    /// Bean name of a pooled component's prototype is already a role.
    #[error("Pooled component {role} needs the bean name {bean}, which another component already uses")]
    PooledNameTaken { role: String, bean: String },

    /// Resource failure outside any document, such as an unusable base
    /// directory.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// IO error while writing generated output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for component bridge operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
