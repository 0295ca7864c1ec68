//! Reading component configuration documents into a registry.
//!
//! A read pass walks a root document and everything it includes:
//!
//! 1. `include` statements load further component or role documents, each
//!    at most once per pass
//! 2. `include-beans` statements are recorded as imports without parsing
//! 3. role documents are applied immediately (shorthands, default classes,
//!    hints)
//! 4. every other element is staged as a component declaration
//!
//! Staged declarations are resolved after the whole include tree has been
//! walked, so a role declared by a later include can still supply the
//! default class of an earlier component. Finally, default classes nobody
//! instantiated are added as lazily initialized components.

mod components;
mod include;
mod roles;

use std::collections::HashSet;

use tracing::debug;
use url::Url;

use crate::config::{is_role_document, ReaderConfig, LOGGER_ATTRIBUTE, USER_ROLES_ATTRIBUTE};
use crate::error::{ConfigError, ResourceError, Result};
use crate::registry::ConfigurationInfo;
use crate::resource::{Resource, ResourceResolver};
use crate::xml::{parse_document, Element, Location};

/// Read a root document (and everything it includes) into a new registry.
///
/// # Arguments
/// * `root_uri` - URI of the root document, resolved without context
/// * `resolver` - Resolver for the root and all includes
/// * `config` - Read options
pub fn read_configuration(
    root_uri: &str,
    resolver: &dyn ResourceResolver,
    config: &ReaderConfig,
) -> Result<ConfigurationInfo> {
    ConfigReader::new(resolver, config).read_configuration(root_uri)
}

/// Read an already parsed role document and component document.
///
/// When `parent` is given, the new registry starts as a child scope of it
/// (see [`ConfigurationInfo::inherit`]).
pub fn read_documents(
    roles: Option<&Element>,
    components: &Element,
    parent: Option<&ConfigurationInfo>,
    resolver: &dyn ResourceResolver,
    config: &ReaderConfig,
) -> Result<ConfigurationInfo> {
    let reader = match parent {
        Some(parent) => ConfigReader::with_parent(resolver, config, parent),
        None => ConfigReader::new(resolver, config),
    };
    reader.read_documents(roles, components, None)
}

/// State of one read pass.
///
/// A reader is consumed by the pass it runs, so the set of loaded URIs never
/// leaks into another pass.
pub struct ConfigReader<'r> {
    resolver: &'r dyn ResourceResolver,
    config: &'r ReaderConfig,
    info: ConfigurationInfo,
    declarations: Vec<Element>,
    loaded: HashSet<String>,
}

impl<'r> ConfigReader<'r> {
    /// Create a reader for a top-level scope.
    #[must_use]
    pub fn new(resolver: &'r dyn ResourceResolver, config: &'r ReaderConfig) -> Self {
        Self::with_info(resolver, config, ConfigurationInfo::new())
    }

    /// Create a reader for a child scope of `parent`.
    #[must_use]
    pub fn with_parent(
        resolver: &'r dyn ResourceResolver,
        config: &'r ReaderConfig,
        parent: &ConfigurationInfo,
    ) -> Self {
        Self::with_info(resolver, config, ConfigurationInfo::inherit(parent))
    }

    fn with_info(
        resolver: &'r dyn ResourceResolver,
        config: &'r ReaderConfig,
        info: ConfigurationInfo,
    ) -> Self {
        Self {
            resolver,
            config,
            info,
            declarations: Vec::new(),
            loaded: HashSet::new(),
        }
    }

    /// Read a root document by URI.
    ///
    /// A `user-roles` attribute on the root names a role document, resolved
    /// relative to the root, that is applied before the root's own content.
    pub fn read_configuration(mut self, root_uri: &str) -> Result<ConfigurationInfo> {
        let resource = self
            .resolver
            .resolve(root_uri, None)
            .map_err(|source| load_error(root_uri, None, source))?;
        let uri = resource.absolute_uri().to_string();
        let root = self.load_document(resource.as_ref(), None)?;
        self.loaded.insert(uri.clone());

        self.info
            .set_root_logger(root.attribute(LOGGER_ATTRIBUTE).map(str::to_string));

        if let Some(user_roles) = root.attribute(USER_ROLES_ATTRIBUTE) {
            let resource = self
                .resolver
                .resolve(user_roles, Some(uri.as_str()))
                .map_err(|source| load_error(user_roles, Some(root.location()), source))?;
            let roles = self.load_document(resource.as_ref(), Some(root.location()))?;
            self.loaded.insert(resource.absolute_uri().to_string());
            self.configure_roles(&roles)?;
        }

        self.read_root(&root, Some(uri.as_str()))?;
        self.finish()
    }

    /// Apply a standalone role document before the read pass.
    ///
    /// The document is marked as loaded, so an include of the same URI later
    /// in the pass is skipped.
    pub fn read_roles(&mut self, uri: &str) -> Result<()> {
        let resource = self
            .resolver
            .resolve(uri, None)
            .map_err(|source| load_error(uri, None, source))?;
        let roles = self.load_document(resource.as_ref(), None)?;
        self.loaded.insert(resource.absolute_uri().to_string());
        self.configure_roles(&roles)
    }

    /// Read parsed documents.
    ///
    /// `roles` is applied first, then `components`, then `additional` (which
    /// has no include base of its own). Relative includes in `components`
    /// resolve against its system id when that is an absolute URI.
    pub fn read_documents(
        mut self,
        roles: Option<&Element>,
        components: &Element,
        additional: Option<&Element>,
    ) -> Result<ConfigurationInfo> {
        if let Some(roles) = roles {
            self.configure_roles(roles)?;
        }
        let base = document_uri(components);
        self.read_root(components, base.as_deref())?;
        if let Some(additional) = additional {
            self.parse_configuration(additional, None)?;
        }
        self.finish()
    }

    fn read_root(&mut self, root: &Element, uri: Option<&str>) -> Result<()> {
        if is_role_document(root.name()) {
            self.configure_roles(root)
        } else {
            self.parse_configuration(root, uri)
        }
    }

    /// Resolve staged components, then promote unclaimed default classes.
    fn finish(mut self) -> Result<ConfigurationInfo> {
        self.process_components()?;

        for mut info in self.info.drain_roles() {
            if !info.has_configured_lazy_init() {
                info.set_lazy_init(true);
            }
            if let Err(existing) = self.info.add_component(info) {
                debug!(role = existing.role(), "Role already instantiated, keeping component");
            }
        }

        debug!(
            components = self.info.components().len(),
            imports = self.info.imports().len(),
            documents = self.loaded.len(),
            "Configuration resolved"
        );
        Ok(self.info)
    }

    /// Read and parse one resource.
    fn load_document(&self, resource: &dyn Resource, location: Option<&Location>) -> Result<Element> {
        let uri = resource.absolute_uri();
        debug!(uri, last_modified = ?resource.last_modified(), "Loading configuration");

        let text = resource
            .read_to_string()
            .map_err(|source| load_error(uri, location, source))?;
        parse_document(&text, uri, &self.config.properties).map_err(|source| {
            load_error(
                uri,
                location,
                ResourceError::Parse {
                    uri: uri.to_string(),
                    source,
                },
            )
        })
    }
}

fn load_error(uri: &str, location: Option<&Location>, source: ResourceError) -> ConfigError {
    ConfigError::Load {
        uri: uri.to_string(),
        location: location.cloned(),
        source,
    }
}

/// System id of a parsed document, when it is an absolute URI.
fn document_uri(document: &Element) -> Option<String> {
    let system_id = &document.location().system_id;
    Url::parse(system_id).ok().map(|_| system_id.to_string())
}
