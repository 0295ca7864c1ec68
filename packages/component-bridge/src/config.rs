//! Configuration constants and options for reading and emitting.

use std::collections::HashMap;

/// Class name suffix marking a selector component.
pub const SELECTOR_SUFFIX: &str = "Selector";

/// Suffix appended to the bean name of a pooled prototype.
pub const POOLED_SUFFIX: &str = "Pooled";

/// Root element of a component-instance document.
pub const COMPONENTS_DOCUMENT: &str = "components";

/// Root elements of a role-declaration document.
pub const ROLE_DOCUMENTS: [&str; 2] = ["role-list", "roles"];

/// Include directive parsed as configuration.
pub const INCLUDE_ELEMENT: &str = "include";

/// Include directive passed through to the bean document.
pub const INCLUDE_BEANS_ELEMENT: &str = "include-beans";

/// Root document attribute naming a sibling role document.
pub const USER_ROLES_ATTRIBUTE: &str = "user-roles";

/// Root document attribute naming the root logger.
pub const LOGGER_ATTRIBUTE: &str = "logger";

/// Default wrapper type for flattened selectors.
pub const DEFAULT_SELECTOR_ADAPTER: &str =
    "org.apache.cocoon.core.container.spring.avalon.AvalonServiceSelector";

/// Default factory type for pooled components.
pub const DEFAULT_POOL_FACTORY: &str =
    "org.apache.cocoon.core.container.spring.avalon.PoolableFactoryBean";

/// Opening of the generated bean document.
pub const BEANS_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<beans xmlns="http://www.springframework.org/schema/beans"
       xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
       xsi:schemaLocation="http://www.springframework.org/schema/beans http://www.springframework.org/schema/beans/spring-beans-2.0.xsd">
"#;

/// Closing of the generated bean document.
pub const BEANS_FOOTER: &str = "</beans>\n";

/// Check whether a root element names a role-declaration document.
#[must_use]
pub fn is_role_document(kind: &str) -> bool {
    ROLE_DOCUMENTS.contains(&kind)
}

/// Strip a trailing [`SELECTOR_SUFFIX`] from a role.
///
/// # Examples
/// ```
/// use component_bridge::config::selector_family;
///
/// assert_eq!(selector_family("org.x.GeneratorSelector"), "org.x.Generator");
/// assert_eq!(selector_family("org.x.Generators"), "org.x.Generators");
/// ```
#[must_use]
pub fn selector_family(role: &str) -> &str {
    role.strip_suffix(SELECTOR_SUFFIX).unwrap_or(role)
}

/// Options for a read pass.
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    /// Values for `${name}` placeholders in attribute values.
    pub properties: HashMap<String, String>,
    /// Sort directory include targets by file name instead of keeping the
    /// resolver's order.
    pub sort_directory_includes: bool,
    /// Fail on selector entries without a class instead of skipping them.
    pub strict_selector_children: bool,
}

impl ReaderConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Sort directory include targets.
    #[must_use]
    pub fn with_sorted_directory_includes(mut self, sort: bool) -> Self {
        self.sort_directory_includes = sort;
        self
    }

    /// Treat classless selector entries as errors.
    #[must_use]
    pub fn with_strict_selector_children(mut self, strict: bool) -> Self {
        self.strict_selector_children = strict;
        self
    }
}

/// Target type names used by the bean emitter.
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Wrapper type for selector components.
    pub selector_adapter: String,
    /// Factory type for pooled components.
    pub pool_factory: String,
    /// Init method of the pool factory.
    pub pool_factory_init: String,
    /// Destroy method of the pool factory.
    pub pool_factory_destroy: String,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            selector_adapter: DEFAULT_SELECTOR_ADAPTER.to_string(),
            pool_factory: DEFAULT_POOL_FACTORY.to_string(),
            pool_factory_init: "initialize".to_string(),
            pool_factory_destroy: "dispose".to_string(),
        }
    }
}
