//! Component descriptors.

use std::fmt;

use crate::config::SELECTOR_SUFFIX;
use crate::xml::Element;

/// Instancing policy of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentModel {
    /// Not declared; inferred by the emitter from the type's capabilities.
    #[default]
    Unknown,
    /// One shared instance.
    Singleton,
    /// Instances borrowed from a pool.
    Pooled,
    /// A fresh instance per lookup.
    Primitive,
}

impl ComponentModel {
    /// Parse the value of a `model` attribute.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "singleton" => Some(Self::Singleton),
            "pooled" => Some(Self::Pooled),
            "primitive" => Some(Self::Primitive),
            _ => None,
        }
    }

    /// Return the attribute spelling of this model.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Singleton => "singleton",
            Self::Pooled => "pooled",
            Self::Primitive => "primitive",
        }
    }
}

impl fmt::Display for ComponentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a component resolves to one implementation or fans out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentKind {
    /// A single implementation.
    #[default]
    Service,
    /// A dispatcher whose children are registered as separate components.
    Selector,
}

impl ComponentKind {
    /// Classify a class name by the selector suffix convention.
    #[must_use]
    pub fn of_class(class_name: &str) -> Self {
        if class_name.ends_with(SELECTOR_SUFFIX) {
            Self::Selector
        } else {
            Self::Service
        }
    }
}

/// One resolvable component.
///
/// Cloning produces an independent descriptor; the reader clones pending
/// role declarations so named instances never disturb the shared default.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentInfo {
    role: String,
    class_name: String,
    kind: ComponentKind,
    alias: Option<String>,
    model: ComponentModel,
    lazy_init: Option<bool>,
    init_method: Option<String>,
    destroy_method: Option<String>,
    pool_in_method: Option<String>,
    pool_out_method: Option<String>,
    default_value: Option<String>,
    configuration: Option<Element>,
}

impl ComponentInfo {
    /// Create a descriptor for `role` implemented by `class_name`.
    #[must_use]
    pub fn new(role: impl Into<String>, class_name: impl Into<String>) -> Self {
        let mut info = Self {
            role: role.into(),
            ..Self::default()
        };
        info.set_class_name(class_name);
        info
    }

    /// Apply the lifecycle and model attributes of a declaration.
    ///
    /// Only attributes present on the element are applied, so filling a
    /// clone of a role declaration keeps the role's values as defaults.
    pub fn fill(&mut self, element: &Element) {
        if let Some(model) = element.attribute("model").and_then(ComponentModel::parse) {
            self.model = model;
        }
        if let Some(lazy) = element.attribute("lazy-init") {
            self.lazy_init = Some(lazy.trim() == "true");
        }
        let methods = [
            ("init", &mut self.init_method),
            ("destroy", &mut self.destroy_method),
            ("pool-in", &mut self.pool_in_method),
            ("pool-out", &mut self.pool_out_method),
            ("default", &mut self.default_value),
        ];
        for (attribute, slot) in methods {
            if let Some(value) = element.attribute(attribute) {
                *slot = Some(value.to_string());
            }
        }
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn set_role(&mut self, role: impl Into<String>) {
        self.role = role.into();
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Set the implementation class and reclassify the component kind.
    pub fn set_class_name(&mut self, class_name: impl Into<String>) {
        self.class_name = class_name.into();
        self.kind = ComponentKind::of_class(&self.class_name);
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Check whether this component is a selector.
    pub fn is_selector(&self) -> bool {
        self.kind == ComponentKind::Selector
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn set_alias(&mut self, alias: Option<String>) {
        self.alias = alias;
    }

    pub fn model(&self) -> ComponentModel {
        self.model
    }

    pub fn set_model(&mut self, model: ComponentModel) {
        self.model = model;
    }

    /// Whether the component is initialized lazily.
    pub fn is_lazy_init(&self) -> bool {
        self.lazy_init.unwrap_or(false)
    }

    /// Whether `lazy-init` was set explicitly.
    pub fn has_configured_lazy_init(&self) -> bool {
        self.lazy_init.is_some()
    }

    pub fn set_lazy_init(&mut self, lazy: bool) {
        self.lazy_init = Some(lazy);
    }

    pub fn init_method(&self) -> Option<&str> {
        self.init_method.as_deref()
    }

    pub fn destroy_method(&self) -> Option<&str> {
        self.destroy_method.as_deref()
    }

    pub fn pool_in_method(&self) -> Option<&str> {
        self.pool_in_method.as_deref()
    }

    pub fn pool_out_method(&self) -> Option<&str> {
        self.pool_out_method.as_deref()
    }

    /// Default hint of a selector.
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Raw declaration this descriptor was built from.
    pub fn configuration(&self) -> Option<&Element> {
        self.configuration.as_ref()
    }

    pub fn set_configuration(&mut self, configuration: Element) {
        self.configuration = Some(configuration);
    }

    /// The `pool-max` attribute of the raw declaration, unparsed.
    pub fn pool_max(&self) -> Option<&str> {
        self.configuration
            .as_ref()
            .and_then(|c| c.attribute("pool-max"))
    }
}
