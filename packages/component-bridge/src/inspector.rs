//! Type capability inspection used to infer undeclared component models.

use std::collections::HashMap;

use crate::component::ComponentModel;

/// Capability a component type declares about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCapability {
    /// Safe to share one instance.
    ThreadSafe,
    /// Instances can be recycled through a pool.
    Poolable,
    /// Neither; a fresh instance is needed per lookup.
    Plain,
}

impl TypeCapability {
    /// Model a component of this type gets when none was declared.
    #[must_use]
    pub fn model(self) -> ComponentModel {
        match self {
            Self::ThreadSafe => ComponentModel::Singleton,
            Self::Poolable => ComponentModel::Pooled,
            Self::Plain => ComponentModel::Primitive,
        }
    }
}

/// Answers capability questions about implementation types.
pub trait TypeInspector {
    /// Capability of `class_name`, or `None` if the type is unknown.
    fn inspect(&self, class_name: &str) -> Option<TypeCapability>;
}

/// Inspector backed by a fixed table of type names.
#[derive(Debug, Clone, Default)]
pub struct StaticTypeInspector {
    capabilities: HashMap<String, TypeCapability>,
    fallback: Option<TypeCapability>,
}

impl StaticTypeInspector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the capability of a type.
    #[must_use]
    pub fn with_type(mut self, class_name: impl Into<String>, capability: TypeCapability) -> Self {
        self.insert(class_name, capability);
        self
    }

    /// Capability reported for types not in the table.
    #[must_use]
    pub fn with_fallback(mut self, capability: TypeCapability) -> Self {
        self.fallback = Some(capability);
        self
    }

    pub fn insert(&mut self, class_name: impl Into<String>, capability: TypeCapability) {
        self.capabilities.insert(class_name.into(), capability);
    }
}

impl TypeInspector for StaticTypeInspector {
    fn inspect(&self, class_name: &str) -> Option<TypeCapability> {
        self.capabilities.get(class_name).copied().or(self.fallback)
    }
}
