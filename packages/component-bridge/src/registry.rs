//! Resolved configuration state for one container scope.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use indexmap::IndexMap;

use crate::component::ComponentInfo;

/// Shorthands, pending role declarations, hints, finalized components and
/// bean imports of one scope.
///
/// Components and pending roles keep insertion order so emitted documents
/// are stable across runs.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationInfo {
    shorthands: HashMap<String, String>,
    roles: IndexMap<String, ComponentInfo>,
    hints: HashMap<String, HashMap<String, ComponentInfo>>,
    components: IndexMap<String, ComponentInfo>,
    imports: Vec<String>,
    root_logger: Option<String>,
}

impl ConfigurationInfo {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a child scope from `parent`.
    ///
    /// Shorthands, pending roles and hints are copied by value. Selector
    /// components of the parent are re-imported as pending roles so the
    /// child can redeclare them by shorthand without a class.
    #[must_use]
    pub fn inherit(parent: &ConfigurationInfo) -> Self {
        let mut info = Self {
            shorthands: parent.shorthands.clone(),
            roles: parent.roles.clone(),
            hints: parent.hints.clone(),
            ..Self::default()
        };
        for component in parent.components.values().filter(|c| c.is_selector()) {
            info.roles
                .insert(component.role().to_string(), component.clone());
        }
        info
    }

    /// Shorthand name to role.
    pub fn shorthands(&self) -> &HashMap<String, String> {
        &self.shorthands
    }

    /// Look up the role bound to a shorthand.
    pub fn shorthand(&self, shorthand: &str) -> Option<&str> {
        self.shorthands.get(shorthand).map(String::as_str)
    }

    /// Bind a shorthand to a role, returning the previous binding.
    pub fn add_shorthand(&mut self, shorthand: impl Into<String>, role: impl Into<String>) -> Option<String> {
        self.shorthands.insert(shorthand.into(), role.into())
    }

    /// Pending role declarations (default classes not yet instantiated).
    pub fn roles(&self) -> impl Iterator<Item = &ComponentInfo> {
        self.roles.values()
    }

    /// Look up a pending role declaration without claiming it.
    pub fn role(&self, role: &str) -> Option<&ComponentInfo> {
        self.roles.get(role)
    }

    /// Stage a pending role declaration.
    pub fn add_role(&mut self, info: ComponentInfo) {
        self.roles.insert(info.role().to_string(), info);
    }

    /// Take ownership of a pending role declaration.
    ///
    /// A declaration can be claimed at most once; later claims return `None`.
    pub fn claim_role(&mut self, role: &str) -> Option<ComponentInfo> {
        self.roles.shift_remove(role)
    }

    /// Remove and return every pending role, in declaration order.
    pub fn drain_roles(&mut self) -> Vec<ComponentInfo> {
        self.roles.drain(..).map(|(_, info)| info).collect()
    }

    /// Hint tables by role.
    pub fn hints(&self) -> &HashMap<String, HashMap<String, ComponentInfo>> {
        &self.hints
    }

    /// Look up a hint of a role.
    pub fn hint(&self, role: &str, hint: &str) -> Option<&ComponentInfo> {
        self.hints.get(role).and_then(|table| table.get(hint))
    }

    /// Register a hint, returning the existing entry instead if one is
    /// already registered for `(role, hint)`.
    pub fn add_hint(&mut self, role: &str, hint: &str, info: ComponentInfo) -> Result<(), &ComponentInfo> {
        match self.hints.entry(role.to_string()).or_default().entry(hint.to_string()) {
            Entry::Occupied(existing) => Err(&*existing.into_mut()),
            Entry::Vacant(slot) => {
                slot.insert(info);
                Ok(())
            }
        }
    }

    /// Finalized components by role.
    pub fn components(&self) -> &IndexMap<String, ComponentInfo> {
        &self.components
    }

    /// Mutable access for in-place rewrites such as model inference.
    pub fn components_mut(&mut self) -> &mut IndexMap<String, ComponentInfo> {
        &mut self.components
    }

    /// Look up a finalized component.
    pub fn component(&self, role: &str) -> Option<&ComponentInfo> {
        self.components.get(role)
    }

    /// Check whether a role is taken by a finalized component.
    pub fn has_component(&self, role: &str) -> bool {
        self.components.contains_key(role)
    }

    /// Add a finalized component keyed by its role.
    ///
    /// Fails with the rejected descriptor if the role is already taken.
    pub fn add_component(&mut self, info: ComponentInfo) -> Result<(), ComponentInfo> {
        if self.components.contains_key(info.role()) {
            return Err(info);
        }
        self.components.insert(info.role().to_string(), info);
        Ok(())
    }

    /// Move the components at `roles` to `role + suffix`, keeping order.
    ///
    /// Nothing moves if a new key is already a role; the first such role is
    /// returned instead.
    pub fn rename_components(&mut self, roles: &[String], suffix: &str) -> Result<(), String> {
        if let Some(taken) = roles
            .iter()
            .find(|role| self.components.contains_key(&format!("{role}{suffix}")))
        {
            return Err(taken.clone());
        }
        if roles.is_empty() {
            return Ok(());
        }
        let components = std::mem::take(&mut self.components);
        self.components = components
            .into_iter()
            .map(|(role, info)| {
                if roles.contains(&role) {
                    (format!("{role}{suffix}"), info)
                } else {
                    (role, info)
                }
            })
            .collect();
        Ok(())
    }

    /// Bean documents imported verbatim into the generated output.
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn add_import(&mut self, uri: impl Into<String>) {
        self.imports.push(uri.into());
    }

    pub fn root_logger(&self) -> Option<&str> {
        self.root_logger.as_deref()
    }

    pub fn set_root_logger(&mut self, logger: Option<String>) {
        self.root_logger = logger;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_role_only_once() {
        let mut info = ConfigurationInfo::new();
        info.add_role(ComponentInfo::new("org.x.Greeter", "impl.Greeter"));

        assert!(info.role("org.x.Greeter").is_some());
        let claimed = info.claim_role("org.x.Greeter");
        assert_eq!(claimed.map(|c| c.class_name().to_string()), Some("impl.Greeter".to_string()));
        assert!(info.claim_role("org.x.Greeter").is_none());
        assert!(info.role("org.x.Greeter").is_none());
    }

    #[test]
    fn test_add_component_rejects_duplicate() {
        let mut info = ConfigurationInfo::new();
        assert!(info.add_component(ComponentInfo::new("org.x.A", "impl.A")).is_ok());

        let rejected = info
            .add_component(ComponentInfo::new("org.x.A", "impl.Other"))
            .unwrap_err();
        assert_eq!(rejected.class_name(), "impl.Other");
        assert_eq!(info.component("org.x.A").unwrap().class_name(), "impl.A");
    }

    #[test]
    fn test_add_hint_reports_existing() {
        let mut info = ConfigurationInfo::new();
        info.add_hint("org.x.GeneratorSelector", "file", ComponentInfo::new("", "impl.File"))
            .unwrap();

        let existing = info
            .add_hint("org.x.GeneratorSelector", "file", ComponentInfo::new("", "impl.Other"))
            .unwrap_err();
        assert_eq!(existing.class_name(), "impl.File");
        assert_eq!(
            info.hint("org.x.GeneratorSelector", "file").unwrap().class_name(),
            "impl.File"
        );
    }

    #[test]
    fn test_components_keep_insertion_order() {
        let mut info = ConfigurationInfo::new();
        for role in ["c", "a", "b"] {
            info.add_component(ComponentInfo::new(role, "impl.X")).unwrap();
        }
        let roles: Vec<&str> = info.components().keys().map(String::as_str).collect();
        assert_eq!(roles, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_rename_components_keeps_order() {
        let mut info = ConfigurationInfo::new();
        for role in ["a", "pool", "b"] {
            info.add_component(ComponentInfo::new(role, "impl.X")).unwrap();
        }
        info.rename_components(&["pool".to_string()], "Pooled").unwrap();

        let roles: Vec<&str> = info.components().keys().map(String::as_str).collect();
        assert_eq!(roles, vec!["a", "poolPooled", "b"]);
    }

    #[test]
    fn test_rename_components_refuses_taken_key() {
        let mut info = ConfigurationInfo::new();
        for role in ["pool", "poolPooled"] {
            info.add_component(ComponentInfo::new(role, "impl.X")).unwrap();
        }

        let taken = info.rename_components(&["pool".to_string()], "Pooled").unwrap_err();

        assert_eq!(taken, "pool");
        let roles: Vec<&str> = info.components().keys().map(String::as_str).collect();
        assert_eq!(roles, vec!["pool", "poolPooled"]);
    }

    #[test]
    fn test_inherit_copies_tables_and_selectors() {
        let mut parent = ConfigurationInfo::new();
        parent.add_shorthand("greeter", "org.x.Greeter");
        parent.add_role(ComponentInfo::new("org.x.Greeter", "impl.Greeter"));
        parent
            .add_hint("org.x.GeneratorSelector", "file", ComponentInfo::new("", "impl.File"))
            .unwrap();
        parent
            .add_component(ComponentInfo::new("org.x.GeneratorSelector", "impl.ComponentsSelector"))
            .unwrap();
        parent
            .add_component(ComponentInfo::new("org.x.Store", "impl.Store"))
            .unwrap();
        parent.add_import("file:///conf/beans.xml");

        let mut child = ConfigurationInfo::inherit(&parent);
        assert_eq!(child.shorthand("greeter"), Some("org.x.Greeter"));
        assert!(child.hint("org.x.GeneratorSelector", "file").is_some());
        assert!(child.role("org.x.Greeter").is_some());
        assert!(child.role("org.x.GeneratorSelector").is_some());
        assert!(child.role("org.x.Store").is_none());
        assert!(child.components().is_empty());
        assert!(child.imports().is_empty());

        // copies, not shared tables
        child.add_shorthand("greeter", "org.x.Other");
        child.claim_role("org.x.Greeter");
        assert_eq!(parent.shorthand("greeter"), Some("org.x.Greeter"));
        assert!(parent.role("org.x.Greeter").is_some());
    }

    #[test]
    fn test_drain_roles() {
        let mut info = ConfigurationInfo::new();
        info.add_role(ComponentInfo::new("b", "impl.B"));
        info.add_role(ComponentInfo::new("a", "impl.A"));

        let drained: Vec<String> = info.drain_roles().iter().map(|c| c.role().to_string()).collect();
        assert_eq!(drained, vec!["b", "a"]);
        assert_eq!(info.roles().count(), 0);
    }
}
