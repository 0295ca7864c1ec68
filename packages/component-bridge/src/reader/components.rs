//! Resolution of staged component declarations.

use tracing::{debug, warn};

use super::ConfigReader;
use crate::component::ComponentInfo;
use crate::config::selector_family;
use crate::error::{ConfigError, Result};
use crate::xml::Element;

impl ConfigReader<'_> {
    /// Resolve every staged declaration into a finalized component.
    pub(super) fn process_components(&mut self) -> Result<()> {
        let declarations = std::mem::take(&mut self.declarations);
        debug!(count = declarations.len(), "Resolving component declarations");
        for declaration in &declarations {
            self.process_component(declaration)?;
        }
        Ok(())
    }

    fn process_component(&mut self, element: &Element) -> Result<()> {
        let tag = element.name();
        let (base_role, shorthand) = match element.attribute("role") {
            Some(role) => (role.to_string(), None),
            None => match self.info.shorthand(tag) {
                Some(role) => (role.to_string(), Some(tag.to_string())),
                None => {
                    return Err(ConfigError::UnknownComponentType {
                        tag: tag.to_string(),
                        location: element.location().clone(),
                    })
                }
            },
        };
        let name = element.attribute("name");

        let mut info = match element.attribute("class") {
            Some(class_name) => ComponentInfo::new(base_role.as_str(), class_name),
            None => self.pending_descriptor(&base_role, name.is_some(), element)?,
        };

        let mut role = base_role.clone();
        let mut alias = shorthand;
        if let Some(name) = name {
            role = format!("{role}/{name}");
            alias = alias.map(|alias| format!("{alias}-{name}"));
        }

        info.fill(element);
        info.set_role(role.as_str());
        info.set_alias(alias);
        info.set_configuration(element.clone());

        let is_selector = info.is_selector();
        self.register(info, element)?;

        if is_selector {
            self.flatten_selector(&role, element)?;
        }
        Ok(())
    }

    /// Base descriptor from the pending declaration of `role`.
    ///
    /// Named instances and selectors work on a copy; an unnamed service
    /// instance claims the declaration.
    fn pending_descriptor(&mut self, role: &str, named: bool, element: &Element) -> Result<ComponentInfo> {
        let missing = || ConfigError::MissingClass {
            role: role.to_string(),
            location: element.location().clone(),
        };

        let shared = match self.info.role(role) {
            Some(pending) => named || pending.is_selector(),
            None if self.info.has_component(role) => {
                return Err(ConfigError::DuplicateDefinition {
                    role: role.to_string(),
                    location: element.location().clone(),
                })
            }
            None => return Err(missing()),
        };

        let info = if shared {
            self.info.role(role).cloned()
        } else {
            self.info.claim_role(role)
        };
        info.ok_or_else(missing)
    }

    /// Register each child of a selector declaration as its own component.
    ///
    /// A child takes its class from `class`, then `src`, then the hint table
    /// of the selector role keyed by the child's tag.
    fn flatten_selector(&mut self, role: &str, element: &Element) -> Result<()> {
        let family = selector_family(role);

        for child in element.children() {
            let name = child.required_attribute("name")?;
            let child_role = format!("{family}/{name}");

            let explicit = child.attribute("class").or_else(|| child.attribute("src"));
            let mut info = match (explicit, self.info.hint(role, child.name())) {
                (Some(class_name), _) => ComponentInfo::new(child_role.as_str(), class_name),
                (None, Some(hint)) => {
                    let mut info = hint.clone();
                    info.set_role(child_role.as_str());
                    info.set_alias(None);
                    info
                }
                (None, None) if self.config.strict_selector_children => {
                    return Err(ConfigError::SelectorChildWithoutClass {
                        role: child_role,
                        location: child.location().clone(),
                    });
                }
                (None, None) => {
                    warn!(
                        role = %child_role,
                        hint = child.name(),
                        location = %child.location(),
                        "No class for selector entry, skipping"
                    );
                    continue;
                }
            };

            info.fill(child);
            info.set_configuration(child.clone());
            self.register(info, child)?;
        }
        Ok(())
    }

    fn register(&mut self, info: ComponentInfo, element: &Element) -> Result<()> {
        self.info
            .add_component(info)
            .map_err(|rejected| ConfigError::DuplicateDefinition {
                role: rejected.role().to_string(),
                location: element.location().clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::read;
    use crate::component::ComponentModel;
    use crate::config::ReaderConfig;
    use crate::error::ConfigError;
    use crate::reader::{read_configuration, read_documents};
    use crate::resource::MemoryResourceResolver;
    use crate::xml::parse_document;

    const ROLES: &str = r#"<role-list>
        <role name="org.x.Greeter" shorthand="greeter" default-class="impl.DefaultGreeter" pool-in="recycle"/>
        <role name="org.x.GeneratorSelector" shorthand="generators" default-class="impl.ComponentsSelector">
          <hint shorthand="file" class="impl.FileGenerator"/>
        </role>
    </role-list>"#;

    fn read_with_roles(components: &str) -> crate::error::Result<crate::registry::ConfigurationInfo> {
        let root = format!(r#"<components user-roles="roles.xml">{components}</components>"#);
        read(&[("file:///conf/app.xconf", &root), ("file:///conf/roles.xml", ROLES)])
    }

    fn roles_of(info: &crate::registry::ConfigurationInfo) -> Vec<&str> {
        info.components().keys().map(String::as_str).collect()
    }

    #[test]
    fn test_named_instances_do_not_claim_default() {
        let info = read_with_roles(r#"<greeter name="loud"/><greeter name="quiet"/><greeter/>"#).unwrap();

        assert_eq!(
            roles_of(&info)[..3],
            ["org.x.Greeter/loud", "org.x.Greeter/quiet", "org.x.Greeter"]
        );
        let loud = info.component("org.x.Greeter/loud").unwrap();
        assert_eq!(loud.class_name(), "impl.DefaultGreeter");
        assert_eq!(loud.alias(), Some("greeter-loud"));
        assert_eq!(loud.pool_in_method(), Some("recycle"));
        assert!(!info.component("org.x.Greeter").unwrap().is_lazy_init());
    }

    #[test]
    fn test_second_unnamed_instance_is_duplicate() {
        let err = read_with_roles(r#"<greeter/><greeter/>"#).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::DuplicateDefinition { ref role, .. } if role == "org.x.Greeter"
        ));
    }

    #[test]
    fn test_explicit_role_claims_default() {
        let err = read_with_roles(r#"<component role="org.x.Greeter"/><greeter/>"#).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateDefinition { .. }));
    }

    #[test]
    fn test_explicit_role_has_no_alias() {
        let info = read_with_roles(
            r#"<component role="org.x.Greeter" name="x"/><component role="org.x.Greeter"/>"#,
        )
        .unwrap();

        let greeter = info.component("org.x.Greeter").unwrap();
        assert_eq!(greeter.class_name(), "impl.DefaultGreeter");
        assert_eq!(greeter.alias(), None);
        assert_eq!(info.component("org.x.Greeter/x").unwrap().alias(), None);
    }

    #[test]
    fn test_explicit_class_starts_fresh_descriptor() {
        let info = read_with_roles(r#"<greeter class="impl.LoudGreeter" init="start"/>"#).unwrap();

        let greeter = info.component("org.x.Greeter").unwrap();
        assert_eq!(greeter.class_name(), "impl.LoudGreeter");
        assert_eq!(greeter.alias(), Some("greeter"));
        assert_eq!(greeter.init_method(), Some("start"));
        assert_eq!(greeter.pool_in_method(), None);
        assert!(!greeter.is_lazy_init());
    }

    #[test]
    fn test_unknown_component_type() {
        let err = read_with_roles("\n<farewell/>").unwrap_err();

        match err {
            ConfigError::UnknownComponentType { tag, location } => {
                assert_eq!(tag, "farewell");
                assert_eq!(location.line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_role_without_class() {
        let err = read_with_roles(r#"<component role="org.x.Unknown"/>"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingClass { ref role, .. } if role == "org.x.Unknown"));
    }

    #[test]
    fn test_declaration_attributes_override_role_defaults() {
        let info = read_with_roles(r#"<greeter model="singleton" pool-in="reuse" lazy-init="true"/>"#).unwrap();

        let greeter = info.component("org.x.Greeter").unwrap();
        assert_eq!(greeter.model(), ComponentModel::Singleton);
        assert_eq!(greeter.pool_in_method(), Some("reuse"));
        assert!(greeter.is_lazy_init());
        assert_eq!(greeter.configuration().map(|c| c.name()), Some("greeter"));
    }

    #[test]
    fn test_selector_children_flattened_in_precedence_order() {
        let info = read_with_roles(
            r#"<generators default="file">
                 <file name="file"/>
                 <file name="special" class="impl.SpecialGenerator" src="impl.Ignored"/>
                 <script name="script" src="impl.ScriptGenerator"/>
                 <mystery name="odd"/>
               </generators>"#,
        )
        .unwrap();

        assert_eq!(
            roles_of(&info),
            vec![
                "org.x.GeneratorSelector",
                "org.x.Generator/file",
                "org.x.Generator/special",
                "org.x.Generator/script",
                "org.x.Greeter",
            ]
        );
        let selector = info.component("org.x.GeneratorSelector").unwrap();
        assert!(selector.is_selector());
        assert_eq!(selector.default_value(), Some("file"));
        assert_eq!(selector.alias(), Some("generators"));

        let class_of = |role: &str| info.component(role).unwrap().class_name().to_string();
        assert_eq!(class_of("org.x.Generator/file"), "impl.FileGenerator");
        assert_eq!(class_of("org.x.Generator/special"), "impl.SpecialGenerator");
        assert_eq!(class_of("org.x.Generator/script"), "impl.ScriptGenerator");
        assert_eq!(info.component("org.x.Generator/file").unwrap().alias(), None);
        assert!(info.component("org.x.Generator/odd").is_none());
    }

    #[test]
    fn test_classless_selector_child_fails_when_strict() {
        let root = r#"<components user-roles="roles.xml">
            <generators><mystery name="odd"/></generators>
        </components>"#;
        let mut resolver = MemoryResourceResolver::new();
        resolver.insert("file:///conf/app.xconf", root).unwrap();
        resolver.insert("file:///conf/roles.xml", ROLES).unwrap();
        let config = ReaderConfig::new().with_strict_selector_children(true);

        let err = read_configuration("file:///conf/app.xconf", &resolver, &config).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SelectorChildWithoutClass { ref role, .. } if role == "org.x.Generator/odd"
        ));
    }

    #[test]
    fn test_selector_child_requires_name() {
        let err = read_with_roles(r#"<generators><file/></generators>"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingAttribute { ref attribute, .. } if attribute == "name"));
    }

    #[test]
    fn test_duplicate_selector_child() {
        let err = read_with_roles(r#"<generators><file name="a"/><file name="a"/></generators>"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DuplicateDefinition { ref role, .. } if role == "org.x.Generator/a"
        ));
    }

    #[test]
    fn test_selector_role_stays_pending_but_is_not_promoted() {
        let info = read_with_roles(r#"<generators/>"#).unwrap();

        let selector = info.component("org.x.GeneratorSelector").unwrap();
        assert!(!selector.is_lazy_init());
        assert_eq!(info.roles().count(), 0);
    }

    #[test]
    fn test_child_scope_redeclares_parent_selector() {
        let parent = read_with_roles(r#"<generators><file name="file"/></generators>"#).unwrap();

        let props = Default::default();
        let components = parse_document(
            r#"<components><generators><file name="local"/></generators></components>"#,
            "file:///app/sitemap.xmap",
            &props,
        )
        .unwrap();
        let resolver = MemoryResourceResolver::new();
        let child = read_documents(None, &components, Some(&parent), &resolver, &ReaderConfig::default())
            .unwrap();

        assert_eq!(
            roles_of(&child),
            vec!["org.x.GeneratorSelector", "org.x.Generator/local"]
        );
        assert_eq!(
            child.component("org.x.Generator/local").unwrap().class_name(),
            "impl.FileGenerator"
        );
        assert!(parent.component("org.x.Generator/local").is_none());
    }
}
