//! Role document handling: shorthands, default classes and hints.

use tracing::debug;

use super::ConfigReader;
use crate::component::ComponentInfo;
use crate::error::{ConfigError, Result};
use crate::xml::Element;

impl ConfigReader<'_> {
    /// Apply every `role` and `alias` declaration of a role document.
    pub(super) fn configure_roles(&mut self, document: &Element) -> Result<()> {
        for declaration in document.children() {
            match declaration.name() {
                "alias" => {
                    let role = declaration.required_attribute("role")?;
                    let shorthand = declaration.required_attribute("shorthand")?;
                    self.info.add_shorthand(shorthand, role);
                }
                "role" => self.configure_role(declaration)?,
                other => {
                    return Err(ConfigError::UnexpectedElement {
                        element: other.to_string(),
                        location: declaration.location().clone(),
                    })
                }
            }
        }
        Ok(())
    }

    fn configure_role(&mut self, declaration: &Element) -> Result<()> {
        let role = declaration.required_attribute("name")?;
        let shorthand = declaration.attribute("shorthand");

        if let Some(shorthand) = shorthand {
            match self.info.shorthand(shorthand) {
                Some(previous) if previous != role => {
                    return Err(ConfigError::InconsistentShorthand {
                        shorthand: shorthand.to_string(),
                        previous: previous.to_string(),
                        role: role.to_string(),
                        location: declaration.location().clone(),
                    });
                }
                Some(_) => {}
                None => {
                    self.info.add_shorthand(shorthand, role);
                }
            }
        }

        if let Some(class_name) = declaration.attribute("default-class") {
            match self.info.role(role) {
                Some(existing) if existing.class_name() != class_name => {
                    return Err(ConfigError::InconsistentDefaultClass {
                        role: role.to_string(),
                        existing: existing.class_name().to_string(),
                        declared: class_name.to_string(),
                        location: declaration.location().clone(),
                    });
                }
                Some(_) => debug!(role, "Default class redeclared"),
                None => {
                    let mut info = ComponentInfo::new(role, class_name);
                    info.fill(declaration);
                    info.set_alias(shorthand.map(str::to_string));
                    info.set_configuration(declaration.clone());
                    self.info.add_role(info);
                }
            }
        }

        for hint in declaration.children_named("hint") {
            self.configure_hint(role, hint)?;
        }
        Ok(())
    }

    fn configure_hint(&mut self, role: &str, hint: &Element) -> Result<()> {
        let shorthand = hint.required_attribute("shorthand")?.trim();
        let class_name = hint.required_attribute("class")?.trim();

        let mut info = ComponentInfo::new("", class_name);
        info.fill(hint);
        info.set_alias(Some(shorthand.to_string()));
        info.set_configuration(hint.clone());

        match self.info.add_hint(role, shorthand, info) {
            Err(existing) if existing.class_name() != class_name => Err(ConfigError::InconsistentHint {
                role: role.to_string(),
                hint: shorthand.to_string(),
                existing: existing.class_name().to_string(),
                declared: class_name.to_string(),
                location: hint.location().clone(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::read;
    use crate::error::ConfigError;

    fn roles(body: &str) -> String {
        format!("<role-list>{body}</role-list>")
    }

    #[test]
    fn test_same_shorthand_same_role_is_allowed() {
        let doc = roles(
            r#"<role name="org.x.Greeter" shorthand="greeter"/>
               <role name="org.x.Greeter" shorthand="greeter"/>"#,
        );
        let info = read(&[("file:///conf/roles.xml", &doc)]).unwrap();
        assert_eq!(info.shorthand("greeter"), Some("org.x.Greeter"));
    }

    #[test]
    fn test_shorthand_for_two_roles_fails() {
        let doc = roles(
            r#"<role name="org.x.Greeter" shorthand="greeter"/>
               <role name="org.x.Other" shorthand="greeter"/>"#,
        );
        let err = read(&[("file:///conf/roles.xml", &doc)]).unwrap_err();

        match err {
            ConfigError::InconsistentShorthand {
                shorthand,
                previous,
                role,
                ..
            } => {
                assert_eq!(shorthand, "greeter");
                assert_eq!(previous, "org.x.Greeter");
                assert_eq!(role, "org.x.Other");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_class_idempotent() {
        let doc = roles(
            r#"<role name="org.x.Greeter" default-class="impl.Greeter"/>
               <role name="org.x.Greeter" default-class="impl.Greeter"/>"#,
        );
        let info = read(&[("file:///conf/roles.xml", &doc)]).unwrap();

        assert_eq!(info.components().len(), 1);
        assert_eq!(
            info.component("org.x.Greeter").unwrap().class_name(),
            "impl.Greeter"
        );
    }

    #[test]
    fn test_default_class_conflict_fails() {
        let doc = roles(
            r#"<role name="org.x.Greeter" default-class="impl.Greeter"/>
               <role name="org.x.Greeter" default-class="impl.Other"/>"#,
        );
        let err = read(&[("file:///conf/roles.xml", &doc)]).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InconsistentDefaultClass { ref existing, ref declared, .. }
                if existing == "impl.Greeter" && declared == "impl.Other"
        ));
    }

    #[test]
    fn test_alias_overwrites_silently() {
        let doc = roles(
            r#"<alias shorthand="hello" role="org.x.Greeter"/>
               <alias shorthand="hello" role="org.x.Other"/>"#,
        );
        let info = read(&[("file:///conf/roles.xml", &doc)]).unwrap();

        assert_eq!(info.shorthand("hello"), Some("org.x.Other"));
        assert!(info.components().is_empty());
    }

    #[test]
    fn test_hints_registered_and_trimmed() {
        let doc = roles(
            r#"<role name="org.x.GeneratorSelector" shorthand="generators"
                     default-class="impl.ComponentsSelector">
                 <hint shorthand=" file " class=" impl.FileGenerator "/>
                 <hint shorthand="file" class="impl.FileGenerator"/>
               </role>"#,
        );
        let info = read(&[("file:///conf/roles.xml", &doc)]).unwrap();

        let hint = info.hint("org.x.GeneratorSelector", "file").unwrap();
        assert_eq!(hint.class_name(), "impl.FileGenerator");
        assert_eq!(hint.alias(), Some("file"));
    }

    #[test]
    fn test_hint_conflict_fails() {
        let doc = roles(
            r#"<role name="org.x.GeneratorSelector">
                 <hint shorthand="file" class="impl.FileGenerator"/>
               </role>
               <role name="org.x.GeneratorSelector">
                 <hint shorthand="file" class="impl.OtherGenerator"/>
               </role>"#,
        );
        let err = read(&[("file:///conf/roles.xml", &doc)]).unwrap_err();

        assert!(matches!(err, ConfigError::InconsistentHint { ref hint, .. } if hint == "file"));
    }

    #[test]
    fn test_hint_requires_class() {
        let doc = roles(r#"<role name="org.x.GeneratorSelector"><hint shorthand="file"/></role>"#);
        let err = read(&[("file:///conf/roles.xml", &doc)]).unwrap_err();

        assert!(matches!(err, ConfigError::MissingAttribute { ref attribute, .. } if attribute == "class"));
    }

    #[test]
    fn test_unexpected_element_fails() {
        let doc = roles(r#"<component role="org.x.A" class="impl.A"/>"#);
        let err = read(&[("file:///conf/roles.xml", &doc)]).unwrap_err();

        assert!(matches!(err, ConfigError::UnexpectedElement { ref element, .. } if element == "component"));
    }

    #[test]
    fn test_role_attributes_become_defaults() {
        let doc = roles(
            r#"<role name="org.x.Store" shorthand="store" default-class="impl.Store"
                     model="pooled" pool-in="recycle"/>"#,
        );
        let info = read(&[("file:///conf/roles.xml", &doc)]).unwrap();

        let store = info.component("org.x.Store").unwrap();
        assert_eq!(store.alias(), Some("store"));
        assert_eq!(store.pool_in_method(), Some("recycle"));
        assert_eq!(store.model(), crate::component::ComponentModel::Pooled);
    }
}
