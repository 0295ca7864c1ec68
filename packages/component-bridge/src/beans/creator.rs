//! Conversion of a resolved registry into a bean-registry document.

use tracing::debug;

use super::writer::{BeanDefinition, BeanWriter};
use crate::component::{ComponentInfo, ComponentModel};
use crate::config::{selector_family, EmitterConfig, POOLED_SUFFIX};
use crate::error::{ConfigError, Result};
use crate::inspector::TypeInspector;
use crate::registry::ConfigurationInfo;

/// Emits bean definitions for every finalized component of a registry.
pub struct XmlConfigCreator<'i> {
    inspector: &'i dyn TypeInspector,
    config: EmitterConfig,
}

impl<'i> XmlConfigCreator<'i> {
    #[must_use]
    pub fn new(inspector: &'i dyn TypeInspector, config: EmitterConfig) -> Self {
        Self { inspector, config }
    }

    /// Generate the bean document for `info`.
    ///
    /// Components with an undeclared model get the model inferred from
    /// their type, written back into the registry. After emission every
    /// pooled component is keyed by `role + "Pooled"`, matching the bean
    /// name of its prototype. On error the registry is left as it was.
    ///
    /// # Errors
    /// [`ConfigError::UnknownType`] if a model cannot be inferred,
    /// [`ConfigError::InvalidPoolMax`] for an unparseable pool size and
    /// [`ConfigError::PooledNameTaken`] if a prototype bean name is already
    /// a role.
    pub fn create_config(&self, info: &mut ConfigurationInfo) -> Result<String> {
        let models = self.resolve_models(info)?;

        let mut writer = BeanWriter::new();
        for import in info.imports() {
            writer.import(import);
        }

        let mut pooled = Vec::new();
        for (component, &model) in info.components().values().zip(&models) {
            if component.is_selector() {
                self.write_selector(&mut writer, component);
            } else if model == ComponentModel::Pooled {
                self.write_pooled(&mut writer, component)?;
                pooled.push(component.role().to_string());
            } else {
                write_plain(&mut writer, component, model);
            }

            if let Some(alias) = component.alias() {
                writer.alias(component.role(), alias);
            }
        }

        info.rename_components(&pooled, POOLED_SUFFIX)
            .map_err(|role| ConfigError::PooledNameTaken {
                bean: format!("{role}{POOLED_SUFFIX}"),
                role,
            })?;
        for (component, model) in info.components_mut().values_mut().zip(models) {
            component.set_model(model);
        }
        debug!(
            components = info.components().len(),
            pooled = pooled.len(),
            imports = info.imports().len(),
            "Generated bean configuration"
        );
        Ok(writer.finish())
    }

    /// Model of every component in registry order, inferring undeclared
    /// ones. Selectors keep theirs.
    fn resolve_models(&self, info: &ConfigurationInfo) -> Result<Vec<ComponentModel>> {
        info.components()
            .values()
            .map(|component| match component.model() {
                ComponentModel::Unknown if !component.is_selector() => self.infer_model(component),
                model => Ok(model),
            })
            .collect()
    }

    fn infer_model(&self, component: &ComponentInfo) -> Result<ComponentModel> {
        let capability = self
            .inspector
            .inspect(component.class_name())
            .ok_or_else(|| ConfigError::UnknownType {
                role: component.role().to_string(),
                class_name: component.class_name().to_string(),
            })?;
        debug!(
            role = component.role(),
            class = component.class_name(),
            ?capability,
            "Inferred component model"
        );
        Ok(capability.model())
    }

    fn write_selector(&self, writer: &mut BeanWriter, component: &ComponentInfo) {
        let mut bean = BeanDefinition {
            singleton: true,
            lazy_init: component.is_lazy_init(),
            constructor_args: vec![selector_family(component.role()).to_string()],
            ..BeanDefinition::new(component.role(), &self.config.selector_adapter)
        };
        if let Some(default) = component.default_value() {
            bean.properties.push(("default", default));
        }
        writer.bean(&bean);
    }

    /// Write the prototype under `role + "Pooled"` and the pooling factory
    /// under `role`.
    fn write_pooled(&self, writer: &mut BeanWriter, component: &ComponentInfo) -> Result<()> {
        let role = component.role();
        let prototype = format!("{role}{POOLED_SUFFIX}");

        writer.bean(&BeanDefinition {
            init_method: component.init_method(),
            destroy_method: component.destroy_method(),
            ..BeanDefinition::new(&prototype, component.class_name())
        });

        let mut factory = BeanDefinition {
            singleton: true,
            init_method: Some(self.config.pool_factory_init.as_str()),
            destroy_method: Some(self.config.pool_factory_destroy.as_str()),
            lazy_init: component.is_lazy_init(),
            constructor_args: vec![prototype.clone(), component.class_name().to_string()],
            ..BeanDefinition::new(role, &self.config.pool_factory)
        };
        if let Some(max) = pool_max(component)? {
            factory.constructor_args.push(max.to_string());
        }
        if let Some(method) = component.pool_in_method() {
            factory.properties.push(("poolInMethodName", method));
        }
        if let Some(method) = component.pool_out_method() {
            factory.properties.push(("poolOutMethodName", method));
        }
        writer.bean(&factory);
        Ok(())
    }
}

fn write_plain(writer: &mut BeanWriter, component: &ComponentInfo, model: ComponentModel) {
    writer.bean(&BeanDefinition {
        singleton: model == ComponentModel::Singleton,
        init_method: component.init_method(),
        destroy_method: component.destroy_method(),
        lazy_init: component.is_lazy_init(),
        ..BeanDefinition::new(component.role(), component.class_name())
    });
}

fn pool_max(component: &ComponentInfo) -> Result<Option<u32>> {
    component
        .pool_max()
        .map(|value| {
            value.trim().parse::<u32>().map_err(|_| ConfigError::InvalidPoolMax {
                role: component.role().to_string(),
                value: value.to_string(),
            })
        })
        .transpose()
}
