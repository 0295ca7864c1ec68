//! Text writer for bean-registry documents.

use crate::config::{BEANS_FOOTER, BEANS_HEADER};
use crate::xml::escape;

/// One `<bean>` entry.
#[derive(Debug, Clone, Default)]
pub struct BeanDefinition<'a> {
    pub name: &'a str,
    pub class_name: &'a str,
    pub singleton: bool,
    pub init_method: Option<&'a str>,
    pub destroy_method: Option<&'a str>,
    pub lazy_init: bool,
    /// `<constructor-arg>` values in order.
    pub constructor_args: Vec<String>,
    /// `<property>` name/value pairs in order.
    pub properties: Vec<(&'a str, &'a str)>,
}

impl<'a> BeanDefinition<'a> {
    #[must_use]
    pub fn new(name: &'a str, class_name: &'a str) -> Self {
        Self {
            name,
            class_name,
            ..Self::default()
        }
    }
}

/// Accumulates a bean document. Every attribute value is escaped.
#[derive(Debug)]
pub struct BeanWriter {
    buffer: String,
}

impl Default for BeanWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BeanWriter {
    /// Start a document with the `<beans>` header.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: String::from(BEANS_HEADER),
        }
    }

    /// Write an `<import>` of another bean document.
    pub fn import(&mut self, resource: &str) {
        self.buffer.push_str("  <import");
        self.attribute("resource", resource);
        self.buffer.push_str("/>\n");
    }

    /// Write a `<bean>` entry.
    pub fn bean(&mut self, bean: &BeanDefinition<'_>) {
        self.buffer.push_str("  <bean");
        self.attribute("name", bean.name);
        self.attribute("class", bean.class_name);
        self.attribute("singleton", if bean.singleton { "true" } else { "false" });
        if let Some(method) = bean.init_method {
            self.attribute("init-method", method);
        }
        if let Some(method) = bean.destroy_method {
            self.attribute("destroy-method", method);
        }
        if bean.lazy_init {
            self.attribute("lazy-init", "true");
        }

        if bean.constructor_args.is_empty() && bean.properties.is_empty() {
            self.buffer.push_str("/>\n");
            return;
        }

        self.buffer.push_str(">\n");
        for value in &bean.constructor_args {
            self.buffer.push_str("    <constructor-arg");
            self.attribute("value", value);
            self.buffer.push_str("/>\n");
        }
        for (name, value) in &bean.properties {
            self.buffer.push_str("    <property");
            self.attribute("name", name);
            self.attribute("value", value);
            self.buffer.push_str("/>\n");
        }
        self.buffer.push_str("  </bean>\n");
    }

    /// Write an `<alias>` making `alias` resolve to the bean `name`.
    pub fn alias(&mut self, name: &str, alias: &str) {
        self.buffer.push_str("  <alias");
        self.attribute("name", name);
        self.attribute("alias", alias);
        self.buffer.push_str("/>\n");
    }

    /// Close the document and return its text.
    #[must_use]
    pub fn finish(mut self) -> String {
        self.buffer.push_str(BEANS_FOOTER);
        self.buffer
    }

    fn attribute(&mut self, name: &str, value: &str) {
        self.buffer.push(' ');
        self.buffer.push_str(name);
        self.buffer.push_str("=\"");
        self.buffer.push_str(&escape(value));
        self.buffer.push('"');
    }
}
