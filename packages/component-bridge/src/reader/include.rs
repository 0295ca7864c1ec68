//! `include` and `include-beans` handling.

use tracing::debug;

use super::{load_error, ConfigReader};
use crate::config::{is_role_document, COMPONENTS_DOCUMENT, INCLUDE_BEANS_ELEMENT, INCLUDE_ELEMENT};
use crate::error::{ConfigError, Result};
use crate::pattern::NamePattern;
use crate::resource::Resource;
use crate::xml::Element;

impl<'r> ConfigReader<'r> {
    /// Walk the children of a component document.
    ///
    /// Includes are followed immediately; everything else is staged as a
    /// component declaration.
    pub(super) fn parse_configuration(&mut self, document: &Element, context: Option<&str>) -> Result<()> {
        for child in document.children() {
            match child.name() {
                INCLUDE_ELEMENT => self.handle_include(child, context)?,
                INCLUDE_BEANS_ELEMENT => self.handle_bean_include(child, context)?,
                _ => self.declarations.push(child.clone()),
            }
        }
        Ok(())
    }

    fn handle_include(&mut self, statement: &Element, context: Option<&str>) -> Result<()> {
        for target in self.include_targets(statement, context)? {
            self.load_include(target.as_ref(), statement)?;
        }
        Ok(())
    }

    fn handle_bean_include(&mut self, statement: &Element, context: Option<&str>) -> Result<()> {
        for target in self.include_targets(statement, context)? {
            debug!(uri = target.absolute_uri(), "Adding bean import");
            self.info.add_import(target.absolute_uri());
        }
        Ok(())
    }

    /// Resolve the resources an include statement points at.
    ///
    /// `src` names one resource. `dir` names a collection whose children are
    /// taken, filtered by the optional `pattern` on their file name.
    fn include_targets(
        &self,
        statement: &Element,
        context: Option<&str>,
    ) -> Result<Vec<Box<dyn Resource + 'r>>> {
        let resolver = self.resolver;

        if let Some(src) = statement.attribute("src") {
            let resource = resolver
                .resolve(src, context)
                .map_err(|source| load_error(src, Some(statement.location()), source))?;
            return Ok(vec![resource]);
        }

        let Some(dir) = statement.attribute("dir") else {
            return Err(ConfigError::MissingIncludeTarget {
                location: statement.location().clone(),
            });
        };

        let directory = resolver
            .resolve(dir, context)
            .map_err(|source| load_error(dir, Some(statement.location()), source))?;
        if !directory.exists() || !directory.is_collection() {
            return Err(ConfigError::NotACollection {
                uri: directory.absolute_uri().to_string(),
                location: statement.location().clone(),
            });
        }

        let pattern = statement.attribute("pattern").map(NamePattern::new);
        let mut targets: Vec<Box<dyn Resource + 'r>> = directory
            .children()
            .map_err(|source| load_error(directory.absolute_uri(), Some(statement.location()), source))?
            .into_iter()
            .filter(|child| !child.is_collection())
            .filter(|child| pattern.as_ref().map_or(true, |p| p.matches(&child.name())))
            .map(|child| self.reresolve(child.as_ref(), statement))
            .collect::<Result<_>>()?;

        if self.config.sort_directory_includes {
            targets.sort_by(|a, b| a.name().cmp(&b.name()));
        }
        debug!(
            dir = directory.absolute_uri(),
            pattern = pattern.as_ref().map(NamePattern::as_str),
            count = targets.len(),
            "Expanded directory include"
        );
        Ok(targets)
    }

    /// Turn a child of a collection into a resource owned by the resolver
    /// rather than by the collection it was listed from.
    fn reresolve(&self, child: &dyn Resource, statement: &Element) -> Result<Box<dyn Resource + 'r>> {
        let uri = child.absolute_uri();
        self.resolver
            .resolve(uri, None)
            .map_err(|source| load_error(uri, Some(statement.location()), source))
    }

    /// Load an included document once and dispatch it by root element.
    fn load_include(&mut self, resource: &dyn Resource, statement: &Element) -> Result<()> {
        let uri = resource.absolute_uri().to_string();
        if self.loaded.contains(&uri) {
            debug!(uri = %uri, "Already loaded, skipping include");
            return Ok(());
        }

        let document = self.load_document(resource, Some(statement.location()))?;
        self.loaded.insert(uri.clone());

        match document.name() {
            COMPONENTS_DOCUMENT => self.parse_configuration(&document, Some(uri.as_str())),
            kind if is_role_document(kind) => self.configure_roles(&document),
            kind => Err(ConfigError::UnknownDocumentKind {
                kind: kind.to_string(),
                location: statement.location().clone(),
            }),
        }
    }
}
