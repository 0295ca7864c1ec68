//! In-memory resolver.

use std::io::{Cursor, Read};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use url::Url;

use super::{base_for, join_uri, parse_uri, Resource, ResourceResolver};
use crate::error::ResourceError;

/// Serves documents registered up front under absolute URIs.
///
/// A URI is a collection when other documents live below it. Children are
/// listed in registration order, which lets callers reproduce resolvers that
/// do not sort.
#[derive(Debug, Clone)]
pub struct MemoryResourceResolver {
    base: Url,
    documents: IndexMap<String, Vec<u8>>,
}

impl MemoryResourceResolver {
    /// Create an empty resolver; relative URIs without context resolve
    /// against `file:///`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: root_url(),
            documents: IndexMap::new(),
        }
    }

    /// Set the base URL for relative URIs without context.
    pub fn with_base(mut self, base: &str) -> Result<Self, ResourceError> {
        self.base = parse_uri(base)?;
        Ok(self)
    }

    /// Register a document under an absolute URI.
    pub fn insert(&mut self, uri: &str, content: impl Into<Vec<u8>>) -> Result<(), ResourceError> {
        let url = parse_uri(uri)?;
        self.documents.insert(url.to_string(), content.into());
        Ok(())
    }

    /// Builder form of [`MemoryResourceResolver::insert`].
    pub fn with_document(mut self, uri: &str, content: impl Into<Vec<u8>>) -> Result<Self, ResourceError> {
        self.insert(uri, content)?;
        Ok(self)
    }

    fn resource(&self, uri: String) -> MemoryResource<'_> {
        MemoryResource {
            content: self.documents.get(&uri).map(Vec::as_slice),
            uri,
            resolver: self,
        }
    }

    fn child_uris(&self, parent: &str) -> Vec<String> {
        let prefix = format!("{}/", parent.trim_end_matches('/'));
        let mut children: Vec<String> = Vec::new();
        for key in self.documents.keys() {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            let child = match rest.split_once('/') {
                Some((dir, _)) => format!("{prefix}{dir}/"),
                None => format!("{prefix}{rest}"),
            };
            if !rest.is_empty() && !children.contains(&child) {
                children.push(child);
            }
        }
        children
    }
}

impl Default for MemoryResourceResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceResolver for MemoryResourceResolver {
    fn resolve(&self, uri: &str, context: Option<&str>) -> Result<Box<dyn Resource + '_>, ResourceError> {
        let base = base_for(context, &self.base)?;
        let url = join_uri(&base, uri)?;
        Ok(Box::new(self.resource(url.to_string())))
    }
}

#[allow(clippy::expect_used)] // Static URL that is guaranteed to be valid
fn root_url() -> Url {
    Url::parse("file:///").expect("valid url")
}

struct MemoryResource<'r> {
    uri: String,
    content: Option<&'r [u8]>,
    resolver: &'r MemoryResourceResolver,
}

impl Resource for MemoryResource<'_> {
    fn absolute_uri(&self) -> &str {
        &self.uri
    }

    fn exists(&self) -> bool {
        self.content.is_some() || self.is_collection()
    }

    fn open(&self) -> Result<Box<dyn Read + '_>, ResourceError> {
        match self.content {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes))),
            None => Err(ResourceError::NotFound(self.uri.clone())),
        }
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn is_collection(&self) -> bool {
        self.content.is_none() && !self.resolver.child_uris(&self.uri).is_empty()
    }

    fn children(&self) -> Result<Vec<Box<dyn Resource + '_>>, ResourceError> {
        Ok(self
            .resolver
            .child_uris(&self.uri)
            .into_iter()
            .map(|uri| Box::new(self.resolver.resource(uri)) as Box<dyn Resource + '_>)
            .collect())
    }
}
