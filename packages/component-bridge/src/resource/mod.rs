//! Resource resolution.
//!
//! The reader never touches the file system directly. It asks a
//! [`ResourceResolver`] for a [`Resource`] by URI (optionally relative to the
//! URI of the including document) and reads bytes through it. Two resolvers
//! ship with the crate:
//!
//! - [`FileResourceResolver`]: `file:` URLs below a base directory
//! - [`MemoryResourceResolver`]: documents held in memory, for tests and
//!   embedding

mod file;
mod memory;

use std::borrow::Cow;
use std::io::Read;

use chrono::{DateTime, Utc};
use url::Url;

use crate::error::ResourceError;

pub use file::FileResourceResolver;
pub use memory::MemoryResourceResolver;

/// A readable or traversable resource returned by a resolver.
pub trait Resource {
    /// Stable absolute identity of the resource.
    fn absolute_uri(&self) -> &str;

    /// Whether the resource exists.
    fn exists(&self) -> bool;

    /// Open the resource for reading.
    ///
    /// The returned reader is released when dropped.
    fn open(&self) -> Result<Box<dyn Read + '_>, ResourceError>;

    /// Last modification time, if known.
    fn last_modified(&self) -> Option<DateTime<Utc>>;

    /// Whether the resource can be traversed with [`Resource::children`].
    fn is_collection(&self) -> bool;

    /// Direct children of a collection, in resolver-defined order.
    fn children(&self) -> Result<Vec<Box<dyn Resource + '_>>, ResourceError>;

    /// File name: the final path segment of the URI, percent-decoded.
    fn name(&self) -> Cow<'_, str> {
        file_name(self.absolute_uri())
    }

    /// Read the whole resource as UTF-8 text.
    fn read_to_string(&self) -> Result<String, ResourceError> {
        let mut reader = self.open()?;
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|source| ResourceError::Io {
                uri: self.absolute_uri().to_string(),
                source,
            })?;
        Ok(text)
    }
}

/// Capability that turns URIs into resources.
pub trait ResourceResolver {
    /// Resolve `uri`, relative to `context` when given.
    fn resolve(&self, uri: &str, context: Option<&str>)
        -> Result<Box<dyn Resource + '_>, ResourceError>;
}

/// Join `uri` onto `base`, keeping absolute URIs as they are.
///
/// # Examples
/// ```
/// use url::Url;
/// use component_bridge::resource::join_uri;
///
/// let base = Url::parse("file:///conf/app.xconf").unwrap();
/// assert_eq!(join_uri(&base, "roles.xml").unwrap().as_str(), "file:///conf/roles.xml");
/// assert_eq!(join_uri(&base, "file:///other/x.xml").unwrap().as_str(), "file:///other/x.xml");
/// ```
pub fn join_uri(base: &Url, uri: &str) -> Result<Url, ResourceError> {
    base.join(uri).map_err(|source| ResourceError::InvalidUri {
        uri: uri.to_string(),
        source,
    })
}

/// Parse an absolute URI.
pub fn parse_uri(uri: &str) -> Result<Url, ResourceError> {
    Url::parse(uri).map_err(|source| ResourceError::InvalidUri {
        uri: uri.to_string(),
        source,
    })
}

/// Final non-empty path segment of a URI.
pub fn last_segment(uri: &str) -> &str {
    uri.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(uri)
}

/// Percent-decoded final path segment of a URI.
///
/// Segments that do not decode to UTF-8 are returned as written.
pub fn file_name(uri: &str) -> Cow<'_, str> {
    let segment = last_segment(uri);
    urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment))
}

/// Pick the base URL for a resolution: the context when given, else a default.
fn base_for(context: Option<&str>, default: &Url) -> Result<Url, ResourceError> {
    match context {
        Some(ctx) => parse_uri(ctx),
        None => Ok(default.clone()),
    }
}
