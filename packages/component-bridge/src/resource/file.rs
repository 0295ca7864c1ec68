//! File system resolver.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use url::Url;

use super::{base_for, join_uri, Resource, ResourceResolver};
use crate::error::ResourceError;

/// Resolves `file:` URLs; relative URIs without context resolve against a
/// base directory.
#[derive(Debug, Clone)]
pub struct FileResourceResolver {
    base: Url,
}

impl FileResourceResolver {
    /// Create a resolver rooted at `base_dir`.
    ///
    /// Relative base directories are made absolute against the current
    /// working directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, ResourceError> {
        let dir = base_dir.as_ref();
        let absolute = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|source| ResourceError::Io {
                    uri: dir.display().to_string(),
                    source,
                })?
                .join(dir)
        };
        let base = Url::from_directory_path(&absolute)
            .map_err(|()| ResourceError::UnsupportedUri(absolute.display().to_string()))?;
        Ok(Self { base })
    }
}

impl ResourceResolver for FileResourceResolver {
    fn resolve(&self, uri: &str, context: Option<&str>) -> Result<Box<dyn Resource + '_>, ResourceError> {
        let base = base_for(context, &self.base)?;
        let url = join_uri(&base, uri)?;
        Ok(Box::new(FileResource::from_url(url)?))
    }
}

/// A file or directory on disk.
#[derive(Debug, Clone)]
struct FileResource {
    uri: String,
    path: PathBuf,
}

impl FileResource {
    fn from_url(url: Url) -> Result<Self, ResourceError> {
        if url.scheme() != "file" {
            return Err(ResourceError::UnsupportedUri(url.to_string()));
        }
        let path = url
            .to_file_path()
            .map_err(|()| ResourceError::UnsupportedUri(url.to_string()))?;
        Ok(Self {
            uri: url.to_string(),
            path,
        })
    }

    fn io_error(&self, source: std::io::Error) -> ResourceError {
        if source.kind() == std::io::ErrorKind::NotFound {
            ResourceError::NotFound(self.uri.clone())
        } else {
            ResourceError::Io {
                uri: self.uri.clone(),
                source,
            }
        }
    }
}

impl Resource for FileResource {
    fn absolute_uri(&self) -> &str {
        &self.uri
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn open(&self) -> Result<Box<dyn Read + '_>, ResourceError> {
        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from)
    }

    fn is_collection(&self) -> bool {
        self.path.is_dir()
    }

    fn children(&self) -> Result<Vec<Box<dyn Resource + '_>>, ResourceError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.path).map_err(|e| self.io_error(e))? {
            let entry = entry.map_err(|e| self.io_error(e))?;
            paths.push(entry.path());
        }
        // read_dir order is platform dependent
        paths.sort();

        paths
            .into_iter()
            .map(|path| {
                let url = if path.is_dir() {
                    Url::from_directory_path(&path)
                } else {
                    Url::from_file_path(&path)
                }
                .map_err(|()| ResourceError::UnsupportedUri(path.display().to_string()))?;
                Ok(Box::new(FileResource::from_url(url)?) as Box<dyn Resource + '_>)
            })
            .collect()
    }
}
