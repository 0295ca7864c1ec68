//! Component Bridge - Resolve declarative component configurations into
//! bean-registry documents.
//!
//! This crate reads a hierarchy of component documents (role declarations,
//! shorthands, hints, component instances and includes), resolves them into
//! one consistent registry, and emits an equivalent flat bean document for a
//! different dependency-injection container.
//!
//! # Example
//!
//! ```
//! use component_bridge::{
//!     read_configuration, EmitterConfig, MemoryResourceResolver, ReaderConfig,
//!     StaticTypeInspector, TypeCapability, XmlConfigCreator,
//! };
//!
//! let resolver = MemoryResourceResolver::new()
//!     .with_document(
//!         "file:///conf/app.xconf",
//!         r#"<components><component role="org.x.Cache" class="impl.Cache"/></components>"#,
//!     )
//!     .unwrap();
//! let mut info = read_configuration("file:///conf/app.xconf", &resolver, &ReaderConfig::default())
//!     .unwrap();
//!
//! let inspector = StaticTypeInspector::new().with_type("impl.Cache", TypeCapability::ThreadSafe);
//! let beans = XmlConfigCreator::new(&inspector, EmitterConfig::default())
//!     .create_config(&mut info)
//!     .unwrap();
//! assert!(beans.contains(r#"<bean name="org.x.Cache" class="impl.Cache" singleton="true"/>"#));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Engine constants and reader/emitter options
//! - [`error`]: Error types and Result alias
//! - [`xml`]: Owned element tree, parsing and escaping
//! - [`resource`]: Resource resolver capability with file and in-memory resolvers
//! - [`pattern`]: File name patterns for directory includes
//! - [`component`]: Component descriptors
//! - [`registry`]: Resolved configuration of one container scope
//! - [`reader`]: Document reader (includes, roles, component resolution)
//! - [`inspector`]: Type capabilities for model inference
//! - [`beans`]: Bean document generation
//! - [`cli`]: Command-line interface

pub mod beans;
pub mod cli;
pub mod component;
pub mod config;
pub mod error;
pub mod inspector;
pub mod pattern;
pub mod reader;
pub mod registry;
pub mod resource;
pub mod xml;

// Re-export the read and emit entry points
pub use beans::XmlConfigCreator;
pub use reader::{read_configuration, read_documents, ConfigReader};

// Re-export commonly used items
pub use component::{ComponentInfo, ComponentKind, ComponentModel};
pub use config::{EmitterConfig, ReaderConfig};
pub use error::{ConfigError, ResourceError, Result};
pub use inspector::{StaticTypeInspector, TypeCapability, TypeInspector};
pub use registry::ConfigurationInfo;
pub use resource::{FileResourceResolver, MemoryResourceResolver, Resource, ResourceResolver};
