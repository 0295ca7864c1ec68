//! XML document model shared by the reader and the bean emitter.
//!
//! Documents are parsed with `roxmltree` and converted into an owned
//! [`Element`] tree so that declarations can outlive the source text they
//! came from (component descriptors keep their raw declaration around).

mod escape;
mod tree;

pub use escape::escape;
pub use tree::{expand_properties, parse_document, Element, Location};
