//! Bean-registry document generation.

mod creator;
mod writer;

pub use creator::XmlConfigCreator;
pub use writer::{BeanDefinition, BeanWriter};
