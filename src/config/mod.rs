pub mod source;

pub use source::{SourceConfig, SourceType};
