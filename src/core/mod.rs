// Public modules
pub mod composer;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod package;
pub mod prefix;
pub mod rewrite;
pub mod transform;

// Re-export common types for convenience
pub use config::{ProjectConfig, TransformConfig};
pub use error::{Error, ErrorCode, Result};
pub use exclusion::ExclusionConfig;
pub use prefix::NamespacePrefix;
pub use rewrite::{FileRewriteEngine, StatementKind};
pub use transform::{TransformReport, Transformer};
