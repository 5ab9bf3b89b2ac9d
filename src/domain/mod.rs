//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod entities;
pub mod error;
pub mod forest;
pub mod materializer;
pub mod validator;

pub use builder::ForestBuilder;
pub use entities::{AnnotatedNode, DuplicatePolicy, Node, RawRow, COLUMN_COUNT, COLUMN_HEADER};
pub use error::{DomainError, DomainResult};
pub use forest::{Forest, TreeNode};
pub use materializer::{children_of, materialize};
pub use validator::validate_rows;
