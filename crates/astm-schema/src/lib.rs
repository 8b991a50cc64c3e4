//! Shared types for the ASTM E1394/LIS2-A2 codec: annotation parsing,
//! delimiter configuration, the error enum, and the leaf value trait.
//!
//! This crate carries no encode/decode machinery of its own; `astm-derive`
//! consumes `annotation` at compile time to generate code against the
//! runtime helpers in `astm-codec`.

pub mod annotation;
pub mod attribute;
pub mod delimiters;
pub mod error;
pub mod value;

pub use annotation::{FieldAnnotation, StructAnnotation};
pub use attribute::Attribute;
pub use delimiters::Delimiters;
pub use error::Error;
pub use value::WireScalar;

/// Maximum recursion depth for a structure tree, confirmed from the
/// source's `MAX_DEPTH` constant.
pub const MAX_DEPTH: u32 = 44;
