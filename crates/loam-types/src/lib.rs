//! Structural types shared by the resolver and the inference layer.
//!
//! [`PrimitiveKind`] carries the fixed JVM widening rules, [`SemanticType`] is the lightweight
//! result type of expression inference, and [`lub`] joins two semantic types.

mod lub;
mod primitive;
mod semantic;
pub mod well_known;

pub use lub::{lub, lub_all};
pub use primitive::PrimitiveKind;
pub use semantic::SemanticType;
