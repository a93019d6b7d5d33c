//! Core shared types for Loam.
//!
//! Everything here is plain data: names, the solved/unsolved lookup result and JVM visibility.
//! Higher layers (`loam-resolve`, `loam-infer`) build on these without pulling in each other.

mod access;
mod name;
mod symbol;

pub use access::{flags, AccessLevel};
pub use name::{Name, PackageName, QualifiedName, TypeName};
pub use symbol::{SymbolReference, UnsolvedSymbolError};
pub use text_size::{TextRange, TextSize};
