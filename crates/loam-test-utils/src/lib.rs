//! Utilities shared by Loam tests.
//!
//! Compiled-class fixtures are produced in-process ([`ClassFileBuilder`], [`write_jar`]) so tests
//! never need a JDK on `PATH`.

mod classfile;
pub mod env;
mod jar;
mod jdk;

pub use classfile::ClassFileBuilder;
pub use env::{env_lock, EnvVarGuard};
pub use jar::{write_jar, write_jmod, TempArchive};
pub use jdk::mini_jdk;
