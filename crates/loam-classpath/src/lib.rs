//! Type solvers backed by the outside world: the built-in platform classes, jar and jmod
//! archives, class directories and source roots, plus the per-workspace [`ResolverSession`]
//! that chains them.

mod archive;
mod class_dir;
mod platform;
mod session;
mod source_root;

use std::path::{Path, PathBuf};

use loam_resolve::{SolverError, TypeDecl};
use thiserror::Error;

pub use archive::{ArchiveKind, ArchiveTypeSolver};
pub use class_dir::ClassDirTypeSolver;
pub use platform::PlatformTypeSolver;
pub use session::{BuildStep, ResolverSession, ResolverSessionBuilder};
pub use source_root::{SourceParseError, SourceParser, SourceRootTypeSolver, SOURCE_EXTENSIONS};

/// Failures while opening a classpath entry. Lookups themselves never fail this way; they
/// report [`loam_resolve::SolverError`] instead.
#[derive(Debug, Error)]
pub enum ClasspathError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open archive `{path}`: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("`{path}` is not a directory")]
    NotADirectory { path: PathBuf },
    #[error("JDK home `{root}` does not contain a `jmods/` directory")]
    MissingJmodsDir { root: PathBuf },
}

/// Whether a decoded class is the type `name` asks for. Local and anonymous classes never
/// resolve by name.
fn answers_to(decl: &TypeDecl, name: &str) -> bool {
    if decl.qualified_name().as_str() != name {
        return false;
    }
    match decl {
        TypeDecl::Introspected(ty) => !ty.stub().is_local_or_anonymous(),
        TypeDecl::Source(_) => true,
    }
}

/// Logs a lookup candidate that could not be read so the next one can be tried.
fn skip_candidate(entry: &Path, candidate: &str, err: &SolverError) {
    tracing::warn!(
        target: "loam.classpath",
        entry = %entry.display(),
        candidate,
        error = %err,
        "skipping unreadable lookup candidate"
    );
}
