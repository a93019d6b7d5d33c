use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use loam_core::SymbolReference;
use loam_hir::CompilationUnit;
use loam_resolve::{SolverError, SourceTypeSolver, TypeDecl, TypeSolver};
use thiserror::Error;

/// Extensions tried under a source root, in order.
pub const SOURCE_EXTENSIONS: [&str; 2] = ["groovy", "java"];

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SourceParseError {
    pub message: String,
}

impl SourceParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Turns source text into the declarations resolution works on. Loam ships no parser; the
/// embedding front end provides one.
pub trait SourceParser: Send + Sync {
    fn parse(&self, path: &Path, text: &str) -> Result<CompilationUnit, SourceParseError>;
}

impl<P: SourceParser + ?Sized> SourceParser for Arc<P> {
    fn parse(&self, path: &Path, text: &str) -> Result<CompilationUnit, SourceParseError> {
        (**self).parse(path, text)
    }
}

/// Solves types from a directory of sources laid out by package.
///
/// `com.acme.Outer.Inner` is looked for in `com/acme/Outer/Inner.groovy`, then
/// `com/acme/Outer.groovy`, and so on up the name, trying every extension in
/// [`SOURCE_EXTENSIONS`]. Parsed files are kept until [`SourceRootTypeSolver::invalidate`].
/// Types whose name differs from their file's only resolve once that file has been parsed.
pub struct SourceRootTypeSolver<P> {
    root: PathBuf,
    parser: P,
    units: DashMap<PathBuf, Arc<SourceTypeSolver>>,
}

impl<P: SourceParser> SourceRootTypeSolver<P> {
    pub fn new(root: impl Into<PathBuf>, parser: P) -> Self {
        Self {
            root: root.into(),
            parser,
            units: DashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Forgets a parsed file, e.g. after it was edited. `path` may be absolute or relative to
    /// the root.
    pub fn invalidate(&self, path: &Path) {
        let path = if path.is_relative() {
            self.root.join(path)
        } else {
            path.to_path_buf()
        };
        if self.units.remove(&path).is_some() {
            tracing::debug!(target: "loam.classpath", path = %path.display(), "invalidated source");
        }
    }

    pub fn cached_units(&self) -> usize {
        self.units.len()
    }

    fn candidate_files(&self, name: &str) -> Vec<PathBuf> {
        let segments: Vec<&str> = name.split('.').filter(|s| !s.is_empty()).collect();
        let mut out = Vec::new();
        for len in (1..=segments.len()).rev() {
            let mut base = self.root.clone();
            base.extend(&segments[..len]);
            for ext in SOURCE_EXTENSIONS {
                out.push(base.with_extension(ext));
            }
        }
        out
    }

    fn unit_types(&self, path: &Path) -> Result<Arc<SourceTypeSolver>, SolverError> {
        if let Some(hit) = self.units.get(path) {
            return Ok(hit.value().clone());
        }
        let text = std::fs::read_to_string(path).map_err(|source| SolverError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let unit = self
            .parser
            .parse(path, &text)
            .map_err(|err| SolverError::Parse {
                path: path.to_path_buf(),
                message: err.message,
            })?;
        let label = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string();
        let types = Arc::new(SourceTypeSolver::with_label(label, [Arc::new(unit)]));
        tracing::debug!(
            target: "loam.classpath",
            path = %path.display(),
            types = types.len(),
            "parsed source file"
        );
        Ok(self
            .units
            .entry(path.to_path_buf())
            .or_insert(types)
            .value()
            .clone())
    }
}

impl<P: SourceParser> TypeSolver for SourceRootTypeSolver<P> {
    fn lookup(&self, name: &str) -> Result<SymbolReference<Arc<TypeDecl>>, SolverError> {
        let mut failure = None;
        for path in self.candidate_files(name) {
            if !path.is_file() {
                continue;
            }
            let types = match self.unit_types(&path) {
                Ok(types) => types,
                Err(err) => {
                    crate::skip_candidate(&self.root, &path.display().to_string(), &err);
                    failure.get_or_insert(err);
                    continue;
                }
            };
            if let found @ SymbolReference::Solved(_) = types.lookup(name)? {
                return Ok(found);
            }
        }
        let parsed: Vec<Arc<SourceTypeSolver>> =
            self.units.iter().map(|entry| entry.value().clone()).collect();
        for types in parsed {
            if let found @ SymbolReference::Solved(_) = types.lookup(name)? {
                return Ok(found);
            }
        }
        failure.map_or(Ok(SymbolReference::Unsolved), Err)
    }

    fn describe(&self) -> String {
        format!("sources({})", self.root.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct NoParser;

    impl SourceParser for NoParser {
        fn parse(&self, _: &Path, _: &str) -> Result<CompilationUnit, SourceParseError> {
            Err(SourceParseError::new("no parser"))
        }
    }

    #[test]
    fn candidates_walk_up_the_name() {
        let solver = SourceRootTypeSolver::new("/src", NoParser);
        let candidates = solver.candidate_files("com.acme.Outer.Inner");
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/src/com/acme/Outer/Inner.groovy"),
                PathBuf::from("/src/com/acme/Outer/Inner.java"),
                PathBuf::from("/src/com/acme/Outer.groovy"),
                PathBuf::from("/src/com/acme/Outer.java"),
                PathBuf::from("/src/com/acme.groovy"),
                PathBuf::from("/src/com/acme.java"),
                PathBuf::from("/src/com.groovy"),
                PathBuf::from("/src/com.java"),
            ]
        );
    }
}
