use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use loam_classfile::{binary_candidates, ClassStub};
use loam_core::SymbolReference;
use loam_resolve::decl::IntrospectedType;
use loam_resolve::{SolverError, TypeDecl, TypeSolver};
use walkdir::WalkDir;

use crate::ClasspathError;

/// Solves types from a directory of `.class` files laid out by package
/// (`com/acme/Widget.class`, `com/acme/Widget$Part.class`).
///
/// Files are probed on demand, so classes compiled after the solver was created are found.
/// Decoded classes are cached until [`ClassDirTypeSolver::clear_cache`].
pub struct ClassDirTypeSolver {
    root: PathBuf,
    loaded: DashMap<String, Arc<TypeDecl>>,
}

impl ClassDirTypeSolver {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ClasspathError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ClasspathError::NotADirectory { path: root });
        }
        Ok(Self {
            root,
            loaded: DashMap::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn clear_cache(&self) {
        self.loaded.clear();
    }

    /// Internal names of every class file under the root, sorted.
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(
                        target: "loam.classpath",
                        root = %self.root.display(),
                        error = %err,
                        "skipping unreadable class directory entry"
                    );
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.root).ok()?;
                let internal = relative
                    .to_str()?
                    .strip_suffix(".class")?
                    .replace(std::path::MAIN_SEPARATOR, "/");
                let simple = internal.rsplit('/').next().unwrap_or(&internal);
                (simple != "module-info" && simple != "package-info").then_some(internal)
            })
            .collect();
        names.sort();
        names
    }

    fn class_file(&self, internal: &str) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(internal.split('/'));
        path.set_extension("class");
        path
    }

    fn load(&self, internal: &str) -> Result<Option<Arc<TypeDecl>>, SolverError> {
        if let Some(hit) = self.loaded.get(internal) {
            tracing::trace!(target: "loam.classpath", internal, "class dir cache hit");
            return Ok(Some(hit.value().clone()));
        }

        let path = self.class_file(internal);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(SolverError::Io { path, source }),
        };
        let stub = ClassStub::parse(&bytes).map_err(|source| SolverError::ClassFormat {
            name: internal.to_string(),
            source,
        })?;
        let decl = Arc::new(TypeDecl::from(IntrospectedType::new(stub)));
        Ok(Some(
            self.loaded
                .entry(internal.to_string())
                .or_insert(decl)
                .value()
                .clone(),
        ))
    }
}

impl TypeSolver for ClassDirTypeSolver {
    fn lookup(&self, name: &str) -> Result<SymbolReference<Arc<TypeDecl>>, SolverError> {
        let mut failure = None;
        for internal in binary_candidates(name) {
            match self.load(&internal) {
                Ok(Some(decl)) if crate::answers_to(&decl, name) => {
                    return Ok(SymbolReference::Solved(decl));
                }
                Ok(_) => {}
                Err(err) => {
                    crate::skip_candidate(&self.root, &internal, &err);
                    failure.get_or_insert(err);
                }
            }
        }
        failure.map_or(Ok(SymbolReference::Unsolved), Err)
    }

    fn describe(&self) -> String {
        format!("classes({})", self.root.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn class_files_live_under_their_package() {
        let dir = tempfile::tempdir().unwrap();
        let solver = ClassDirTypeSolver::new(dir.path()).unwrap();
        assert_eq!(
            solver.class_file("com/acme/Widget$Part"),
            dir.path().join("com").join("acme").join("Widget$Part.class")
        );
    }

    #[test]
    fn a_file_is_not_a_class_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Widget.class");
        std::fs::write(&file, b"").unwrap();
        assert!(matches!(
            ClassDirTypeSolver::new(&file),
            Err(ClasspathError::NotADirectory { .. })
        ));
    }
}
