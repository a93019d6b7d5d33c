use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use loam_classfile::{binary_candidates, ClassStub};
use loam_core::SymbolReference;
use loam_resolve::decl::IntrospectedType;
use loam_resolve::{SolverError, TypeDecl, TypeSolver};
use zip::ZipArchive;

use crate::ClasspathError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Jar,
    /// JDK module image: classes live under `classes/`.
    Jmod,
}

impl ArchiveKind {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jmod") => ArchiveKind::Jmod,
            _ => ArchiveKind::Jar,
        }
    }

    fn entry_to_internal_name(self, entry: &str) -> Option<String> {
        let entry = entry.strip_prefix('/').unwrap_or(entry);
        let entry = match self {
            ArchiveKind::Jmod => entry.strip_prefix("classes/")?,
            ArchiveKind::Jar => entry,
        };
        // Multi-release overlays would shadow the base entries.
        if entry.starts_with("META-INF/") {
            return None;
        }
        let internal = entry.strip_suffix(".class")?;
        if is_ignored_class(internal) {
            return None;
        }
        Some(internal.to_string())
    }
}

fn is_ignored_class(internal: &str) -> bool {
    let simple = internal.rsplit('/').next().unwrap_or(internal);
    simple == "module-info" || simple == "package-info"
}

/// Solves types from a `.jar` or `.jmod`.
///
/// The entry list is read once when the archive is opened; class files are decoded on first
/// lookup and kept.
pub struct ArchiveTypeSolver {
    path: PathBuf,
    kind: ArchiveKind,
    /// Internal name -> entry name inside the archive.
    entries: HashMap<String, String>,
    loaded: DashMap<String, Arc<TypeDecl>>,
}

impl ArchiveTypeSolver {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ClasspathError> {
        let path = path.into();
        let kind = ArchiveKind::from_path(&path);
        let archive = open_archive(&path)?;

        let entries: HashMap<String, String> = archive
            .file_names()
            .filter_map(|entry| {
                kind.entry_to_internal_name(entry)
                    .map(|internal| (internal, entry.to_string()))
            })
            .collect();

        tracing::debug!(
            target: "loam.classpath",
            path = %path.display(),
            kind = ?kind,
            classes = entries.len(),
            "indexed archive"
        );

        Ok(Self {
            path,
            kind,
            entries,
            loaded: DashMap::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ArchiveKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Internal names of every class in the archive, sorted.
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn read_entry(&self, entry: &str) -> Result<Vec<u8>, SolverError> {
        let archive_err = |message: String| SolverError::Archive {
            path: self.path.clone(),
            message,
        };
        let mut archive = open_archive(&self.path).map_err(|err| archive_err(err.to_string()))?;
        let mut file = archive
            .by_name(entry)
            .map_err(|err| archive_err(format!("{entry}: {err}")))?;
        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes).map_err(|source| SolverError::Io {
            path: self.path.join(entry),
            source,
        })?;
        Ok(bytes)
    }

    fn materialize(&self, internal: &str, entry: &str) -> Result<Arc<TypeDecl>, SolverError> {
        if let Some(hit) = self.loaded.get(internal) {
            tracing::trace!(target: "loam.classpath", internal, "archive cache hit");
            return Ok(hit.value().clone());
        }
        let bytes = self.read_entry(entry)?;
        let stub = ClassStub::parse(&bytes).map_err(|source| SolverError::ClassFormat {
            name: internal.to_string(),
            source,
        })?;
        let decl = Arc::new(TypeDecl::from(IntrospectedType::new(stub)));
        Ok(self
            .loaded
            .entry(internal.to_string())
            .or_insert(decl)
            .value()
            .clone())
    }
}

impl TypeSolver for ArchiveTypeSolver {
    fn lookup(&self, name: &str) -> Result<SymbolReference<Arc<TypeDecl>>, SolverError> {
        let mut failure = None;
        for internal in binary_candidates(name) {
            let Some(entry) = self.entries.get(&internal) else {
                continue;
            };
            let decl = match self.materialize(&internal, entry) {
                Ok(decl) => decl,
                Err(err) => {
                    crate::skip_candidate(&self.path, &internal, &err);
                    failure.get_or_insert(err);
                    continue;
                }
            };
            // `a.b$C` style class names can land on a candidate that is not this type's
            // canonical spelling.
            if crate::answers_to(&decl, name) {
                return Ok(SymbolReference::Solved(decl));
            }
        }
        failure.map_or(Ok(SymbolReference::Unsolved), Err)
    }

    fn describe(&self) -> String {
        let kind = match self.kind {
            ArchiveKind::Jar => "jar",
            ArchiveKind::Jmod => "jmod",
        };
        format!("{kind}({})", self.path.display())
    }
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>, ClasspathError> {
    let file = File::open(path).map_err(|source| ClasspathError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ZipArchive::new(file).map_err(|source| ClasspathError::Zip {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn entry_names_map_to_internal_names() {
        let jar = ArchiveKind::Jar;
        assert_eq!(
            jar.entry_to_internal_name("com/acme/Widget.class").as_deref(),
            Some("com/acme/Widget")
        );
        assert_eq!(
            jar.entry_to_internal_name("/com/acme/Widget$Part.class").as_deref(),
            Some("com/acme/Widget$Part")
        );
        assert_eq!(jar.entry_to_internal_name("META-INF/versions/11/com/acme/Widget.class"), None);
        assert_eq!(jar.entry_to_internal_name("com/acme/package-info.class"), None);
        assert_eq!(jar.entry_to_internal_name("module-info.class"), None);
        assert_eq!(jar.entry_to_internal_name("com/acme/readme.txt"), None);

        let jmod = ArchiveKind::Jmod;
        assert_eq!(
            jmod.entry_to_internal_name("classes/java/lang/Object.class").as_deref(),
            Some("java/lang/Object")
        );
        assert_eq!(jmod.entry_to_internal_name("lib/libjava.so"), None);
    }

    #[test]
    fn kind_follows_the_extension() {
        assert_eq!(ArchiveKind::from_path(Path::new("java.base.jmod")), ArchiveKind::Jmod);
        assert_eq!(ArchiveKind::from_path(Path::new("groovy-4.0.jar")), ArchiveKind::Jar);
        assert_eq!(ArchiveKind::from_path(Path::new("classes.zip")), ArchiveKind::Jar);
    }
}
