use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::FileOptions;

/// Writes a jar whose entries are `(path inside the archive, bytes)`.
pub fn write_jar(path: &Path, entries: &[(&str, &[u8])]) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = FileOptions::default();
    for (name, bytes) in entries {
        zip.start_file(*name, options).map_err(zip_to_io)?;
        zip.write_all(bytes)?;
    }
    zip.finish().map_err(zip_to_io)?;
    Ok(())
}

/// Writes a jmod-shaped archive: every class entry lands under `classes/`.
pub fn write_jmod(path: &Path, classes: &[(&str, &[u8])]) -> std::io::Result<()> {
    let prefixed: Vec<(String, &[u8])> = classes
        .iter()
        .map(|(name, bytes)| (format!("classes/{name}"), *bytes))
        .collect();
    let borrowed: Vec<(&str, &[u8])> = prefixed
        .iter()
        .map(|(name, bytes)| (name.as_str(), *bytes))
        .collect();
    write_jar(path, &borrowed)
}

fn zip_to_io(err: zip::result::ZipError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err)
}

/// An archive written into its own temporary directory, removed on drop.
pub struct TempArchive {
    _dir: tempfile::TempDir,
    path: PathBuf,
}

impl TempArchive {
    pub fn jar(entries: &[(&str, &[u8])]) -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("fixture.jar");
        write_jar(&path, entries)?;
        tracing::trace!(target: "loam.test", path = %path.display(), "wrote jar fixture");
        Ok(Self { _dir: dir, path })
    }

    pub fn jmod(classes: &[(&str, &[u8])]) -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("fixture.jmod");
        write_jmod(&path, classes)?;
        Ok(Self { _dir: dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
