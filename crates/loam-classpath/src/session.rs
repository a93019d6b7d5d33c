use std::path::{Path, PathBuf};
use std::sync::Arc;

use loam_config::LoamConfig;
use loam_hir::CompilationUnit;
use loam_resolve::{CombinedTypeSolver, Resolver, SourceTypeSolver, TypeSolver};

use crate::{
    ArchiveTypeSolver, ClassDirTypeSolver, ClasspathError, PlatformTypeSolver, SourceParser,
    SourceRootTypeSolver,
};

/// Everything needed to resolve the files of one workspace: the combined solver chain and the
/// inference mode.
///
/// Solvers are consulted in this order: sources (in-memory units, then source roots), class
/// directories, archives (configured archives, then the JDK's jmods), the built-in platform.
/// With `sources_first` off, compiled classes come before sources.
pub struct ResolverSession {
    solver: Arc<CombinedTypeSolver>,
    static_compilation: bool,
}

impl ResolverSession {
    pub fn builder() -> ResolverSessionBuilder {
        ResolverSessionBuilder::default()
    }

    /// Builds a session from a workspace config.
    ///
    /// Classpath entries that cannot be opened are logged and skipped. Source roots are only
    /// added when a `parser` is available.
    pub fn from_config(config: &LoamConfig, parser: Option<Arc<dyn SourceParser>>) -> Self {
        let classpath = &config.classpath;
        let mut builder = Self::builder()
            .sources_first(config.resolution.sources_first)
            .static_compilation(config.resolution.static_compilation)
            .platform(if config.resolution.trusted_platform_only {
                PlatformTypeSolver::new().trusted_only()
            } else {
                PlatformTypeSolver::new()
            });

        match parser {
            Some(parser) => {
                for root in &classpath.source_roots {
                    builder = builder.source_root(root, parser.clone());
                }
            }
            None if !classpath.source_roots.is_empty() => tracing::warn!(
                target: "loam.classpath",
                roots = classpath.source_roots.len(),
                "no source parser available; ignoring source roots"
            ),
            None => {}
        }

        for dir in &classpath.class_dirs {
            builder = match builder.class_dir(dir) {
                Ok(builder) => builder,
                Err((builder, err)) => skip(builder, dir, &err),
            };
        }
        for archive in &classpath.archives {
            builder = match builder.archive(archive) {
                Ok(builder) => builder,
                Err((builder, err)) => skip(builder, archive, &err),
            };
        }
        if let Some(jdk_home) = &classpath.jdk_home {
            builder = match builder.jdk_home(jdk_home) {
                Ok(builder) => builder,
                Err((builder, err)) => skip(builder, jdk_home, &err),
            };
        }
        builder.build()
    }

    pub fn solver(&self) -> Arc<CombinedTypeSolver> {
        self.solver.clone()
    }

    pub fn static_compilation(&self) -> bool {
        self.static_compilation
    }

    /// A resolver for one compilation unit. The unit's own types shadow the session's.
    pub fn resolver(&self, unit: Arc<CompilationUnit>) -> Resolver {
        let solver: Arc<dyn TypeSolver> = self.solver.clone();
        Resolver::new(unit, solver)
    }

    pub fn describe(&self) -> String {
        self.solver.describe()
    }
}

fn skip(builder: ResolverSessionBuilder, path: &Path, err: &ClasspathError) -> ResolverSessionBuilder {
    tracing::warn!(
        target: "loam.classpath",
        path = %path.display(),
        error = %err,
        "skipping classpath entry"
    );
    builder
}

/// Fallible steps hand the builder back with the error so callers can skip the entry.
pub type BuildStep = Result<ResolverSessionBuilder, (ResolverSessionBuilder, ClasspathError)>;

pub struct ResolverSessionBuilder {
    sources: Vec<Arc<dyn TypeSolver>>,
    class_dirs: Vec<Arc<dyn TypeSolver>>,
    archives: Vec<Arc<dyn TypeSolver>>,
    platform: Option<PlatformTypeSolver>,
    sources_first: bool,
    static_compilation: bool,
}

impl Default for ResolverSessionBuilder {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            class_dirs: Vec::new(),
            archives: Vec::new(),
            platform: Some(PlatformTypeSolver::new()),
            sources_first: true,
            static_compilation: false,
        }
    }
}

impl ResolverSessionBuilder {
    /// Adds already-parsed units, e.g. the open editor buffers.
    pub fn sources(mut self, units: impl IntoIterator<Item = Arc<CompilationUnit>>) -> Self {
        self.sources.push(Arc::new(SourceTypeSolver::new(units)));
        self
    }

    pub fn source_root<P: SourceParser + 'static>(mut self, root: impl Into<PathBuf>, parser: P) -> Self {
        self.sources
            .push(Arc::new(SourceRootTypeSolver::new(root, parser)));
        self
    }

    pub fn class_dir(mut self, root: impl Into<PathBuf>) -> BuildStep {
        match ClassDirTypeSolver::new(root) {
            Ok(solver) => {
                self.class_dirs.push(Arc::new(solver));
                Ok(self)
            }
            Err(err) => Err((self, err)),
        }
    }

    pub fn archive(mut self, path: impl Into<PathBuf>) -> BuildStep {
        match ArchiveTypeSolver::open(path) {
            Ok(solver) => {
                self.archives.push(Arc::new(solver));
                Ok(self)
            }
            Err(err) => Err((self, err)),
        }
    }

    /// Adds every `jmods/*.jmod` of a JDK, sorted by file name so `java.base` precedes most
    /// others.
    pub fn jdk_home(mut self, root: impl AsRef<Path>) -> BuildStep {
        let root = root.as_ref();
        let jmods_dir = root.join("jmods");
        if !jmods_dir.is_dir() {
            return Err((
                self,
                ClasspathError::MissingJmodsDir {
                    root: root.to_path_buf(),
                },
            ));
        }
        let entries = match std::fs::read_dir(&jmods_dir) {
            Ok(entries) => entries,
            Err(source) => {
                return Err((
                    self,
                    ClasspathError::Io {
                        path: jmods_dir,
                        source,
                    },
                ))
            }
        };
        let mut jmods: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "jmod"))
            .collect();
        jmods.sort_by_key(|path| {
            let base = path.file_stem().is_some_and(|stem| stem == "java.base");
            (!base, path.clone())
        });

        for jmod in jmods {
            match ArchiveTypeSolver::open(&jmod) {
                Ok(solver) => self.archives.push(Arc::new(solver)),
                Err(err) => tracing::warn!(
                    target: "loam.classpath",
                    path = %jmod.display(),
                    error = %err,
                    "skipping unreadable jmod"
                ),
            }
        }
        Ok(self)
    }

    /// Replaces the built-in platform solver.
    pub fn platform(mut self, platform: PlatformTypeSolver) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn without_platform(mut self) -> Self {
        self.platform = None;
        self
    }

    pub fn sources_first(mut self, sources_first: bool) -> Self {
        self.sources_first = sources_first;
        self
    }

    pub fn static_compilation(mut self, static_compilation: bool) -> Self {
        self.static_compilation = static_compilation;
        self
    }

    pub fn build(self) -> ResolverSession {
        let mut children = Vec::new();
        let compiled = self.class_dirs.into_iter().chain(self.archives);
        if self.sources_first {
            children.extend(self.sources);
            children.extend(compiled);
        } else {
            children.extend(compiled);
            children.extend(self.sources);
        }
        if let Some(platform) = self.platform {
            children.push(Arc::new(platform) as Arc<dyn TypeSolver>);
        }

        let solver = Arc::new(CombinedTypeSolver::new(children));
        tracing::debug!(
            target: "loam.classpath",
            solvers = solver.children().len(),
            chain = %solver.describe(),
            "built resolver session"
        );
        ResolverSession {
            solver,
            static_compilation: self.static_compilation,
        }
    }
}
