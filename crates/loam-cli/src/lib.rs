//! The `loam` command line: opens a workspace the way an editor integration would and reports
//! what the resolver sees.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use loam_classpath::ResolverSession;
use loam_config::LoamConfig;
use loam_core::SymbolReference;
use loam_resolve::{ResolvedType, TypeDecl, TypeKind, TypeSolver};
use serde::Serialize;

pub struct Workspace {
    root: PathBuf,
    config_path: Option<PathBuf>,
    config: LoamConfig,
    session: ResolverSession,
}

impl Workspace {
    /// Loads `loam.toml` (or the defaults) for `root` and builds its resolver session. Source
    /// roots are skipped: the command line has no Groovy parser.
    pub fn open(root: &Path) -> Result<Self> {
        let (config, config_path) = loam_config::load_for_workspace(root)
            .with_context(|| format!("failed to load config for {}", root.display()))?;
        loam_config::init_tracing(&config.logging);
        let session = ResolverSession::from_config(&config, None);
        tracing::debug!(
            target: "loam.cli",
            root = %root.display(),
            config = ?config_path,
            "opened workspace"
        );
        Ok(Self {
            root: root.to_path_buf(),
            config_path,
            config,
            session,
        })
    }

    pub fn config(&self) -> &LoamConfig {
        &self.config
    }

    pub fn chain(&self) -> ChainReport {
        ChainReport {
            root: self.root.clone(),
            config: self.config_path.clone(),
            static_compilation: self.session.static_compilation(),
            solvers: self
                .session
                .solver()
                .children()
                .iter()
                .map(|solver| solver.describe())
                .collect(),
        }
    }

    /// `None` when no solver knows `name`.
    pub fn resolve(&self, name: &str) -> Option<TypeReport> {
        let solver = self.session.solver();
        let decl = solver.try_to_solve_type(name).ok()?;
        Some(TypeReport::new(&decl, solver.as_ref()))
    }
}

#[derive(Debug, Serialize)]
pub struct ChainReport {
    pub root: PathBuf,
    pub config: Option<PathBuf>,
    pub static_compilation: bool,
    /// Solvers in lookup order.
    pub solvers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TypeReport {
    pub name: String,
    pub kind: &'static str,
    /// `source` or `compiled`.
    pub origin: &'static str,
    pub type_parameters: Vec<String>,
    pub ancestors: Vec<String>,
    pub fields: Vec<String>,
    pub constructors: Vec<String>,
    pub methods: Vec<String>,
}

impl TypeReport {
    fn new(decl: &TypeDecl, solver: &dyn TypeSolver) -> Self {
        let fields = decl
            .fields()
            .iter()
            .map(|field| {
                let ty = if field.is_dynamic() {
                    "def".to_string()
                } else {
                    display(field.ty(solver))
                };
                let prefix = if field.is_static() { "static " } else { "" };
                format!("{prefix}{}: {ty}", field.name())
            })
            .collect();
        let methods = decl
            .methods()
            .iter()
            .map(|method| {
                let ty = if method.returns_dynamic() {
                    "def".to_string()
                } else {
                    display(method.return_type(solver))
                };
                let prefix = if method.is_static() { "static " } else { "" };
                format!("{prefix}{}: {ty}", method.signature())
            })
            .collect();

        Self {
            name: decl.qualified_name().to_string(),
            kind: kind_name(decl.kind()),
            origin: if decl.is_source() { "source" } else { "compiled" },
            type_parameters: decl.type_parameters(),
            ancestors: decl
                .all_ancestors(solver)
                .iter()
                .map(|ancestor| ancestor.qualified_name().to_string())
                .collect(),
            fields,
            constructors: decl
                .constructors()
                .iter()
                .map(|constructor| constructor.signature())
                .collect(),
            methods,
        }
    }
}

fn display(ty: SymbolReference<ResolvedType>) -> String {
    ty.ok().map_or_else(|| "?".to_string(), |ty| ty.to_string())
}

fn kind_name(kind: TypeKind) -> &'static str {
    match kind {
        TypeKind::Class => "class",
        TypeKind::Interface => "interface",
        TypeKind::Enum => "enum",
        TypeKind::Annotation => "annotation",
        TypeKind::Trait => "trait",
    }
}
