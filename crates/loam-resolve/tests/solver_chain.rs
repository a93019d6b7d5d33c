mod common;

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use loam_core::SymbolReference;
use loam_resolve::{CombinedTypeSolver, MemoryTypeSolver, SolverError, TypeDecl, TypeSolver};
use loam_test_utils::ClassFileBuilder;

struct Counting {
    inner: MemoryTypeSolver,
    calls: AtomicUsize,
}

impl Counting {
    fn new(inner: MemoryTypeSolver) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TypeSolver for Counting {
    fn lookup(&self, name: &str) -> Result<SymbolReference<Arc<TypeDecl>>, SolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup(name)
    }

    fn describe(&self) -> String {
        "counting".to_string()
    }
}

struct Broken;

impl TypeSolver for Broken {
    fn lookup(&self, _name: &str) -> Result<SymbolReference<Arc<TypeDecl>>, SolverError> {
        Err(SolverError::Archive {
            path: PathBuf::from("broken.jar"),
            message: "truncated central directory".to_string(),
        })
    }

    fn describe(&self) -> String {
        "broken".to_string()
    }
}

fn widget(with_field: bool) -> TypeDecl {
    let mut builder = ClassFileBuilder::class("com/acme/Widget");
    if with_field {
        builder = builder.field(0x0001, "size", "I", None);
    }
    common::introspect(&builder.build())
}

#[test]
fn first_solver_that_knows_a_name_wins() {
    let first = Counting::new(MemoryTypeSolver::new().with(widget(true)));
    let second = Counting::new(MemoryTypeSolver::new().with(widget(false)));
    let combined = CombinedTypeSolver::new([
        first.clone() as Arc<dyn TypeSolver>,
        second.clone() as Arc<dyn TypeSolver>,
    ]);

    let found = combined.solve_type("com.acme.Widget").expect("solved");
    assert_eq!(found.fields().len(), 1);
    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 0);
}

#[test]
fn hits_and_misses_are_cached() {
    let child = Counting::new(MemoryTypeSolver::new().with(widget(true)));
    let combined = CombinedTypeSolver::new([child.clone() as Arc<dyn TypeSolver>]);

    for _ in 0..3 {
        assert!(combined.try_to_solve_type("com.acme.Widget").is_solved());
        assert!(!combined.try_to_solve_type("com.acme.Missing").is_solved());
    }
    assert_eq!(child.calls(), 2);
    assert_eq!(combined.cached_len(), 2);

    combined.clear_cache();
    assert!(combined.try_to_solve_type("com.acme.Widget").is_solved());
    assert_eq!(child.calls(), 3);
}

#[test]
fn a_failing_solver_is_a_miss_not_an_error() {
    let fallback = Counting::new(MemoryTypeSolver::new().with(widget(true)));
    let combined = CombinedTypeSolver::new([
        Arc::new(Broken) as Arc<dyn TypeSolver>,
        fallback.clone() as Arc<dyn TypeSolver>,
    ]);

    assert!(Broken.lookup("com.acme.Widget").is_err());
    assert!(!Broken.try_to_solve_type("com.acme.Widget").is_solved());
    assert!(combined.try_to_solve_type("com.acme.Widget").is_solved());
    assert_eq!(fallback.calls(), 1);
}

#[test]
fn demanding_an_unknown_type_names_the_solver() {
    let combined = CombinedTypeSolver::new([common::jdk_solver()]);
    let err = combined.solve_type("com.acme.Nope").expect_err("unsolved");
    assert_eq!(err.symbol, "com.acme.Nope");
    assert!(err.solver.starts_with("combined["));
}

#[test]
fn results_are_shared_across_threads() {
    let combined = Arc::new(CombinedTypeSolver::new([common::jdk_solver()]));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let combined = combined.clone();
            std::thread::spawn(move || combined.try_to_solve_type("java.lang.String").is_solved())
        })
        .collect();
    for handle in handles {
        assert!(handle.join().expect("thread"));
    }
}
