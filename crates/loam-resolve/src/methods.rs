//! Overload selection for method calls.

use loam_core::SymbolReference;
use loam_types::well_known;

use crate::decl::{ConstructorDecl, MethodDecl, ParameterDecl};
use crate::solver::TypeSolver;
use crate::ty::ResolvedType;

/// Picks the overload a call with `args` binds to.
///
/// Candidates are filtered by arity (varargs and Groovy default parameters included), then by
/// applicability of every argument. Among the applicable ones the most specific wins; if none
/// is strictly more specific, the first declared does.
pub fn select_method(
    candidates: &[MethodDecl],
    args: &[ResolvedType],
    solver: &dyn TypeSolver,
) -> SymbolReference<MethodDecl> {
    select(candidates, MethodDecl::parameters, args, solver)
}

pub fn select_constructor(
    candidates: &[ConstructorDecl],
    args: &[ResolvedType],
    solver: &dyn TypeSolver,
) -> SymbolReference<ConstructorDecl> {
    select(candidates, ConstructorDecl::parameters, args, solver)
}

fn select<T: Clone>(
    candidates: &[T],
    parameters: impl Fn(&T) -> Vec<ParameterDecl>,
    args: &[ResolvedType],
    solver: &dyn TypeSolver,
) -> SymbolReference<T> {
    let mut best: Option<(&T, Vec<ParameterDecl>)> = None;
    for candidate in candidates {
        let params = parameters(candidate);
        if !is_applicable(&params, args, solver) {
            continue;
        }
        best = match best {
            Some((current, current_params))
                if !(is_more_specific(&params, &current_params, solver)
                    && !is_more_specific(&current_params, &params, solver)) =>
            {
                Some((current, current_params))
            }
            _ => Some((candidate, params)),
        };
    }
    best.map(|(found, _)| found.clone()).into()
}

pub fn is_applicable(params: &[ParameterDecl], args: &[ResolvedType], solver: &dyn TypeSolver) -> bool {
    let is_varargs = params.last().is_some_and(ParameterDecl::is_varargs);
    if is_varargs {
        let fixed = params.len() - 1;
        if args.len() < fixed {
            return false;
        }
        if !params[..fixed]
            .iter()
            .zip(args)
            .all(|(param, arg)| accepts(param, arg, solver))
        {
            return false;
        }
        let rest = &args[fixed..];
        let array = &params[fixed];
        // A single argument may be the array itself.
        if rest.len() == 1 && accepts(array, &rest[0], solver) {
            return true;
        }
        let component = match array.ty(solver) {
            SymbolReference::Solved(ResolvedType::Array(component)) => *component,
            _ => return true,
        };
        return rest.iter().all(|arg| lenient_assignable(&component, arg, solver));
    }

    let required = params.iter().filter(|p| !p.has_default()).count();
    if args.len() > params.len() || args.len() < required {
        return false;
    }
    params
        .iter()
        .zip(args)
        .all(|(param, arg)| accepts(param, arg, solver))
}

fn accepts(param: &ParameterDecl, arg: &ResolvedType, solver: &dyn TypeSolver) -> bool {
    if param.is_dynamic() {
        return true;
    }
    match param.ty(solver) {
        SymbolReference::Solved(ty) => lenient_assignable(&ty, arg, solver),
        SymbolReference::Unsolved => true,
    }
}

/// An argument only known as `Object` might be anything at runtime, so it is accepted by every
/// reference parameter.
fn lenient_assignable(target: &ResolvedType, arg: &ResolvedType, solver: &dyn TypeSolver) -> bool {
    let arg_is_object = arg
        .qualified_name()
        .is_some_and(|name| name.as_str() == well_known::OBJECT);
    (arg_is_object && !target.is_primitive()) || target.is_assignable_by(arg, solver)
}

/// `a` is at least as specific as `b` when every parameter of `a` can be passed to `b`.
fn is_more_specific(a: &[ParameterDecl], b: &[ParameterDecl], solver: &dyn TypeSolver) -> bool {
    a.iter().zip(b).all(|(pa, pb)| {
        match (pa.ty(solver), pb.ty(solver)) {
            (SymbolReference::Solved(ta), SymbolReference::Solved(tb)) => {
                tb.is_assignable_by(&ta, solver)
            }
            (_, SymbolReference::Unsolved) => true,
            (SymbolReference::Unsolved, _) => false,
        }
    })
}
