//! The calculators every registry starts with.

mod control;
mod literals;
mod members;
mod operators;

use std::sync::Arc;

use loam_types::SemanticType;

use crate::context::TypeContext;
use crate::node::ExpressionNode;
use crate::registry::TypeCalculator;

pub use control::{
    CastCalculator, DeclarationCalculator, TernaryCalculator, VariableCalculator,
};
pub use literals::{
    ClosureCalculator, ConstantCalculator, GStringCalculator, ListCalculator, MapCalculator,
    RangeCalculator,
};
pub use members::{
    ConstructorCallCalculator, MethodCallCalculator, PropertyCalculator, SpreadCallCalculator,
    SpreadPropertyCalculator,
};
pub use operators::{BinaryCalculator, UnaryCalculator};

pub fn builtin_calculators() -> Vec<Arc<dyn TypeCalculator>> {
    vec![
        Arc::new(ConstantCalculator),
        Arc::new(GStringCalculator),
        Arc::new(VariableCalculator),
        Arc::new(BinaryCalculator),
        Arc::new(DeclarationCalculator),
        Arc::new(UnaryCalculator),
        Arc::new(ListCalculator),
        Arc::new(MapCalculator),
        Arc::new(RangeCalculator),
        Arc::new(MethodCallCalculator),
        Arc::new(SpreadCallCalculator),
        Arc::new(ConstructorCallCalculator),
        Arc::new(CastCalculator),
        Arc::new(PropertyCalculator),
        Arc::new(SpreadPropertyCalculator),
        Arc::new(TernaryCalculator),
        Arc::new(ClosureCalculator),
    ]
}

/// What a member that cannot be found evaluates to: resolved at runtime in dynamic Groovy, an
/// error under static compilation.
fn missing_member(ctx: &dyn TypeContext, reason: impl FnOnce() -> String) -> SemanticType {
    if ctx.is_static_compilation() {
        SemanticType::unknown(reason())
    } else {
        SemanticType::Dynamic
    }
}

/// `def` values are `Object` under static compilation.
fn untyped(ctx: &dyn TypeContext) -> SemanticType {
    if ctx.is_static_compilation() {
        SemanticType::object()
    } else {
        SemanticType::Dynamic
    }
}

/// The type a receiver expression stands for when it names a class rather than a value, as in
/// `Math.max(a, b)`.
fn static_target(node: &dyn ExpressionNode, ctx: &dyn TypeContext) -> Option<SemanticType> {
    let name = node.as_variable()?;
    if ctx.lookup_symbol(&name).is_some() {
        return None;
    }
    ctx.resolve_type(&name)
        .filter(|ty| matches!(ty, SemanticType::Known(_)))
}
