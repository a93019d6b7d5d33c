use loam_types::{lub, well_known, SemanticType};

use crate::calculators::untyped;
use crate::context::TypeContext;
use crate::node::{ExpressionNode, NodeKind};
use crate::registry::TypeCalculator;

/// A name is a variable, parameter or field when one is in scope, else a class reference.
pub struct VariableCalculator;

impl TypeCalculator for VariableCalculator {
    fn id(&self) -> &str {
        "variable"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Variable
    }

    fn calculate(&self, node: &dyn ExpressionNode, ctx: &dyn TypeContext) -> Option<SemanticType> {
        let name = node.as_variable()?;
        if let Some(ty) = ctx.lookup_symbol(&name) {
            return Some(if ty.is_dynamic() { untyped(ctx) } else { ty });
        }
        if let Some(SemanticType::Known(_)) = ctx.resolve_type(&name) {
            return Some(SemanticType::known(well_known::CLASS));
        }
        tracing::debug!(target: "loam.infer", name = %name, "unresolved variable");
        Some(SemanticType::unknown(format!("unresolved variable `{name}`")))
    }
}

/// `T x = value`: the value's type, else the declared one, else `def`. The declared name is not
/// entered into any scope.
pub struct DeclarationCalculator;

impl TypeCalculator for DeclarationCalculator {
    fn id(&self) -> &str {
        "declaration"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Declaration
    }

    fn calculate(&self, node: &dyn ExpressionNode, ctx: &dyn TypeContext) -> Option<SemanticType> {
        let decl = node.as_declaration()?;
        if let Some(initializer) = &decl.initializer {
            let ty = ctx.calculate_type(&**initializer);
            if !ty.is_unknown() {
                return Some(ty);
            }
        }
        match decl.type_text.as_deref().filter(|text| *text != "def") {
            Some(text) => Some(ctx.resolve_type(text).unwrap_or_else(|| {
                SemanticType::unknown(format!("unresolved type `{text}` of `{}`", decl.name))
            })),
            None => Some(untyped(ctx)),
        }
    }
}

/// `c ? a : b` and `a ?: b`: the least upper bound of the two branches.
pub struct TernaryCalculator;

impl TypeCalculator for TernaryCalculator {
    fn id(&self) -> &str {
        "ternary"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Ternary
    }

    fn calculate(&self, node: &dyn ExpressionNode, ctx: &dyn TypeContext) -> Option<SemanticType> {
        let ternary = node.as_ternary()?;
        let then_ty = ctx.calculate_type(&*ternary.then_branch);
        let else_ty = ctx.calculate_type(&*ternary.else_branch);
        Some(lub(&then_ty, &else_ty))
    }
}

pub struct CastCalculator;

impl TypeCalculator for CastCalculator {
    fn id(&self) -> &str {
        "cast"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Cast
    }

    fn calculate(&self, node: &dyn ExpressionNode, ctx: &dyn TypeContext) -> Option<SemanticType> {
        let cast = node.as_cast()?;
        Some(
            ctx.resolve_type(&cast.type_text)
                .unwrap_or_else(|| SemanticType::unknown(format!("unresolved cast type `{}`", cast.type_text))),
        )
    }
}
