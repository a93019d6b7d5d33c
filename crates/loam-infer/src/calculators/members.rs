use loam_types::{well_known, SemanticType};

use crate::calculators::{missing_member, static_target};
use crate::context::TypeContext;
use crate::node::{ExpressionNode, NodeKind};
use crate::registry::TypeCalculator;

/// The type a member is looked up on: the class itself for `Math.max(..)`, otherwise the
/// receiver's value type.
fn receiver_type(receiver: &dyn ExpressionNode, ctx: &dyn TypeContext) -> SemanticType {
    static_target(receiver, ctx).unwrap_or_else(|| ctx.calculate_type(receiver))
}

/// `a?.b` yields `null` when `a` is, so a primitive result is boxed.
fn navigated(ty: SemanticType, safe: bool) -> SemanticType {
    if safe {
        ty.boxed()
    } else {
        ty
    }
}

pub struct MethodCallCalculator;

impl TypeCalculator for MethodCallCalculator {
    fn id(&self) -> &str {
        "method-call"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::MethodCall
    }

    fn calculate(&self, node: &dyn ExpressionNode, ctx: &dyn TypeContext) -> Option<SemanticType> {
        let call = node.as_method_call()?;
        let Some(receiver) = &call.receiver else {
            // TODO: search the enclosing class, its outer classes and the script binding for
            // implicit-receiver calls.
            return Some(SemanticType::unknown(format!(
                "call to `{}` without an explicit receiver",
                call.name
            )));
        };

        let receiver = receiver_type(&**receiver, ctx);
        match receiver {
            SemanticType::Unknown(_) | SemanticType::Dynamic => return Some(receiver),
            SemanticType::Null if call.safe => return Some(SemanticType::Null),
            SemanticType::Null => {
                return Some(SemanticType::unknown(format!("`{}` called on null", call.name)))
            }
            _ => {}
        }

        let args: Vec<SemanticType> = call
            .args
            .iter()
            .map(|arg| ctx.calculate_type(&**arg))
            .collect();
        let ty = match ctx.method_return_type(&receiver, &call.name, &args) {
            Some(ty) => ty,
            None => {
                tracing::debug!(
                    target: "loam.infer",
                    receiver = %receiver,
                    name = %call.name,
                    arity = args.len(),
                    "no matching method"
                );
                missing_member(ctx, || format!("no method {receiver}.{}", call.name))
            }
        };
        Some(navigated(ty, call.safe))
    }
}

/// `list*.name()` collects one result per element.
pub struct SpreadCallCalculator;

impl TypeCalculator for SpreadCallCalculator {
    fn id(&self) -> &str {
        "spread-method-call"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::SpreadMethodCall
    }

    fn calculate(&self, node: &dyn ExpressionNode, _ctx: &dyn TypeContext) -> Option<SemanticType> {
        node.as_method_call()?;
        Some(SemanticType::known(well_known::LIST))
    }
}

pub struct ConstructorCallCalculator;

impl TypeCalculator for ConstructorCallCalculator {
    fn id(&self) -> &str {
        "constructor-call"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::ConstructorCall
    }

    fn calculate(&self, node: &dyn ExpressionNode, ctx: &dyn TypeContext) -> Option<SemanticType> {
        let call = node.as_constructor_call()?;
        Some(match ctx.resolve_type(&call.type_text) {
            Some(ty @ SemanticType::Known(_)) => ty,
            _ => SemanticType::unknown(format!("cannot instantiate `{}`", call.type_text)),
        })
    }
}

pub struct PropertyCalculator;

impl TypeCalculator for PropertyCalculator {
    fn id(&self) -> &str {
        "property"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Property
    }

    fn calculate(&self, node: &dyn ExpressionNode, ctx: &dyn TypeContext) -> Option<SemanticType> {
        let property = node.as_property()?;
        if property.name == "class" {
            return Some(SemanticType::known(well_known::CLASS));
        }

        let receiver = receiver_type(&*property.receiver, ctx);
        match receiver {
            SemanticType::Unknown(_) | SemanticType::Dynamic => return Some(receiver),
            SemanticType::Null if property.safe => return Some(SemanticType::Null),
            SemanticType::Null => {
                return Some(SemanticType::unknown(format!(
                    "property `{}` read from null",
                    property.name
                )))
            }
            _ => {}
        }

        let ty = ctx.field_type(&receiver, &property.name).unwrap_or_else(|| {
            missing_member(ctx, || format!("no property {receiver}.{}", property.name))
        });
        Some(navigated(ty, property.safe))
    }
}

/// `list*.name` collects one value per element.
pub struct SpreadPropertyCalculator;

impl TypeCalculator for SpreadPropertyCalculator {
    fn id(&self) -> &str {
        "spread-property"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::SpreadProperty
    }

    fn calculate(&self, node: &dyn ExpressionNode, _ctx: &dyn TypeContext) -> Option<SemanticType> {
        node.as_property()?;
        Some(SemanticType::known(well_known::LIST))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_types::PrimitiveKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn safe_navigation_boxes_primitives() {
        assert_eq!(
            navigated(SemanticType::from(PrimitiveKind::Int), true),
            SemanticType::known("java.lang.Integer")
        );
        assert_eq!(
            navigated(SemanticType::from(PrimitiveKind::Int), false),
            SemanticType::from(PrimitiveKind::Int)
        );
        assert_eq!(navigated(SemanticType::string(), true), SemanticType::string());
    }
}
