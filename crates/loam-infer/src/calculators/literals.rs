use loam_types::{well_known, PrimitiveKind, SemanticType};

use crate::context::TypeContext;
use crate::node::{ConstantKind, ExpressionNode, NodeKind};
use crate::registry::TypeCalculator;

pub struct ConstantCalculator;

impl TypeCalculator for ConstantCalculator {
    fn id(&self) -> &str {
        "constant"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Constant
    }

    fn calculate(&self, node: &dyn ExpressionNode, _ctx: &dyn TypeContext) -> Option<SemanticType> {
        Some(match node.as_constant()? {
            ConstantKind::Integer => PrimitiveKind::Int.into(),
            ConstantKind::Long => PrimitiveKind::Long.into(),
            ConstantKind::Float => PrimitiveKind::Float.into(),
            ConstantKind::Double => PrimitiveKind::Double.into(),
            ConstantKind::Char => PrimitiveKind::Char.into(),
            ConstantKind::Boolean => PrimitiveKind::Boolean.into(),
            ConstantKind::BigInteger => SemanticType::known(well_known::BIG_INTEGER),
            ConstantKind::BigDecimal => SemanticType::known(well_known::BIG_DECIMAL),
            ConstantKind::String => SemanticType::string(),
            ConstantKind::Null => SemanticType::Null,
        })
    }
}

/// A double-quoted string is a `GString` only when it interpolates something.
pub struct GStringCalculator;

impl TypeCalculator for GStringCalculator {
    fn id(&self) -> &str {
        "gstring"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::GString
    }

    fn calculate(&self, node: &dyn ExpressionNode, _ctx: &dyn TypeContext) -> Option<SemanticType> {
        let parts = node.as_gstring()?;
        Some(if parts.is_empty() {
            SemanticType::string()
        } else {
            SemanticType::known(well_known::GSTRING)
        })
    }
}

pub struct ListCalculator;

impl TypeCalculator for ListCalculator {
    fn id(&self) -> &str {
        "list"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::List
    }

    fn calculate(&self, _node: &dyn ExpressionNode, _ctx: &dyn TypeContext) -> Option<SemanticType> {
        Some(SemanticType::known(well_known::LIST))
    }
}

pub struct MapCalculator;

impl TypeCalculator for MapCalculator {
    fn id(&self) -> &str {
        "map"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Map
    }

    fn calculate(&self, _node: &dyn ExpressionNode, _ctx: &dyn TypeContext) -> Option<SemanticType> {
        Some(SemanticType::known(well_known::LINKED_HASH_MAP))
    }
}

/// `1..10` is an `IntRange`; any other bounds make a plain `Range`.
pub struct RangeCalculator;

impl TypeCalculator for RangeCalculator {
    fn id(&self) -> &str {
        "range"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Range
    }

    fn calculate(&self, node: &dyn ExpressionNode, ctx: &dyn TypeContext) -> Option<SemanticType> {
        let range = node.as_range()?;
        let is_int = |ty: SemanticType| ty.numeric_kind() == Some(PrimitiveKind::Int);
        let ints = is_int(ctx.calculate_type(&range.from)) && is_int(ctx.calculate_type(&range.to));
        Some(SemanticType::known(if ints {
            well_known::INT_RANGE
        } else {
            well_known::RANGE
        }))
    }
}

pub struct ClosureCalculator;

impl TypeCalculator for ClosureCalculator {
    fn id(&self) -> &str {
        "closure"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Closure
    }

    fn calculate(&self, _node: &dyn ExpressionNode, _ctx: &dyn TypeContext) -> Option<SemanticType> {
        Some(SemanticType::known(well_known::CLOSURE))
    }
}
