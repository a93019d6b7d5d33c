use loam_types::{well_known, PrimitiveKind, SemanticType};

use crate::calculators::missing_member;
use crate::context::TypeContext;
use crate::node::{BinaryOperator, ExpressionNode, NodeKind, UnaryOperator};
use crate::registry::TypeCalculator;

/// Numeric operands as Groovy's number math sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numeric {
    Primitive(PrimitiveKind),
    BigInteger,
    BigDecimal,
}

impl Numeric {
    fn of(ty: &SemanticType) -> Option<Self> {
        if let Some(kind) = ty.numeric_kind() {
            return Some(Numeric::Primitive(kind));
        }
        match ty.as_known()?.as_str() {
            well_known::BIG_INTEGER => Some(Numeric::BigInteger),
            well_known::BIG_DECIMAL => Some(Numeric::BigDecimal),
            _ => None,
        }
    }

    fn is_integral(self) -> bool {
        match self {
            Numeric::Primitive(kind) => kind.is_integral(),
            Numeric::BigInteger => true,
            Numeric::BigDecimal => false,
        }
    }

    fn is_floating(self) -> bool {
        matches!(
            self,
            Numeric::Primitive(PrimitiveKind::Float | PrimitiveKind::Double)
        )
    }

    fn into_type(self) -> SemanticType {
        match self {
            Numeric::Primitive(kind) => kind.into(),
            Numeric::BigInteger => SemanticType::known(well_known::BIG_INTEGER),
            Numeric::BigDecimal => SemanticType::known(well_known::BIG_DECIMAL),
        }
    }
}

/// `+ - * %`: floating point wins and is always `double`, then `BigDecimal`, then `BigInteger`,
/// then the wider of `long` and `int`.
fn arithmetic(left: Numeric, right: Numeric) -> SemanticType {
    use Numeric::*;

    if left.is_floating() || right.is_floating() {
        return PrimitiveKind::Double.into();
    }
    match (left, right) {
        (BigDecimal, _) | (_, BigDecimal) => BigDecimal.into_type(),
        (BigInteger, _) | (_, BigInteger) => BigInteger.into_type(),
        (Primitive(a), Primitive(b)) => a
            .promote(b)
            .map(SemanticType::from)
            .unwrap_or_else(|| SemanticType::unknown(format!("no arithmetic on {a} and {b}"))),
    }
}

fn division(left: Numeric, right: Numeric) -> SemanticType {
    if left.is_floating() || right.is_floating() {
        PrimitiveKind::Double.into()
    } else {
        SemanticType::known(well_known::BIG_DECIMAL)
    }
}

fn power(left: Numeric, right: Numeric) -> SemanticType {
    if left.is_integral() && right.is_integral() {
        SemanticType::known(well_known::NUMBER)
    } else {
        PrimitiveKind::Double.into()
    }
}

/// Integral operands of shifts and bitwise operators widen to at least `int`.
fn integral(left: Numeric, right: Numeric) -> Option<SemanticType> {
    use Numeric::*;

    if !left.is_integral() || !right.is_integral() {
        return None;
    }
    Some(match (left, right) {
        (BigInteger, _) | (_, BigInteger) => BigInteger.into_type(),
        (Primitive(a), Primitive(b)) => a.promote(b)?.into(),
        _ => return None,
    })
}

/// The method Groovy dispatches an overloadable operator to.
fn operator_method(op: BinaryOperator) -> Option<&'static str> {
    use BinaryOperator::*;

    Some(match op {
        Plus => "plus",
        Minus => "minus",
        Multiply => "multiply",
        Divide => "div",
        Remainder => "mod",
        Power => "power",
        BitAnd => "and",
        BitOr => "or",
        BitXor => "xor",
        ShiftLeft => "leftShift",
        ShiftRight => "rightShift",
        UnsignedShiftRight => "rightShiftUnsigned",
        _ => return None,
    })
}

pub struct BinaryCalculator;

impl BinaryCalculator {
    fn numeric(op: BinaryOperator, left: Numeric, right: Numeric) -> Option<SemanticType> {
        use BinaryOperator::*;

        match op {
            Plus | Minus | Multiply | Remainder => Some(arithmetic(left, right)),
            Divide => Some(division(left, right)),
            Power => Some(power(left, right)),
            ShiftLeft | ShiftRight | UnsignedShiftRight => match left {
                Numeric::Primitive(kind) if kind.is_integral() && right.is_integral() => {
                    Some(kind.promote(PrimitiveKind::Int)?.into())
                }
                Numeric::BigInteger if right.is_integral() => Some(left.into_type()),
                _ => None,
            },
            BitAnd | BitOr | BitXor => integral(left, right),
            _ => None,
        }
    }
}

impl TypeCalculator for BinaryCalculator {
    fn id(&self) -> &str {
        "binary"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Binary
    }

    fn calculate(&self, node: &dyn ExpressionNode, ctx: &dyn TypeContext) -> Option<SemanticType> {
        use BinaryOperator::*;

        let binary = node.as_binary()?;
        let op = binary.op;
        match op {
            Assign => return Some(ctx.calculate_type(&*binary.right)),
            _ if op.is_predicate() => return Some(PrimitiveKind::Boolean.into()),
            Compare => return Some(PrimitiveKind::Int.into()),
            Find => return Some(SemanticType::known(well_known::MATCHER)),
            Subscript => return Some(SemanticType::Dynamic),
            _ => {}
        }

        let left = ctx.calculate_type(&*binary.left);
        let right = ctx.calculate_type(&*binary.right);
        if left.is_unknown() {
            return Some(left);
        }
        if right.is_unknown() {
            return Some(right);
        }
        if left.is_dynamic() || right.is_dynamic() {
            return Some(SemanticType::Dynamic);
        }

        if op == Plus && (left.is_string_like() || right.is_string_like()) {
            return Some(SemanticType::string());
        }
        let is_boolean = |ty: &SemanticType| {
            ty.as_primitive() == Some(PrimitiveKind::Boolean)
                || ty
                    .as_known()
                    .is_some_and(|name| name.as_str() == PrimitiveKind::Boolean.boxed_name())
        };
        if op.is_bitwise() && is_boolean(&left) && is_boolean(&right) {
            return Some(PrimitiveKind::Boolean.into());
        }
        if let (Some(l), Some(r)) = (Numeric::of(&left), Numeric::of(&right)) {
            if let Some(ty) = Self::numeric(op, l, r) {
                return Some(ty);
            }
        }

        let method = operator_method(op)?;
        Some(
            ctx.method_return_type(&left, method, std::slice::from_ref(&right))
                .unwrap_or_else(|| {
                    missing_member(ctx, || format!("no operator method {left}.{method}({right})"))
                }),
        )
    }
}

pub struct UnaryCalculator;

impl TypeCalculator for UnaryCalculator {
    fn id(&self) -> &str {
        "unary"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Unary
    }

    fn calculate(&self, node: &dyn ExpressionNode, ctx: &dyn TypeContext) -> Option<SemanticType> {
        let unary = node.as_unary()?;
        if unary.op == UnaryOperator::Not {
            return Some(PrimitiveKind::Boolean.into());
        }

        let operand = ctx.calculate_type(&*unary.operand);
        if operand.is_unknown() || operand.is_dynamic() {
            return Some(operand);
        }
        // `~"a+b"` compiles a pattern.
        if unary.op == UnaryOperator::BitNot && operand.is_string_like() {
            return Some(SemanticType::known("java.util.regex.Pattern"));
        }
        if let Some(numeric) = Numeric::of(&operand) {
            return Some(match (unary.op, numeric) {
                (UnaryOperator::Increment | UnaryOperator::Decrement, _) => operand,
                (UnaryOperator::BitNot, _) if !numeric.is_integral() => {
                    SemanticType::unknown(format!("bitwise negation of {operand}"))
                }
                (_, Numeric::Primitive(kind)) => kind
                    .promote(PrimitiveKind::Int)
                    .map(SemanticType::from)
                    .unwrap_or(operand),
                _ => operand,
            });
        }

        let method = match unary.op {
            UnaryOperator::Minus => "negative",
            UnaryOperator::Plus => "positive",
            UnaryOperator::BitNot => "bitwiseNegate",
            UnaryOperator::Increment => "next",
            UnaryOperator::Decrement => "previous",
            UnaryOperator::Not => return None,
        };
        Some(
            ctx.method_return_type(&operand, method, &[])
                .unwrap_or_else(|| missing_member(ctx, || format!("no operator method {operand}.{method}()"))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn int() -> Numeric {
        Numeric::Primitive(PrimitiveKind::Int)
    }

    #[test]
    fn arithmetic_follows_number_math() {
        assert_eq!(
            arithmetic(int(), Numeric::Primitive(PrimitiveKind::Long)),
            SemanticType::from(PrimitiveKind::Long)
        );
        assert_eq!(
            arithmetic(Numeric::Primitive(PrimitiveKind::Float), int()),
            SemanticType::from(PrimitiveKind::Double)
        );
        assert_eq!(
            arithmetic(Numeric::Primitive(PrimitiveKind::Byte), Numeric::Primitive(PrimitiveKind::Short)),
            SemanticType::from(PrimitiveKind::Int)
        );
        assert_eq!(
            arithmetic(Numeric::BigInteger, Numeric::BigDecimal),
            SemanticType::known(well_known::BIG_DECIMAL)
        );
        assert_eq!(
            arithmetic(int(), Numeric::BigInteger),
            SemanticType::known(well_known::BIG_INTEGER)
        );
    }

    #[test]
    fn integral_division_is_decimal() {
        assert_eq!(division(int(), int()), SemanticType::known(well_known::BIG_DECIMAL));
        assert_eq!(
            division(int(), Numeric::Primitive(PrimitiveKind::Double)),
            SemanticType::from(PrimitiveKind::Double)
        );
        assert_eq!(power(int(), int()), SemanticType::known(well_known::NUMBER));
    }

    #[test]
    fn numeric_recognizes_wrappers() {
        assert_eq!(
            Numeric::of(&SemanticType::known("java.lang.Long")),
            Some(Numeric::Primitive(PrimitiveKind::Long))
        );
        assert_eq!(Numeric::of(&SemanticType::string()), None);
        assert_eq!(Numeric::of(&SemanticType::from(PrimitiveKind::Boolean)), None);
    }
}
