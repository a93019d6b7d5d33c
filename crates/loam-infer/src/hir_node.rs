use loam_hir::{BinaryOp, Body, Expr, ExprId, LiteralKind, UnaryOp};
use loam_resolve::{BodyOwner, Resolver};
use loam_types::SemanticType;

use crate::context::ResolvingTypeContext;
use crate::node::{
    BinaryOperator, BinaryView, CastView, ConstantKind, ConstructorCallView, DeclarationView,
    ExpressionNode, MethodCallView, Node, NodeKind, PropertyView, RangeView, TernaryView,
    UnaryOperator, UnaryView,
};
use crate::registry::TypeCalculatorRegistry;

/// An expression of a `loam-hir` body.
#[derive(Debug, Clone, Copy)]
pub struct HirExpr<'a> {
    body: &'a Body,
    id: ExprId,
}

impl<'a> HirExpr<'a> {
    pub fn new(body: &'a Body, id: ExprId) -> Self {
        Self { body, id }
    }

    pub fn id(&self) -> ExprId {
        self.id
    }

    pub fn expr(&self) -> &'a Expr {
        self.body.expr(self.id)
    }

    fn child(&self, id: ExprId) -> Node<'a> {
        Box::new(HirExpr::new(self.body, id))
    }

    fn children(&self, ids: &[ExprId]) -> Vec<Node<'a>> {
        ids.iter().map(|id| self.child(*id)).collect()
    }
}

impl ExpressionNode for HirExpr<'_> {
    fn kind(&self) -> NodeKind {
        match self.expr() {
            Expr::Literal { .. } => NodeKind::Constant,
            Expr::GString { .. } => NodeKind::GString,
            Expr::Name { .. } => NodeKind::Variable,
            Expr::Property {
                safe,
                spread,
                attribute,
                ..
            } => match (*spread, *safe, *attribute) {
                (true, _, _) => NodeKind::SpreadProperty,
                (_, true, _) => NodeKind::SafeProperty,
                (_, _, true) => NodeKind::AttributeAccess,
                _ => NodeKind::Property,
            },
            Expr::MethodCall { safe, spread, .. } => match (*spread, *safe) {
                (true, _) => NodeKind::SpreadMethodCall,
                (_, true) => NodeKind::SafeMethodCall,
                _ => NodeKind::MethodCall,
            },
            Expr::New { .. } => NodeKind::ConstructorCall,
            Expr::Binary { .. } => NodeKind::Binary,
            Expr::Unary { .. } => NodeKind::Unary,
            Expr::Ternary { .. } => NodeKind::Ternary,
            Expr::Elvis { .. } => NodeKind::Elvis,
            Expr::List { .. } => NodeKind::List,
            Expr::Map { .. } => NodeKind::Map,
            Expr::Range { .. } => NodeKind::Range,
            Expr::Cast { .. } => NodeKind::Cast,
            Expr::Closure { .. } => NodeKind::Closure,
            Expr::Declaration { .. } => NodeKind::Declaration,
            Expr::Missing { .. } => NodeKind::Expression,
        }
    }

    fn as_constant(&self) -> Option<ConstantKind> {
        let Expr::Literal { kind, .. } = self.expr() else {
            return None;
        };
        Some(match kind {
            LiteralKind::Integer => ConstantKind::Integer,
            LiteralKind::Long => ConstantKind::Long,
            LiteralKind::BigInteger => ConstantKind::BigInteger,
            LiteralKind::Float => ConstantKind::Float,
            LiteralKind::Double => ConstantKind::Double,
            LiteralKind::BigDecimal => ConstantKind::BigDecimal,
            LiteralKind::String => ConstantKind::String,
            LiteralKind::Boolean => ConstantKind::Boolean,
            LiteralKind::Null => ConstantKind::Null,
        })
    }

    fn as_gstring(&self) -> Option<Vec<Node<'_>>> {
        match self.expr() {
            Expr::GString { parts, .. } => Some(self.children(parts)),
            _ => None,
        }
    }

    fn as_variable(&self) -> Option<String> {
        match self.expr() {
            Expr::Name { name, .. } => Some(name.as_str().to_string()),
            _ => None,
        }
    }

    fn as_binary(&self) -> Option<BinaryView<'_>> {
        let Expr::Binary { op, lhs, rhs, .. } = self.expr() else {
            return None;
        };
        Some(BinaryView {
            op: binary_operator(*op),
            left: self.child(*lhs),
            right: self.child(*rhs),
        })
    }

    fn as_unary(&self) -> Option<UnaryView<'_>> {
        let Expr::Unary { op, operand, .. } = self.expr() else {
            return None;
        };
        let op = match op {
            UnaryOp::Not => UnaryOperator::Not,
            UnaryOp::Minus => UnaryOperator::Minus,
            UnaryOp::Plus => UnaryOperator::Plus,
            UnaryOp::BitNot => UnaryOperator::BitNot,
            UnaryOp::PreIncrement | UnaryOp::PostIncrement => UnaryOperator::Increment,
            UnaryOp::PreDecrement | UnaryOp::PostDecrement => UnaryOperator::Decrement,
        };
        Some(UnaryView {
            op,
            operand: self.child(*operand),
        })
    }

    fn as_list(&self) -> Option<Vec<Node<'_>>> {
        match self.expr() {
            Expr::List { elements, .. } => Some(self.children(elements)),
            _ => None,
        }
    }

    fn as_map(&self) -> Option<Vec<(Node<'_>, Node<'_>)>> {
        match self.expr() {
            Expr::Map { entries, .. } => Some(
                entries
                    .iter()
                    .map(|(key, value)| (self.child(*key), self.child(*value)))
                    .collect(),
            ),
            _ => None,
        }
    }

    fn as_range(&self) -> Option<RangeView<'_>> {
        let Expr::Range {
            from,
            to,
            exclusive,
            ..
        } = self.expr()
        else {
            return None;
        };
        Some(RangeView {
            from: self.child(*from),
            to: self.child(*to),
            exclusive: *exclusive,
        })
    }

    fn as_method_call(&self) -> Option<MethodCallView<'_>> {
        let Expr::MethodCall {
            receiver,
            name,
            args,
            safe,
            spread,
            ..
        } = self.expr()
        else {
            return None;
        };
        Some(MethodCallView {
            receiver: receiver.map(|id| self.child(id)),
            name: name.as_str().to_string(),
            args: self.children(args),
            safe: *safe,
            spread: *spread,
        })
    }

    fn as_constructor_call(&self) -> Option<ConstructorCallView<'_>> {
        let Expr::New { ty, args, .. } = self.expr() else {
            return None;
        };
        Some(ConstructorCallView {
            type_text: ty.to_string(),
            args: self.children(args),
        })
    }

    fn as_cast(&self) -> Option<CastView<'_>> {
        let Expr::Cast { expr, ty, .. } = self.expr() else {
            return None;
        };
        Some(CastView {
            expr: self.child(*expr),
            type_text: ty.to_string(),
        })
    }

    fn as_property(&self) -> Option<PropertyView<'_>> {
        let Expr::Property {
            receiver,
            name,
            safe,
            spread,
            ..
        } = self.expr()
        else {
            return None;
        };
        Some(PropertyView {
            receiver: self.child(*receiver),
            name: name.as_str().to_string(),
            safe: *safe,
            spread: *spread,
        })
    }

    fn as_ternary(&self) -> Option<TernaryView<'_>> {
        match self.expr() {
            Expr::Ternary {
                condition,
                then_expr,
                else_expr,
                ..
            } => Some(TernaryView {
                condition: self.child(*condition),
                then_branch: self.child(*then_expr),
                else_branch: self.child(*else_expr),
            }),
            Expr::Elvis {
                value, fallback, ..
            } => Some(TernaryView {
                condition: self.child(*value),
                then_branch: self.child(*value),
                else_branch: self.child(*fallback),
            }),
            _ => None,
        }
    }

    fn as_closure(&self) -> Option<usize> {
        match self.expr() {
            Expr::Closure { params, .. } => Some(params.len()),
            _ => None,
        }
    }

    fn as_declaration(&self) -> Option<DeclarationView<'_>> {
        let Expr::Declaration {
            local, initializer, ..
        } = self.expr()
        else {
            return None;
        };
        let local = self.body.local(*local);
        Some(DeclarationView {
            name: local.name.as_str().to_string(),
            type_text: local.ty.as_ref().map(ToString::to_string),
            initializer: initializer.map(|id| self.child(id)),
        })
    }
}

fn binary_operator(op: BinaryOp) -> BinaryOperator {
    match op {
        BinaryOp::Plus => BinaryOperator::Plus,
        BinaryOp::Minus => BinaryOperator::Minus,
        BinaryOp::Multiply => BinaryOperator::Multiply,
        BinaryOp::Divide => BinaryOperator::Divide,
        BinaryOp::Remainder => BinaryOperator::Remainder,
        BinaryOp::Power => BinaryOperator::Power,
        BinaryOp::Equal => BinaryOperator::Equal,
        BinaryOp::NotEqual => BinaryOperator::NotEqual,
        BinaryOp::Less => BinaryOperator::Less,
        BinaryOp::LessEqual => BinaryOperator::LessEqual,
        BinaryOp::Greater => BinaryOperator::Greater,
        BinaryOp::GreaterEqual => BinaryOperator::GreaterEqual,
        BinaryOp::Compare => BinaryOperator::Compare,
        BinaryOp::LogicalAnd => BinaryOperator::LogicalAnd,
        BinaryOp::LogicalOr => BinaryOperator::LogicalOr,
        BinaryOp::BitAnd => BinaryOperator::BitAnd,
        BinaryOp::BitOr => BinaryOperator::BitOr,
        BinaryOp::BitXor => BinaryOperator::BitXor,
        BinaryOp::ShiftLeft => BinaryOperator::ShiftLeft,
        BinaryOp::ShiftRight => BinaryOperator::ShiftRight,
        BinaryOp::UnsignedShiftRight => BinaryOperator::UnsignedShiftRight,
        BinaryOp::Find => BinaryOperator::Find,
        BinaryOp::Match => BinaryOperator::Match,
        BinaryOp::In => BinaryOperator::In,
        BinaryOp::InstanceOf => BinaryOperator::InstanceOf,
        BinaryOp::Subscript => BinaryOperator::Subscript,
        BinaryOp::Assign => BinaryOperator::Assign,
    }
}

/// The type of expression `expr` in the body of `owner`, evaluated in the scope the expression
/// sits in.
pub fn infer_expr_type(
    registry: &TypeCalculatorRegistry,
    resolver: &Resolver,
    owner: &BodyOwner,
    expr: ExprId,
    static_compilation: bool,
) -> SemanticType {
    let Some(body) = resolver.body(owner) else {
        return SemanticType::unknown("no body for owner");
    };
    let Some(context) = resolver.expr_context(owner, expr) else {
        return SemanticType::unknown("expression is outside every scope");
    };
    let ctx = ResolvingTypeContext::new(registry, context).with_static_compilation(static_compilation);
    ctx.type_of(&HirExpr::new(body, expr))
}
