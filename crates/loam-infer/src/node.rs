//! The expression shapes calculators understand.
//!
//! A parser's expression type implements [`ExpressionNode`] once: it reports its [`NodeKind`]
//! and answers the `as_*` capability for its shape. Children come back as boxed nodes, so an
//! adapter can hand out cheap views into its own arena.

use std::fmt;

/// Expression kinds, arranged the way the Groovy AST's node classes extend each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Expression,
    Constant,
    GString,
    Variable,
    Binary,
    /// `int x = 1`; a binary expression in the Groovy AST.
    Declaration,
    Unary,
    List,
    Map,
    Range,
    MethodCall,
    SafeMethodCall,
    SpreadMethodCall,
    ConstructorCall,
    Cast,
    Property,
    SafeProperty,
    SpreadProperty,
    AttributeAccess,
    Ternary,
    /// `a ?: b`; a ternary whose condition is also its true branch.
    Elvis,
    Closure,
}

impl NodeKind {
    pub fn parent(self) -> Option<NodeKind> {
        use NodeKind::*;

        match self {
            Expression => None,
            Declaration => Some(Binary),
            SafeMethodCall | SpreadMethodCall => Some(MethodCall),
            SafeProperty | SpreadProperty | AttributeAccess => Some(Property),
            Elvis => Some(Ternary),
            Constant | GString | Variable | Binary | Unary | List | Map | Range | MethodCall
            | ConstructorCall | Cast | Property | Ternary | Closure => Some(Expression),
        }
    }

    /// This kind followed by its supertypes, most specific first.
    pub fn lineage(self) -> impl Iterator<Item = NodeKind> {
        std::iter::successors(Some(self), |kind| kind.parent())
    }

    pub fn is_a(self, other: NodeKind) -> bool {
        self.lineage().any(|kind| kind == other)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantKind {
    Integer,
    Long,
    BigInteger,
    Float,
    Double,
    BigDecimal,
    Char,
    String,
    Boolean,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Remainder,
    Power,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Compare,
    LogicalAnd,
    LogicalOr,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    Find,
    Match,
    In,
    InstanceOf,
    Subscript,
    Assign,
}

impl BinaryOperator {
    /// Operators whose result is always `boolean`.
    pub fn is_predicate(self) -> bool {
        use BinaryOperator::*;

        matches!(
            self,
            Equal
                | NotEqual
                | Less
                | LessEqual
                | Greater
                | GreaterEqual
                | LogicalAnd
                | LogicalOr
                | Match
                | In
                | InstanceOf
        )
    }

    pub fn is_shift(self) -> bool {
        matches!(
            self,
            BinaryOperator::ShiftLeft | BinaryOperator::ShiftRight | BinaryOperator::UnsignedShiftRight
        )
    }

    pub fn is_bitwise(self) -> bool {
        matches!(
            self,
            BinaryOperator::BitAnd | BinaryOperator::BitOr | BinaryOperator::BitXor
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Not,
    Minus,
    Plus,
    BitNot,
    Increment,
    Decrement,
}

pub type Node<'a> = Box<dyn ExpressionNode + 'a>;

pub struct BinaryView<'a> {
    pub op: BinaryOperator,
    pub left: Node<'a>,
    pub right: Node<'a>,
}

pub struct UnaryView<'a> {
    pub op: UnaryOperator,
    pub operand: Node<'a>,
}

pub struct MethodCallView<'a> {
    /// `None` for `foo(x)`.
    pub receiver: Option<Node<'a>>,
    pub name: String,
    pub args: Vec<Node<'a>>,
    pub safe: bool,
    pub spread: bool,
}

pub struct ConstructorCallView<'a> {
    /// The type as written.
    pub type_text: String,
    pub args: Vec<Node<'a>>,
}

pub struct PropertyView<'a> {
    pub receiver: Node<'a>,
    pub name: String,
    pub safe: bool,
    pub spread: bool,
}

pub struct TernaryView<'a> {
    pub condition: Node<'a>,
    pub then_branch: Node<'a>,
    pub else_branch: Node<'a>,
}

pub struct RangeView<'a> {
    pub from: Node<'a>,
    pub to: Node<'a>,
    pub exclusive: bool,
}

pub struct CastView<'a> {
    pub expr: Node<'a>,
    pub type_text: String,
}

pub struct DeclarationView<'a> {
    pub name: String,
    /// `None` for `def x` and untyped declarations.
    pub type_text: Option<String>,
    pub initializer: Option<Node<'a>>,
}

/// An expression node as seen by the calculators.
///
/// Every `as_*` capability defaults to `None`; an adapter overrides the ones its node kinds
/// need. A calculator asking for a capability the node lacks declines to answer.
pub trait ExpressionNode {
    fn kind(&self) -> NodeKind;

    fn as_constant(&self) -> Option<ConstantKind> {
        None
    }

    /// The interpolated parts of a GString.
    fn as_gstring(&self) -> Option<Vec<Node<'_>>> {
        None
    }

    fn as_variable(&self) -> Option<String> {
        None
    }

    fn as_binary(&self) -> Option<BinaryView<'_>> {
        None
    }

    fn as_unary(&self) -> Option<UnaryView<'_>> {
        None
    }

    fn as_list(&self) -> Option<Vec<Node<'_>>> {
        None
    }

    fn as_map(&self) -> Option<Vec<(Node<'_>, Node<'_>)>> {
        None
    }

    fn as_range(&self) -> Option<RangeView<'_>> {
        None
    }

    fn as_method_call(&self) -> Option<MethodCallView<'_>> {
        None
    }

    fn as_constructor_call(&self) -> Option<ConstructorCallView<'_>> {
        None
    }

    fn as_cast(&self) -> Option<CastView<'_>> {
        None
    }

    fn as_property(&self) -> Option<PropertyView<'_>> {
        None
    }

    fn as_ternary(&self) -> Option<TernaryView<'_>> {
        None
    }

    /// Closure parameter count.
    fn as_closure(&self) -> Option<usize> {
        None
    }

    fn as_declaration(&self) -> Option<DeclarationView<'_>> {
        None
    }
}

impl<N: ExpressionNode + ?Sized> ExpressionNode for Box<N> {
    fn kind(&self) -> NodeKind {
        (**self).kind()
    }

    fn as_constant(&self) -> Option<ConstantKind> {
        (**self).as_constant()
    }

    fn as_gstring(&self) -> Option<Vec<Node<'_>>> {
        (**self).as_gstring()
    }

    fn as_variable(&self) -> Option<String> {
        (**self).as_variable()
    }

    fn as_binary(&self) -> Option<BinaryView<'_>> {
        (**self).as_binary()
    }

    fn as_unary(&self) -> Option<UnaryView<'_>> {
        (**self).as_unary()
    }

    fn as_list(&self) -> Option<Vec<Node<'_>>> {
        (**self).as_list()
    }

    fn as_map(&self) -> Option<Vec<(Node<'_>, Node<'_>)>> {
        (**self).as_map()
    }

    fn as_range(&self) -> Option<RangeView<'_>> {
        (**self).as_range()
    }

    fn as_method_call(&self) -> Option<MethodCallView<'_>> {
        (**self).as_method_call()
    }

    fn as_constructor_call(&self) -> Option<ConstructorCallView<'_>> {
        (**self).as_constructor_call()
    }

    fn as_cast(&self) -> Option<CastView<'_>> {
        (**self).as_cast()
    }

    fn as_property(&self) -> Option<PropertyView<'_>> {
        (**self).as_property()
    }

    fn as_ternary(&self) -> Option<TernaryView<'_>> {
        (**self).as_ternary()
    }

    fn as_closure(&self) -> Option<usize> {
        (**self).as_closure()
    }

    fn as_declaration(&self) -> Option<DeclarationView<'_>> {
        (**self).as_declaration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lineage_walks_to_expression() {
        assert_eq!(
            NodeKind::Declaration.lineage().collect::<Vec<_>>(),
            vec![NodeKind::Declaration, NodeKind::Binary, NodeKind::Expression]
        );
        assert_eq!(
            NodeKind::Elvis.lineage().collect::<Vec<_>>(),
            vec![NodeKind::Elvis, NodeKind::Ternary, NodeKind::Expression]
        );
        assert!(NodeKind::SpreadMethodCall.is_a(NodeKind::MethodCall));
        assert!(!NodeKind::MethodCall.is_a(NodeKind::SpreadMethodCall));
    }
}
