use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use loam_types::SemanticType;
use thiserror::Error;

use crate::context::TypeContext;
use crate::node::{ExpressionNode, NodeKind};

/// Computes the type of one kind of expression.
pub trait TypeCalculator: Send + Sync {
    /// Unique within a registry.
    fn id(&self) -> &str;

    /// The most general kind this calculator handles. Nodes of sub-kinds reach it when nothing
    /// more specific answered.
    fn node_kind(&self) -> NodeKind;

    /// Higher runs first among calculators of the same kind.
    fn priority(&self) -> i32 {
        0
    }

    /// `None` when the calculator does not apply to `node`.
    fn calculate(&self, node: &dyn ExpressionNode, ctx: &dyn TypeContext) -> Option<SemanticType>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("duplicate type calculator id '{id}'")]
    DuplicateId { id: String },
}

/// Dispatches expressions to calculators by node kind.
#[derive(Clone, Default)]
pub struct TypeCalculatorRegistry {
    by_kind: HashMap<NodeKind, Vec<Arc<dyn TypeCalculator>>>,
}

impl fmt::Debug for TypeCalculatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<(&NodeKind, Vec<&str>)> = self
            .by_kind
            .iter()
            .map(|(kind, calculators)| (kind, calculators.iter().map(|c| c.id()).collect()))
            .collect();
        kinds.sort_by_key(|(kind, _)| **kind);
        f.debug_map().entries(kinds).finish()
    }
}

impl TypeCalculatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in calculator.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for calculator in crate::calculators::builtin_calculators() {
            let registered = registry.register(calculator);
            debug_assert!(
                registered.is_ok(),
                "built-in calculator ids are distinct: {registered:?}"
            );
        }
        registry
    }

    pub fn register(&mut self, calculator: Arc<dyn TypeCalculator>) -> Result<(), RegisterError> {
        let id = calculator.id();
        if self.calculators().any(|existing| existing.id() == id) {
            return Err(RegisterError::DuplicateId { id: id.to_string() });
        }
        let slot = self.by_kind.entry(calculator.node_kind()).or_default();
        slot.push(calculator);
        // Stable, so equal priorities keep registration order.
        slot.sort_by_key(|calculator| std::cmp::Reverse(calculator.priority()));
        Ok(())
    }

    pub fn calculators(&self) -> impl Iterator<Item = &Arc<dyn TypeCalculator>> {
        self.by_kind.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of the calculators that would be tried for `kind`, in order.
    pub fn dispatch_order(&self, kind: NodeKind) -> Vec<&str> {
        kind.lineage()
            .filter_map(|kind| self.by_kind.get(&kind))
            .flatten()
            .map(|calculator| calculator.id())
            .collect()
    }

    /// The type of `node`. Never fails: when no calculator answers the result is `Unknown`.
    pub fn calculate(&self, node: &dyn ExpressionNode, ctx: &dyn TypeContext) -> SemanticType {
        let kind = node.kind();
        for candidate in kind.lineage() {
            let Some(calculators) = self.by_kind.get(&candidate) else {
                continue;
            };
            for calculator in calculators {
                if let Some(ty) = calculator.calculate(node, ctx) {
                    tracing::trace!(
                        target: "loam.infer",
                        %kind,
                        calculator = calculator.id(),
                        ty = %ty,
                        "calculated expression type"
                    );
                    return ty;
                }
            }
        }
        tracing::debug!(target: "loam.infer", %kind, "no calculator answered");
        SemanticType::unknown(format!("no calculator for {kind}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MapTypeContext;
    use loam_types::PrimitiveKind;
    use pretty_assertions::assert_eq;

    struct Fixed {
        id: &'static str,
        kind: NodeKind,
        priority: i32,
        answer: Option<SemanticType>,
    }

    impl TypeCalculator for Fixed {
        fn id(&self) -> &str {
            self.id
        }

        fn node_kind(&self) -> NodeKind {
            self.kind
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn calculate(&self, _: &dyn ExpressionNode, _: &dyn TypeContext) -> Option<SemanticType> {
            self.answer.clone()
        }
    }

    struct Bare(NodeKind);

    impl ExpressionNode for Bare {
        fn kind(&self) -> NodeKind {
            self.0
        }
    }

    fn fixed(id: &'static str, kind: NodeKind, priority: i32, answer: Option<SemanticType>) -> Arc<dyn TypeCalculator> {
        Arc::new(Fixed {
            id,
            kind,
            priority,
            answer,
        })
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut registry = TypeCalculatorRegistry::new();
        registry
            .register(fixed("a", NodeKind::Binary, 0, None))
            .unwrap();
        let err = registry
            .register(fixed("a", NodeKind::Unary, 0, None))
            .unwrap_err();
        assert_eq!(err, RegisterError::DuplicateId { id: "a".into() });
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn priority_then_registration_order() {
        let mut registry = TypeCalculatorRegistry::new();
        registry.register(fixed("low", NodeKind::Binary, -1, None)).unwrap();
        registry.register(fixed("first", NodeKind::Binary, 0, None)).unwrap();
        registry.register(fixed("second", NodeKind::Binary, 0, None)).unwrap();
        registry.register(fixed("high", NodeKind::Binary, 5, None)).unwrap();
        registry.register(fixed("general", NodeKind::Expression, 100, None)).unwrap();

        assert_eq!(
            registry.dispatch_order(NodeKind::Declaration),
            vec!["high", "first", "second", "low", "general"]
        );
    }

    #[test]
    fn dispatch_falls_through_to_supertypes() {
        let mut registry = TypeCalculatorRegistry::new();
        registry.register(fixed("declines", NodeKind::Declaration, 0, None)).unwrap();
        registry
            .register(fixed(
                "binary",
                NodeKind::Binary,
                0,
                Some(SemanticType::Primitive(PrimitiveKind::Int)),
            ))
            .unwrap();
        let ctx = MapTypeContext::new(&registry);

        assert_eq!(
            registry.calculate(&Bare(NodeKind::Declaration), &ctx),
            SemanticType::Primitive(PrimitiveKind::Int)
        );
        let missing = registry.calculate(&Bare(NodeKind::Closure), &ctx);
        assert_eq!(missing.unknown_reason(), Some("no calculator for Closure"));
    }
}
