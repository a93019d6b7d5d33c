use loam_types::{lub, PrimitiveKind, SemanticType};
use proptest::prelude::*;

fn primitive() -> impl Strategy<Value = PrimitiveKind> {
    proptest::sample::select(PrimitiveKind::ALL.to_vec())
}

fn semantic_type() -> impl Strategy<Value = SemanticType> {
    prop_oneof![
        proptest::sample::select(vec![
            "java.lang.String",
            "java.lang.Object",
            "java.util.List",
            "java.lang.Integer",
        ])
        .prop_map(SemanticType::known),
        primitive().prop_map(SemanticType::Primitive),
        Just(SemanticType::Null),
        Just(SemanticType::Dynamic),
        "[a-z]{0,8}".prop_map(SemanticType::unknown),
    ]
}

proptest! {
    #[test]
    fn lub_is_commutative(a in semantic_type(), b in semantic_type()) {
        prop_assert_eq!(lub(&a, &b), lub(&b, &a));
    }

    #[test]
    fn lub_is_idempotent_on_known_types(a in semantic_type()) {
        prop_assume!(!a.is_unknown());
        prop_assert_eq!(lub(&a, &a), a);
    }

    #[test]
    fn unknown_absorbs(a in semantic_type()) {
        prop_assert!(lub(&a, &SemanticType::unknown("x")).is_unknown());
    }

    #[test]
    fn widening_is_reflexive_and_transitive(
        a in primitive(),
        b in primitive(),
        c in primitive(),
    ) {
        prop_assert!(a.is_assignable_by(a));
        if a.is_assignable_by(b) && b.is_assignable_by(c) {
            prop_assert!(a.is_assignable_by(c));
        }
    }

    #[test]
    fn numeric_lub_accepts_both_sides(a in primitive(), b in primitive()) {
        if let SemanticType::Primitive(joined) = lub(
            &SemanticType::Primitive(a),
            &SemanticType::Primitive(b),
        ) {
            prop_assert!(joined.is_assignable_by(a));
            prop_assert!(joined.is_assignable_by(b));
        }
    }
}
