use crate::semantic::SemanticType;

/// Least upper bound of two semantic types.
///
/// Rules apply in order: `Unknown` absorbs everything, then `Dynamic` does; equal types join to
/// themselves; two numeric primitives promote; `null` joins a reference type to that type.
/// Anything else is `Unknown`. The join is commutative for every pair and idempotent for every
/// type.
pub fn lub(a: &SemanticType, b: &SemanticType) -> SemanticType {
    use SemanticType::*;

    match (a, b) {
        (Unknown(reason), _) | (_, Unknown(reason)) => Unknown(reason.clone()),
        (Dynamic, _) | (_, Dynamic) => Dynamic,
        _ if a == b => a.clone(),
        (Primitive(x), Primitive(y)) => match x.promote(*y) {
            Some(kind) => Primitive(kind),
            None => SemanticType::unknown(format!("no common type for {x} and {y}")),
        },
        (Null, Known(name)) | (Known(name), Null) => Known(name.clone()),
        _ => SemanticType::unknown(format!("no common type for {a} and {b}")),
    }
}

/// Folds [`lub`] over a sequence; an empty sequence has no type.
pub fn lub_all<'a>(types: impl IntoIterator<Item = &'a SemanticType>) -> SemanticType {
    let mut iter = types.into_iter();
    let Some(first) = iter.next() else {
        return SemanticType::unknown("no types to join");
    };
    iter.fold(first.clone(), |acc, ty| lub(&acc, ty))
}
