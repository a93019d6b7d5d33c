/// `java/util/Map$Entry` -> `java.util.Map$Entry`.
pub fn internal_to_binary(internal: &str) -> String {
    internal.replace('/', ".")
}

/// Internal names a canonical dotted name may have been compiled to.
///
/// `a.b.C.D` could be the top-level class `a/b/C/D` or the nested class `a/b/C$D` (or deeper
/// nestings). Candidates are ordered from "no nesting" to "everything after the first segment is
/// nested", which is the order a package-first lookup should probe them in.
pub fn binary_candidates(dotted: &str) -> Vec<String> {
    let segments: Vec<&str> = dotted.split('.').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(segments.len());
    for nested in 0..segments.len() {
        let split = segments.len() - nested;
        let package = &segments[..split - 1];
        let class = &segments[split - 1..];
        let mut internal = package.join("/");
        if !internal.is_empty() {
            internal.push('/');
        }
        internal.push_str(&class.join("$"));
        out.push(internal);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn candidates_move_nesting_outwards() {
        assert_eq!(
            binary_candidates("java.util.Map.Entry"),
            vec![
                "java/util/Map/Entry".to_string(),
                "java/util/Map$Entry".to_string(),
                "java/util$Map$Entry".to_string(),
                "java$util$Map$Entry".to_string(),
            ]
        );
        assert_eq!(binary_candidates("Foo"), vec!["Foo".to_string()]);
        assert!(binary_candidates("").is_empty());
    }
}
