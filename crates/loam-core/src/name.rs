use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A single identifier (`foo`, `String`, `Entry`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Name(SmolStr);

impl Name {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(SmolStr::new(text.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::new(value)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dotted name as written in source, e.g. `java.util.Map.Entry`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    segments: Vec<Name>,
}

impl QualifiedName {
    pub fn from_dotted(text: &str) -> Self {
        let segments = text
            .split('.')
            .filter(|seg| !seg.is_empty())
            .map(Name::from)
            .collect();
        Self { segments }
    }

    pub fn from_segments(segments: impl IntoIterator<Item = Name>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    pub fn segments(&self) -> &[Name] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn first(&self) -> Option<&Name> {
        self.segments.first()
    }

    pub fn last(&self) -> Option<&Name> {
        self.segments.last()
    }

    /// Everything but the last segment.
    pub fn parent(&self) -> Option<QualifiedName> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn push(&mut self, name: Name) {
        self.segments.push(name);
    }

    pub fn to_dotted(&self) -> String {
        let mut out = String::new();
        for (idx, seg) in self.segments.iter().enumerate() {
            if idx > 0 {
                out.push('.');
            }
            out.push_str(seg.as_str());
        }
        out
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dotted())
    }
}

/// A package, stored in dotted form. The default package is the empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(dotted: impl Into<String>) -> Self {
        Self(dotted.into())
    }

    pub fn default_package() -> Self {
        Self(String::new())
    }

    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fully-qualified name of `simple` declared in this package.
    pub fn qualify(&self, simple: &str) -> TypeName {
        if self.is_default() {
            TypeName::new(simple)
        } else {
            TypeName::new(format!("{}.{simple}", self.0))
        }
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A canonical (source-style) fully-qualified type name: `java.util.Map.Entry`.
///
/// Nested types use `.`; binary `$` names are converted by the class-file layer before they reach
/// this type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn simple_name(&self) -> &str {
        match self.0.rsplit_once('.') {
            Some((_, simple)) => simple,
            None => &self.0,
        }
    }

    /// The qualifier in front of the simple name (package, or outer type for nested types).
    pub fn qualifier(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(qualifier, _)| qualifier)
    }

    pub fn nested(&self, member: &str) -> TypeName {
        TypeName(format!("{}.{member}", self.0))
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        TypeName::new(value)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn qualified_name_round_trips_dotted_text() {
        let name = QualifiedName::from_dotted("java.util.Map.Entry");
        assert_eq!(name.len(), 4);
        assert_eq!(name.last().map(Name::as_str), Some("Entry"));
        assert_eq!(name.to_dotted(), "java.util.Map.Entry");
        assert_eq!(
            name.parent().map(|p| p.to_dotted()),
            Some("java.util.Map".to_string())
        );
    }

    #[test]
    fn package_qualifies_simple_names() {
        assert_eq!(PackageName::new("a.b").qualify("C").as_str(), "a.b.C");
        assert_eq!(PackageName::default_package().qualify("C").as_str(), "C");
    }

    #[test]
    fn type_name_splits_simple_name() {
        let name = TypeName::new("java.util.Map.Entry");
        assert_eq!(name.simple_name(), "Entry");
        assert_eq!(name.qualifier(), Some("java.util.Map"));
        assert_eq!(TypeName::new("Foo").qualifier(), None);
    }
}
