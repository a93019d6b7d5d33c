use std::fmt;

use loam_core::QualifiedName;

/// A type as written in source (`List<String>[]`, `Map.Entry`), not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub name: QualifiedName,
    pub type_args: Vec<TypeRef>,
    pub array_dims: u8,
}

impl TypeRef {
    pub fn new(name: &str) -> Self {
        Self {
            name: QualifiedName::from_dotted(name),
            type_args: Vec::new(),
            array_dims: 0,
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = TypeRef>) -> Self {
        self.type_args = args.into_iter().collect();
        self
    }

    pub fn array(mut self, dims: u8) -> Self {
        self.array_dims = dims;
        self
    }

    /// Parses type text such as `java.util.Map<String, List<Integer>>[]`.
    ///
    /// Wildcards (`? extends T`) keep only their bound; `?` alone becomes `Object`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut p = TypeTextParser {
            text: text.as_bytes(),
            pos: 0,
        };
        let ty = p.type_ref()?;
        p.skip_ws();
        (p.pos == p.text.len()).then_some(ty)
    }

    /// Whether this is the `def` keyword standing in for a type.
    pub fn is_def(&self) -> bool {
        self.array_dims == 0
            && self.type_args.is_empty()
            && self.name.len() == 1
            && self.name.first().map(|n| n.as_str()) == Some("def")
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.type_args.is_empty() {
            f.write_str("<")?;
            for (idx, arg) in self.type_args.iter().enumerate() {
                if idx > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        for _ in 0..self.array_dims {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

struct TypeTextParser<'a> {
    text: &'a [u8],
    pos: usize,
}

impl TypeTextParser<'_> {
    fn skip_ws(&mut self) {
        while self.text.get(self.pos).is_some_and(u8::is_ascii_whitespace) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        self.skip_ws();
        if self.text.get(self.pos) == Some(&byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Option<String> {
        self.skip_ws();
        let start = self.pos;
        while self
            .text
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'$' || *b == b'.')
        {
            self.pos += 1;
        }
        if start == self.pos {
            return None;
        }
        std::str::from_utf8(&self.text[start..self.pos])
            .ok()
            .map(str::to_string)
    }

    fn type_ref(&mut self) -> Option<TypeRef> {
        if self.eat(b'?') {
            let save = self.pos;
            return match self.ident().as_deref() {
                Some("extends") | Some("super") => self.type_ref(),
                _ => {
                    self.pos = save;
                    Some(TypeRef::new("java.lang.Object"))
                }
            };
        }

        let mut ty = TypeRef::new(&self.ident()?);
        if self.eat(b'<') {
            loop {
                ty.type_args.push(self.type_ref()?);
                if self.eat(b'>') {
                    break;
                }
                if !self.eat(b',') {
                    return None;
                }
            }
        }
        while self.eat(b'[') {
            if !self.eat(b']') {
                return None;
            }
            ty.array_dims += 1;
        }
        Some(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_nested_generics_and_arrays() {
        let ty = TypeRef::parse("java.util.Map<String, List<Integer>>[]").unwrap();
        assert_eq!(ty.name.to_dotted(), "java.util.Map");
        assert_eq!(ty.array_dims, 1);
        assert_eq!(ty.type_args.len(), 2);
        assert_eq!(ty.type_args[1].to_string(), "List<Integer>");
        assert_eq!(ty.to_string(), "java.util.Map<String, List<Integer>>[]");
    }

    #[test]
    fn wildcards_keep_their_bound() {
        let ty = TypeRef::parse("List<? extends Number>").unwrap();
        assert_eq!(ty.type_args[0], TypeRef::new("Number"));
        let ty = TypeRef::parse("List<?>").unwrap();
        assert_eq!(ty.type_args[0], TypeRef::new("java.lang.Object"));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(TypeRef::parse("List<"), None);
        assert_eq!(TypeRef::parse("int[x]"), None);
        assert_eq!(TypeRef::parse(""), None);
        assert!(TypeRef::parse("def").unwrap().is_def());
    }
}
