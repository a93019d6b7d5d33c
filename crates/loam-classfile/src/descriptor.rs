use crate::error::{Error, Result};
use crate::names::internal_to_binary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    pub fn from_descriptor_char(c: u8) -> Option<Self> {
        Some(match c {
            b'B' => BaseType::Byte,
            b'C' => BaseType::Char,
            b'D' => BaseType::Double,
            b'F' => BaseType::Float,
            b'I' => BaseType::Int,
            b'J' => BaseType::Long,
            b'S' => BaseType::Short,
            b'Z' => BaseType::Boolean,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Base(BaseType),
    /// Internal name, e.g. `java/lang/String`.
    Object(String),
    Array(Box<FieldType>),
}

impl FieldType {
    /// Binary, dot-separated rendering (`java.lang.String[]`, `java.util.Map$Entry`).
    pub fn binary_name(&self) -> String {
        match self {
            FieldType::Base(base) => base.keyword().to_string(),
            FieldType::Object(internal) => internal_to_binary(internal),
            FieldType::Array(component) => format!("{}[]", component.binary_name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnType {
    Void,
    Type(FieldType),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

pub fn parse_field_descriptor(desc: &str) -> Result<FieldType> {
    let mut pos = 0;
    let ty = field_type(desc, &mut pos)?;
    if pos != desc.len() {
        return Err(Error::BadDescriptor(desc.to_string()));
    }
    Ok(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let invalid = || Error::BadDescriptor(desc.to_string());
    let bytes = desc.as_bytes();
    if bytes.first() != Some(&b'(') {
        return Err(invalid());
    }

    let mut pos = 1;
    let mut params = Vec::new();
    loop {
        match bytes.get(pos) {
            Some(b')') => {
                pos += 1;
                break;
            }
            Some(_) => params.push(field_type(desc, &mut pos)?),
            None => return Err(invalid()),
        }
    }

    let return_type = match bytes.get(pos) {
        Some(b'V') => {
            pos += 1;
            ReturnType::Void
        }
        Some(_) => ReturnType::Type(field_type(desc, &mut pos)?),
        None => return Err(invalid()),
    };

    if pos != desc.len() {
        return Err(invalid());
    }
    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

fn field_type(desc: &str, pos: &mut usize) -> Result<FieldType> {
    let bytes = desc.as_bytes();
    let Some(&c) = bytes.get(*pos) else {
        return Err(Error::BadDescriptor(desc.to_string()));
    };
    *pos += 1;

    if let Some(base) = BaseType::from_descriptor_char(c) {
        return Ok(FieldType::Base(base));
    }
    match c {
        b'L' => {
            let rest = &desc[*pos..];
            let end = rest
                .find(';')
                .filter(|end| *end > 0)
                .ok_or_else(|| Error::BadDescriptor(desc.to_string()))?;
            *pos += end + 1;
            Ok(FieldType::Object(rest[..end].to_string()))
        }
        b'[' => Ok(FieldType::Array(Box::new(field_type(desc, pos)?))),
        _ => Err(Error::BadDescriptor(desc.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_field_descriptor_primitives_and_arrays() {
        assert_eq!(parse_field_descriptor("J").unwrap(), FieldType::Base(BaseType::Long));
        let ty = parse_field_descriptor("[[Ljava/util/Map$Entry;").unwrap();
        assert_eq!(ty.binary_name(), "java.util.Map$Entry[][]");
    }

    #[test]
    fn parse_method_descriptor_with_void_return() {
        let desc = parse_method_descriptor("(IZLjava/lang/String;)V").unwrap();
        assert_eq!(
            desc.params,
            vec![
                FieldType::Base(BaseType::Int),
                FieldType::Base(BaseType::Boolean),
                FieldType::Object("java/lang/String".to_string()),
            ]
        );
        assert_eq!(desc.return_type, ReturnType::Void);
    }

    #[test]
    fn rejects_truncated_descriptors() {
        assert!(parse_method_descriptor("(I").is_err());
        assert!(parse_method_descriptor("(I)").is_err());
        assert!(parse_field_descriptor("Ljava/lang/String").is_err());
        assert!(parse_field_descriptor("II").is_err());
    }
}
