use crate::classfile::{ClassFile, ClassMember, InnerClassInfo};
use crate::descriptor::{parse_field_descriptor, parse_method_descriptor, FieldType, MethodDescriptor};
use crate::error::Result;
use crate::signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, ClassSignature,
    FieldTypeSignature, MethodSignature,
};

/// A class with parsed descriptors and signatures, ready to back a declaration.
#[derive(Debug, Clone)]
pub struct ClassStub {
    pub internal_name: String,
    pub access_flags: u16,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub signature: Option<ClassSignature>,
    pub inner_classes: Vec<InnerClassInfo>,
    pub fields: Vec<FieldStub>,
    pub methods: Vec<MethodStub>,
}

#[derive(Debug, Clone)]
pub struct FieldStub {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: FieldType,
    pub signature: Option<FieldTypeSignature>,
}

#[derive(Debug, Clone)]
pub struct MethodStub {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: MethodDescriptor,
    pub signature: Option<MethodSignature>,
}

/// A named member type declared directly inside a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberTypeStub {
    pub simple_name: String,
    pub internal_name: String,
    pub access_flags: u16,
}

impl ClassStub {
    pub fn from_classfile(class: &ClassFile) -> Result<Self> {
        let signature = class
            .signature
            .as_deref()
            .map(parse_class_signature)
            .transpose()?;

        let fields = class
            .fields
            .iter()
            .map(field_stub)
            .collect::<Result<Vec<_>>>()?;
        let methods = class
            .methods
            .iter()
            .map(method_stub)
            .collect::<Result<Vec<_>>>()?;

        Ok(ClassStub {
            internal_name: class.this_class.clone(),
            access_flags: class.access_flags,
            super_class: class.super_class.clone(),
            interfaces: class.interfaces.clone(),
            signature,
            inner_classes: class.inner_classes.clone(),
            fields,
            methods,
        })
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::from_classfile(&ClassFile::parse(bytes)?)
    }

    fn own_inner_entry(&self) -> Option<&InnerClassInfo> {
        self.inner_classes
            .iter()
            .find(|info| info.inner_class == self.internal_name)
    }

    /// Anonymous and local classes never resolve by name.
    pub fn is_local_or_anonymous(&self) -> bool {
        matches!(
            self.own_inner_entry(),
            Some(info) if info.outer_class.is_none() || info.inner_name.is_none()
        )
    }

    /// Canonical dotted name: nesting recorded in `InnerClasses` becomes `.`, other `$`s stay.
    pub fn source_name(&self) -> String {
        let mut current = self.internal_name.as_str();
        let mut suffix: Vec<&str> = Vec::new();
        while let Some(info) = self
            .inner_classes
            .iter()
            .find(|info| info.inner_class == current)
        {
            // Malformed attributes can describe a cycle.
            if suffix.len() > self.inner_classes.len() {
                break;
            }
            match (&info.outer_class, &info.inner_name) {
                (Some(outer), Some(inner)) => {
                    suffix.push(inner.as_str());
                    current = outer.as_str();
                }
                _ => break,
            }
        }

        let mut out = current.replace('/', ".");
        for seg in suffix.iter().rev() {
            out.push('.');
            out.push_str(seg);
        }
        out
    }

    /// Effective access flags. Nested classes carry their real visibility in `InnerClasses`.
    pub fn effective_access_flags(&self) -> u16 {
        self.own_inner_entry()
            .map(|info| info.access_flags)
            .unwrap_or(self.access_flags)
    }

    pub fn member_types(&self) -> impl Iterator<Item = MemberTypeStub> + '_ {
        self.inner_classes.iter().filter_map(move |info| {
            let outer = info.outer_class.as_deref()?;
            if outer != self.internal_name {
                return None;
            }
            Some(MemberTypeStub {
                simple_name: info.inner_name.clone()?,
                internal_name: info.inner_class.clone(),
                access_flags: info.access_flags,
            })
        })
    }
}

fn field_stub(field: &ClassMember) -> Result<FieldStub> {
    Ok(FieldStub {
        access_flags: field.access_flags,
        name: field.name.clone(),
        descriptor: parse_field_descriptor(&field.descriptor)?,
        signature: field
            .signature
            .as_deref()
            .map(parse_field_signature)
            .transpose()?,
    })
}

fn method_stub(method: &ClassMember) -> Result<MethodStub> {
    Ok(MethodStub {
        access_flags: method.access_flags,
        name: method.name.clone(),
        descriptor: parse_method_descriptor(&method.descriptor)?,
        signature: method
            .signature
            .as_deref()
            .map(parse_method_signature)
            .transpose()?,
    })
}

impl ClassFile {
    pub fn stub(&self) -> Result<ClassStub> {
        ClassStub::from_classfile(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_test_utils::ClassFileBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_class_gets_dotted_source_name() {
        let bytes = ClassFileBuilder::class("java/util/Map$Entry")
            .access(0x0601)
            .inner_class("java/util/Map$Entry", Some("java/util/Map"), Some("Entry"), 0x0609)
            .build();
        let stub = ClassStub::parse(&bytes).unwrap();
        assert_eq!(stub.source_name(), "java.util.Map.Entry");
        assert_eq!(stub.effective_access_flags(), 0x0609);
        assert!(!stub.is_local_or_anonymous());
    }

    #[test]
    fn dollar_without_inner_classes_is_part_of_the_name() {
        let stub = ClassStub::parse(&ClassFileBuilder::class("gen/Foo$Bar").build()).unwrap();
        assert_eq!(stub.source_name(), "gen.Foo$Bar");
    }

    #[test]
    fn anonymous_classes_are_flagged_and_member_types_listed() {
        let anon = ClassFileBuilder::class("demo/Outer$1")
            .inner_class("demo/Outer$1", None, None, 0)
            .build();
        assert!(ClassStub::parse(&anon).unwrap().is_local_or_anonymous());

        let outer = ClassFileBuilder::class("demo/Outer")
            .inner_class("demo/Outer$Inner", Some("demo/Outer"), Some("Inner"), 0x0009)
            .inner_class("demo/Outer$1", None, None, 0)
            .build();
        let members: Vec<_> = ClassStub::parse(&outer).unwrap().member_types().collect();
        assert_eq!(
            members,
            vec![MemberTypeStub {
                simple_name: "Inner".into(),
                internal_name: "demo/Outer$Inner".into(),
                access_flags: 0x0009,
            }]
        );
    }
}
