use crate::constant_pool::ConstantPool;
use crate::error::{Error, Result};
use crate::reader::Reader;

const ACC_SYNTHETIC: u16 = 0x1000;

/// A decoded class file, names still in internal (`a/b/C$D`) form.
#[derive(Debug, Clone)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub access_flags: u16,
    pub this_class: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<ClassMember>,
    pub methods: Vec<ClassMember>,
    pub signature: Option<String>,
    pub inner_classes: Vec<InnerClassInfo>,
}

#[derive(Debug, Clone)]
pub struct ClassMember {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
}

impl ClassMember {
    pub fn is_synthetic(&self) -> bool {
        self.access_flags & ACC_SYNTHETIC != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClassInfo {
    pub inner_class: String,
    pub outer_class: Option<String>,
    /// `None` for anonymous classes.
    pub inner_name: Option<String>,
    pub access_flags: u16,
}

impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let magic = reader.read_u4()?;
        if magic != 0xCAFEBABE {
            return Err(Error::BadMagic(magic));
        }

        let minor_version = reader.read_u2()?;
        let major_version = reader.read_u2()?;
        let cp = ConstantPool::parse(&mut reader)?;

        let access_flags = reader.read_u2()?;
        let this_class = cp.get_class_name(reader.read_u2()?)?;
        let super_class = match reader.read_u2()? {
            0 => None,
            idx => Some(cp.get_class_name(idx)?),
        };

        let interfaces = (0..reader.read_u2()?)
            .map(|_| cp.get_class_name(reader.read_u2()?))
            .collect::<Result<Vec<_>>>()?;
        let fields = (0..reader.read_u2()?)
            .map(|_| parse_member(&mut reader, &cp))
            .collect::<Result<Vec<_>>>()?;
        let methods = (0..reader.read_u2()?)
            .map(|_| parse_member(&mut reader, &cp))
            .collect::<Result<Vec<_>>>()?;

        let attrs = parse_attributes(&mut reader, &cp, AttributeTarget::Class)?;
        reader.ensure_empty()?;

        Ok(Self {
            minor_version,
            major_version,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            signature: attrs.signature,
            inner_classes: attrs.inner_classes,
        })
    }
}

fn parse_member(reader: &mut Reader<'_>, cp: &ConstantPool) -> Result<ClassMember> {
    let mut access_flags = reader.read_u2()?;
    let name = cp.get_utf8(reader.read_u2()?)?.to_string();
    let descriptor = cp.get_utf8(reader.read_u2()?)?.to_string();

    let attrs = parse_attributes(reader, cp, AttributeTarget::Member)?;
    // Pre-Java-5 compilers mark synthetic members with an attribute instead of the flag.
    if attrs.synthetic {
        access_flags |= ACC_SYNTHETIC;
    }
    Ok(ClassMember {
        access_flags,
        name,
        descriptor,
        signature: attrs.signature,
    })
}

#[derive(Default)]
struct ParsedAttributes {
    signature: Option<String>,
    synthetic: bool,
    inner_classes: Vec<InnerClassInfo>,
}

enum AttributeTarget {
    Class,
    Member,
}

fn parse_attributes(
    reader: &mut Reader<'_>,
    cp: &ConstantPool,
    target: AttributeTarget,
) -> Result<ParsedAttributes> {
    let count = reader.read_u2()?;
    let mut parsed = ParsedAttributes::default();
    for _ in 0..count {
        let name_index = reader.read_u2()?;
        let length = reader.read_u4()? as usize;
        let info = reader.read_bytes(length)?;
        let name = cp.get_utf8(name_index)?;

        let mut sub = Reader::new(info);
        match name {
            "Signature" => {
                let sig_index = sub
                    .read_u2()
                    .map_err(|_| Error::BadAttribute("Signature"))?;
                parsed.signature = Some(cp.get_utf8(sig_index)?.to_string());
                sub.ensure_empty()
                    .map_err(|_| Error::BadAttribute("Signature"))?;
            }
            "Synthetic" => parsed.synthetic = true,
            "InnerClasses" if matches!(target, AttributeTarget::Class) => {
                let num = sub.read_u2()?;
                for _ in 0..num {
                    let inner_class = cp.get_class_name(sub.read_u2()?)?;
                    let outer_class = match sub.read_u2()? {
                        0 => None,
                        idx => Some(cp.get_class_name(idx)?),
                    };
                    let inner_name = match sub.read_u2()? {
                        0 => None,
                        idx => Some(cp.get_utf8(idx)?.to_string()),
                    };
                    let access_flags = sub.read_u2()?;
                    parsed.inner_classes.push(InnerClassInfo {
                        inner_class,
                        outer_class,
                        inner_name,
                        access_flags,
                    });
                }
                sub.ensure_empty()
                    .map_err(|_| Error::BadAttribute("InnerClasses"))?;
            }
            _ => {}
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_test_utils::ClassFileBuilder;

    #[test]
    fn parses_header_members_and_signature() {
        let bytes = ClassFileBuilder::class("demo/Box")
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
            .implements("java/io/Serializable")
            .field(0x0002, "value", "Ljava/lang/Object;", Some("TT;"))
            .method(0x0001, "get", "()Ljava/lang/Object;", Some("()TT;"))
            .build();

        let class = ClassFile::parse(&bytes).unwrap();
        assert_eq!(class.this_class, "demo/Box");
        assert_eq!(class.super_class.as_deref(), Some("java/lang/Object"));
        assert_eq!(class.interfaces, vec!["java/io/Serializable".to_string()]);
        assert_eq!(class.signature.as_deref(), Some("<T:Ljava/lang/Object;>Ljava/lang/Object;"));
        assert_eq!(class.fields[0].signature.as_deref(), Some("TT;"));
        assert_eq!(class.methods[0].name, "get");
    }

    #[test]
    fn rejects_bad_magic_and_truncation() {
        assert!(matches!(
            ClassFile::parse(&[0, 0, 0, 0]),
            Err(Error::BadMagic(0))
        ));
        let bytes = ClassFileBuilder::class("demo/A").build();
        assert!(matches!(
            ClassFile::parse(&bytes[..bytes.len() - 3]),
            Err(Error::Truncated { .. })
        ));
    }
}
