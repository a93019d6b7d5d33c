use crate::error::{Error, Result};
use crate::reader::Reader;

#[derive(Debug, Clone)]
enum Entry {
    Utf8(String),
    Class { name_index: u16 },
    /// Any constant the resolver never dereferences (numbers, member refs, method handles, ...).
    Other(&'static str),
}

impl Entry {
    fn kind(&self) -> &'static str {
        match self {
            Entry::Utf8(_) => "Utf8",
            Entry::Class { .. } => "Class",
            Entry::Other(kind) => kind,
        }
    }
}

/// Constant pool with 1-based indices; the second slot of `long`/`double` constants is `None`.
#[derive(Debug, Clone)]
pub(crate) struct ConstantPool {
    entries: Vec<Option<Entry>>,
}

impl ConstantPool {
    pub(crate) fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count);
        entries.push(None);

        while entries.len() < count {
            let tag = reader.read_u1()?;
            let entry = match tag {
                1 => {
                    let len = reader.read_u2()? as usize;
                    Entry::Utf8(decode_modified_utf8(reader.read_bytes(len)?)?)
                }
                3 => {
                    reader.skip(4)?;
                    Entry::Other("Integer")
                }
                4 => {
                    reader.skip(4)?;
                    Entry::Other("Float")
                }
                5 | 6 => {
                    reader.skip(8)?;
                    entries.push(Some(Entry::Other(if tag == 5 { "Long" } else { "Double" })));
                    entries.push(None);
                    continue;
                }
                7 => Entry::Class {
                    name_index: reader.read_u2()?,
                },
                8 => {
                    reader.skip(2)?;
                    Entry::Other("String")
                }
                9 | 10 | 11 => {
                    reader.skip(4)?;
                    Entry::Other("MemberRef")
                }
                12 => {
                    reader.skip(4)?;
                    Entry::Other("NameAndType")
                }
                15 => {
                    reader.skip(3)?;
                    Entry::Other("MethodHandle")
                }
                16 => {
                    reader.skip(2)?;
                    Entry::Other("MethodType")
                }
                17 | 18 => {
                    reader.skip(4)?;
                    Entry::Other("Dynamic")
                }
                19 => {
                    reader.skip(2)?;
                    Entry::Other("Module")
                }
                20 => {
                    reader.skip(2)?;
                    Entry::Other("Package")
                }
                other => return Err(Error::UnknownConstantTag(other)),
            };
            entries.push(Some(entry));
        }

        Ok(Self { entries })
    }

    fn entry(&self, index: u16) -> Result<&Entry> {
        self.entries
            .get(index as usize)
            .and_then(Option::as_ref)
            .ok_or(Error::ConstantIndexOutOfRange(index))
    }

    pub(crate) fn get_utf8(&self, index: u16) -> Result<&str> {
        match self.entry(index)? {
            Entry::Utf8(text) => Ok(text),
            other => Err(Error::WrongConstantKind {
                index,
                expected: "Utf8",
                found: other.kind(),
            }),
        }
    }

    pub(crate) fn get_class_name(&self, index: u16) -> Result<String> {
        match self.entry(index)? {
            Entry::Class { name_index } => Ok(self.get_utf8(*name_index)?.to_string()),
            other => Err(Error::WrongConstantKind {
                index,
                expected: "Class",
                found: other.kind(),
            }),
        }
    }
}

/// JVM "modified UTF-8": `\0` is encoded as `C0 80` and supplementary characters as surrogate
/// pairs of 3-byte sequences.
fn decode_modified_utf8(bytes: &[u8]) -> Result<String> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        let b0 = bytes[idx];
        if b0 & 0x80 == 0 {
            if b0 == 0 {
                return Err(Error::BadModifiedUtf8);
            }
            units.push(b0 as u16);
            idx += 1;
        } else if b0 & 0xE0 == 0xC0 {
            let b1 = *bytes.get(idx + 1).ok_or(Error::BadModifiedUtf8)?;
            if b1 & 0xC0 != 0x80 {
                return Err(Error::BadModifiedUtf8);
            }
            units.push((((b0 & 0x1F) as u16) << 6) | (b1 & 0x3F) as u16);
            idx += 2;
        } else if b0 & 0xF0 == 0xE0 {
            let b1 = *bytes.get(idx + 1).ok_or(Error::BadModifiedUtf8)?;
            let b2 = *bytes.get(idx + 2).ok_or(Error::BadModifiedUtf8)?;
            if b1 & 0xC0 != 0x80 || b2 & 0xC0 != 0x80 {
                return Err(Error::BadModifiedUtf8);
            }
            units.push(
                (((b0 & 0x0F) as u16) << 12) | (((b1 & 0x3F) as u16) << 6) | (b2 & 0x3F) as u16,
            );
            idx += 3;
        } else {
            return Err(Error::BadModifiedUtf8);
        }
    }
    String::from_utf16(&units).map_err(|_| Error::BadModifiedUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_embedded_nul_and_ascii() {
        assert_eq!(decode_modified_utf8(b"abc").unwrap(), "abc");
        assert_eq!(decode_modified_utf8(&[b'a', 0xC0, 0x80, b'b']).unwrap(), "a\0b");
    }

    #[test]
    fn rejects_raw_nul_and_truncated_sequences() {
        assert_eq!(decode_modified_utf8(&[0]), Err(Error::BadModifiedUtf8));
        assert_eq!(decode_modified_utf8(&[0xE2, 0x82]), Err(Error::BadModifiedUtf8));
    }

    #[test]
    fn long_constants_take_two_slots() {
        // count=4: #1 Long (occupies #1,#2), #3 Utf8 "x"
        let bytes = [
            0x00, 0x04, 5, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0x00, 0x01, b'x',
        ];
        let mut reader = Reader::new(&bytes);
        let pool = ConstantPool::parse(&mut reader).unwrap();
        assert_eq!(pool.get_utf8(3).unwrap(), "x");
        assert_eq!(pool.get_utf8(2), Err(Error::ConstantIndexOutOfRange(2)));
    }
}
