use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Why a class file could not be decoded. Offsets are byte positions into the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Truncated { offset: usize },
    TrailingBytes(usize),
    BadMagic(u32),
    ConstantIndexOutOfRange(u16),
    UnknownConstantTag(u8),
    WrongConstantKind {
        index: u16,
        expected: &'static str,
        found: &'static str,
    },
    BadModifiedUtf8,
    BadDescriptor(String),
    BadSignature(String),
    BadAttribute(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Truncated { offset } => write!(f, "class file truncated at byte {offset}"),
            Error::TrailingBytes(count) => write!(f, "{count} bytes left over after the class"),
            Error::BadMagic(magic) => write!(f, "not a class file (magic 0x{magic:08x})"),
            Error::ConstantIndexOutOfRange(index) => {
                write!(f, "constant #{index} is out of range")
            }
            Error::UnknownConstantTag(tag) => write!(f, "unknown constant tag {tag}"),
            Error::WrongConstantKind {
                index,
                expected,
                found,
            } => write!(f, "constant #{index} is {found}, expected {expected}"),
            Error::BadModifiedUtf8 => f.write_str("constant is not valid modified UTF-8"),
            Error::BadDescriptor(desc) => write!(f, "bad descriptor `{desc}`"),
            Error::BadSignature(sig) => write!(f, "bad generic signature `{sig}`"),
            Error::BadAttribute(name) => write!(f, "bad `{name}` attribute"),
        }
    }
}

impl std::error::Error for Error {}
