//! Fully-qualified names the engine refers to directly.

pub const OBJECT: &str = "java.lang.Object";
pub const STRING: &str = "java.lang.String";
pub const CLASS: &str = "java.lang.Class";
pub const ENUM: &str = "java.lang.Enum";
pub const NUMBER: &str = "java.lang.Number";
pub const BIG_INTEGER: &str = "java.math.BigInteger";
pub const BIG_DECIMAL: &str = "java.math.BigDecimal";
pub const LIST: &str = "java.util.List";
pub const LINKED_HASH_MAP: &str = "java.util.LinkedHashMap";
pub const MATCHER: &str = "java.util.regex.Matcher";
pub const GROOVY_OBJECT: &str = "groovy.lang.GroovyObject";
pub const GSTRING: &str = "groovy.lang.GString";
pub const CLOSURE: &str = "groovy.lang.Closure";
pub const RANGE: &str = "groovy.lang.Range";
pub const INT_RANGE: &str = "groovy.lang.IntRange";
pub const SCRIPT: &str = "groovy.lang.Script";
