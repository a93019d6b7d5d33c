use crate::ClassFileBuilder;

const PUBLIC: u16 = 0x0001;
const PRIVATE: u16 = 0x0002;
const STATIC: u16 = 0x0008;
const FINAL: u16 = 0x0010;
const VARARGS: u16 = 0x0080;
const ABSTRACT: u16 = 0x0400;

/// A small slice of the JDK and the Groovy runtime, compiled in-process.
///
/// Returns `(internal name, class file bytes)` pairs: enough hierarchy for boxing, numeric
/// wrappers, collections, nested types and script methods.
pub fn mini_jdk() -> Vec<(&'static str, Vec<u8>)> {
    let iface = |name: &str| ClassFileBuilder::interface(name);
    let mut out = vec![
        (
            "java/lang/Object",
            ClassFileBuilder::class("java/lang/Object")
                .super_class(None)
                .method(PUBLIC, "<init>", "()V", None)
                .method(PUBLIC, "toString", "()Ljava/lang/String;", None)
                .method(PUBLIC, "hashCode", "()I", None)
                .method(PUBLIC, "equals", "(Ljava/lang/Object;)Z", None)
                .build(),
        ),
        ("java/io/Serializable", iface("java/io/Serializable").build()),
        ("java/lang/Cloneable", iface("java/lang/Cloneable").build()),
        (
            "java/lang/Comparable",
            iface("java/lang/Comparable")
                .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
                .method(PUBLIC | ABSTRACT, "compareTo", "(Ljava/lang/Object;)I", Some("(TT;)I"))
                .build(),
        ),
        (
            "java/lang/CharSequence",
            iface("java/lang/CharSequence")
                .method(PUBLIC | ABSTRACT, "length", "()I", None)
                .build(),
        ),
        (
            "java/lang/String",
            ClassFileBuilder::class("java/lang/String")
                .access(0x0031)
                .implements("java/io/Serializable")
                .implements("java/lang/Comparable")
                .implements("java/lang/CharSequence")
                .signature(
                    "Ljava/lang/Object;Ljava/io/Serializable;Ljava/lang/Comparable<Ljava/lang/String;>;Ljava/lang/CharSequence;",
                )
                .field(PRIVATE | FINAL, "value", "[B", None)
                .method(PUBLIC, "<init>", "()V", None)
                .method(PUBLIC, "length", "()I", None)
                .method(PUBLIC, "substring", "(I)Ljava/lang/String;", None)
                .method(PUBLIC, "substring", "(II)Ljava/lang/String;", None)
                .method(PUBLIC, "toUpperCase", "()Ljava/lang/String;", None)
                .method(
                    PUBLIC | STATIC | VARARGS,
                    "format",
                    "(Ljava/lang/String;[Ljava/lang/Object;)Ljava/lang/String;",
                    None,
                )
                .build(),
        ),
        (
            "java/lang/Number",
            ClassFileBuilder::class("java/lang/Number")
                .access(0x0421)
                .implements("java/io/Serializable")
                .method(PUBLIC | ABSTRACT, "intValue", "()I", None)
                .method(PUBLIC | ABSTRACT, "doubleValue", "()D", None)
                .build(),
        ),
        ("java/lang/Boolean", wrapper("java/lang/Boolean", None, "Z")),
        ("java/lang/Character", wrapper("java/lang/Character", None, "C")),
        ("java/lang/Byte", wrapper("java/lang/Byte", Some("java/lang/Number"), "B")),
        ("java/lang/Short", wrapper("java/lang/Short", Some("java/lang/Number"), "S")),
        ("java/lang/Integer", wrapper("java/lang/Integer", Some("java/lang/Number"), "I")),
        ("java/lang/Long", wrapper("java/lang/Long", Some("java/lang/Number"), "J")),
        ("java/lang/Float", wrapper("java/lang/Float", Some("java/lang/Number"), "F")),
        ("java/lang/Double", wrapper("java/lang/Double", Some("java/lang/Number"), "D")),
        (
            "java/lang/Math",
            ClassFileBuilder::class("java/lang/Math")
                .access(0x0031)
                .field(PUBLIC | STATIC | FINAL, "PI", "D", None)
                .method(PUBLIC | STATIC, "max", "(II)I", None)
                .method(PUBLIC | STATIC, "max", "(JJ)J", None)
                .method(PUBLIC | STATIC, "max", "(DD)D", None)
                .method(PUBLIC | STATIC, "abs", "(I)I", None)
                .build(),
        ),
        (
            "java/lang/Class",
            ClassFileBuilder::class("java/lang/Class")
                .access(0x0031)
                .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
                .method(PUBLIC, "getName", "()Ljava/lang/String;", None)
                .build(),
        ),
        (
            "java/lang/Enum",
            ClassFileBuilder::class("java/lang/Enum")
                .access(0x0421)
                .signature("<E:Ljava/lang/Enum<TE;>;>Ljava/lang/Object;Ljava/lang/Comparable<TE;>;")
                .implements("java/lang/Comparable")
                .method(PUBLIC | FINAL, "name", "()Ljava/lang/String;", None)
                .method(PUBLIC | FINAL, "ordinal", "()I", None)
                .build(),
        ),
        (
            "java/lang/Iterable",
            iface("java/lang/Iterable")
                .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
                .build(),
        ),
        (
            "java/util/Collection",
            iface("java/util/Collection")
                .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/lang/Iterable<TE;>;")
                .implements("java/lang/Iterable")
                .method(PUBLIC | ABSTRACT, "size", "()I", None)
                .method(PUBLIC | ABSTRACT, "add", "(Ljava/lang/Object;)Z", Some("(TE;)Z"))
                .build(),
        ),
        (
            "java/util/List",
            iface("java/util/List")
                .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Collection<TE;>;")
                .implements("java/util/Collection")
                .method(PUBLIC | ABSTRACT, "get", "(I)Ljava/lang/Object;", Some("(I)TE;"))
                .build(),
        ),
        (
            "java/util/ArrayList",
            ClassFileBuilder::class("java/util/ArrayList")
                .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/List<TE;>;")
                .implements("java/util/List")
                .method(PUBLIC, "<init>", "()V", None)
                .method(PUBLIC, "size", "()I", None)
                .build(),
        ),
        (
            "java/util/Map",
            iface("java/util/Map")
                .signature("<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;")
                .inner_class("java/util/Map$Entry", Some("java/util/Map"), Some("Entry"), 0x0609)
                .method(PUBLIC | ABSTRACT, "get", "(Ljava/lang/Object;)Ljava/lang/Object;", Some("(Ljava/lang/Object;)TV;"))
                .build(),
        ),
        (
            "java/util/Map$Entry",
            iface("java/util/Map$Entry")
                .signature("<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;")
                .inner_class("java/util/Map$Entry", Some("java/util/Map"), Some("Entry"), 0x0609)
                .method(PUBLIC | ABSTRACT, "getKey", "()Ljava/lang/Object;", Some("()TK;"))
                .build(),
        ),
        (
            "java/util/LinkedHashMap",
            ClassFileBuilder::class("java/util/LinkedHashMap")
                .signature("<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Map<TK;TV;>;")
                .implements("java/util/Map")
                .method(PUBLIC, "<init>", "()V", None)
                .build(),
        ),
        (
            "java/util/regex/Matcher",
            ClassFileBuilder::class("java/util/regex/Matcher")
                .access(0x0031)
                .method(PUBLIC, "matches", "()Z", None)
                .build(),
        ),
        (
            "java/math/BigInteger",
            ClassFileBuilder::class("java/math/BigInteger")
                .super_class(Some("java/lang/Number"))
                .build(),
        ),
        (
            "java/math/BigDecimal",
            ClassFileBuilder::class("java/math/BigDecimal")
                .super_class(Some("java/lang/Number"))
                .build(),
        ),
        ("groovy/lang/GroovyObject", iface("groovy/lang/GroovyObject").build()),
        (
            "groovy/lang/GString",
            ClassFileBuilder::class("groovy/lang/GString")
                .access(0x0421)
                .implements("java/lang/CharSequence")
                .build(),
        ),
        (
            "groovy/lang/Closure",
            ClassFileBuilder::class("groovy/lang/Closure")
                .access(0x0421)
                .signature("<V:Ljava/lang/Object;>Ljava/lang/Object;")
                .method(PUBLIC, "call", "()Ljava/lang/Object;", Some("()TV;"))
                .build(),
        ),
        (
            "groovy/lang/Range",
            iface("groovy/lang/Range")
                .signature("<T::Ljava/lang/Comparable;>Ljava/lang/Object;Ljava/util/List<TT;>;")
                .implements("java/util/List")
                .build(),
        ),
        (
            "groovy/lang/IntRange",
            ClassFileBuilder::class("groovy/lang/IntRange")
                .implements("groovy/lang/Range")
                .build(),
        ),
        (
            "groovy/lang/Script",
            ClassFileBuilder::class("groovy/lang/Script")
                .access(0x0421)
                .implements("groovy/lang/GroovyObject")
                .method(PUBLIC, "println", "(Ljava/lang/Object;)V", None)
                .method(PUBLIC, "println", "()V", None)
                .method(PUBLIC, "getBinding", "()Lgroovy/lang/Binding;", None)
                .build(),
        ),
    ];
    out.sort_by_key(|(name, _)| *name);
    out
}

fn wrapper(internal: &str, super_class: Option<&str>, primitive: &str) -> Vec<u8> {
    let mut builder = ClassFileBuilder::class(internal)
        .access(0x0031)
        .implements("java/io/Serializable")
        .implements("java/lang/Comparable")
        .field(PUBLIC | STATIC | FINAL, "TYPE", "Ljava/lang/Class;", None)
        .method(
            PUBLIC | STATIC,
            "valueOf",
            &format!("({primitive})L{internal};"),
            None,
        );
    if let Some(super_class) = super_class {
        builder = builder.super_class(Some(super_class));
    }
    builder.build()
}
