use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use loam_classfile::{
    parse_class_signature, parse_field_descriptor, parse_field_signature,
    parse_method_descriptor, parse_method_signature, ClassStub, FieldStub, InnerClassInfo,
    MethodStub,
};
use loam_core::flags::{
    ACC_ABSTRACT, ACC_ANNOTATION, ACC_FINAL, ACC_INTERFACE, ACC_PUBLIC, ACC_STATIC, ACC_VARARGS,
};
use loam_core::SymbolReference;
use loam_resolve::decl::IntrospectedType;
use loam_resolve::{SolverError, TypeDecl, TypeSolver};

const PUBLIC: u16 = ACC_PUBLIC;
const STATIC: u16 = ACC_PUBLIC | ACC_STATIC;
const FINAL_CLASS: u16 = ACC_PUBLIC | ACC_FINAL;
const ABSTRACT_CLASS: u16 = ACC_PUBLIC | ACC_ABSTRACT;
const INTERFACE: u16 = ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT;
const ANNOTATION: u16 = INTERFACE | ACC_ANNOTATION;
const ABSTRACT: u16 = ACC_PUBLIC | ACC_ABSTRACT;
const CONSTANT: u16 = ACC_PUBLIC | ACC_STATIC | ACC_FINAL;
const STATIC_VARARGS: u16 = STATIC | ACC_VARARGS;

const OBJECT: &str = "java/lang/Object";

/// Prefixes `trusted_only` keeps.
const TRUSTED_PREFIXES: [&str; 3] = ["java.", "javax.", "groovy."];

/// Solves the always-available platform classes from a built-in table of core `java.lang`,
/// `java.util`, `java.io`, `java.math`, `java.util.regex` and `groovy.lang` types.
///
/// Stubs are built on first lookup and shared afterwards. Pair it with a JDK's jmods (see
/// `ClasspathConfig::jdk_home`) when the full platform is needed.
pub struct PlatformTypeSolver {
    trusted_only: bool,
    index: HashMap<String, usize>,
    loaded: DashMap<usize, Arc<TypeDecl>>,
}

impl PlatformTypeSolver {
    pub fn new() -> Self {
        let index = PLATFORM
            .iter()
            .enumerate()
            .map(|(idx, class)| (canonical_name(class.name), idx))
            .collect();
        Self {
            trusted_only: false,
            index,
            loaded: DashMap::new(),
        }
    }

    /// Restricts the solver to `java.*`, `javax.*` and `groovy.*` names.
    pub fn trusted_only(mut self) -> Self {
        self.trusted_only = true;
        self
    }

    pub fn is_trusted_only(&self) -> bool {
        self.trusted_only
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.index
            .keys()
            .map(String::as_str)
            .filter(|name| !self.trusted_only || is_trusted(name))
    }

    pub fn len(&self) -> usize {
        self.type_names().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PlatformTypeSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeSolver for PlatformTypeSolver {
    fn lookup(&self, name: &str) -> Result<SymbolReference<Arc<TypeDecl>>, SolverError> {
        if self.trusted_only && !is_trusted(name) {
            return Ok(SymbolReference::Unsolved);
        }
        let Some(&idx) = self.index.get(name) else {
            return Ok(SymbolReference::Unsolved);
        };
        if let Some(hit) = self.loaded.get(&idx) {
            tracing::trace!(target: "loam.classpath", name, "platform cache hit");
            return Ok(SymbolReference::Solved(hit.value().clone()));
        }

        let stub = build_stub(&PLATFORM[idx]).map_err(|source| SolverError::ClassFormat {
            name: name.to_string(),
            source,
        })?;
        let decl = Arc::new(TypeDecl::from(IntrospectedType::new(stub)));
        let decl = self.loaded.entry(idx).or_insert(decl).value().clone();
        Ok(SymbolReference::Solved(decl))
    }

    fn describe(&self) -> String {
        if self.trusted_only {
            "platform(trusted)".to_string()
        } else {
            "platform".to_string()
        }
    }
}

fn is_trusted(name: &str) -> bool {
    TRUSTED_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// The table never uses `$` except for nesting.
fn canonical_name(internal: &str) -> String {
    internal.replace(['/', '$'], ".")
}

fn build_stub(class: &PlatformClass) -> loam_classfile::Result<ClassStub> {
    let inner_classes = PLATFORM
        .iter()
        .filter_map(|nested| {
            let outer = nested.outer?;
            (nested.name == class.name || outer == class.name).then(|| InnerClassInfo {
                inner_class: nested.name.to_string(),
                outer_class: Some(outer.to_string()),
                inner_name: nested.name.rsplit_once('$').map(|(_, simple)| simple.to_string()),
                access_flags: nested.access | ACC_STATIC,
            })
        })
        .collect();

    let fields = class
        .fields
        .iter()
        .map(|field| {
            Ok(FieldStub {
                access_flags: field.access,
                name: field.name.to_string(),
                descriptor: parse_field_descriptor(field.descriptor)?,
                signature: field.signature.map(parse_field_signature).transpose()?,
            })
        })
        .collect::<loam_classfile::Result<Vec<_>>>()?;
    let methods = class
        .methods
        .iter()
        .map(|method| {
            Ok(MethodStub {
                access_flags: method.access,
                name: method.name.to_string(),
                descriptor: parse_method_descriptor(method.descriptor)?,
                signature: method.signature.map(parse_method_signature).transpose()?,
            })
        })
        .collect::<loam_classfile::Result<Vec<_>>>()?;

    Ok(ClassStub {
        internal_name: class.name.to_string(),
        access_flags: class.access,
        super_class: class.super_class.map(str::to_string),
        interfaces: class.interfaces.iter().map(|i| i.to_string()).collect(),
        signature: class.signature.map(parse_class_signature).transpose()?,
        inner_classes,
        fields,
        methods,
    })
}

struct PlatformClass {
    name: &'static str,
    access: u16,
    super_class: Option<&'static str>,
    interfaces: &'static [&'static str],
    signature: Option<&'static str>,
    /// Enclosing class of a member type.
    outer: Option<&'static str>,
    fields: &'static [Member],
    methods: &'static [Member],
}

struct Member {
    access: u16,
    name: &'static str,
    descriptor: &'static str,
    signature: Option<&'static str>,
}

const fn m(access: u16, name: &'static str, descriptor: &'static str) -> Member {
    Member {
        access,
        name,
        descriptor,
        signature: None,
    }
}

const fn g(access: u16, name: &'static str, descriptor: &'static str, signature: &'static str) -> Member {
    Member {
        access,
        name,
        descriptor,
        signature: Some(signature),
    }
}

const CLASS: PlatformClass = PlatformClass {
    name: "",
    access: PUBLIC,
    super_class: Some(OBJECT),
    interfaces: &[],
    signature: None,
    outer: None,
    fields: &[],
    methods: &[],
};

const IFACE: PlatformClass = PlatformClass {
    access: INTERFACE,
    ..CLASS
};

const NUMERIC_WRAPPER: PlatformClass = PlatformClass {
    access: FINAL_CLASS,
    super_class: Some("java/lang/Number"),
    interfaces: &["java/lang/Comparable"],
    ..CLASS
};

static PLATFORM: &[PlatformClass] = &[
    // java.lang
    PlatformClass {
        name: OBJECT,
        super_class: None,
        methods: &[
            m(PUBLIC, "<init>", "()V"),
            m(PUBLIC, "toString", "()Ljava/lang/String;"),
            m(PUBLIC, "hashCode", "()I"),
            m(PUBLIC, "equals", "(Ljava/lang/Object;)Z"),
            g(PUBLIC | ACC_FINAL, "getClass", "()Ljava/lang/Class;", "()Ljava/lang/Class<*>;"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "java/lang/Comparable",
        signature: Some("<T:Ljava/lang/Object;>Ljava/lang/Object;"),
        methods: &[g(ABSTRACT, "compareTo", "(Ljava/lang/Object;)I", "(TT;)I")],
        ..IFACE
    },
    PlatformClass {
        name: "java/lang/CharSequence",
        methods: &[
            m(ABSTRACT, "length", "()I"),
            m(ABSTRACT, "charAt", "(I)C"),
            m(ABSTRACT, "toString", "()Ljava/lang/String;"),
        ],
        ..IFACE
    },
    PlatformClass {
        name: "java/lang/Iterable",
        signature: Some("<T:Ljava/lang/Object;>Ljava/lang/Object;"),
        methods: &[g(
            ABSTRACT,
            "iterator",
            "()Ljava/util/Iterator;",
            "()Ljava/util/Iterator<TT;>;",
        )],
        ..IFACE
    },
    PlatformClass {
        name: "java/lang/Runnable",
        methods: &[m(ABSTRACT, "run", "()V")],
        ..IFACE
    },
    PlatformClass {
        name: "java/lang/Cloneable",
        ..IFACE
    },
    PlatformClass {
        name: "java/lang/String",
        access: FINAL_CLASS,
        interfaces: &[
            "java/io/Serializable",
            "java/lang/Comparable",
            "java/lang/CharSequence",
        ],
        signature: Some(
            "Ljava/lang/Object;Ljava/io/Serializable;Ljava/lang/Comparable<Ljava/lang/String;>;Ljava/lang/CharSequence;",
        ),
        methods: &[
            m(PUBLIC, "<init>", "()V"),
            m(PUBLIC, "<init>", "(Ljava/lang/String;)V"),
            m(PUBLIC, "length", "()I"),
            m(PUBLIC, "isEmpty", "()Z"),
            m(PUBLIC, "charAt", "(I)C"),
            m(PUBLIC, "substring", "(I)Ljava/lang/String;"),
            m(PUBLIC, "substring", "(II)Ljava/lang/String;"),
            m(PUBLIC, "indexOf", "(Ljava/lang/String;)I"),
            m(PUBLIC, "startsWith", "(Ljava/lang/String;)Z"),
            m(PUBLIC, "contains", "(Ljava/lang/CharSequence;)Z"),
            m(PUBLIC, "toUpperCase", "()Ljava/lang/String;"),
            m(PUBLIC, "toLowerCase", "()Ljava/lang/String;"),
            m(PUBLIC, "trim", "()Ljava/lang/String;"),
            m(PUBLIC, "split", "(Ljava/lang/String;)[Ljava/lang/String;"),
            m(PUBLIC, "compareTo", "(Ljava/lang/String;)I"),
            m(STATIC, "valueOf", "(Ljava/lang/Object;)Ljava/lang/String;"),
            m(STATIC, "valueOf", "(I)Ljava/lang/String;"),
            m(
                STATIC_VARARGS,
                "format",
                "(Ljava/lang/String;[Ljava/lang/Object;)Ljava/lang/String;",
            ),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "java/lang/StringBuilder",
        access: FINAL_CLASS,
        interfaces: &["java/lang/CharSequence", "java/io/Serializable"],
        methods: &[
            m(PUBLIC, "<init>", "()V"),
            m(PUBLIC, "<init>", "(Ljava/lang/String;)V"),
            m(PUBLIC, "append", "(Ljava/lang/String;)Ljava/lang/StringBuilder;"),
            m(PUBLIC, "append", "(Ljava/lang/Object;)Ljava/lang/StringBuilder;"),
            m(PUBLIC, "append", "(I)Ljava/lang/StringBuilder;"),
            m(PUBLIC, "length", "()I"),
            m(PUBLIC, "charAt", "(I)C"),
            m(PUBLIC, "toString", "()Ljava/lang/String;"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "java/lang/Number",
        access: ABSTRACT_CLASS,
        interfaces: &["java/io/Serializable"],
        methods: &[
            m(PUBLIC, "<init>", "()V"),
            m(ABSTRACT, "intValue", "()I"),
            m(ABSTRACT, "longValue", "()J"),
            m(ABSTRACT, "doubleValue", "()D"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "java/lang/Boolean",
        access: FINAL_CLASS,
        interfaces: &["java/io/Serializable", "java/lang/Comparable"],
        signature: Some(
            "Ljava/lang/Object;Ljava/io/Serializable;Ljava/lang/Comparable<Ljava/lang/Boolean;>;",
        ),
        fields: &[
            g(CONSTANT, "TYPE", "Ljava/lang/Class;", "Ljava/lang/Class<Ljava/lang/Boolean;>;"),
            m(CONSTANT, "TRUE", "Ljava/lang/Boolean;"),
            m(CONSTANT, "FALSE", "Ljava/lang/Boolean;"),
        ],
        methods: &[
            m(STATIC, "valueOf", "(Z)Ljava/lang/Boolean;"),
            m(STATIC, "parseBoolean", "(Ljava/lang/String;)Z"),
            m(PUBLIC, "booleanValue", "()Z"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "java/lang/Character",
        access: FINAL_CLASS,
        interfaces: &["java/io/Serializable", "java/lang/Comparable"],
        signature: Some(
            "Ljava/lang/Object;Ljava/io/Serializable;Ljava/lang/Comparable<Ljava/lang/Character;>;",
        ),
        fields: &[g(
            CONSTANT,
            "TYPE",
            "Ljava/lang/Class;",
            "Ljava/lang/Class<Ljava/lang/Character;>;",
        )],
        methods: &[
            m(STATIC, "valueOf", "(C)Ljava/lang/Character;"),
            m(STATIC, "isDigit", "(C)Z"),
            m(PUBLIC, "charValue", "()C"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "java/lang/Byte",
        signature: Some("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Byte;>;"),
        fields: &[g(CONSTANT, "TYPE", "Ljava/lang/Class;", "Ljava/lang/Class<Ljava/lang/Byte;>;")],
        methods: &[
            m(STATIC, "valueOf", "(B)Ljava/lang/Byte;"),
            m(PUBLIC, "byteValue", "()B"),
            m(PUBLIC, "intValue", "()I"),
            m(PUBLIC, "longValue", "()J"),
            m(PUBLIC, "doubleValue", "()D"),
        ],
        ..NUMERIC_WRAPPER
    },
    PlatformClass {
        name: "java/lang/Short",
        signature: Some("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Short;>;"),
        fields: &[g(CONSTANT, "TYPE", "Ljava/lang/Class;", "Ljava/lang/Class<Ljava/lang/Short;>;")],
        methods: &[
            m(STATIC, "valueOf", "(S)Ljava/lang/Short;"),
            m(PUBLIC, "shortValue", "()S"),
            m(PUBLIC, "intValue", "()I"),
            m(PUBLIC, "longValue", "()J"),
            m(PUBLIC, "doubleValue", "()D"),
        ],
        ..NUMERIC_WRAPPER
    },
    PlatformClass {
        name: "java/lang/Integer",
        signature: Some("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Integer;>;"),
        fields: &[
            g(CONSTANT, "TYPE", "Ljava/lang/Class;", "Ljava/lang/Class<Ljava/lang/Integer;>;"),
            m(CONSTANT, "MAX_VALUE", "I"),
            m(CONSTANT, "MIN_VALUE", "I"),
        ],
        methods: &[
            m(PUBLIC, "<init>", "(I)V"),
            m(STATIC, "valueOf", "(I)Ljava/lang/Integer;"),
            m(STATIC, "parseInt", "(Ljava/lang/String;)I"),
            m(STATIC, "toString", "(I)Ljava/lang/String;"),
            m(PUBLIC, "intValue", "()I"),
            m(PUBLIC, "longValue", "()J"),
            m(PUBLIC, "doubleValue", "()D"),
            m(PUBLIC, "compareTo", "(Ljava/lang/Integer;)I"),
        ],
        ..NUMERIC_WRAPPER
    },
    PlatformClass {
        name: "java/lang/Long",
        signature: Some("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Long;>;"),
        fields: &[
            g(CONSTANT, "TYPE", "Ljava/lang/Class;", "Ljava/lang/Class<Ljava/lang/Long;>;"),
            m(CONSTANT, "MAX_VALUE", "J"),
        ],
        methods: &[
            m(STATIC, "valueOf", "(J)Ljava/lang/Long;"),
            m(STATIC, "parseLong", "(Ljava/lang/String;)J"),
            m(PUBLIC, "intValue", "()I"),
            m(PUBLIC, "longValue", "()J"),
            m(PUBLIC, "doubleValue", "()D"),
        ],
        ..NUMERIC_WRAPPER
    },
    PlatformClass {
        name: "java/lang/Float",
        signature: Some("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Float;>;"),
        fields: &[g(CONSTANT, "TYPE", "Ljava/lang/Class;", "Ljava/lang/Class<Ljava/lang/Float;>;")],
        methods: &[
            m(STATIC, "valueOf", "(F)Ljava/lang/Float;"),
            m(PUBLIC, "floatValue", "()F"),
            m(PUBLIC, "intValue", "()I"),
            m(PUBLIC, "longValue", "()J"),
            m(PUBLIC, "doubleValue", "()D"),
        ],
        ..NUMERIC_WRAPPER
    },
    PlatformClass {
        name: "java/lang/Double",
        signature: Some("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Double;>;"),
        fields: &[
            g(CONSTANT, "TYPE", "Ljava/lang/Class;", "Ljava/lang/Class<Ljava/lang/Double;>;"),
            m(CONSTANT, "NaN", "D"),
        ],
        methods: &[
            m(STATIC, "valueOf", "(D)Ljava/lang/Double;"),
            m(STATIC, "parseDouble", "(Ljava/lang/String;)D"),
            m(PUBLIC, "intValue", "()I"),
            m(PUBLIC, "longValue", "()J"),
            m(PUBLIC, "doubleValue", "()D"),
        ],
        ..NUMERIC_WRAPPER
    },
    PlatformClass {
        name: "java/lang/Void",
        access: FINAL_CLASS,
        fields: &[g(CONSTANT, "TYPE", "Ljava/lang/Class;", "Ljava/lang/Class<Ljava/lang/Void;>;")],
        ..CLASS
    },
    PlatformClass {
        name: "java/lang/Math",
        access: FINAL_CLASS,
        fields: &[m(CONSTANT, "PI", "D"), m(CONSTANT, "E", "D")],
        methods: &[
            m(STATIC, "max", "(II)I"),
            m(STATIC, "max", "(JJ)J"),
            m(STATIC, "max", "(DD)D"),
            m(STATIC, "min", "(II)I"),
            m(STATIC, "min", "(JJ)J"),
            m(STATIC, "min", "(DD)D"),
            m(STATIC, "abs", "(I)I"),
            m(STATIC, "abs", "(J)J"),
            m(STATIC, "abs", "(D)D"),
            m(STATIC, "sqrt", "(D)D"),
            m(STATIC, "pow", "(DD)D"),
            m(STATIC, "round", "(D)J"),
            m(STATIC, "random", "()D"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "java/lang/System",
        access: FINAL_CLASS,
        fields: &[
            m(CONSTANT, "out", "Ljava/io/PrintStream;"),
            m(CONSTANT, "err", "Ljava/io/PrintStream;"),
        ],
        methods: &[
            m(STATIC, "currentTimeMillis", "()J"),
            m(STATIC, "nanoTime", "()J"),
            m(STATIC, "getProperty", "(Ljava/lang/String;)Ljava/lang/String;"),
            m(STATIC, "getenv", "(Ljava/lang/String;)Ljava/lang/String;"),
            m(STATIC, "lineSeparator", "()Ljava/lang/String;"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "java/lang/Class",
        access: FINAL_CLASS,
        signature: Some("<T:Ljava/lang/Object;>Ljava/lang/Object;"),
        methods: &[
            m(PUBLIC, "getName", "()Ljava/lang/String;"),
            m(PUBLIC, "getSimpleName", "()Ljava/lang/String;"),
            m(PUBLIC, "isInstance", "(Ljava/lang/Object;)Z"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "java/lang/Enum",
        access: ABSTRACT_CLASS,
        interfaces: &["java/lang/Comparable", "java/io/Serializable"],
        signature: Some(
            "<E:Ljava/lang/Enum<TE;>;>Ljava/lang/Object;Ljava/lang/Comparable<TE;>;Ljava/io/Serializable;",
        ),
        methods: &[
            m(PUBLIC | ACC_FINAL, "name", "()Ljava/lang/String;"),
            m(PUBLIC | ACC_FINAL, "ordinal", "()I"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "java/lang/Throwable",
        interfaces: &["java/io/Serializable"],
        methods: &[
            m(PUBLIC, "<init>", "()V"),
            m(PUBLIC, "<init>", "(Ljava/lang/String;)V"),
            m(PUBLIC, "getMessage", "()Ljava/lang/String;"),
            m(PUBLIC, "getCause", "()Ljava/lang/Throwable;"),
            m(PUBLIC, "printStackTrace", "()V"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "java/lang/Exception",
        super_class: Some("java/lang/Throwable"),
        methods: &[m(PUBLIC, "<init>", "()V"), m(PUBLIC, "<init>", "(Ljava/lang/String;)V")],
        ..CLASS
    },
    PlatformClass {
        name: "java/lang/RuntimeException",
        super_class: Some("java/lang/Exception"),
        methods: &[m(PUBLIC, "<init>", "()V"), m(PUBLIC, "<init>", "(Ljava/lang/String;)V")],
        ..CLASS
    },
    PlatformClass {
        name: "java/lang/IllegalArgumentException",
        super_class: Some("java/lang/RuntimeException"),
        methods: &[m(PUBLIC, "<init>", "()V"), m(PUBLIC, "<init>", "(Ljava/lang/String;)V")],
        ..CLASS
    },
    PlatformClass {
        name: "java/lang/annotation/Annotation",
        methods: &[m(
            ABSTRACT,
            "annotationType",
            "()Ljava/lang/Class;",
        )],
        ..IFACE
    },
    PlatformClass {
        name: "java/lang/Override",
        access: ANNOTATION,
        interfaces: &["java/lang/annotation/Annotation"],
        ..CLASS
    },
    PlatformClass {
        name: "java/lang/Deprecated",
        access: ANNOTATION,
        interfaces: &["java/lang/annotation/Annotation"],
        ..CLASS
    },
    // java.io
    PlatformClass {
        name: "java/io/Serializable",
        ..IFACE
    },
    PlatformClass {
        name: "java/io/PrintStream",
        methods: &[
            m(PUBLIC, "println", "()V"),
            m(PUBLIC, "println", "(Ljava/lang/String;)V"),
            m(PUBLIC, "println", "(Ljava/lang/Object;)V"),
            m(PUBLIC, "print", "(Ljava/lang/Object;)V"),
            m(
                PUBLIC | ACC_VARARGS,
                "printf",
                "(Ljava/lang/String;[Ljava/lang/Object;)Ljava/io/PrintStream;",
            ),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "java/io/File",
        interfaces: &["java/io/Serializable", "java/lang/Comparable"],
        signature: Some(
            "Ljava/lang/Object;Ljava/io/Serializable;Ljava/lang/Comparable<Ljava/io/File;>;",
        ),
        methods: &[
            m(PUBLIC, "<init>", "(Ljava/lang/String;)V"),
            m(PUBLIC, "getName", "()Ljava/lang/String;"),
            m(PUBLIC, "getPath", "()Ljava/lang/String;"),
            m(PUBLIC, "exists", "()Z"),
            m(PUBLIC, "isDirectory", "()Z"),
        ],
        ..CLASS
    },
    // java.util
    PlatformClass {
        name: "java/util/Iterator",
        signature: Some("<E:Ljava/lang/Object;>Ljava/lang/Object;"),
        methods: &[
            m(ABSTRACT, "hasNext", "()Z"),
            g(ABSTRACT, "next", "()Ljava/lang/Object;", "()TE;"),
        ],
        ..IFACE
    },
    PlatformClass {
        name: "java/util/Collection",
        interfaces: &["java/lang/Iterable"],
        signature: Some("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/lang/Iterable<TE;>;"),
        methods: &[
            m(ABSTRACT, "size", "()I"),
            m(ABSTRACT, "isEmpty", "()Z"),
            m(ABSTRACT, "contains", "(Ljava/lang/Object;)Z"),
            g(ABSTRACT, "add", "(Ljava/lang/Object;)Z", "(TE;)Z"),
            m(ABSTRACT, "remove", "(Ljava/lang/Object;)Z"),
        ],
        ..IFACE
    },
    PlatformClass {
        name: "java/util/List",
        interfaces: &["java/util/Collection"],
        signature: Some("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Collection<TE;>;"),
        methods: &[
            g(ABSTRACT, "get", "(I)Ljava/lang/Object;", "(I)TE;"),
            g(ABSTRACT, "set", "(ILjava/lang/Object;)Ljava/lang/Object;", "(ITE;)TE;"),
            m(ABSTRACT, "indexOf", "(Ljava/lang/Object;)I"),
            g(
                ABSTRACT,
                "subList",
                "(II)Ljava/util/List;",
                "(II)Ljava/util/List<TE;>;",
            ),
        ],
        ..IFACE
    },
    PlatformClass {
        name: "java/util/ArrayList",
        interfaces: &["java/util/List", "java/lang/Cloneable", "java/io/Serializable"],
        signature: Some(
            "<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/List<TE;>;Ljava/lang/Cloneable;Ljava/io/Serializable;",
        ),
        methods: &[
            m(PUBLIC, "<init>", "()V"),
            m(PUBLIC, "<init>", "(I)V"),
            m(PUBLIC, "size", "()I"),
            g(PUBLIC, "get", "(I)Ljava/lang/Object;", "(I)TE;"),
            g(PUBLIC, "add", "(Ljava/lang/Object;)Z", "(TE;)Z"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "java/util/LinkedList",
        interfaces: &["java/util/List", "java/lang/Cloneable", "java/io/Serializable"],
        signature: Some(
            "<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/List<TE;>;Ljava/lang/Cloneable;Ljava/io/Serializable;",
        ),
        methods: &[
            m(PUBLIC, "<init>", "()V"),
            g(PUBLIC, "getFirst", "()Ljava/lang/Object;", "()TE;"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "java/util/Set",
        interfaces: &["java/util/Collection"],
        signature: Some("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Collection<TE;>;"),
        ..IFACE
    },
    PlatformClass {
        name: "java/util/HashSet",
        interfaces: &["java/util/Set", "java/lang/Cloneable", "java/io/Serializable"],
        signature: Some(
            "<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Set<TE;>;Ljava/lang/Cloneable;Ljava/io/Serializable;",
        ),
        methods: &[m(PUBLIC, "<init>", "()V")],
        ..CLASS
    },
    PlatformClass {
        name: "java/util/LinkedHashSet",
        super_class: Some("java/util/HashSet"),
        interfaces: &["java/util/Set"],
        signature: Some("<E:Ljava/lang/Object;>Ljava/util/HashSet<TE;>;Ljava/util/Set<TE;>;"),
        methods: &[m(PUBLIC, "<init>", "()V")],
        ..CLASS
    },
    PlatformClass {
        name: "java/util/Map",
        signature: Some("<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;"),
        methods: &[
            m(ABSTRACT, "size", "()I"),
            m(ABSTRACT, "isEmpty", "()Z"),
            m(ABSTRACT, "containsKey", "(Ljava/lang/Object;)Z"),
            g(ABSTRACT, "get", "(Ljava/lang/Object;)Ljava/lang/Object;", "(Ljava/lang/Object;)TV;"),
            g(
                ABSTRACT,
                "put",
                "(Ljava/lang/Object;Ljava/lang/Object;)Ljava/lang/Object;",
                "(TK;TV;)TV;",
            ),
            g(ABSTRACT, "keySet", "()Ljava/util/Set;", "()Ljava/util/Set<TK;>;"),
            g(
                ABSTRACT,
                "values",
                "()Ljava/util/Collection;",
                "()Ljava/util/Collection<TV;>;",
            ),
            g(
                ABSTRACT,
                "entrySet",
                "()Ljava/util/Set;",
                "()Ljava/util/Set<Ljava/util/Map$Entry<TK;TV;>;>;",
            ),
        ],
        ..IFACE
    },
    PlatformClass {
        name: "java/util/Map$Entry",
        signature: Some("<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;"),
        outer: Some("java/util/Map"),
        methods: &[
            g(ABSTRACT, "getKey", "()Ljava/lang/Object;", "()TK;"),
            g(ABSTRACT, "getValue", "()Ljava/lang/Object;", "()TV;"),
        ],
        ..IFACE
    },
    PlatformClass {
        name: "java/util/HashMap",
        interfaces: &["java/util/Map", "java/lang/Cloneable", "java/io/Serializable"],
        signature: Some(
            "<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Map<TK;TV;>;Ljava/lang/Cloneable;Ljava/io/Serializable;",
        ),
        methods: &[
            m(PUBLIC, "<init>", "()V"),
            g(PUBLIC, "get", "(Ljava/lang/Object;)Ljava/lang/Object;", "(Ljava/lang/Object;)TV;"),
            m(PUBLIC, "size", "()I"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "java/util/LinkedHashMap",
        super_class: Some("java/util/HashMap"),
        interfaces: &["java/util/Map"],
        signature: Some(
            "<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/util/HashMap<TK;TV;>;Ljava/util/Map<TK;TV;>;",
        ),
        methods: &[m(PUBLIC, "<init>", "()V")],
        ..CLASS
    },
    PlatformClass {
        name: "java/util/Optional",
        access: FINAL_CLASS,
        signature: Some("<T:Ljava/lang/Object;>Ljava/lang/Object;"),
        methods: &[
            g(
                STATIC,
                "of",
                "(Ljava/lang/Object;)Ljava/util/Optional;",
                "<T:Ljava/lang/Object;>(TT;)Ljava/util/Optional<TT;>;",
            ),
            g(
                STATIC,
                "empty",
                "()Ljava/util/Optional;",
                "<T:Ljava/lang/Object;>()Ljava/util/Optional<TT;>;",
            ),
            m(PUBLIC, "isPresent", "()Z"),
            g(PUBLIC, "get", "()Ljava/lang/Object;", "()TT;"),
        ],
        ..CLASS
    },
    // java.util.regex
    PlatformClass {
        name: "java/util/regex/Pattern",
        access: FINAL_CLASS,
        interfaces: &["java/io/Serializable"],
        methods: &[
            m(STATIC, "compile", "(Ljava/lang/String;)Ljava/util/regex/Pattern;"),
            m(
                PUBLIC,
                "matcher",
                "(Ljava/lang/CharSequence;)Ljava/util/regex/Matcher;",
            ),
            m(PUBLIC, "pattern", "()Ljava/lang/String;"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "java/util/regex/Matcher",
        access: FINAL_CLASS,
        methods: &[
            m(PUBLIC, "matches", "()Z"),
            m(PUBLIC, "find", "()Z"),
            m(PUBLIC, "group", "()Ljava/lang/String;"),
            m(PUBLIC, "group", "(I)Ljava/lang/String;"),
            m(PUBLIC, "groupCount", "()I"),
        ],
        ..CLASS
    },
    // java.math
    PlatformClass {
        name: "java/math/BigInteger",
        super_class: Some("java/lang/Number"),
        interfaces: &["java/lang/Comparable"],
        signature: Some("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/math/BigInteger;>;"),
        fields: &[
            m(CONSTANT, "ZERO", "Ljava/math/BigInteger;"),
            m(CONSTANT, "ONE", "Ljava/math/BigInteger;"),
        ],
        methods: &[
            m(PUBLIC, "<init>", "(Ljava/lang/String;)V"),
            m(STATIC, "valueOf", "(J)Ljava/math/BigInteger;"),
            m(PUBLIC, "add", "(Ljava/math/BigInteger;)Ljava/math/BigInteger;"),
            m(PUBLIC, "multiply", "(Ljava/math/BigInteger;)Ljava/math/BigInteger;"),
            m(PUBLIC, "intValue", "()I"),
            m(PUBLIC, "longValue", "()J"),
            m(PUBLIC, "doubleValue", "()D"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "java/math/BigDecimal",
        super_class: Some("java/lang/Number"),
        interfaces: &["java/lang/Comparable"],
        signature: Some("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/math/BigDecimal;>;"),
        fields: &[
            m(CONSTANT, "ZERO", "Ljava/math/BigDecimal;"),
            m(CONSTANT, "ONE", "Ljava/math/BigDecimal;"),
        ],
        methods: &[
            m(PUBLIC, "<init>", "(Ljava/lang/String;)V"),
            m(PUBLIC, "<init>", "(I)V"),
            m(STATIC, "valueOf", "(D)Ljava/math/BigDecimal;"),
            m(PUBLIC, "add", "(Ljava/math/BigDecimal;)Ljava/math/BigDecimal;"),
            m(PUBLIC, "multiply", "(Ljava/math/BigDecimal;)Ljava/math/BigDecimal;"),
            m(PUBLIC, "scale", "()I"),
            m(PUBLIC, "intValue", "()I"),
            m(PUBLIC, "longValue", "()J"),
            m(PUBLIC, "doubleValue", "()D"),
        ],
        ..CLASS
    },
    // groovy.lang
    PlatformClass {
        name: "groovy/lang/GroovyObject",
        methods: &[
            m(ABSTRACT, "invokeMethod", "(Ljava/lang/String;Ljava/lang/Object;)Ljava/lang/Object;"),
            m(ABSTRACT, "getProperty", "(Ljava/lang/String;)Ljava/lang/Object;"),
            m(ABSTRACT, "setProperty", "(Ljava/lang/String;Ljava/lang/Object;)V"),
            m(ABSTRACT, "getMetaClass", "()Lgroovy/lang/MetaClass;"),
        ],
        ..IFACE
    },
    PlatformClass {
        name: "groovy/lang/MetaClass",
        methods: &[m(
            ABSTRACT,
            "respondsTo",
            "(Ljava/lang/Object;Ljava/lang/String;)Ljava/util/List;",
        )],
        ..IFACE
    },
    PlatformClass {
        name: "groovy/lang/GroovyObjectSupport",
        access: ABSTRACT_CLASS,
        interfaces: &["groovy/lang/GroovyObject"],
        methods: &[
            m(PUBLIC, "<init>", "()V"),
            m(PUBLIC, "getMetaClass", "()Lgroovy/lang/MetaClass;"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "groovy/lang/Script",
        access: ABSTRACT_CLASS,
        super_class: Some("groovy/lang/GroovyObjectSupport"),
        methods: &[
            m(PUBLIC, "<init>", "()V"),
            m(ABSTRACT, "run", "()Ljava/lang/Object;"),
            m(PUBLIC, "println", "()V"),
            m(PUBLIC, "println", "(Ljava/lang/Object;)V"),
            m(PUBLIC, "print", "(Ljava/lang/Object;)V"),
            m(
                PUBLIC | ACC_VARARGS,
                "printf",
                "(Ljava/lang/String;[Ljava/lang/Object;)V",
            ),
            m(PUBLIC, "getBinding", "()Lgroovy/lang/Binding;"),
            m(PUBLIC, "setBinding", "(Lgroovy/lang/Binding;)V"),
            m(PUBLIC, "evaluate", "(Ljava/lang/String;)Ljava/lang/Object;"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "groovy/lang/Binding",
        super_class: Some("groovy/lang/GroovyObjectSupport"),
        methods: &[
            m(PUBLIC, "<init>", "()V"),
            m(PUBLIC, "getVariable", "(Ljava/lang/String;)Ljava/lang/Object;"),
            m(PUBLIC, "setVariable", "(Ljava/lang/String;Ljava/lang/Object;)V"),
            m(PUBLIC, "hasVariable", "(Ljava/lang/String;)Z"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "groovy/lang/Closure",
        access: ABSTRACT_CLASS,
        super_class: Some("groovy/lang/GroovyObjectSupport"),
        interfaces: &["java/lang/Cloneable", "java/lang/Runnable", "java/io/Serializable"],
        signature: Some(
            "<V:Ljava/lang/Object;>Lgroovy/lang/GroovyObjectSupport;Ljava/lang/Cloneable;Ljava/lang/Runnable;Ljava/io/Serializable;",
        ),
        methods: &[
            g(PUBLIC, "call", "()Ljava/lang/Object;", "()TV;"),
            g(
                PUBLIC | ACC_VARARGS,
                "call",
                "([Ljava/lang/Object;)Ljava/lang/Object;",
                "([Ljava/lang/Object;)TV;",
            ),
            m(PUBLIC, "getMaximumNumberOfParameters", "()I"),
            g(
                PUBLIC | ACC_VARARGS,
                "curry",
                "([Ljava/lang/Object;)Lgroovy/lang/Closure;",
                "([Ljava/lang/Object;)Lgroovy/lang/Closure<TV;>;",
            ),
            m(PUBLIC, "run", "()V"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "groovy/lang/GString",
        access: ABSTRACT_CLASS,
        super_class: Some("groovy/lang/GroovyObjectSupport"),
        interfaces: &["java/lang/Comparable", "java/lang/CharSequence", "java/io/Serializable"],
        methods: &[
            m(PUBLIC, "toString", "()Ljava/lang/String;"),
            m(PUBLIC, "length", "()I"),
            m(PUBLIC, "charAt", "(I)C"),
            m(PUBLIC, "getValues", "()[Ljava/lang/Object;"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "groovy/lang/Range",
        interfaces: &["java/util/List"],
        signature: Some(
            "<T::Ljava/lang/Comparable;>Ljava/lang/Object;Ljava/util/List<TT;>;",
        ),
        methods: &[
            g(ABSTRACT, "getFrom", "()Ljava/lang/Comparable;", "()TT;"),
            g(ABSTRACT, "getTo", "()Ljava/lang/Comparable;", "()TT;"),
            m(ABSTRACT, "isReverse", "()Z"),
            m(ABSTRACT, "containsWithinBounds", "(Ljava/lang/Object;)Z"),
        ],
        ..IFACE
    },
    PlatformClass {
        name: "groovy/lang/IntRange",
        interfaces: &["groovy/lang/Range"],
        signature: Some("Ljava/lang/Object;Lgroovy/lang/Range<Ljava/lang/Integer;>;"),
        methods: &[
            m(PUBLIC, "<init>", "(II)V"),
            m(PUBLIC, "getFrom", "()Ljava/lang/Integer;"),
            m(PUBLIC, "getTo", "()Ljava/lang/Integer;"),
            m(PUBLIC, "getFromInt", "()I"),
            m(PUBLIC, "getToInt", "()I"),
            m(PUBLIC, "size", "()I"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "groovy/lang/ObjectRange",
        interfaces: &["groovy/lang/Range"],
        signature: Some("Ljava/lang/Object;Lgroovy/lang/Range<Ljava/lang/Comparable;>;"),
        methods: &[
            m(PUBLIC, "<init>", "(Ljava/lang/Comparable;Ljava/lang/Comparable;)V"),
            m(PUBLIC, "size", "()I"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "groovy/lang/MissingMethodException",
        super_class: Some("java/lang/RuntimeException"),
        methods: &[
            m(PUBLIC, "getMethod", "()Ljava/lang/String;"),
            m(PUBLIC, "getType", "()Ljava/lang/Class;"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "groovy/util/Eval",
        methods: &[
            m(STATIC, "me", "(Ljava/lang/String;)Ljava/lang/Object;"),
            m(STATIC, "x", "(Ljava/lang/Object;Ljava/lang/String;)Ljava/lang/Object;"),
        ],
        ..CLASS
    },
    PlatformClass {
        name: "groovy/transform/CompileStatic",
        access: ANNOTATION,
        interfaces: &["java/lang/annotation/Annotation"],
        ..CLASS
    },
    PlatformClass {
        name: "groovy/transform/TypeChecked",
        access: ANNOTATION,
        interfaces: &["java/lang/annotation/Annotation"],
        ..CLASS
    },
    // Groovy runtime internals, hidden by `trusted_only`.
    PlatformClass {
        name: "org/codehaus/groovy/runtime/InvokerHelper",
        methods: &[
            m(
                STATIC,
                "invokeMethod",
                "(Ljava/lang/Object;Ljava/lang/String;Ljava/lang/Object;)Ljava/lang/Object;",
            ),
            m(STATIC, "toString", "(Ljava/lang/Object;)Ljava/lang/String;"),
        ],
        ..CLASS
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use loam_resolve::ResolvedType;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_table_entry_decodes() {
        let solver = PlatformTypeSolver::new();
        let names: Vec<String> = solver.type_names().map(str::to_string).collect();
        assert_eq!(names.len(), PLATFORM.len());
        for name in names {
            let decl = solver
                .lookup(&name)
                .unwrap_or_else(|err| panic!("{name}: {err}"))
                .ok()
                .unwrap_or_else(|| panic!("{name} is indexed"));
            assert_eq!(decl.qualified_name().as_str(), name);
            for method in decl.methods() {
                assert!(method.return_type(&solver).is_solved(), "{name}.{}", method.name());
            }
        }
    }

    #[test]
    fn nested_types_are_members_of_their_outer_type() {
        let solver = PlatformTypeSolver::new();
        let map = solver.solve_type("java.util.Map").expect("map");
        let entry = map.member_type("Entry", &solver).ok().expect("entry");
        assert_eq!(entry.qualified_name().as_str(), "java.util.Map.Entry");
        assert!(entry.is_interface());
    }

    #[test]
    fn trusted_only_hides_runtime_internals() {
        let all = PlatformTypeSolver::new();
        let trusted = PlatformTypeSolver::new().trusted_only();
        let internal = "org.codehaus.groovy.runtime.InvokerHelper";

        assert!(all.try_to_solve_type(internal).is_solved());
        assert!(!trusted.try_to_solve_type(internal).is_solved());
        assert!(trusted.try_to_solve_type("groovy.lang.Script").is_solved());
        assert_eq!(trusted.len() + 1, all.len());
    }

    #[test]
    fn hierarchy_supports_boxing_and_subtyping() {
        let solver = PlatformTypeSolver::new();
        let integer = solver.solve_type("java.lang.Integer").expect("integer");
        assert!(integer.is_subtype_of("java.lang.Number", &solver));
        assert!(integer.is_subtype_of("java.io.Serializable", &solver));

        let string = ResolvedType::reference(solver.solve_type("java.lang.String").expect("string"));
        let sequence =
            ResolvedType::reference(solver.solve_type("java.lang.CharSequence").expect("seq"));
        assert!(sequence.is_assignable_by(&string, &solver));

        let first = solver.solve_type("java.lang.String").expect("string");
        let second = solver.solve_type("java.lang.String").expect("string");
        assert!(Arc::ptr_eq(&first, &second));
    }
}
