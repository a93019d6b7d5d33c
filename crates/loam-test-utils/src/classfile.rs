use std::collections::HashMap;

/// Builds minimal but valid class files: header, members and the `Signature` / `InnerClasses`
/// attributes the resolver reads. Methods carry no `Code`.
#[derive(Debug, Clone)]
pub struct ClassFileBuilder {
    this_class: String,
    access_flags: u16,
    super_class: Option<String>,
    interfaces: Vec<String>,
    signature: Option<String>,
    fields: Vec<Member>,
    methods: Vec<Member>,
    inner_classes: Vec<InnerClass>,
}

#[derive(Debug, Clone)]
struct Member {
    access_flags: u16,
    name: String,
    descriptor: String,
    signature: Option<String>,
}

#[derive(Debug, Clone)]
struct InnerClass {
    inner: String,
    outer: Option<String>,
    name: Option<String>,
    access_flags: u16,
}

impl ClassFileBuilder {
    /// A public class extending `java/lang/Object`.
    pub fn class(internal_name: &str) -> Self {
        Self {
            this_class: internal_name.to_string(),
            access_flags: 0x0021,
            super_class: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            signature: None,
            fields: Vec::new(),
            methods: Vec::new(),
            inner_classes: Vec::new(),
        }
    }

    /// A public abstract interface.
    pub fn interface(internal_name: &str) -> Self {
        Self::class(internal_name).access(0x0601)
    }

    pub fn access(mut self, flags: u16) -> Self {
        self.access_flags = flags;
        self
    }

    pub fn super_class(mut self, internal_name: Option<&str>) -> Self {
        self.super_class = internal_name.map(str::to_string);
        self
    }

    pub fn implements(mut self, internal_name: &str) -> Self {
        self.interfaces.push(internal_name.to_string());
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn field(mut self, flags: u16, name: &str, descriptor: &str, signature: Option<&str>) -> Self {
        self.fields.push(Member {
            access_flags: flags,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: signature.map(str::to_string),
        });
        self
    }

    pub fn method(mut self, flags: u16, name: &str, descriptor: &str, signature: Option<&str>) -> Self {
        self.methods.push(Member {
            access_flags: flags,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: signature.map(str::to_string),
        });
        self
    }

    pub fn inner_class(
        mut self,
        inner: &str,
        outer: Option<&str>,
        name: Option<&str>,
        flags: u16,
    ) -> Self {
        self.inner_classes.push(InnerClass {
            inner: inner.to_string(),
            outer: outer.map(str::to_string),
            name: name.map(str::to_string),
            access_flags: flags,
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = PoolWriter::default();
        let this_idx = pool.class(&self.this_class);
        let super_idx = self.super_class.as_deref().map(|s| pool.class(s)).unwrap_or(0);
        let interface_idx: Vec<u16> = self.interfaces.iter().map(|i| pool.class(i)).collect();

        let mut body = Vec::new();
        put_u2(&mut body, self.access_flags);
        put_u2(&mut body, this_idx);
        put_u2(&mut body, super_idx);
        put_u2(&mut body, interface_idx.len() as u16);
        for idx in interface_idx {
            put_u2(&mut body, idx);
        }
        for members in [&self.fields, &self.methods] {
            put_u2(&mut body, members.len() as u16);
            for member in members {
                put_u2(&mut body, member.access_flags);
                put_u2(&mut body, pool.utf8(&member.name));
                put_u2(&mut body, pool.utf8(&member.descriptor));
                match &member.signature {
                    Some(sig) => {
                        put_u2(&mut body, 1);
                        signature_attribute(&mut body, &mut pool, sig);
                    }
                    None => put_u2(&mut body, 0),
                }
            }
        }

        let attr_count = self.signature.is_some() as u16 + !self.inner_classes.is_empty() as u16;
        put_u2(&mut body, attr_count);
        if let Some(sig) = &self.signature {
            signature_attribute(&mut body, &mut pool, sig);
        }
        if !self.inner_classes.is_empty() {
            let name = pool.utf8("InnerClasses");
            let mut info = Vec::new();
            put_u2(&mut info, self.inner_classes.len() as u16);
            for inner in &self.inner_classes {
                put_u2(&mut info, pool.class(&inner.inner));
                put_u2(&mut info, inner.outer.as_deref().map(|o| pool.class(o)).unwrap_or(0));
                put_u2(&mut info, inner.name.as_deref().map(|n| pool.utf8(n)).unwrap_or(0));
                put_u2(&mut info, inner.access_flags);
            }
            put_u2(&mut body, name);
            put_u4(&mut body, info.len() as u32);
            body.extend(info);
        }

        let mut out = Vec::new();
        put_u4(&mut out, 0xCAFEBABE);
        put_u2(&mut out, 0);
        put_u2(&mut out, 52);
        put_u2(&mut out, pool.count());
        out.extend(pool.bytes);
        out.extend(body);
        out
    }
}

fn signature_attribute(out: &mut Vec<u8>, pool: &mut PoolWriter, signature: &str) {
    let name = pool.utf8("Signature");
    let value = pool.utf8(signature);
    put_u2(out, name);
    put_u4(out, 2);
    put_u2(out, value);
}

#[derive(Default)]
struct PoolWriter {
    bytes: Vec<u8>,
    next: u16,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl PoolWriter {
    fn alloc(&mut self) -> u16 {
        if self.next == 0 {
            self.next = 1;
        }
        let idx = self.next;
        self.next += 1;
        idx
    }

    fn count(&self) -> u16 {
        self.next.max(1)
    }

    fn utf8(&mut self, text: &str) -> u16 {
        if let Some(idx) = self.utf8.get(text) {
            return *idx;
        }
        let idx = self.alloc();
        self.bytes.push(1);
        put_u2(&mut self.bytes, text.len() as u16);
        self.bytes.extend_from_slice(text.as_bytes());
        self.utf8.insert(text.to_string(), idx);
        idx
    }

    fn class(&mut self, internal_name: &str) -> u16 {
        if let Some(idx) = self.classes.get(internal_name) {
            return *idx;
        }
        let name = self.utf8(internal_name);
        let idx = self.alloc();
        self.bytes.push(7);
        put_u2(&mut self.bytes, name);
        self.classes.insert(internal_name.to_string(), idx);
        idx
    }
}

fn put_u2(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_u4(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}
