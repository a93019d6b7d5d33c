#![forbid(unsafe_code)]
//! Decoding of compiled JVM class files into the stubs the introspection-backed declarations wrap.
//!
//! Only what symbol resolution needs is decoded: the class header, member names/descriptors,
//! generic `Signature` attributes and `InnerClasses`. Code attributes are skipped.

mod classfile;
mod constant_pool;
mod descriptor;
mod error;
mod names;
mod reader;
mod signature;
mod stub;

pub use crate::classfile::{ClassFile, ClassMember, InnerClassInfo};
pub use crate::descriptor::{parse_field_descriptor, parse_method_descriptor};
pub use crate::descriptor::{BaseType, FieldType, MethodDescriptor, ReturnType};
pub use crate::error::{Error, Result};
pub use crate::names::{binary_candidates, internal_to_binary};
pub use crate::signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, ClassSignature,
    ClassTypeSignature, FieldTypeSignature, MethodSignature, SimpleClassTypeSignature,
    TypeArgument, TypeParameter, TypeSignature,
};
pub use crate::stub::{ClassStub, FieldStub, MemberTypeStub, MethodStub};
