#![allow(dead_code)]

use std::path::Path;

use loam_core::PackageName;
use loam_hir::{ClassDecl, CompilationUnit, FieldDecl, TypeRef};
use loam_classpath::{SourceParseError, SourceParser};

/// Understands just enough line-oriented Groovy for fixtures:
/// `package a.b`, `class Name`, `field name Type` (attached to the last class) and `error`.
pub struct LineParser;

impl SourceParser for LineParser {
    fn parse(&self, _path: &Path, text: &str) -> Result<CompilationUnit, SourceParseError> {
        let mut unit = CompilationUnit::new(None);
        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let mut words = line.split_whitespace();
            match (words.next(), words.next(), words.next()) {
                (Some("package"), Some(name), None) => unit.package = Some(PackageName::new(name)),
                (Some("class"), Some(name), None) => unit.types.push(ClassDecl::new(name)),
                (Some("field"), Some(name), ty) => {
                    let class = unit
                        .types
                        .last_mut()
                        .ok_or_else(|| SourceParseError::new("field outside a class"))?;
                    class
                        .fields
                        .push(FieldDecl::new(name, ty.map(TypeRef::new)));
                }
                _ => return Err(SourceParseError::new(format!("unexpected line `{line}`"))),
            }
        }
        Ok(unit)
    }
}

pub fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, text).unwrap();
}
