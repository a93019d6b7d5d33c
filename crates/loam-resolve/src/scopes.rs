use std::collections::HashMap;

use loam_core::{Name, PackageName, TypeName};
use loam_hir::{Body, ClassDecl, CompilationUnit, Expr, ExprId, LocalId, ParamDecl, Stmt, StmtId, TypeRef};
use loam_types::well_known;

pub type ScopeId = usize;

/// The code a body belongs to. Methods and constructors are identified by their position in
/// the declaring class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BodyOwner {
    Script,
    Method { ty: TypeName, index: usize },
    Constructor { ty: TypeName, index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalRef {
    pub owner: BodyOwner,
    pub local: LocalId,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamRef {
    pub owner: BodyOwner,
    pub index: usize,
}

/// Where an expression or declaration sits in the walk of its body. Later code has a higher
/// position.
pub type Position = u32;

/// What a value name bound in a scope refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Local {
        local: LocalRef,
        ty: Option<TypeRef>,
        declared_at: Position,
    },
    Parameter {
        param: ParamRef,
        ty: Option<TypeRef>,
        is_varargs: bool,
    },
}

impl Resolution {
    /// Whether this binding is visible from code at `position`. Locals are visible only after
    /// their declaration; parameters everywhere in their body.
    pub fn is_visible_at(&self, position: Option<Position>) -> bool {
        match (self, position) {
            (Resolution::Local { declared_at, .. }, Some(position)) => *declared_at < position,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    Unit {
        package: PackageName,
    },
    Script,
    Class {
        ty: TypeName,
    },
    Method {
        owner: TypeName,
        index: usize,
        is_static: bool,
    },
    Constructor {
        owner: TypeName,
        index: usize,
    },
    Block {
        owner: BodyOwner,
        stmt: StmtId,
    },
    Closure {
        owner: BodyOwner,
        expr: ExprId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeData {
    pub(crate) parent: Option<ScopeId>,
    pub(crate) kind: ScopeKind,
    pub(crate) values: HashMap<Name, Resolution>,
    pub(crate) types: HashMap<Name, TypeName>,
}

impl ScopeData {
    #[must_use]
    pub fn values(&self) -> &HashMap<Name, Resolution> {
        &self.values
    }

    /// Type names bound here: member types and (erased) type parameters.
    #[must_use]
    pub fn types(&self) -> &HashMap<Name, TypeName> {
        &self.types
    }

    #[must_use]
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    #[must_use]
    pub fn kind(&self) -> &ScopeKind {
        &self.kind
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeGraph {
    scopes: Vec<ScopeData>,
}

impl ScopeGraph {
    #[must_use]
    pub fn scope(&self, id: ScopeId) -> &ScopeData {
        &self.scopes[id]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// `id` followed by its ancestors, innermost first.
    pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(id), move |current| self.scopes[*current].parent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeBuildResult {
    pub scopes: ScopeGraph,
    pub unit_scope: ScopeId,
    pub script_scope: Option<ScopeId>,
    pub class_scopes: HashMap<TypeName, ScopeId>,
    pub method_scopes: HashMap<(TypeName, usize), ScopeId>,
    pub constructor_scopes: HashMap<(TypeName, usize), ScopeId>,
    pub body_scopes: HashMap<BodyOwner, ScopeId>,
    pub block_scopes: Vec<ScopeId>,
    pub stmt_scopes: HashMap<(BodyOwner, StmtId), ScopeId>,
    pub expr_scopes: HashMap<(BodyOwner, ExprId), ScopeId>,
    pub expr_positions: HashMap<(BodyOwner, ExprId), Position>,
}

impl ScopeBuildResult {
    pub fn expr_scope(&self, owner: &BodyOwner, expr: ExprId) -> Option<ScopeId> {
        self.expr_scopes.get(&(owner.clone(), expr)).copied()
    }

    pub fn expr_position(&self, owner: &BodyOwner, expr: ExprId) -> Option<Position> {
        self.expr_positions.get(&(owner.clone(), expr)).copied()
    }

    pub fn stmt_scope(&self, owner: &BodyOwner, stmt: StmtId) -> Option<ScopeId> {
        self.stmt_scopes.get(&(owner.clone(), stmt)).copied()
    }
}

/// Builds the scope graph of a compilation unit: unit, then classes, then members, then nested
/// blocks and closures.
pub fn build_scopes(unit: &CompilationUnit) -> ScopeBuildResult {
    let mut builder = ScopeBuilder::default();
    let package = unit.package_name();
    let unit_scope = builder.alloc_scope(
        None,
        ScopeKind::Unit {
            package: package.clone(),
        },
    );
    for class in &unit.types {
        builder.scopes[unit_scope]
            .types
            .insert(class.name.clone(), package.qualify(class.name.as_str()));
    }

    for class in &unit.types {
        let name = package.qualify(class.name.as_str());
        builder.build_type_scopes(unit_scope, name, class);
    }

    let script_scope = unit.script.as_ref().map(|script| {
        let scope = builder.alloc_scope(Some(unit_scope), ScopeKind::Script);
        let root = builder.build_body_scopes(scope, BodyOwner::Script, script);
        builder.body_scopes.insert(BodyOwner::Script, root);
        scope
    });

    ScopeBuildResult {
        scopes: ScopeGraph {
            scopes: builder.scopes,
        },
        unit_scope,
        script_scope,
        class_scopes: builder.class_scopes,
        method_scopes: builder.method_scopes,
        constructor_scopes: builder.constructor_scopes,
        body_scopes: builder.body_scopes,
        block_scopes: builder.block_scopes,
        stmt_scopes: builder.stmt_scopes,
        expr_scopes: builder.expr_scopes,
        expr_positions: builder.expr_positions,
    }
}

#[derive(Default)]
struct ScopeBuilder {
    scopes: Vec<ScopeData>,
    class_scopes: HashMap<TypeName, ScopeId>,
    method_scopes: HashMap<(TypeName, usize), ScopeId>,
    constructor_scopes: HashMap<(TypeName, usize), ScopeId>,
    body_scopes: HashMap<BodyOwner, ScopeId>,
    block_scopes: Vec<ScopeId>,
    stmt_scopes: HashMap<(BodyOwner, StmtId), ScopeId>,
    expr_scopes: HashMap<(BodyOwner, ExprId), ScopeId>,
    expr_positions: HashMap<(BodyOwner, ExprId), Position>,
    next_position: Position,
}

impl ScopeBuilder {
    fn build_type_scopes(&mut self, parent: ScopeId, ty: TypeName, class: &ClassDecl) -> ScopeId {
        let class_scope = self.alloc_scope(Some(parent), ScopeKind::Class { ty: ty.clone() });
        self.class_scopes.insert(ty.clone(), class_scope);

        for param in &class.type_params {
            self.scopes[class_scope]
                .types
                .insert(param.clone(), TypeName::new(well_known::OBJECT));
        }
        for nested in &class.nested_types {
            self.scopes[class_scope]
                .types
                .insert(nested.name.clone(), ty.nested(nested.name.as_str()));
        }

        for (index, method) in class.methods.iter().enumerate() {
            let method_scope = self.alloc_scope(
                Some(class_scope),
                ScopeKind::Method {
                    owner: ty.clone(),
                    index,
                    is_static: method.modifiers.is_static,
                },
            );
            self.method_scopes.insert((ty.clone(), index), method_scope);
            for param in &method.type_params {
                self.scopes[method_scope]
                    .types
                    .insert(param.clone(), TypeName::new(well_known::OBJECT));
            }

            let owner = BodyOwner::Method {
                ty: ty.clone(),
                index,
            };
            self.insert_params(method_scope, &owner, &method.params);
            if let Some(body) = &method.body {
                let root = self.build_body_scopes(method_scope, owner.clone(), body);
                self.body_scopes.insert(owner, root);
            }
        }

        for (index, ctor) in class.constructors.iter().enumerate() {
            let ctor_scope = self.alloc_scope(
                Some(class_scope),
                ScopeKind::Constructor {
                    owner: ty.clone(),
                    index,
                },
            );
            self.constructor_scopes.insert((ty.clone(), index), ctor_scope);

            let owner = BodyOwner::Constructor {
                ty: ty.clone(),
                index,
            };
            self.insert_params(ctor_scope, &owner, &ctor.params);
            if let Some(body) = &ctor.body {
                let root = self.build_body_scopes(ctor_scope, owner.clone(), body);
                self.body_scopes.insert(owner, root);
            }
        }

        for nested in &class.nested_types {
            let nested_name = ty.nested(nested.name.as_str());
            self.build_type_scopes(class_scope, nested_name, nested);
        }

        class_scope
    }

    fn insert_params(&mut self, scope: ScopeId, owner: &BodyOwner, params: &[ParamDecl]) {
        for (index, param) in params.iter().enumerate() {
            self.scopes[scope].values.insert(
                param.name.clone(),
                Resolution::Parameter {
                    param: ParamRef {
                        owner: owner.clone(),
                        index,
                    },
                    ty: param.ty.clone(),
                    is_varargs: param.is_varargs,
                },
            );
        }
    }

    fn build_body_scopes(&mut self, parent: ScopeId, owner: BodyOwner, body: &Body) -> ScopeId {
        self.build_stmt_scopes(parent, &owner, body, body.root)
    }

    fn build_stmt_scopes(
        &mut self,
        parent: ScopeId,
        owner: &BodyOwner,
        body: &Body,
        stmt_id: StmtId,
    ) -> ScopeId {
        match body.stmt(stmt_id) {
            Stmt::Block { statements, .. } => {
                let block_scope = self.alloc_block(parent, owner, stmt_id);
                self.stmt_scopes.insert((owner.clone(), stmt_id), block_scope);
                for stmt in statements {
                    self.build_stmt_scopes(block_scope, owner, body, *stmt);
                }
                block_scope
            }
            Stmt::Expr { expr, .. } => {
                self.stmt_scopes.insert((owner.clone(), stmt_id), parent);
                self.record_expr_scopes(parent, owner, body, *expr);
                parent
            }
            Stmt::Return { expr, .. } => {
                self.stmt_scopes.insert((owner.clone(), stmt_id), parent);
                if let Some(expr) = expr {
                    self.record_expr_scopes(parent, owner, body, *expr);
                }
                parent
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.stmt_scopes.insert((owner.clone(), stmt_id), parent);
                self.record_expr_scopes(parent, owner, body, *condition);
                self.build_branch_scopes(parent, owner, body, *then_branch);
                if let Some(else_branch) = else_branch {
                    self.build_branch_scopes(parent, owner, body, *else_branch);
                }
                parent
            }
            Stmt::While {
                condition,
                body: loop_body,
                ..
            } => {
                self.stmt_scopes.insert((owner.clone(), stmt_id), parent);
                self.record_expr_scopes(parent, owner, body, *condition);
                self.build_branch_scopes(parent, owner, body, *loop_body);
                parent
            }
            Stmt::ForIn {
                local,
                iterable,
                body: loop_body,
                ..
            } => {
                self.stmt_scopes.insert((owner.clone(), stmt_id), parent);
                self.record_expr_scopes(parent, owner, body, *iterable);

                // The loop variable lives in a block wrapping the loop body.
                let loop_scope = self.alloc_block(parent, owner, stmt_id);
                self.insert_local(loop_scope, owner, body, *local);
                self.build_stmt_scopes(loop_scope, owner, body, *loop_body);
                parent
            }
            Stmt::Empty { .. } => {
                self.stmt_scopes.insert((owner.clone(), stmt_id), parent);
                parent
            }
        }
    }

    /// A branch or loop body without braces still gets its own block, so a declaration there
    /// stays out of the enclosing scope.
    fn build_branch_scopes(
        &mut self,
        parent: ScopeId,
        owner: &BodyOwner,
        body: &Body,
        stmt_id: StmtId,
    ) -> ScopeId {
        if matches!(body.stmt(stmt_id), Stmt::Block { .. }) {
            return self.build_stmt_scopes(parent, owner, body, stmt_id);
        }
        let branch_scope = self.alloc_block(parent, owner, stmt_id);
        self.build_stmt_scopes(branch_scope, owner, body, stmt_id)
    }

    fn record_expr_scopes(&mut self, scope: ScopeId, owner: &BodyOwner, body: &Body, expr_id: ExprId) {
        self.expr_scopes.insert((owner.clone(), expr_id), scope);
        let position = self.advance();
        self.expr_positions.insert((owner.clone(), expr_id), position);

        match body.expr(expr_id) {
            Expr::Literal { .. } | Expr::Name { .. } | Expr::Missing { .. } => {}
            Expr::GString { parts, .. } => {
                for part in parts {
                    self.record_expr_scopes(scope, owner, body, *part);
                }
            }
            Expr::Property { receiver, .. } => {
                self.record_expr_scopes(scope, owner, body, *receiver);
            }
            Expr::MethodCall { receiver, args, .. } => {
                if let Some(receiver) = receiver {
                    self.record_expr_scopes(scope, owner, body, *receiver);
                }
                for arg in args {
                    self.record_expr_scopes(scope, owner, body, *arg);
                }
            }
            Expr::New { args, .. } | Expr::List { elements: args, .. } => {
                for arg in args {
                    self.record_expr_scopes(scope, owner, body, *arg);
                }
            }
            Expr::Binary { lhs, rhs, .. } => {
                self.record_expr_scopes(scope, owner, body, *lhs);
                self.record_expr_scopes(scope, owner, body, *rhs);
            }
            Expr::Unary { operand, .. } => {
                self.record_expr_scopes(scope, owner, body, *operand);
            }
            Expr::Ternary {
                condition,
                then_expr,
                else_expr,
                ..
            } => {
                self.record_expr_scopes(scope, owner, body, *condition);
                self.record_expr_scopes(scope, owner, body, *then_expr);
                self.record_expr_scopes(scope, owner, body, *else_expr);
            }
            Expr::Elvis { value, fallback, .. } => {
                self.record_expr_scopes(scope, owner, body, *value);
                self.record_expr_scopes(scope, owner, body, *fallback);
            }
            Expr::Map { entries, .. } => {
                for (key, value) in entries {
                    self.record_expr_scopes(scope, owner, body, *key);
                    self.record_expr_scopes(scope, owner, body, *value);
                }
            }
            Expr::Range { from, to, .. } => {
                self.record_expr_scopes(scope, owner, body, *from);
                self.record_expr_scopes(scope, owner, body, *to);
            }
            Expr::Cast { expr, .. } => {
                self.record_expr_scopes(scope, owner, body, *expr);
            }
            Expr::Closure {
                params,
                body: closure_body,
                ..
            } => {
                let closure_scope = self.alloc_scope(
                    Some(scope),
                    ScopeKind::Closure {
                        owner: owner.clone(),
                        expr: expr_id,
                    },
                );
                for param in params {
                    self.insert_local(closure_scope, owner, body, *param);
                }
                self.build_stmt_scopes(closure_scope, owner, body, *closure_body);
            }
            Expr::Declaration {
                local, initializer, ..
            } => {
                if let Some(initializer) = initializer {
                    self.record_expr_scopes(scope, owner, body, *initializer);
                }
                self.insert_local(scope, owner, body, *local);
            }
        }
    }

    fn insert_local(&mut self, scope: ScopeId, owner: &BodyOwner, body: &Body, local: LocalId) {
        let data = body.local(local);
        let declared_at = self.advance();
        self.scopes[scope].values.insert(
            data.name.clone(),
            Resolution::Local {
                local: LocalRef {
                    owner: owner.clone(),
                    local,
                },
                ty: data.ty.clone(),
                declared_at,
            },
        );
    }

    fn advance(&mut self) -> Position {
        let position = self.next_position;
        self.next_position += 1;
        position
    }

    fn alloc_block(&mut self, parent: ScopeId, owner: &BodyOwner, stmt: StmtId) -> ScopeId {
        let scope = self.alloc_scope(
            Some(parent),
            ScopeKind::Block {
                owner: owner.clone(),
                stmt,
            },
        );
        self.block_scopes.push(scope);
        scope
    }

    fn alloc_scope(&mut self, parent: Option<ScopeId>, kind: ScopeKind) -> ScopeId {
        let id = self.scopes.len();
        self.scopes.push(ScopeData {
            parent,
            kind,
            values: HashMap::new(),
            types: HashMap::new(),
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_hir::{BodyBuilder, MethodDecl};
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_blocks_get_their_own_scope() {
        let mut b = BodyBuilder::new();
        let one = b.int(1);
        let (_, outer_decl) = b.declare("x", None, Some(one));
        let outer_stmt = b.expr_stmt(outer_decl);
        let two = b.int(2);
        let (_, inner_decl) = b.declare("y", None, Some(two));
        let inner_stmt = b.expr_stmt(inner_decl);
        let inner_block = b.block(vec![inner_stmt]);
        let root = b.block(vec![outer_stmt, inner_block]);
        let body = b.finish(root);

        let mut class = ClassDecl::new("Foo");
        let mut method = MethodDecl::new("run");
        method.body = Some(body);
        class.methods.push(method);
        let mut unit = CompilationUnit::new(None);
        unit.types.push(class);

        let result = build_scopes(&unit);
        let owner = BodyOwner::Method {
            ty: TypeName::new("Foo"),
            index: 0,
        };
        let root_scope = result.body_scopes[&owner];
        let inner_scope = result.stmt_scope(&owner, inner_block).expect("inner block");

        assert_ne!(root_scope, inner_scope);
        assert!(result.scopes.scope(root_scope).values().contains_key(&Name::new("x")));
        assert!(!result.scopes.scope(root_scope).values().contains_key(&Name::new("y")));
        assert!(result.scopes.scope(inner_scope).values().contains_key(&Name::new("y")));
        assert_eq!(result.scopes.scope(inner_scope).parent(), Some(root_scope));

        let chain: Vec<_> = result.scopes.ancestors(inner_scope).collect();
        assert_eq!(chain.last(), Some(&result.unit_scope));
        assert_eq!(chain.len(), 5);
    }
}
