//! Two-pass semantic analyzer.
//!
//! Pass one hoists every top-level declaration (structs, free functions,
//! constructors, `extends` blocks) so later declarations can call earlier
//! *or* later ones. Mangled names depend only on a name's own parameter
//! list, so they're assigned during hoisting; pass two is a bottom-up walk
//! that resolves each call's overload, fills in `Call::signature`, and
//! flags bare identifiers that actually resolve to `this`-fields.
//!
//! `extends` merges a parent's already-accumulated fields/methods into the
//! child textually, in declaration order. If a child's `extends` block is
//! parsed before its parent's, the merge sees a partial parent — a known
//! rough edge carried over unfixed (see `DESIGN.md`).

use crate::ast::*;
use crate::diagnostics::Diagnostics;
use crate::mangle;
use crate::symtab::{MetaKind, SymbolTable};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct MethodInfo {
    name: String,
    params: Vec<Param>,
    mangled: String,
    return_ty: String,
}

#[derive(Debug, Clone)]
struct CtorInfo {
    params: Vec<Param>,
    mangled: String,
}

#[derive(Debug, Clone, Default)]
struct StructInfo {
    fields: Vec<StructField>,
    methods: Vec<MethodInfo>,
    constructors: Vec<CtorInfo>,
}

#[derive(Debug, Clone)]
struct FunctionOverload {
    params: Vec<Param>,
    mangled: String,
    return_ty: String,
}

pub struct Analyzer<'a> {
    symtab: SymbolTable,
    diags: &'a mut Diagnostics,
    structs: HashMap<String, StructInfo>,
    functions: HashMap<String, Vec<FunctionOverload>>,
    current_struct: Option<String>,
    /// Declared return type (mangled) of the function/method/constructor
    /// currently being walked, and whether a `return` has been seen in it
    /// yet. `None` while walking top-level statements outside any body.
    current_return_ty: Option<String>,
    saw_return: bool,
}

pub struct AnalysisResult {
    pub symtab: SymbolTable,
}

pub fn analyze(program: &mut Program, diags: &mut Diagnostics) -> AnalysisResult {
    let mut analyzer = Analyzer {
        symtab: SymbolTable::new(),
        diags,
        structs: HashMap::new(),
        functions: HashMap::new(),
        current_struct: None,
        current_return_ty: None,
        saw_return: false,
    };
    analyzer.hoist(&mut program.statements);
    for stmt in &mut program.statements {
        analyzer.walk_stmt(stmt);
    }
    AnalysisResult {
        symtab: analyzer.symtab,
    }
}

/// Compares two resolved type strings for equality, ignoring a trailing
/// pointer `*`. Every struct-typed value in this language lives behind a
/// pointer at the C level, but `TypeRef::mangled` (used for declared
/// types) never spells that pointer out, while constructor-call results
/// and `this`'s bound type always do (`<Name>*`) — so the same struct
/// type surfaces as both `Name` and `Name*` depending on where it came
/// from. Stripping the pointer before comparing reconciles the two.
fn same_type(a: &str, b: &str) -> bool {
    a.trim_end_matches('*') == b.trim_end_matches('*')
}

fn types_match(params: &[Param], arg_types: &[String]) -> bool {
    params.len() == arg_types.len()
        && params
            .iter()
            .zip(arg_types)
            .all(|(p, a)| same_type(&p.ty.mangled(), a))
}

impl<'a> Analyzer<'a> {
    fn hoist(&mut self, statements: &mut [Stmt]) {
        for stmt in statements.iter_mut() {
            match stmt {
                Stmt::StructDef(def) => {
                    self.symtab.add_symbol(def.name.clone(), MetaKind::Structure, def.name.clone());
                    if !def.generic_params.is_empty() {
                        self.symtab.add_template(def.clone());
                    }
                    self.structs.entry(def.name.clone()).or_insert_with(|| StructInfo {
                        fields: def.fields.clone(),
                        methods: Vec::new(),
                        constructors: Vec::new(),
                    });
                }
                Stmt::FunctionDef(f) => {
                    let mangled = mangle::free_function(&f.name, &f.params);
                    f.mangled_name = Some(mangled.clone());
                    // One symbol-table entry per overloaded *name*, not per
                    // overload: lookupSymbol only needs to report that the
                    // name is a function, overload selection itself is
                    // driven by `self.functions`.
                    if self.symtab.lookup_in_top_scope(&f.name).is_none() {
                        self.symtab.add_symbol(f.name.clone(), MetaKind::Function, f.return_ty.mangled());
                    }
                    self.functions.entry(f.name.clone()).or_default().push(FunctionOverload {
                        params: f.params.clone(),
                        mangled,
                        return_ty: f.return_ty.mangled(),
                    });
                }
                Stmt::ConstructorDef(c) => {
                    let mangled = mangle::constructor(&c.struct_name, &c.params);
                    c.mangled_name = Some(mangled.clone());
                    match self.structs.get_mut(&c.struct_name) {
                        Some(info) => info.constructors.push(CtorInfo {
                            params: c.params.clone(),
                            mangled,
                        }),
                        None => self.diags.error(format!(
                            "constructor defined for unknown struct '{}'",
                            c.struct_name
                        )),
                    }
                }
                Stmt::ExtendsStmt(e) => self.hoist_extends(e),
                _ => {}
            }
        }
    }

    fn hoist_extends(&mut self, e: &mut ExtendsStmt) {
        if !self.structs.contains_key(&e.struct_name) {
            self.diags.error(format!(
                "'extends' refers to unknown struct '{}'",
                e.struct_name
            ));
            return;
        }
        if let Some(parent) = &e.parent {
            let inherited = match self.structs.get(parent) {
                Some(info) => info.clone(),
                None => {
                    self.diags.error(format!(
                        "'extends {}' names unknown parent '{}'",
                        e.struct_name, parent
                    ));
                    StructInfo::default()
                }
            };
            let child = self.structs.get_mut(&e.struct_name).expect("checked above");
            child.fields.extend(inherited.fields);
            child.methods.extend(inherited.methods);
            child.constructors.extend(inherited.constructors);
        }

        for member in &mut e.members {
            match member {
                ExtendsMember::Field(field) => {
                    self.structs
                        .get_mut(&e.struct_name)
                        .expect("checked above")
                        .fields
                        .push(field.clone());
                }
                ExtendsMember::Method(m) => {
                    let mangled = mangle::method(&e.struct_name, &m.name, &m.params);
                    m.mangled_name = Some(mangled.clone());
                    self.structs.get_mut(&e.struct_name).expect("checked above").methods.push(MethodInfo {
                        name: m.name.clone(),
                        params: m.params.clone(),
                        mangled,
                        return_ty: m.return_ty.mangled(),
                    });
                }
                ExtendsMember::Constructor(c) => {
                    c.struct_name = e.struct_name.clone();
                    let mangled = mangle::constructor(&e.struct_name, &c.params);
                    c.mangled_name = Some(mangled.clone());
                    self.structs
                        .get_mut(&e.struct_name)
                        .expect("checked above")
                        .constructors
                        .push(CtorInfo {
                            params: c.params.clone(),
                            mangled,
                        });
                }
            }
        }
    }

    fn walk_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Block(stmts) => {
                self.symtab.enter_scope();
                for s in stmts {
                    self.walk_stmt(s);
                }
                self.symtab.exit_scope();
            }
            Stmt::Expr(expr) => {
                self.infer_expr(expr);
            }
            Stmt::VarDecl { ty, name, init } => {
                if let Some(existing) = self.symtab.lookup_in_top_scope(name) {
                    if existing.meta_kind == MetaKind::Variable {
                        self.diags
                            .error(format!("redeclaration of variable '{name}' in the same scope"));
                    }
                }
                crate::monomorphize::ensure_instantiated(&mut self.symtab, ty);
                let declared_ty = ty.mangled();
                if let Some(init) = init {
                    let init_ty = self.infer_expr(init);
                    if init_ty != "error_type" && !same_type(&init_ty, &declared_ty) {
                        self.diags.error(format!(
                            "cannot initialize '{name}' of type '{declared_ty}' with value of type '{init_ty}'"
                        ));
                    }
                }
                self.symtab.add_symbol(name.clone(), MetaKind::Variable, declared_ty);
            }
            Stmt::FunctionDef(f) => {
                self.symtab.enter_scope();
                let prev_struct = self.current_struct.take();
                for p in &f.params {
                    self.symtab.add_symbol(p.name.clone(), MetaKind::Variable, p.ty.mangled());
                }
                self.walk_function_body(&mut f.body, &f.return_ty.mangled(), &f.name);
                self.current_struct = prev_struct;
                self.symtab.exit_scope();
            }
            Stmt::StructDef(_) => {}
            Stmt::ConstructorDef(c) => self.walk_constructor(c),
            Stmt::ExtendsStmt(e) => {
                for member in &mut e.members {
                    match member {
                        ExtendsMember::Method(m) => self.walk_method(&e.struct_name, m),
                        ExtendsMember::Constructor(c) => self.walk_constructor(c),
                        ExtendsMember::Field(_) => {}
                    }
                }
            }
            Stmt::Return(expr) => {
                self.saw_return = true;
                let return_ty = self.current_return_ty.clone();
                match (expr, return_ty) {
                    (Some(e), Some(return_ty)) if return_ty == "void" => {
                        self.infer_expr(e);
                        self.diags
                            .error("void function must not return a value".to_string());
                    }
                    (Some(e), Some(return_ty)) => {
                        let ty = self.infer_expr(e);
                        if ty != "error_type" && !same_type(&ty, &return_ty) {
                            self.diags.error(format!(
                                "return type mismatch: expected '{return_ty}', found '{ty}'"
                            ));
                        }
                    }
                    (None, Some(return_ty)) if return_ty != "void" => {
                        self.diags
                            .error(format!("missing return value; expected '{return_ty}'"));
                    }
                    (Some(e), None) => {
                        self.infer_expr(e);
                    }
                    _ => {}
                }
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.infer_expr(cond);
                self.walk_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.walk_stmt(else_branch);
                }
            }
            Stmt::While { cond, body } => {
                self.infer_expr(cond);
                self.walk_stmt(body);
            }
            Stmt::For {
                init,
                cond,
                step,
                body,
            } => {
                self.symtab.enter_scope();
                if let Some(init) = init {
                    self.walk_stmt(init);
                }
                if let Some(cond) = cond {
                    self.infer_expr(cond);
                }
                if let Some(step) = step {
                    self.infer_expr(step);
                }
                self.walk_stmt(body);
                self.symtab.exit_scope();
            }
            Stmt::Continue | Stmt::Break | Stmt::ExternLib(_) => {}
        }
    }

    fn walk_method(&mut self, struct_name: &str, m: &mut FunctionDef) {
        self.symtab.enter_scope();
        let prev_struct = self.current_struct.replace(struct_name.to_string());
        self.symtab.add_symbol("this", MetaKind::Variable, format!("{struct_name}*"));
        for p in &m.params {
            self.symtab.add_symbol(p.name.clone(), MetaKind::Variable, p.ty.mangled());
        }
        self.walk_function_body(&mut m.body, &m.return_ty.mangled(), &m.name);
        self.current_struct = prev_struct;
        self.symtab.exit_scope();
    }

    fn walk_constructor(&mut self, c: &mut ConstructorDef) {
        self.symtab.enter_scope();
        let prev_struct = self.current_struct.replace(c.struct_name.clone());
        self.symtab.add_symbol("this", MetaKind::Variable, format!("{}*", c.struct_name));
        for p in &c.params {
            self.symtab.add_symbol(p.name.clone(), MetaKind::Variable, p.ty.mangled());
        }
        for s in &mut c.body {
            self.walk_stmt(s);
        }
        self.current_struct = prev_struct;
        self.symtab.exit_scope();
    }

    /// Walks a function/method body and checks its return behavior against
    /// the declared return type: `void` functions may only use a bare
    /// `return;`, non-void functions must return a value of the declared
    /// type on every `return` they contain and must contain at least one.
    /// Single-expression (`= expr`) bodies are exempt from the "at least
    /// one return" requirement since the expression itself is the value.
    fn walk_function_body(&mut self, body: &mut FunctionBody, return_ty: &str, name: &str) {
        let prev_return_ty = self.current_return_ty.replace(return_ty.to_string());
        let prev_saw_return = std::mem::replace(&mut self.saw_return, false);
        match body {
            FunctionBody::Block(stmts) => {
                for s in stmts {
                    self.walk_stmt(s);
                }
                if !self.saw_return && return_ty != "void" {
                    self.diags
                        .error(format!("function '{name}' must return a value of type '{return_ty}'"));
                }
            }
            FunctionBody::Expr(expr) => {
                let ty = self.infer_expr(expr);
                if ty != "error_type" && return_ty != "void" && !same_type(&ty, &return_ty) {
                    self.diags.error(format!(
                        "function '{name}' declared to return '{return_ty}' but its expression body resolves to '{ty}'"
                    ));
                }
            }
        }
        self.current_return_ty = prev_return_ty;
        self.saw_return = prev_saw_return;
    }

    /// Resolves a bare identifier against locals/params first, falling
    /// back to the enclosing struct's fields when inside a method or
    /// constructor. Unresolved names are reported once and default to
    /// `int` so the walk can keep going.
    fn resolve_variable(&mut self, name: &str) -> (bool, String) {
        if let Some(info) = self.symtab.lookup(name) {
            return (false, info.ty.clone());
        }
        if let Some(struct_name) = self.current_struct.clone() {
            if let Some(field) = self
                .structs
                .get(&struct_name)
                .and_then(|info| info.fields.iter().find(|f| f.name == name))
            {
                return (true, field.ty.mangled());
            }
        }
        self.diags.error(format!("undefined variable '{name}'"));
        (false, "error_type".to_string())
    }

    fn infer_expr(&mut self, expr: &mut Expr) -> String {
        match expr {
            Expr::Int(_) => "int".to_string(),
            Expr::Float(_) => "float".to_string(),
            Expr::Str(_) => "string".to_string(),
            Expr::Variable { name, is_field } => {
                let (field, ty) = self.resolve_variable(name);
                *is_field = field;
                ty
            }
            Expr::Unary { op, operand } => {
                let ty = self.infer_expr(operand);
                if matches!(op, crate::token::OpKind::Not) {
                    "bool".to_string()
                } else {
                    ty
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs_ty = self.infer_expr(lhs);
                let rhs_ty = self.infer_expr(rhs);
                if lhs_ty == "error_type" || rhs_ty == "error_type" {
                    "error_type".to_string()
                } else if !same_type(&lhs_ty, &rhs_ty) {
                    self.diags.error(format!(
                        "type mismatch in binary operation: '{lhs_ty}' vs '{rhs_ty}'"
                    ));
                    "error_type".to_string()
                } else if op.precedence().map(|p| p <= 60).unwrap_or(false) {
                    "bool".to_string()
                } else {
                    lhs_ty
                }
            }
            Expr::Assign { target, value, .. } => {
                let value_ty = self.infer_expr(value);
                let target_ty = self.infer_expr(target);
                if value_ty != "error_type" && target_ty != "error_type" && !same_type(&value_ty, &target_ty) {
                    self.diags.error(format!(
                        "type mismatch in assignment: cannot assign '{value_ty}' to '{target_ty}'"
                    ));
                    return "error_type".to_string();
                }
                target_ty
            }
            Expr::Call(call) => self.resolve_call(call),
            Expr::MethodCall { receiver, call } => self.resolve_method_call(receiver, call),
            Expr::FieldAccess { receiver, field } => self.resolve_field_access(receiver, field),
            Expr::ExternRaw(_) => "int".to_string(),
        }
    }

    fn resolve_call(&mut self, call: &mut Call) -> String {
        let arg_types: Vec<String> = call.args.iter_mut().map(|a| self.infer_expr(a)).collect();

        // A call whose name matches a known struct is construction, not a
        // free-function call: it resolves against that struct's
        // constructor overloads (or the synthesized default constructor
        // keyed on field types, if no user constructor was written).
        if let Some(info) = self.structs.get(&call.name) {
            if info.constructors.is_empty() {
                let field_params: Vec<Param> = info
                    .fields
                    .iter()
                    .map(|f| Param { ty: f.ty.clone(), name: f.name.clone() })
                    .collect();
                if types_match(&field_params, &arg_types) {
                    call.signature =
                        Some(crate::codegen::header::default_ctor_mangled(&call.name, &info.fields));
                    return format!("{}*", call.name);
                }
            } else if let Some(found) = info
                .constructors
                .clone()
                .iter()
                .find(|c| types_match(&c.params, &arg_types))
            {
                call.signature = Some(found.mangled.clone());
                return format!("{}*", call.name);
            }
            self.diags.error(format!(
                "no constructor of '{}' matches argument types ({})",
                call.name,
                arg_types.join(", ")
            ));
            return "error_type".to_string();
        }

        let overloads = match self.functions.get(&call.name) {
            Some(o) => o.clone(),
            None => {
                self.diags.error(format!("call to undefined function '{}'", call.name));
                return "error_type".to_string();
            }
        };
        match overloads.iter().find(|o| types_match(&o.params, &arg_types)) {
            Some(found) => {
                call.signature = Some(found.mangled.clone());
                found.return_ty.clone()
            }
            None => {
                self.diags.error(format!(
                    "no overload of '{}' matches argument types ({})",
                    call.name,
                    arg_types.join(", ")
                ));
                "error_type".to_string()
            }
        }
    }

    fn resolve_method_call(&mut self, receiver: &mut Expr, call: &mut Call) -> String {
        let receiver_ty = self.infer_expr(receiver);
        let receiver_ty = receiver_ty.trim_end_matches('*').to_string();
        let arg_types: Vec<String> = call.args.iter_mut().map(|a| self.infer_expr(a)).collect();
        let methods = match self.structs.get(&receiver_ty) {
            Some(info) => info.methods.clone(),
            None => {
                self.diags.error(format!("method call on non-struct type '{receiver_ty}'"));
                return "error_type".to_string();
            }
        };
        match methods
            .iter()
            .find(|m| m.name == call.name && types_match(&m.params, &arg_types))
        {
            Some(found) => {
                call.signature = Some(found.mangled.clone());
                found.return_ty.clone()
            }
            None => {
                self.diags.error(format!(
                    "no method '{}' on '{receiver_ty}' matches argument types ({})",
                    call.name,
                    arg_types.join(", ")
                ));
                "error_type".to_string()
            }
        }
    }

    fn resolve_field_access(&mut self, receiver: &mut Expr, field: &str) -> String {
        let receiver_ty = self.infer_expr(receiver);
        let receiver_ty = receiver_ty.trim_end_matches('*').to_string();
        match self
            .structs
            .get(&receiver_ty)
            .and_then(|info| info.fields.iter().find(|f| f.name == field))
        {
            Some(found) => found.ty.mangled(),
            None => {
                self.diags.error(format!("no field '{field}' on struct '{receiver_ty}'"));
                "error_type".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser;

    fn analyze_source(src: &str) -> (Program, Diagnostics) {
        let mut diags = Diagnostics::new("t.rill", src);
        let tokens = Lexer::new(src).tokenize(&mut diags).unwrap();
        let mut program = parser::parse(tokens, &mut diags);
        analyze(&mut program, &mut diags);
        (program, diags)
    }

    #[test]
    fn main_is_exempted_from_fun_prefix() {
        let (program, diags) = analyze_source("int main() { return 0; }");
        assert!(!diags.has_errors());
        match &program.statements[0] {
            Stmt::FunctionDef(f) => assert_eq!(f.mangled_name.as_deref(), Some("main")),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn overload_resolution_picks_matching_param_types() {
        let src = "int add(int a, int b) { return a + b; } \
                   float add(float a, float b) { return a + b; } \
                   int main() { int x = add(1, 2); return x; }";
        let (program, diags) = analyze_source(src);
        assert!(!diags.has_errors());
        if let Stmt::FunctionDef(main_fn) = &program.statements[2] {
            if let FunctionBody::Block(body) = &main_fn.body {
                if let Stmt::VarDecl { init: Some(Expr::Call(call)), .. } = &body[0] {
                    assert_eq!(call.signature.as_deref(), Some("fun_add_int_int"));
                    return;
                }
            }
        }
        panic!("unexpected shape");
    }

    #[test]
    fn bare_identifier_in_method_resolves_to_this_field() {
        let src = "struct Point { int x; int y; } \
                   extends Point { int getX() { return x; } }";
        let (program, diags) = analyze_source(src);
        assert!(!diags.has_errors());
        if let Stmt::ExtendsStmt(e) = &program.statements[1] {
            if let ExtendsMember::Method(m) = &e.members[0] {
                if let FunctionBody::Block(body) = &m.body {
                    if let Stmt::Return(Some(Expr::Variable { is_field, .. })) = &body[0] {
                        assert!(*is_field);
                        return;
                    }
                }
            }
        }
        panic!("unexpected shape");
    }

    #[test]
    fn undefined_call_is_reported() {
        let (_, diags) = analyze_source("int main() { return missing(1); }");
        assert!(diags.has_errors());
    }

    #[test]
    fn extends_inherits_parent_fields_in_declaration_order() {
        let src = "struct Base { int a; } \
                   struct Child { int b; } \
                   extends Base { int a2() { return a; } } \
                   extends Child::Base { int getA() { return a; } }";
        let (_, diags) = analyze_source(src);
        assert!(!diags.has_errors());
    }

    #[test]
    fn single_expression_function_body_type_checks_against_return_type() {
        let (_, diags) = analyze_source("int add(int a, int b) = a + b;");
        assert!(!diags.has_errors(), "{:?}", diags.entries());
    }

    #[test]
    fn single_expression_body_mismatched_return_type_is_reported() {
        let (_, diags) = analyze_source("int bad() = 1.0;");
        assert!(diags.has_errors());
    }

    #[test]
    fn this_binds_in_methods_and_field_access_through_it_resolves() {
        let src = "struct Point { int x; } \
                   extends Point { int get() = this.x; }";
        let (_, diags) = analyze_source(src);
        assert!(!diags.has_errors(), "{:?}", diags.entries());
    }

    #[test]
    fn this_binds_in_constructors_for_dotted_field_assignment() {
        let src = "struct Point { int x; int y; } \
                   constructor Point(int x, int y) { this.x = x; this.y = y; }";
        let (_, diags) = analyze_source(src);
        assert!(!diags.has_errors(), "{:?}", diags.entries());
    }

    #[test]
    fn redeclaring_a_variable_in_the_same_scope_is_an_error() {
        let (_, diags) = analyze_source("int main() { int x = 1; int x = 2; return x; }");
        assert!(diags.has_errors());
        assert!(diags.entries().iter().any(|d| d.to_string().contains("redeclaration")));
    }

    #[test]
    fn shadowing_in_a_nested_block_is_allowed() {
        let src = "int main() { int x = 1; { int x = 2; } return x; }";
        let (_, diags) = analyze_source(src);
        assert!(!diags.has_errors(), "{:?}", diags.entries());
    }

    #[test]
    fn binary_operand_type_mismatch_is_reported() {
        let (_, diags) = analyze_source("int main() { int x = 1 + 1.0; return x; }");
        assert!(diags.has_errors());
    }

    #[test]
    fn var_decl_initializer_type_mismatch_is_reported() {
        let (_, diags) = analyze_source("int main() { int x = 1.0; return x; }");
        assert!(diags.has_errors());
    }

    #[test]
    fn void_function_forbids_returning_a_value() {
        let (_, diags) = analyze_source("void noop() { return 1; }");
        assert!(diags.has_errors());
    }

    #[test]
    fn void_function_accepts_bare_return() {
        let (_, diags) = analyze_source("void noop() { return; }");
        assert!(!diags.has_errors(), "{:?}", diags.entries());
    }

    #[test]
    fn non_void_function_without_a_return_is_an_error() {
        let (_, diags) = analyze_source("int broken() { int x = 1; }");
        assert!(diags.has_errors());
    }

    #[test]
    fn constructor_style_call_resolves_against_struct_constructors() {
        let src = "struct Point { int x; int y; } \
                   int main() { Point p = Point(1, 2); return 0; }";
        let (program, diags) = analyze_source(src);
        assert!(!diags.has_errors(), "{:?}", diags.entries());
        if let Stmt::FunctionDef(main_fn) = &program.statements[1] {
            if let FunctionBody::Block(body) = &main_fn.body {
                if let Stmt::VarDecl { init: Some(Expr::Call(call)), .. } = &body[0] {
                    assert_eq!(call.signature.as_deref(), Some("fun_Point_int_int"));
                    return;
                }
            }
        }
        panic!("unexpected shape");
    }
}
