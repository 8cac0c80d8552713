//! Implementation-file emission: free function, constructor and method
//! bodies, synthesized default constructors, and any top-level statement
//! that isn't a struct/extends declaration.

use super::c_type_name;
use super::error::CodeGenError;
use super::header::{self, param_list, CodegenStruct};
use crate::ast::*;
use crate::mangle;
use std::fmt::Write as _;

pub(crate) fn emit_body(program: &Program, structs: &[CodegenStruct]) -> Result<String, CodeGenError> {
    let mut out = String::new();
    writeln!(out, "#include \"rill_generated.h\"")?;
    writeln!(out)?;

    for s in structs {
        if s.constructors.is_empty() {
            emit_default_constructor(&mut out, s)?;
        }
    }

    for stmt in &program.statements {
        match stmt {
            Stmt::FunctionDef(f) => emit_function(&mut out, f)?,
            Stmt::ConstructorDef(c) => emit_constructor(&mut out, c)?,
            Stmt::ExtendsStmt(e) => {
                for member in &e.members {
                    match member {
                        ExtendsMember::Method(m) => emit_method(&mut out, &e.struct_name, m)?,
                        ExtendsMember::Constructor(c) => emit_constructor(&mut out, c)?,
                        ExtendsMember::Field(_) => {}
                    }
                }
            }
            Stmt::StructDef(_) => {}
            other => emit_stmt(&mut out, other, 0)?,
        }
    }

    Ok(out)
}

fn emit_default_constructor(out: &mut String, s: &CodegenStruct) -> Result<(), CodeGenError> {
    let mangled = header::default_ctor_mangled(&s.name, &s.fields);
    let params: Vec<Param> = s
        .fields
        .iter()
        .map(|f| Param {
            ty: f.ty.clone(),
            name: f.name.clone(),
        })
        .collect();
    writeln!(out, "{}* {}({}) {{", s.name, mangled, param_list(&params))?;
    writeln!(out, "    {0}* self = ({0}*)alloc(sizeof({0}));", s.name)?;
    for f in &s.fields {
        writeln!(out, "    self->{0} = {0};", f.name)?;
    }
    writeln!(out, "    return self;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn emit_function(out: &mut String, f: &FunctionDef) -> Result<(), CodeGenError> {
    let mangled = f
        .mangled_name
        .clone()
        .unwrap_or_else(|| mangle::free_function(&f.name, &f.params));
    writeln!(
        out,
        "{} {}({}) {{",
        c_type_name(&f.return_ty),
        mangled,
        param_list(&f.params)
    )?;
    if mangled == "main" {
        writeln!(out, "    initGlobalPool(0, 0);")?;
    }
    emit_function_body(out, &f.body)?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

/// Emits a function/method body: a block's statements verbatim, or a
/// single-expression (`= expr`) body as its implied `return <expr>;`.
fn emit_function_body(out: &mut String, body: &FunctionBody) -> Result<(), CodeGenError> {
    match body {
        FunctionBody::Block(stmts) => {
            for s in stmts {
                emit_stmt(out, s, 1)?;
            }
        }
        FunctionBody::Expr(expr) => {
            writeln!(out, "    return {};", emit_expr(expr))?;
        }
    }
    Ok(())
}

fn emit_constructor(out: &mut String, c: &ConstructorDef) -> Result<(), CodeGenError> {
    let mangled = c
        .mangled_name
        .clone()
        .unwrap_or_else(|| mangle::constructor(&c.struct_name, &c.params));
    writeln!(
        out,
        "{}* {}({}) {{",
        c.struct_name,
        mangled,
        param_list(&c.params)
    )?;
    writeln!(
        out,
        "    {0}* self = ({0}*)alloc(sizeof({0}));",
        c.struct_name
    )?;
    for s in &c.body {
        emit_stmt(out, s, 1)?;
    }
    writeln!(out, "    return self;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn emit_method(out: &mut String, struct_name: &str, m: &FunctionDef) -> Result<(), CodeGenError> {
    let mangled = m
        .mangled_name
        .clone()
        .unwrap_or_else(|| mangle::method(struct_name, &m.name, &m.params));
    let rest = param_list(&m.params);
    let this_param = format!("{struct_name}* self");
    let all = if rest.is_empty() {
        this_param
    } else {
        format!("{this_param}, {rest}")
    };
    writeln!(out, "{} {}({}) {{", c_type_name(&m.return_ty), mangled, all)?;
    emit_function_body(out, &m.body)?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn emit_braced(out: &mut String, stmt: &Stmt, indent: usize) -> Result<(), CodeGenError> {
    match stmt {
        Stmt::Block(stmts) => {
            for s in stmts {
                emit_stmt(out, s, indent)?;
            }
        }
        other => emit_stmt(out, other, indent)?,
    }
    Ok(())
}

fn render_inline_init(stmt: &Stmt) -> String {
    match stmt {
        Stmt::VarDecl { ty, name, init: Some(e) } => {
            format!("{} {} = {}", c_type_name(ty), name, emit_expr(e))
        }
        Stmt::VarDecl { ty, name, init: None } => format!("{} {}", c_type_name(ty), name),
        Stmt::Expr(e) => emit_expr(e),
        _ => String::new(),
    }
}

fn emit_stmt(out: &mut String, stmt: &Stmt, indent: usize) -> Result<(), CodeGenError> {
    let pad = "    ".repeat(indent);
    match stmt {
        Stmt::Block(stmts) => {
            writeln!(out, "{pad}{{")?;
            for s in stmts {
                emit_stmt(out, s, indent + 1)?;
            }
            writeln!(out, "{pad}}}")?;
        }
        Stmt::Expr(e) => writeln!(out, "{pad}{};", emit_expr(e))?,
        Stmt::VarDecl { ty, name, init } => match init {
            Some(e) => writeln!(out, "{pad}{} {} = {};", c_type_name(ty), name, emit_expr(e))?,
            None => writeln!(out, "{pad}{} {};", c_type_name(ty), name)?,
        },
        Stmt::Return(Some(e)) => writeln!(out, "{pad}return {};", emit_expr(e))?,
        Stmt::Return(None) => writeln!(out, "{pad}return;")?,
        Stmt::If {
            cond,
            then_branch,
            else_branch,
        } => {
            writeln!(out, "{pad}if ({}) {{", emit_expr(cond))?;
            emit_braced(out, then_branch, indent + 1)?;
            write!(out, "{pad}}}")?;
            match else_branch {
                Some(else_b) => {
                    writeln!(out, " else {{")?;
                    emit_braced(out, else_b, indent + 1)?;
                    writeln!(out, "{pad}}}")?;
                }
                None => writeln!(out)?,
            }
        }
        Stmt::While { cond, body } => {
            writeln!(out, "{pad}while ({}) {{", emit_expr(cond))?;
            emit_braced(out, body, indent + 1)?;
            writeln!(out, "{pad}}}")?;
        }
        Stmt::For {
            init,
            cond,
            step,
            body,
        } => {
            let init_s = init.as_ref().map(|s| render_inline_init(s)).unwrap_or_default();
            let cond_s = cond.as_ref().map(emit_expr).unwrap_or_default();
            let step_s = step.as_ref().map(emit_expr).unwrap_or_default();
            writeln!(out, "{pad}for ({init_s}; {cond_s}; {step_s}) {{")?;
            emit_braced(out, body, indent + 1)?;
            writeln!(out, "{pad}}}")?;
        }
        Stmt::Continue => writeln!(out, "{pad}continue;")?,
        Stmt::Break => writeln!(out, "{pad}break;")?,
        Stmt::ExternLib(name) => writeln!(out, "{pad}/* extern library: {name}, linked at build time */")?,
        Stmt::FunctionDef(_) | Stmt::StructDef(_) | Stmt::ConstructorDef(_) | Stmt::ExtendsStmt(_) => {
            return Err(CodeGenError::Logic(
                "declarations may only appear at the top level".to_string(),
            ));
        }
    }
    Ok(())
}

fn escape_c_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Renders one expression as C. `Inc`/`Dec` always render prefix-style
/// (`++x`) regardless of whether the source wrote a prefix or postfix
/// increment — the AST doesn't distinguish the two positions, which is an
/// accepted simplification (see DESIGN.md) since neither form is
/// observably different for the statement-position uses this language
/// allows.
fn emit_expr(e: &Expr) -> String {
    match e {
        Expr::Int(v) => v.to_string(),
        Expr::Float(v) => format!("{v}"),
        Expr::Str(s) => format!("\"{}\"", escape_c_string(s)),
        Expr::Variable { name, is_field } => {
            if *is_field {
                format!("self->{name}")
            } else if name == "this" {
                "self".to_string()
            } else {
                name.clone()
            }
        }
        Expr::Unary { op, operand } => format!("{}{}", op.lexeme(), emit_expr(operand)),
        Expr::Binary { op, lhs, rhs } => {
            format!("{} {} {}", emit_expr(lhs), op.lexeme(), emit_expr(rhs))
        }
        Expr::Assign { op, target, value } => {
            format!("{} {} {}", emit_expr(target), op.lexeme(), emit_expr(value))
        }
        Expr::Call(call) => {
            let name = call.signature.clone().unwrap_or_else(|| call.name.clone());
            let args: Vec<String> = call.args.iter().map(emit_expr).collect();
            format!("{name}({})", args.join(", "))
        }
        Expr::MethodCall { receiver, call } => {
            let name = call.signature.clone().unwrap_or_else(|| call.name.clone());
            let mut args = vec![emit_expr(receiver)];
            args.extend(call.args.iter().map(emit_expr));
            format!("{name}({})", args.join(", "))
        }
        Expr::FieldAccess { receiver, field } => format!("{}->{field}", emit_expr(receiver)),
        Expr::ExternRaw(raw) => raw.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer;
    use crate::codegen::header::collect_structs;
    use crate::diagnostics::Diagnostics;
    use crate::lexer::Lexer;
    use crate::parser;

    fn build(src: &str) -> String {
        let mut diags = Diagnostics::new("t.rill", src);
        let tokens = Lexer::new(src).tokenize(&mut diags).unwrap();
        let mut program = parser::parse(tokens, &mut diags);
        let result = analyzer::analyze(&mut program, &mut diags);
        assert!(!diags.has_errors(), "{:?}", diags.entries());
        let structs = collect_structs(&program, &result.symtab).unwrap();
        emit_body(&program, &structs).unwrap()
    }

    #[test]
    fn main_gets_init_global_pool_as_first_statement() {
        let body = build("int main() { return 0; }");
        let main_fn = body.split("main(").nth(1).unwrap();
        let first_stmt = main_fn.lines().nth(1).unwrap().trim();
        assert_eq!(first_stmt, "initGlobalPool(0, 0);");
    }

    #[test]
    fn default_constructor_allocates_and_assigns_every_field() {
        let body = build("struct Point { int x; int y; }");
        assert!(body.contains("fun_Point_int_int(int x, int y) {"));
        assert!(body.contains("self->x = x;"));
        assert!(body.contains("self->y = y;"));
        assert!(body.contains("return self;"));
    }

    #[test]
    fn field_access_through_this_uses_arrow() {
        let src = "struct Point { int x; } extends Point { int getX() { return x; } }";
        let body = build(src);
        assert!(body.contains("return self->x;"));
    }

    #[test]
    fn method_call_passes_receiver_as_first_argument() {
        let src = "struct Point { int x; } \
                   extends Point { int getX() { return x; } } \
                   int main() { Point p; int v = p.getX(); return 0; }";
        let body = build(src);
        assert!(body.contains("Point_fun_getX(p)"));
    }
}
