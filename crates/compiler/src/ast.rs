//! Abstract syntax tree produced by the parser, mutated in place by the
//! analyzer (mangled call signatures, field-access flags) and consumed by
//! the code generator.
//!
//! The original walked a virtual-dispatch class hierarchy and cloned nodes
//! through a hand-written `clone()` + downcast on every base pointer.
//! Plain enums with `#[derive(Clone)]` give the same disjoint-ownership
//! deep clone for free.

use crate::token::OpKind;

/// A type reference as written in source: a base name plus optional
/// generic arguments (`Box<int>`) and pointer depth from leading `*`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub generic_args: Vec<TypeRef>,
    pub pointer_depth: u32,
}

impl TypeRef {
    pub fn simple(name: impl Into<String>) -> Self {
        TypeRef {
            name: name.into(),
            generic_args: Vec::new(),
            pointer_depth: 0,
        }
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_args.is_empty()
    }

    /// The mangled form used in struct/instantiation keys and symbol names,
    /// e.g. `Box<int>` -> `Box_int`.
    pub fn mangled(&self) -> String {
        if self.generic_args.is_empty() {
            self.name.clone()
        } else {
            let args: Vec<String> = self.generic_args.iter().map(TypeRef::mangled).collect();
            format!("{}_{}", self.name, args.join("_"))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: TypeRef,
    pub name: String,
}

/// A call expression. `signature` starts empty and is filled in by the
/// analyzer once overload resolution has picked a concrete mangled name.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: String,
    pub args: Vec<Expr>,
    pub signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Str(String),
    /// A bare identifier. `is_field` starts `false` and is set by the
    /// analyzer when the name resolves to a struct field rather than a
    /// local/parameter, so codegen knows to emit `self->name`.
    Variable { name: String, is_field: bool },
    Unary {
        op: OpKind,
        operand: Box<Expr>,
    },
    Binary {
        op: OpKind,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call(Call),
    MethodCall {
        receiver: Box<Expr>,
        call: Call,
    },
    /// `receiver.field`, distinct from a method call so the analyzer can
    /// type it against the receiver's struct fields without guessing from
    /// a trailing `(`.
    FieldAccess {
        receiver: Box<Expr>,
        field: String,
    },
    Assign {
        op: OpKind,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// An `extern { ... }` block used as an expression-position escape
    /// hatch; the captured text is emitted verbatim.
    ExternRaw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    Block(Vec<Stmt>),
    /// `= expr;` in place of a `{ ... }` block. Equivalent to a block whose
    /// only statement is `return expr;`, but kept distinct so codegen can
    /// emit the tight `{ return <expr>; }` form the single-line syntax
    /// implies rather than a full statement list.
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub return_ty: TypeRef,
    pub params: Vec<Param>,
    pub body: FunctionBody,
    /// Set when the definition was introduced by the `static` keyword
    /// (spec §3.2/§4.2.1).
    pub is_static: bool,
    /// Filled in by the analyzer: `fun_name_paramType...`, or the bare
    /// name `main` for the entry point.
    pub mangled_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub ty: TypeRef,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDef {
    pub struct_name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub mangled_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtendsMember {
    Field(StructField),
    Method(FunctionDef),
    Constructor(ConstructorDef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtendsStmt {
    pub struct_name: String,
    pub parent: Option<String>,
    pub members: Vec<ExtendsMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    pub name: String,
    pub generic_params: Vec<String>,
    pub fields: Vec<StructField>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Vec<Stmt>),
    Expr(Expr),
    VarDecl {
        ty: TypeRef,
        name: String,
        init: Option<Expr>,
    },
    FunctionDef(FunctionDef),
    StructDef(StructDef),
    ConstructorDef(ConstructorDef),
    ExtendsStmt(ExtendsStmt),
    Return(Option<Expr>),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        step: Option<Expr>,
        body: Box<Stmt>,
    },
    Continue,
    Break,
    /// A bare `extern libname;` declaration requesting a library be linked
    /// at emission time, as opposed to the raw-capture expression form.
    ExternLib(String),
}

/// A parsed source file: the flat top-level statement list the parser
/// produces before analysis hoists declarations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}
