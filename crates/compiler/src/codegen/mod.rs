//! C header + body generation.
//!
//! Runs its own 4-pass struct/extends walk over the analyzed AST rather
//! than consuming the analyzer's internal tables: collect declared struct
//! fields, merge `extends`/inheritance on top of them, emit typedefs, then
//! emit constructor/method prototypes. This mirrors the original
//! generator, which re-derives struct shape from the AST at emission time
//! instead of threading the analyzer's symbol table through.

pub mod body;
pub mod error;
pub mod header;

use crate::ast::{Program, TypeRef};
use crate::symtab::SymbolTable;
use error::CodeGenError;

pub struct GeneratedCode {
    pub header: String,
    pub body: String,
}

pub fn generate(program: &Program, symtab: &SymbolTable) -> Result<GeneratedCode, CodeGenError> {
    let structs = header::collect_structs(program, symtab)?;
    let header_src = header::emit_header(&structs)?;
    let body_src = body::emit_body(program, &structs)?;
    Ok(GeneratedCode {
        header: header_src,
        body: body_src,
    })
}

pub(crate) fn is_primitive(name: &str) -> bool {
    matches!(name, "int" | "float" | "double" | "bool" | "char" | "void")
}

/// Maps a source type to its emitted C spelling. Primitives map to their C
/// counterparts (`bool` has no C89 equivalent so it emits as `int`);
/// everything else — structs, generic instantiations, and the
/// unrecognized `string` type alike — emits as a pointer, since every
/// non-primitive value in this language lives on the scope-tracked heap.
/// `string` has no backing struct definition, so it preserves a rough
/// edge inherited from the original: it emits as `string*` with no
/// matching typedef, which a real C compiler would reject. See DESIGN.md.
pub(crate) fn c_type_name(ty: &TypeRef) -> String {
    let mut out = if is_primitive(&ty.name) && ty.generic_args.is_empty() {
        match ty.name.as_str() {
            "bool" => "int".to_string(),
            other => other.to_string(),
        }
    } else {
        format!("{}*", ty.mangled())
    };
    for _ in 0..ty.pointer_depth {
        out.push('*');
    }
    out
}
