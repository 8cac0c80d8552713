//! On-demand generic monomorphizer.
//!
//! Every distinct generic instantiation (`Box<int>`, `Pair<int, float>`, ...)
//! is materialized at most once: a mangled key is looked up in the
//! instantiation registry first, and only produced by deep-cloning the
//! template and substituting type parameters when it's missing. Nested
//! generic field types are instantiated recursively so `Box<Pair<int,int>>`
//! pulls in `Pair_int_int` as well as `Box_Pair_int_int`.

use crate::ast::{StructDef, TypeRef};
use crate::symtab::SymbolTable;

/// Ensures `ty` (if generic) has a materialized struct definition
/// registered under its mangled key, recursively instantiating any
/// generic field types it introduces. Returns the mangled key, or `None`
/// if `ty` isn't generic and needs no instantiation.
pub fn ensure_instantiated(symtab: &mut SymbolTable, ty: &TypeRef) -> Option<String> {
    if !ty.is_generic() {
        return None;
    }
    let key = ty.mangled();
    if symtab.find_instantiation(&key).is_some() {
        return Some(key);
    }

    let template = symtab.lookup_template(&ty.name)?.clone();
    let substituted_fields: Vec<_> = template
        .fields
        .iter()
        .map(|f| crate::ast::StructField {
            ty: substitute_type(&f.ty, &template.generic_params, &ty.generic_args),
            name: f.name.clone(),
        })
        .collect();

    for field in &substituted_fields {
        ensure_instantiated(symtab, &field.ty);
    }

    symtab.register_instantiation(
        key.clone(),
        StructDef {
            name: key.clone(),
            generic_params: Vec::new(),
            fields: substituted_fields,
        },
    );
    Some(key)
}

fn substitute_type(ty: &TypeRef, generic_params: &[String], args: &[TypeRef]) -> TypeRef {
    if let Some(idx) = generic_params.iter().position(|p| p == &ty.name) {
        return args[idx].clone();
    }
    TypeRef {
        name: ty.name.clone(),
        generic_args: ty
            .generic_args
            .iter()
            .map(|a| substitute_type(a, generic_params, args))
            .collect(),
        pointer_depth: ty.pointer_depth,
    }
}
