//! Name-mangling schemes shared between the analyzer (call-site overload
//! resolution) and the code generator (prototype emission).
//!
//! Three schemes, all keyed on parameter *types* rather than argument
//! count, so overloads that differ only in type are distinguishable:
//!
//! - free functions: `fun_<name>(_<paramType>)*`, except `main`, which is
//!   exempted from the prefix entirely and emitted bare.
//! - methods: `<Struct>_fun_<name>(_<paramType>)*`
//! - user-written constructors: `<Struct>_new(_<paramType>)*`
//!
//! Codegen-synthesized default constructors use a fourth, deliberately
//! different scheme (`fun_<Struct>_<fieldType>*`) local to
//! [`crate::codegen`], since they are never looked up by this module's
//! callers.

use crate::ast::Param;

fn param_type_suffix(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| p.ty.mangled())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn free_function(name: &str, params: &[Param]) -> String {
    if name == "main" {
        return "main".to_string();
    }
    let suffix = param_type_suffix(params);
    if suffix.is_empty() {
        format!("fun_{name}")
    } else {
        format!("fun_{name}_{suffix}")
    }
}

pub fn method(struct_name: &str, name: &str, params: &[Param]) -> String {
    let suffix = param_type_suffix(params);
    if suffix.is_empty() {
        format!("{struct_name}_fun_{name}")
    } else {
        format!("{struct_name}_fun_{name}_{suffix}")
    }
}

pub fn constructor(struct_name: &str, params: &[Param]) -> String {
    let suffix = param_type_suffix(params);
    if suffix.is_empty() {
        format!("{struct_name}_new")
    } else {
        format!("{struct_name}_new_{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TypeRef;

    fn param(ty: &str) -> Param {
        Param {
            ty: TypeRef::simple(ty),
            name: "p".to_string(),
        }
    }

    #[test]
    fn main_is_exempted_from_the_fun_prefix() {
        assert_eq!(free_function("main", &[]), "main");
        assert_eq!(free_function("main", &[param("int")]), "main");
    }

    #[test]
    fn free_function_mangles_with_param_types() {
        assert_eq!(free_function("add", &[param("int"), param("int")]), "fun_add_int_int");
        assert_eq!(free_function("noop", &[]), "fun_noop");
    }

    #[test]
    fn method_and_constructor_prefix_with_struct_name() {
        assert_eq!(method("Point", "norm", &[]), "Point_fun_norm");
        assert_eq!(
            constructor("Point", &[param("int"), param("int")]),
            "Point_new_int_int"
        );
    }
}
