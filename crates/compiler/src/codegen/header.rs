//! Passes 1-4 of header generation: collect fields, merge `extends`,
//! emit typedefs, emit constructor/method prototypes.

use super::error::CodeGenError;
use super::c_type_name;
use crate::ast::{ExtendsMember, FunctionDef, Param, Program, Stmt, StructField, TypeRef};
use crate::mangle;
use crate::symtab::SymbolTable;
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub(crate) struct MethodProto {
    pub mangled: String,
    pub return_ty: TypeRef,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone)]
pub(crate) struct CtorProto {
    pub mangled: String,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone)]
pub(crate) struct CodegenStruct {
    pub name: String,
    pub fields: Vec<StructField>,
    pub methods: Vec<MethodProto>,
    pub constructors: Vec<CtorProto>,
}

/// Default-constructor mangling is a scheme of its own, distinct from
/// [`crate::mangle::constructor`]: it's keyed on the struct's *field*
/// types in declaration order, not a user-written parameter list, since
/// there is no user-written constructor to draw parameters from.
pub(crate) fn default_ctor_mangled(struct_name: &str, fields: &[StructField]) -> String {
    if fields.is_empty() {
        format!("fun_{struct_name}")
    } else {
        let types: Vec<String> = fields.iter().map(|f| f.ty.mangled()).collect();
        format!("fun_{struct_name}_{}", types.join("_"))
    }
}

fn find_index(structs: &[CodegenStruct], name: &str) -> Option<usize> {
    structs.iter().position(|s| s.name == name)
}

pub(crate) fn collect_structs(
    program: &Program,
    symtab: &SymbolTable,
) -> Result<Vec<CodegenStruct>, CodeGenError> {
    let mut structs = Vec::new();

    // Pass 1: declared struct fields, plus materialized generic instantiations.
    // A generic template (`struct Box<T> { ... }`) is never emitted itself —
    // only the monomorphized instantiations the analyzer registered for it.
    for stmt in &program.statements {
        if let Stmt::StructDef(def) = stmt {
            if !def.generic_params.is_empty() {
                continue;
            }
            structs.push(CodegenStruct {
                name: def.name.clone(),
                fields: def.fields.clone(),
                methods: Vec::new(),
                constructors: Vec::new(),
            });
        }
    }
    for (key, def) in symtab.instantiations() {
        if find_index(&structs, key).is_none() {
            structs.push(CodegenStruct {
                name: key.clone(),
                fields: def.fields.clone(),
                methods: Vec::new(),
                constructors: Vec::new(),
            });
        }
    }

    // Pass 2: apply `extends`/inheritance in declaration order. A child
    // whose `extends` block appears before its parent's only sees the
    // parent state accumulated so far — not fixed, see DESIGN.md.
    for stmt in &program.statements {
        if let Stmt::ExtendsStmt(e) = stmt {
            let Some(child_idx) = find_index(&structs, &e.struct_name) else {
                return Err(CodeGenError::Logic(format!(
                    "extends names unknown struct '{}'",
                    e.struct_name
                )));
            };

            if let Some(parent_name) = &e.parent {
                let parent_idx = find_index(&structs, parent_name).ok_or_else(|| {
                    CodeGenError::Logic(format!(
                        "extends {} : {} names unknown parent",
                        e.struct_name, parent_name
                    ))
                })?;
                let (fields, methods, constructors) = {
                    let parent = &structs[parent_idx];
                    (
                        parent.fields.clone(),
                        parent.methods.clone(),
                        parent.constructors.clone(),
                    )
                };
                let child = &mut structs[child_idx];
                child.fields.extend(fields);
                child.methods.extend(methods);
                child.constructors.extend(constructors);
            }

            for member in &e.members {
                match member {
                    ExtendsMember::Field(field) => structs[child_idx].fields.push(field.clone()),
                    ExtendsMember::Method(m) => {
                        structs[child_idx].methods.push(method_proto(&e.struct_name, m))
                    }
                    ExtendsMember::Constructor(c) => {
                        let mangled = c
                            .mangled_name
                            .clone()
                            .unwrap_or_else(|| mangle::constructor(&e.struct_name, &c.params));
                        structs[child_idx].constructors.push(CtorProto {
                            mangled,
                            params: c.params.clone(),
                        });
                    }
                }
            }
        }
    }

    // Top-level `constructor Name(...) { ... }` definitions (outside an
    // `extends` block) also contribute prototypes.
    for stmt in &program.statements {
        if let Stmt::ConstructorDef(c) = stmt {
            if let Some(idx) = find_index(&structs, &c.struct_name) {
                let mangled = c
                    .mangled_name
                    .clone()
                    .unwrap_or_else(|| mangle::constructor(&c.struct_name, &c.params));
                structs[idx].constructors.push(CtorProto {
                    mangled,
                    params: c.params.clone(),
                });
            }
        }
    }

    Ok(structs)
}

fn method_proto(struct_name: &str, m: &FunctionDef) -> MethodProto {
    let mangled = m
        .mangled_name
        .clone()
        .unwrap_or_else(|| mangle::method(struct_name, &m.name, &m.params));
    MethodProto {
        mangled,
        return_ty: m.return_ty.clone(),
        params: m.params.clone(),
    }
}

pub(crate) fn param_list(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| format!("{} {}", c_type_name(&p.ty), p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn emit_header(structs: &[CodegenStruct]) -> Result<String, CodeGenError> {
    let mut out = String::new();
    writeln!(out, "#ifndef RILL_GENERATED_H")?;
    writeln!(out, "#define RILL_GENERATED_H")?;
    writeln!(out)?;
    writeln!(out, "#include \"rill_runtime.h\"")?;
    writeln!(out)?;

    // Pass 3: typedefs.
    for s in structs {
        writeln!(out, "typedef struct {{")?;
        for field in &s.fields {
            writeln!(out, "    {} {};", c_type_name(&field.ty), field.name)?;
        }
        writeln!(out, "}} {};", s.name)?;
        writeln!(out)?;
    }

    // Pass 4: constructor/method prototypes. Any struct with no
    // user-written constructor gets a synthesized default one keyed on
    // its field types.
    for s in structs {
        if s.constructors.is_empty() {
            let mangled = default_ctor_mangled(&s.name, &s.fields);
            let params: Vec<Param> = s
                .fields
                .iter()
                .map(|f| Param {
                    ty: f.ty.clone(),
                    name: f.name.clone(),
                })
                .collect();
            writeln!(out, "{}* {}({});", s.name, mangled, param_list(&params))?;
        } else {
            for ctor in &s.constructors {
                writeln!(out, "{}* {}({});", s.name, ctor.mangled, param_list(&ctor.params))?;
            }
        }
        for method in &s.methods {
            let this_param = format!("{}* self", s.name);
            let rest = param_list(&method.params);
            let all = if rest.is_empty() {
                this_param
            } else {
                format!("{this_param}, {rest}")
            };
            writeln!(
                out,
                "{} {}({});",
                c_type_name(&method.return_ty),
                method.mangled,
                all
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "#endif")?;
    Ok(out)
}
