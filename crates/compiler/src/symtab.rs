//! Scoped symbol table used by the analyzer, plus the generic-template
//! registry the monomorphizer draws from.
//!
//! Scopes push/pop at block, struct, function and constructor boundaries,
//! mirroring the original's `SymbolTable::enterScope`/`exitScope` pair.
//! Lookups walk outward from the innermost scope.

use crate::ast::StructDef;
use std::collections::HashMap;

/// What kind of thing a name in scope refers to. `Structure` lets call
/// resolution find a user-written constructor registered under the
/// `<Name>_new...` scheme; struct names with no user constructor are
/// never callable as `Name(...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKind {
    Variable,
    Function,
    Structure,
}

#[derive(Debug, Clone)]
pub struct SymbolInfo {
    pub meta_kind: MetaKind,
    pub ty: String,
}

type Scope = HashMap<String, SymbolInfo>;

#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    /// Parsed struct templates, keyed by base name, kept for the
    /// monomorphizer to clone-and-substitute on demand. Stored as owned
    /// clones rather than arena indices: templates are parsed once and
    /// never mutated afterward, so there's no dangling-reference risk
    /// for an arena to guard against.
    templates: HashMap<String, StructDef>,
    /// Mangled-key -> materialized struct, for instantiations already
    /// produced by the monomorphizer. Ensures idempotence: the same
    /// generic key is never instantiated twice.
    instantiations: HashMap<String, StructDef>,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut base = Scope::new();
        for prim in ["int", "float", "double", "char", "bool"] {
            base.insert(
                prim.to_string(),
                SymbolInfo {
                    meta_kind: MetaKind::Variable,
                    ty: prim.to_string(),
                },
            );
        }
        SymbolTable {
            scopes: vec![base],
            templates: HashMap::new(),
            instantiations: HashMap::new(),
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    pub fn exit_scope(&mut self) {
        self.scopes.pop();
        debug_assert!(!self.scopes.is_empty(), "popped the base scope");
    }

    pub fn add_symbol(&mut self, name: impl Into<String>, meta_kind: MetaKind, ty: impl Into<String>) {
        self.scopes
            .last_mut()
            .expect("at least one scope")
            .insert(name.into(), SymbolInfo { meta_kind, ty: ty.into() });
    }

    pub fn lookup(&self, name: &str) -> Option<&SymbolInfo> {
        self.scopes.iter().rev().find_map(|s| s.get(name))
    }

    /// Looks up `name` only in the innermost scope, for redeclaration
    /// checks that must not see shadowed outer-scope bindings.
    pub fn lookup_in_top_scope(&self, name: &str) -> Option<&SymbolInfo> {
        self.scopes.last().and_then(|s| s.get(name))
    }

    pub fn add_template(&mut self, def: StructDef) {
        self.templates.insert(def.name.clone(), def);
    }

    pub fn lookup_template(&self, name: &str) -> Option<&StructDef> {
        self.templates.get(name)
    }

    pub fn find_instantiation(&self, mangled_key: &str) -> Option<&StructDef> {
        self.instantiations.get(mangled_key)
    }

    pub fn register_instantiation(&mut self, mangled_key: String, def: StructDef) {
        self.instantiations.entry(mangled_key).or_insert(def);
    }

    pub fn instantiations(&self) -> impl Iterator<Item = (&String, &StructDef)> {
        self.instantiations.iter()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
