//! `rillc`: front end and C code generator for the Rill language.
//!
//! Pipeline: [`lexer`] -> [`parser`] -> [`analyzer`] (with on-demand
//! [`monomorphize`]ation of generics along the way) -> [`codegen`]. Emitted
//! programs link against `rill-runtime`'s scope-tracking allocator.

pub mod analyzer;
pub mod ast;
pub mod codegen;
pub mod config;
pub mod diagnostics;
pub mod lexer;
pub mod mangle;
pub mod monomorphize;
pub mod parser;
pub mod symtab;
pub mod token;

use codegen::GeneratedCode;
use diagnostics::Diagnostics;
use std::fs;
use std::path::Path;

/// Runs the full front end over `source` and returns the generated header
/// and body text, without touching the filesystem. Mirrors the shape of
/// `compile_to_ir` from the library this crate's structure is descended
/// from, but returns C source instead of an intermediate representation
/// since that's this compiler's actual target.
pub fn compile_to_ir(source: &str) -> Result<GeneratedCode, String> {
    let mut diags = Diagnostics::new("<source>", source);
    let tokens = lexer::Lexer::new(source).tokenize(&mut diags)?;
    let mut program = parser::parse(tokens, &mut diags);
    if diags.has_errors() {
        return Err(render_errors(&diags));
    }
    let result = analyzer::analyze(&mut program, &mut diags);
    if diags.has_errors() {
        return Err(render_errors(&diags));
    }
    codegen::generate(&program, &result.symtab).map_err(|e| e.to_string())
}

/// Compiles the file at `source_path`, writing a generated `<stem>.h` and
/// `<stem>.c` next to `output_path` using its file stem. `output_path`'s
/// own extension is ignored for the generated pair but used verbatim if a
/// caller later links the result into a binary of that name.
pub fn compile_file(source_path: &Path, output_path: &Path) -> Result<(), String> {
    let source = fs::read_to_string(source_path)
        .map_err(|e| format!("failed to read {}: {e}", source_path.display()))?;
    let mut diags = Diagnostics::new(source_path.display().to_string(), &source);
    let tokens = lexer::Lexer::new(&source).tokenize(&mut diags)?;
    let mut program = parser::parse(tokens, &mut diags);
    if diags.has_errors() {
        diags.emit();
        return Err(format!("compilation of {} failed", source_path.display()));
    }
    let result = analyzer::analyze(&mut program, &mut diags);
    if diags.has_errors() {
        diags.emit();
        return Err(format!("compilation of {} failed", source_path.display()));
    }
    let generated = codegen::generate(&program, &result.symtab).map_err(|e| e.to_string())?;

    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "out".to_string());
    let dir = output_path.parent().unwrap_or_else(|| Path::new("."));
    let header_path = dir.join(format!("{stem}.h"));
    let body_path = dir.join(format!("{stem}.c"));

    fs::write(&header_path, generated.header)
        .map_err(|e| format!("failed to write {}: {e}", header_path.display()))?;
    fs::write(&body_path, generated.body)
        .map_err(|e| format!("failed to write {}: {e}", body_path.display()))?;
    rill_runtime::write_runtime_files(dir)
        .map_err(|e| format!("failed to write runtime sources into {}: {e}", dir.display()))?;

    Ok(())
}

/// Runs only the lexer/parser/analyzer and reports diagnostics, without
/// generating C. Used by the CLI's `check` subcommand.
pub fn check_file(source_path: &Path) -> Result<(), String> {
    let source = fs::read_to_string(source_path)
        .map_err(|e| format!("failed to read {}: {e}", source_path.display()))?;
    let mut diags = Diagnostics::new(source_path.display().to_string(), &source);
    let tokens = lexer::Lexer::new(&source).tokenize(&mut diags)?;
    let mut program = parser::parse(tokens, &mut diags);
    analyzer::analyze(&mut program, &mut diags);
    if diags.has_errors() {
        diags.emit();
        return Err(format!("{} has errors", source_path.display()));
    }
    diags.emit();
    Ok(())
}

fn render_errors(diags: &Diagnostics) -> String {
    diags
        .entries()
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_to_ir_round_trips_a_minimal_program() {
        let generated = compile_to_ir("int main() { return 0; }").unwrap();
        assert!(generated.header.contains("#ifndef RILL_GENERATED_H"));
        assert!(generated.body.contains("int main("));
    }

    #[test]
    fn compile_to_ir_surfaces_analysis_errors() {
        let err = compile_to_ir("int main() { return missing(); }").unwrap_err();
        assert!(err.contains("missing"));
    }
}
