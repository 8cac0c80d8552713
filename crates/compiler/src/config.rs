//! Compiler configuration: linked libraries, search paths, and the
//! project-level `rill.toml` they can be loaded from.
//!
//! Builder-style construction plus a `validate_symbol`-shaped guard on
//! anything that ends up on a linker command line, since library names
//! ultimately come from source-level `extern libname;` declarations.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct ConfigError(String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Rejects anything that isn't a plain identifier-ish library/path
/// fragment, so a crafted `extern` name can't smuggle flags or shell
/// metacharacters into the `cc` invocation used to link the final binary.
pub fn validate_symbol(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError("symbol name must not be empty".to_string()));
    }
    let ok = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');
    if !ok {
        return Err(ConfigError(format!(
            "'{name}' contains characters not allowed in a library name"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub libraries: Vec<String>,
    pub library_paths: Vec<PathBuf>,
    pub cc: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CompilerConfig {
    libraries: Vec<String>,
    library_paths: Vec<PathBuf>,
    cc: Option<String>,
}

impl CompilerConfig {
    pub fn new() -> Self {
        CompilerConfig::default()
    }

    pub fn with_library(mut self, name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        validate_symbol(&name)?;
        self.libraries.push(name);
        Ok(self)
    }

    pub fn with_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_paths.push(path.into());
        self
    }

    pub fn with_cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = Some(cc.into());
        self
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {e}", path.display())))?;
        let file: FileConfig =
            toml::from_str(&text).map_err(|e| ConfigError(format!("invalid config {}: {e}", path.display())))?;
        let mut config = CompilerConfig::new();
        for lib in file.libraries {
            config = config.with_library(lib)?;
        }
        for p in file.library_paths {
            config = config.with_library_path(p);
        }
        if let Some(cc) = file.cc {
            config = config.with_cc(cc);
        }
        Ok(config)
    }

    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }

    pub fn library_paths(&self) -> &[PathBuf] {
        &self.library_paths
    }

    pub fn cc(&self) -> &str {
        self.cc.as_deref().unwrap_or("cc")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_symbol_accepts_plain_names() {
        assert!(validate_symbol("libm").is_ok());
        assert!(validate_symbol("my-lib.1").is_ok());
    }

    #[test]
    fn validate_symbol_rejects_shell_metacharacters() {
        assert!(validate_symbol("libm; rm -rf /").is_err());
        assert!(validate_symbol("").is_err());
    }

    #[test]
    fn builder_accumulates_libraries_and_paths() {
        let config = CompilerConfig::new()
            .with_library("m")
            .unwrap()
            .with_library_path("/usr/local/lib")
            .with_cc("clang");
        assert_eq!(config.libraries(), &["m".to_string()]);
        assert_eq!(config.library_paths(), &[PathBuf::from("/usr/local/lib")]);
        assert_eq!(config.cc(), "clang");
    }

    #[test]
    fn defaults_to_cc_when_unset() {
        assert_eq!(CompilerConfig::new().cc(), "cc");
    }

    #[test]
    fn from_file_parses_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rill.toml");
        std::fs::write(&path, "libraries = [\"m\"]\ncc = \"clang\"\n").unwrap();
        let config = CompilerConfig::from_file(&path).unwrap();
        assert_eq!(config.libraries(), &["m".to_string()]);
        assert_eq!(config.cc(), "clang");
    }
}
