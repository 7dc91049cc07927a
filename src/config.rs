//! Configuration management for schema-typegen
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (typegen.toml)
//! - Environment variables (TYPEGEN__*)
//!
//! ## Example config file (typegen.toml):
//! ```toml
//! [emit]
//! target = "rust"
//! header = true
//! indent = 4
//!
//! [emit.types]
//! number = "float"
//!
//! [emit.rust]
//! derives = ["Debug", "Clone", "Serialize", "Deserialize"]
//!
//! [output]
//! path = "generated/types.rs"
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::codegen::config::{default_derives, DEFAULT_INDENT};
use crate::codegen::{RenderProfile, Target, TypeMappings, TypeOverrides};
use crate::error::Result;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypegenConfig {
    /// Rendering settings
    #[serde(default)]
    pub emit: EmitConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmitConfig {
    /// Output language
    #[serde(default)]
    pub target: Target,

    /// Emit the generated-file banner
    #[serde(default = "default_true")]
    pub header: bool,

    /// Spaces per indentation level
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Primitive type overrides on top of the target defaults
    #[serde(default)]
    pub types: TypeOverrides,

    /// Rust-only settings
    #[serde(default)]
    pub rust: RustEmitConfig,
}

/// Rust target settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RustEmitConfig {
    /// Derives placed on every generated struct
    #[serde(default = "default_derives")]
    pub derives: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output file; stdout when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_indent() -> usize {
    DEFAULT_INDENT
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            target: Target::default(),
            header: true,
            indent: DEFAULT_INDENT,
            types: TypeOverrides::default(),
            rust: RustEmitConfig::default(),
        }
    }
}

impl Default for RustEmitConfig {
    fn default() -> Self {
        Self {
            derives: default_derives(),
        }
    }
}

impl TypegenConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the defaults
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = ["typegen.toml", ".typegen.toml", "config/typegen.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "typegen", "schema-typegen") {
            let xdg_config = config_dir.config_dir().join("typegen.toml");
            if xdg_config.exists() {
                debug!(path = %xdg_config.display(), "loading user config");
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // TYPEGEN__EMIT__TARGET=rust
        builder = builder.add_source(
            Environment::with_prefix("TYPEGEN")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(target = %config.emit.target, "configuration loaded");
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
    }

    /// Render profile for the configured target
    pub fn profile(&self) -> RenderProfile {
        self.profile_for(self.emit.target)
    }

    /// Render profile for `target`, with the configured overrides applied
    pub fn profile_for(&self, target: Target) -> RenderProfile {
        RenderProfile {
            target,
            types: TypeMappings::for_target(target).with_overrides(&self.emit.types),
            header: self.emit.header,
            indent: self.emit.indent,
            derives: self.emit.rust.derives.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TypegenConfig::default();
        assert_eq!(config.emit.target, Target::Python);
        assert!(config.emit.header);
        assert_eq!(config.emit.indent, 4);
        assert_eq!(config.profile(), RenderProfile::python());
    }

    #[test]
    fn test_serialize_config() {
        let config = TypegenConfig::default();
        let toml_str = config.to_toml().unwrap();
        assert!(toml_str.contains("[emit]"));
        assert!(toml_str.contains("target = \"python\""));
        assert!(toml_str.contains("[emit.rust]"));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[emit]\ntarget = \"rust\"\nindent = 2\n\n[emit.types]\nnumber = \"f32\"\n\n[output]\npath = \"out.rs\""
        )
        .unwrap();

        let config = TypegenConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.emit.target, Target::Rust);
        assert_eq!(config.output.path, Some(PathBuf::from("out.rs")));

        let profile = config.profile();
        assert_eq!(profile.indent, 2);
        assert_eq!(profile.types.number, "f32");
        assert_eq!(profile.types.string, "String");
        assert_eq!(profile.derives, default_derives());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(TypegenConfig::load_from(Some(&missing)).is_err());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typegen.toml");
        let mut config = TypegenConfig::default();
        config.emit.target = Target::Rust;
        config.emit.types.null = Some("serde_json::Value".to_string());
        config.save(&path).unwrap();

        let loaded = TypegenConfig::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.emit.target, Target::Rust);
        assert_eq!(loaded.emit.types.null.as_deref(), Some("serde_json::Value"));
    }
}
