//! Engine settings, layered with the `config` crate: compiled defaults first,
//! then an optional settings file, then `IPAM_SEARCH__SECTION__KEY`
//! environment variables.

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Environment variable naming an explicit settings file.
pub const CONFIG_PATH_VAR: &str = "IPAM_SEARCH_CONFIG";
/// Settings file looked up in the working directory, any supported extension.
pub const CONFIG_FILE_STEM: &str = "ipam-search";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingIdMode {
    /// Routing identifiers are searched as free text.
    #[default]
    Legacy,
    /// Routing identifiers are compared for equality with the routing column.
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub max_result: usize,
    pub offset: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { max_result: 50, offset: 0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    pub max_depth: usize,
    /// Operands allowed in one query, counted through all groups.
    pub max_terms: usize,
    pub routing_id: RoutingIdMode,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self { max_depth: 32, max_terms: 256, routing_id: RoutingIdMode::Legacy }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationSettings {
    pub max_count: usize,
}

impl Default for AllocationSettings {
    fn default() -> Self {
        Self { max_count: 1000 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Directive for `tracing_subscriber::EnvFilter`, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { filter: "info".to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub parser: ParserSettings,
    pub allocation: AllocationSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Reads the file named by `IPAM_SEARCH_CONFIG`, or `ipam-search.*` if
    /// present, and then the environment.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_VAR).ok();
        Self::load_from(path.as_deref())
    }

    /// An explicit `path` must exist, the default file may be absent.
    pub fn load_from(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(CONFIG_FILE_STEM).required(false),
        };
        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("IPAM_SEARCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
