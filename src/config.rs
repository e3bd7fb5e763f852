use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{error::NotesError, utils::ensure_parent_dir};

/// Directory under the home directory holding the log file.
pub const DATA_DIR: &str = ".course-notes";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    pub paths: Paths,
    pub generator: GeneratorConfig,
    pub levels: Levels,
    pub notes: Notes,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Paths {
    /// Folder holding the `*.en.txt` transcripts.
    pub transcripts: Option<PathBuf>,
    /// Notes vault; also the default root for renaming.
    pub vault: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorMode {
    #[default]
    Openai,
    Ollama,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub mode: GeneratorMode,
    /// Defaults to the public endpoint of the selected mode.
    pub base_url: Option<String>,
    pub api_key: String,
    pub model: String,
    pub retries: u8,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            mode: GeneratorMode::Openai,
            base_url: None,
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            retries: 3,
        }
    }
}

impl GeneratorConfig {
    pub fn base_url(&self) -> &str {
        match (&self.base_url, self.mode) {
            (Some(url), _) => url.trim_end_matches('/'),
            (None, GeneratorMode::Openai) => "https://api.openai.com/v1",
            (None, GeneratorMode::Ollama) => "http://localhost:11434",
        }
    }
}

/// Prefix per depth for the level renamer, shallowest first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Levels {
    pub prefixes: Vec<String>,
}

impl Default for Levels {
    fn default() -> Self {
        Self {
            prefixes: vec![
                "Course ".to_string(),
                "Module ".to_string(),
                "Section ".to_string(),
            ],
        }
    }
}

impl Levels {
    pub fn prefix(&self, depth: usize) -> Option<&str> {
        self.prefixes.get(depth).map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.prefixes.len()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Notes {
    /// File name suffix marking a transcript.
    pub suffix: String,
}

impl Default for Notes {
    fn default() -> Self {
        Self {
            suffix: ".en.txt".to_string(),
        }
    }
}

impl Config {
    /// Loads the config from the default location, or defaults if there is none.
    pub fn load_default() -> Result<Config, NotesError> {
        let config_path = config_path();
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            tracing::info!("no config at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    pub fn load(config_path: &Path) -> Result<Config, NotesError> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config = Self::parse(&config_content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Config> {
        Ok(toml::from_str(content)?)
    }

    pub fn vault(&self) -> Result<&Path, NotesError> {
        self.paths
            .vault
            .as_deref()
            .ok_or(NotesError::MissingPath("vault"))
    }

    pub fn transcripts(&self) -> Result<&Path, NotesError> {
        self.paths
            .transcripts
            .as_deref()
            .ok_or(NotesError::MissingPath("transcripts"))
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("course-notes/course-notes.toml")
}

pub fn log_path() -> PathBuf {
    let log_file = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR)
        .join("course-notes.log");
    ensure_parent_dir(&log_file);
    log_file
}
