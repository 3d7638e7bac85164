use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Patterns enabled out of the box, one regex per line.
///
/// Covers Chinese statute numbering (`第…条`, optionally bolded), dotted and
/// plain outline numbers, and English `Article`/`Section`/`Chapter` headings.
pub const DEFAULT_PATTERNS: &[&str] = &[
    r"^(\**)?第.+条",
    r"^\d+(\.\d+)+\s*",
    r"^\d+\.\s*",
    r"^\d+、\s*",
    r"^Article\s+\d+",
    r"^Section\s+\d+",
    r"^Chapter\s+\d+",
];

pub const DEFAULT_INDENT_SIZE: &str = "2em";

/// Style variable the host sets from [`Config::effective_indent_size`].
pub const INDENT_SIZE_VARIABLE: &str = "--lac-indent-size";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// How decorated paragraphs are indented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentMode {
    #[default]
    First,
    Hanging,
    None,
}

/// How a copied section is serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Visible text only.
    #[default]
    Plain,
    /// Inline markup (emphasis, links, code) kept in markdown syntax.
    Structured,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Folder prefixes a note must live under to be processed. Empty means all notes.
    pub whitelist_folders: Vec<String>,
    /// Newline separated regex patterns, edited as one text block.
    pub regex_patterns: String,
    pub indent_type: IndentMode,
    pub indent_size: String,
    pub output_mode: OutputMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_path: Option<PathBuf>,
    /// Language tag used to pick UI strings, e.g. `en` or `zh-CN`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            whitelist_folders: Vec::new(),
            regex_patterns: DEFAULT_PATTERNS.join("\n"),
            indent_type: IndentMode::default(),
            indent_size: DEFAULT_INDENT_SIZE.to_string(),
            output_mode: OutputMode::default(),
            notes_path: None,
            language: None,
        }
    }
}

impl Config {
    /// Load the config file, filling any missing keys from the defaults.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the notes path
        config.notes_path = config
            .notes_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Like [`Config::load_from_path`] but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        Ok(Self::load_from_path(config_path)?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/paracopy");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// The raw pattern lines, blank lines included.
    pub fn pattern_lines(&self) -> impl Iterator<Item = &str> {
        self.regex_patterns.split('\n')
    }

    /// Append a folder to the whitelist. Returns `false` if it was already present.
    pub fn add_whitelist_folder(&mut self, folder: &str) -> bool {
        let folder = folder.trim();
        if folder.is_empty() || self.whitelist_folders.iter().any(|f| f == folder) {
            return false;
        }
        self.whitelist_folders.push(folder.to_string());
        true
    }

    /// Replace the whitelist from one-folder-per-line text.
    pub fn set_whitelist_from_text(&mut self, text: &str) {
        self.whitelist_folders = text
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
    }

    pub fn whitelist_text(&self) -> String {
        self.whitelist_folders.join("\n")
    }

    /// Indent size with the default substituted for a blank value.
    pub fn effective_indent_size(&self) -> &str {
        let size = self.indent_size.trim();
        if size.is_empty() {
            DEFAULT_INDENT_SIZE
        } else {
            size
        }
    }

    /// Style variables the host should set on its document body.
    pub fn style_variables(&self) -> Vec<(&'static str, String)> {
        vec![(INDENT_SIZE_VARIABLE, self.effective_indent_size().to_string())]
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
