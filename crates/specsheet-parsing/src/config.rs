use thiserror::Error;

use specsheet_core::config_file::ConfigFile;

/// Header keywords that mark a heuristic table as an equipment table.
pub const DEFAULT_TABLE_HEADER_KEYWORDS: &[&str] = &[
    "equipment",
    "model",
    "manufacturer",
    "quantity",
    "type",
    "brand",
    "description",
    "specs",
    "specifications",
    "audio",
    "video",
    "lighting",
];

/// Keywords whose presence anywhere in a document's text flags it as
/// equipment-related in summaries.
pub const DEFAULT_EQUIPMENT_KEYWORDS: &[&str] = &[
    "audio",
    "equipment",
    "lighting",
    "sound",
    "microphone",
    "speaker",
    "projector",
    "screen",
    "mixer",
    "amplifier",
    "led",
    "fixture",
];

/// Minimum number of characters (after trimming) a backend must extract for
/// its result to be accepted.
pub const DEFAULT_MIN_TEXT_CHARS: usize = 100;

pub const DEFAULT_SUPPORTED_EXTENSIONS: &[&str] = &["pdf"];

/// Controls how a list of values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("min_text_chars must be greater than zero")]
    ZeroThreshold,
    #[error("at least one supported file extension is required")]
    NoExtensions,
}

/// Immutable settings shared by the backends and the pipeline.
///
/// Keyword lists are stored lowercased; extensions are stored lowercased and
/// without a leading dot.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub(crate) min_text_chars: usize,
    pub(crate) table_header_keywords: Vec<String>,
    pub(crate) equipment_keywords: Vec<String>,
    pub(crate) supported_extensions: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_text_chars: DEFAULT_MIN_TEXT_CHARS,
            table_header_keywords: to_owned_list(DEFAULT_TABLE_HEADER_KEYWORDS),
            equipment_keywords: to_owned_list(DEFAULT_EQUIPMENT_KEYWORDS),
            supported_extensions: to_owned_list(DEFAULT_SUPPORTED_EXTENSIONS),
        }
    }
}

impl PipelineConfig {
    pub fn min_text_chars(&self) -> usize {
        self.min_text_chars
    }

    pub fn table_header_keywords(&self) -> &[String] {
        &self.table_header_keywords
    }

    pub fn equipment_keywords(&self) -> &[String] {
        &self.equipment_keywords
    }

    pub fn supported_extensions(&self) -> &[String] {
        &self.supported_extensions
    }

    /// Whether `ext` (with or without leading dot, any case) is supported.
    pub fn supports_extension(&self, ext: &str) -> bool {
        let ext = normalize_extension(ext);
        self.supported_extensions.iter().any(|e| *e == ext)
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    min_text_chars: Option<usize>,
    table_header_keywords: ListOverride<String>,
    equipment_keywords: ListOverride<String>,
    supported_extensions: Option<Vec<String>>,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an on-disk config. List fields follow the
    /// replace-then-extend convention of [`KeywordsConfig`].
    ///
    /// [`KeywordsConfig`]: specsheet_core::config_file::KeywordsConfig
    pub fn from_config_file(file: &ConfigFile) -> Self {
        let mut builder = Self::new();

        if let Some(ext) = &file.extraction {
            builder.min_text_chars = ext.min_text_chars;
            builder.supported_extensions = ext.supported_extensions.clone();
        }

        if let Some(kw) = &file.keywords {
            builder.table_header_keywords =
                list_from_file(kw.table_header.clone(), kw.extra_table_header.clone());
            builder.equipment_keywords =
                list_from_file(kw.equipment.clone(), kw.extra_equipment.clone());
        }

        builder
    }

    // ── Scalars ──

    pub fn min_text_chars(mut self, n: usize) -> Self {
        self.min_text_chars = Some(n);
        self
    }

    pub fn supported_extensions(mut self, extensions: Vec<String>) -> Self {
        self.supported_extensions = Some(extensions);
        self
    }

    // ── Table header keywords ──

    pub fn set_table_header_keywords(mut self, keywords: Vec<String>) -> Self {
        self.table_header_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_table_header_keyword(mut self, keyword: String) -> Self {
        match &mut self.table_header_keywords {
            ListOverride::Extend(v) | ListOverride::Replace(v) => v.push(keyword),
            ListOverride::Default => {
                self.table_header_keywords = ListOverride::Extend(vec![keyword])
            }
        }
        self
    }

    // ── Equipment keywords ──

    pub fn set_equipment_keywords(mut self, keywords: Vec<String>) -> Self {
        self.equipment_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_equipment_keyword(mut self, keyword: String) -> Self {
        match &mut self.equipment_keywords {
            ListOverride::Extend(v) | ListOverride::Replace(v) => v.push(keyword),
            ListOverride::Default => self.equipment_keywords = ListOverride::Extend(vec![keyword]),
        }
        self
    }

    /// Resolve overrides and validate into a [`PipelineConfig`].
    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let min_text_chars = self.min_text_chars.unwrap_or(DEFAULT_MIN_TEXT_CHARS);
        if min_text_chars == 0 {
            return Err(ConfigError::ZeroThreshold);
        }

        let supported_extensions: Vec<String> = match self.supported_extensions {
            Some(v) => v
                .iter()
                .map(|e| normalize_extension(e))
                .filter(|e| !e.is_empty())
                .collect(),
            None => to_owned_list(DEFAULT_SUPPORTED_EXTENSIONS),
        };
        if supported_extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }

        let lowercase = |v: Vec<String>| -> Vec<String> {
            v.into_iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect()
        };

        Ok(PipelineConfig {
            min_text_chars,
            table_header_keywords: lowercase(
                self.table_header_keywords
                    .resolve(&to_owned_list(DEFAULT_TABLE_HEADER_KEYWORDS)),
            ),
            equipment_keywords: lowercase(
                self.equipment_keywords
                    .resolve(&to_owned_list(DEFAULT_EQUIPMENT_KEYWORDS)),
            ),
            supported_extensions,
        })
    }
}

fn to_owned_list(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

fn list_from_file(replace: Option<Vec<String>>, extend: Option<Vec<String>>) -> ListOverride<String> {
    match (replace, extend) {
        (None, None) => ListOverride::Default,
        (None, Some(extra)) => ListOverride::Extend(extra),
        (Some(mut base), extra) => {
            base.extend(extra.unwrap_or_default());
            ListOverride::Replace(base)
        }
    }
}
