use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub extraction: Option<ExtractionConfig>,
    pub keywords: Option<KeywordsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Minimum stripped text length for a backend result to be accepted.
    pub min_text_chars: Option<usize>,
    /// File extensions (without the dot) the pipeline attempts.
    pub supported_extensions: Option<Vec<String>>,
}

/// Keyword lists. `table_header`/`equipment` replace the built-in lists,
/// the `extra_*` variants extend them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordsConfig {
    pub table_header: Option<Vec<String>>,
    pub extra_table_header: Option<Vec<String>>,
    pub equipment: Option<Vec<String>>,
    pub extra_equipment: Option<Vec<String>>,
}

/// Platform config directory path: `<config_dir>/specsheet/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("specsheet").join("config.toml"))
}

/// Load config by cascading CWD `.specsheet.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".specsheet.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_ext = base.extraction.unwrap_or_default();
    let over_ext = overlay.extraction.unwrap_or_default();
    let base_kw = base.keywords.unwrap_or_default();
    let over_kw = overlay.keywords.unwrap_or_default();

    ConfigFile {
        extraction: Some(ExtractionConfig {
            min_text_chars: over_ext.min_text_chars.or(base_ext.min_text_chars),
            supported_extensions: over_ext
                .supported_extensions
                .or(base_ext.supported_extensions),
        }),
        keywords: Some(KeywordsConfig {
            table_header: over_kw.table_header.or(base_kw.table_header),
            extra_table_header: over_kw.extra_table_header.or(base_kw.extra_table_header),
            equipment: over_kw.equipment.or(base_kw.equipment),
            extra_equipment: over_kw.extra_equipment.or(base_kw.extra_equipment),
        }),
    }
}
