//! Localization loading from files and byte blobs.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{Catalog, LocalizationTable};
use crate::error::I18nError;
use crate::locale::Locale;

/// Localization file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Yaml,
    Toml,
    Json,
}

impl Format {
    /// Formats in lookup priority order.
    pub const ALL: [Format; 3] = [Format::Yaml, Format::Toml, Format::Json];

    /// File extensions mapped to this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Yaml => &["yaml", "yml"],
            Self::Toml => &["toml"],
            Self::Json => &["json"],
        }
    }

    /// Format for a file extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| {
            format
                .extensions()
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext))
        })
    }

    /// Format implied by a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Lowercase format name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }

    /// Decode one locale's `key -> {one, other}` mapping.
    ///
    /// `origin` names the source (a path or a locale) in error messages.
    pub fn decode(&self, bytes: &[u8], origin: &str) -> Result<Catalog, I18nError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Catalog::new());
        }

        let decode_error = |message: String| I18nError::Decode {
            origin: origin.to_string(),
            format: self.name(),
            message,
        };

        match self {
            Self::Yaml => serde_yaml::from_slice(bytes).map_err(|e| decode_error(e.to_string())),
            Self::Json => serde_json::from_slice(bytes).map_err(|e| decode_error(e.to_string())),
            Self::Toml => {
                let text = std::str::from_utf8(bytes).map_err(|e| decode_error(e.to_string()))?;
                toml::from_str(text).map_err(|e| decode_error(e.to_string()))
            }
        }
    }

    fn priority(&self) -> usize {
        match self {
            Self::Yaml => 0,
            Self::Toml => 1,
            Self::Json => 2,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s.trim_start_matches('.'))
            .ok_or_else(|| I18nError::UnsupportedFormat(s.to_string()))
    }
}

/// Load a single localization file, choosing the decoder by extension.
pub fn load_file(path: &Path) -> Result<Catalog, I18nError> {
    let format = Format::from_path(path)
        .ok_or_else(|| I18nError::UnsupportedFormat(path.display().to_string()))?;
    let bytes = fs::read(path)?;
    format.decode(&bytes, &path.display().to_string())
}

/// Load one file per locale from `dir`.
///
/// A file matches a locale when its stem names the same locale (case and
/// `-`/`_` insensitive) and its extension is a known format. Subdirectories
/// are not searched. When several formats exist for one locale the first in
/// [`Format::ALL`] order wins. Every locale must have a file.
pub fn load_dir(dir: &Path, locales: &[Locale]) -> Result<LocalizationTable, I18nError> {
    let files = scan_dir(dir)?;
    let mut table = LocalizationTable::new();

    for locale in locales {
        let code = locale.code();
        let path = files
            .iter()
            .filter(|file| file.code == code)
            .min_by(|a, b| {
                a.format
                    .priority()
                    .cmp(&b.format.priority())
                    .then_with(|| a.path.cmp(&b.path))
            })
            .map(|file| file.path.clone())
            .ok_or_else(|| I18nError::MissingFile {
                locale: code.clone(),
                dir: dir.to_path_buf(),
            })?;

        let catalog = load_file(&path)?;
        debug!(locale = %code, path = %path.display(), entries = catalog.len(), "loaded localization file");
        table.insert(locale, catalog);
    }

    info!(dir = %dir.display(), locales = table.len(), "localizations loaded");
    Ok(table)
}

struct LocaleFile {
    code: String,
    format: Format,
    path: PathBuf,
}

fn scan_dir(dir: &Path) -> Result<Vec<LocaleFile>, I18nError> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path();
        let Some(format) = Format::from_path(&path) else {
            continue;
        };
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Ok(locale) = Locale::parse(stem) else {
            continue;
        };

        files.push(LocaleFile {
            code: locale.code(),
            format,
            path,
        });
    }

    Ok(files)
}

impl LocalizationTable {
    /// Build a table from raw encoded blobs, one per locale.
    pub fn from_bytes<L, B>(format: Format, blobs: &HashMap<L, B>) -> Result<Self, I18nError>
    where
        L: AsRef<str>,
        B: AsRef<[u8]>,
    {
        let mut table = Self::new();
        for (locale, bytes) in blobs {
            let locale = Locale::parse(locale.as_ref())?;
            let catalog = format.decode(bytes.as_ref(), &locale.code())?;
            table.insert(&locale, catalog);
        }
        info!(format = %format, locales = table.len(), "localizations decoded from bytes");
        Ok(table)
    }
}
