//! Traditional-to-simplified script conversion
//!
//! Conversion is table driven. Tables use the OpenCC dictionary layout
//! (`TSCharacters.txt`, `TSPhrases.txt`): one entry per line, the source
//! form, a tab, then one or more space separated targets of which the first
//! is used. Files ending in `.zst` are decompressed while loading.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{debug, info, warn};
use zstd::stream::read::Decoder;

use crate::core::error::{Result, SegError};

/// Environment variable naming the default conversion table
pub const T2S_DICT_ENV: &str = "HANSEG_T2S_DICT";

/// A script converter capability that may or may not be present at runtime
pub trait ScriptConverter: Send + Sync {
    /// Convert traditional text to simplified
    fn convert(&self, text: &str) -> String;
}

/// Mapping-table converter using forward maximum matching
#[derive(Debug, Clone, Default)]
pub struct TableConverter {
    table: HashMap<String, String>,
    /// Longest key, in chars
    max_key_len: usize,
}

impl TableConverter {
    /// Create an empty converter
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a converter from explicit pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut converter = Self::new();
        for (from, to) in pairs {
            converter.insert(from.into(), to.into());
        }
        converter
    }

    /// Load a table file, or every table file in a directory
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut converter = Self::new();

        if path.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(path)
                .map_err(|e| SegError::Io {
                    message: format!("Failed to read conversion table directory: {}", e),
                    path: Some(path.to_path_buf()),
                })?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| is_table_file(p))
                .collect();
            files.sort();

            if files.is_empty() {
                return Err(SegError::Config {
                    message: "No conversion tables found in directory".to_string(),
                    path: Some(path.to_path_buf()),
                });
            }
            for file in &files {
                converter.load_file(file)?;
            }
        } else {
            converter.load_file(path)?;
        }

        info!(
            "Loaded {} conversion entries from {}",
            converter.len(),
            path.display()
        );
        Ok(converter)
    }

    /// Merge entries from a single table file
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SegError::Io {
            message: format!("Failed to open conversion table: {}", e),
            path: Some(path.to_path_buf()),
        })?;

        let is_zstd = path.extension().map_or(false, |ext| ext == "zst");
        let reader: Box<dyn Read> = if is_zstd {
            Box::new(Decoder::new(file).map_err(|e| SegError::Io {
                message: format!("Failed to create zstd decoder: {}", e),
                path: Some(path.to_path_buf()),
            })?)
        } else {
            Box::new(file)
        };

        let added = self.load_reader(BufReader::new(reader)).map_err(|e| match e {
            SegError::Io { message, .. } => SegError::Io {
                message,
                path: Some(path.to_path_buf()),
            },
            other => other,
        })?;
        debug!("{} entries read from {}", added, path.display());
        Ok(())
    }

    /// Merge entries from any buffered reader, returning how many were added
    pub fn load_reader<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        let mut added = 0;
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut columns = line.splitn(2, '\t');
            let source = columns.next().unwrap_or_default().trim();
            let target = columns
                .next()
                .and_then(|targets| targets.split_whitespace().next());

            match target {
                Some(target) if !source.is_empty() => {
                    self.insert(source.to_string(), target.to_string());
                    added += 1;
                }
                _ => {}
            }
        }
        Ok(added)
    }

    fn insert(&mut self, from: String, to: String) {
        self.max_key_len = self.max_key_len.max(from.chars().count());
        self.table.insert(from, to);
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl ScriptConverter for TableConverter {
    fn convert(&self, text: &str) -> String {
        if self.table.is_empty() {
            return text.to_string();
        }

        // Byte offset of every char boundary, including the end
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let n_chars = bounds.len() - 1;

        let mut result = String::with_capacity(text.len());
        let mut i = 0;
        while i < n_chars {
            let longest = self.max_key_len.min(n_chars - i);
            let mut matched = false;

            for len in (1..=longest).rev() {
                let candidate = &text[bounds[i]..bounds[i + len]];
                if let Some(target) = self.table.get(candidate) {
                    result.push_str(target);
                    i += len;
                    matched = true;
                    break;
                }
            }

            if !matched {
                result.push_str(&text[bounds[i]..bounds[i + 1]]);
                i += 1;
            }
        }
        result
    }
}

fn is_table_file(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    path.is_file() && (name.ends_with(".txt") || name.ends_with(".txt.zst"))
}

static DEFAULT_CONVERTER: Lazy<Option<Arc<dyn ScriptConverter>>> = Lazy::new(|| {
    let path = std::env::var_os(T2S_DICT_ENV)?;
    match TableConverter::load(&path) {
        Ok(converter) => Some(Arc::new(converter) as Arc<dyn ScriptConverter>),
        Err(e) => {
            warn!("Traditional-to-simplified conversion disabled: {}", e);
            None
        }
    }
});

/// Process-wide converter loaded from `HANSEG_T2S_DICT`, if any
pub fn default_converter() -> Option<Arc<dyn ScriptConverter>> {
    DEFAULT_CONVERTER.clone()
}
