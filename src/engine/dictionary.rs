//! Dictionary file loading shared by the jieba-backed adapters

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use jieba_rs::Jieba;
use tracing::info;

use crate::core::error::{Result, SegError};

/// Read a vocabulary file into memory, rejecting anything that is not UTF-8
pub(crate) fn read_vocab(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| SegError::VocabLoad {
        message: format!("Failed to open vocabulary file: {}", e),
        path: path.to_path_buf(),
    })?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| SegError::VocabLoad {
            message: format!("Failed to read vocabulary file: {}", e),
            path: path.to_path_buf(),
        })?;
    Ok(content)
}

/// Parse vocabulary `content` into a throwaway engine.
///
/// Succeeds only when every entry would be accepted, so a later merge of the
/// same content cannot stop partway.
pub(crate) fn validate_vocab(content: &str, path: &Path) -> Result<()> {
    merge_vocab(&mut Jieba::empty(), content, path)
}

/// Merge vocabulary `content` (entries `word [freq] [tag]`, one per line) into `jieba`
pub(crate) fn merge_vocab(jieba: &mut Jieba, content: &str, path: &Path) -> Result<()> {
    jieba
        .load_dict(&mut Cursor::new(content.as_bytes()))
        .map_err(|e| SegError::VocabLoad {
            message: format!("Failed to parse vocabulary file: {}", e),
            path: path.to_path_buf(),
        })
}

/// Load a user vocabulary file into an engine owned by the caller
pub(crate) fn load_vocab(jieba: &mut Jieba, path: &Path) -> Result<()> {
    let content = read_vocab(path)?;
    merge_vocab(jieba, &content, path)?;
    info!("Loaded user vocabulary: {}", path.display());
    Ok(())
}

/// Build an engine whose main dictionary is read from `path`
pub(crate) fn load_main_dict(path: &Path, component: &str) -> Result<Jieba> {
    let file = File::open(path).map_err(|e| SegError::Construction {
        message: format!("Failed to open model dictionary: {}", e),
        component: component.to_string(),
        path: Some(path.to_path_buf()),
    })?;

    let jieba = Jieba::with_dict(&mut BufReader::new(file)).map_err(|e| SegError::Construction {
        message: format!("Invalid model dictionary: {}", e),
        component: component.to_string(),
        path: Some(path.to_path_buf()),
    })?;

    info!("Loaded model dictionary: {}", path.display());
    Ok(jieba)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_vocab_rejects_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xff\xfe\xfd 10 n\n").unwrap();
        let err = read_vocab(file.path()).unwrap_err();
        assert!(matches!(err, SegError::VocabLoad { .. }));
    }

    #[test]
    fn test_validate_vocab() {
        let path = Path::new("vocab.txt");
        assert!(validate_vocab("云计算 100 n\n大数据 50\n", path).is_ok());
        let err = validate_vocab("云计算 100 n\n坏词 notanumber n\n", path).unwrap_err();
        assert!(matches!(err, SegError::VocabLoad { .. }));
    }
}
