//! Tolerant source file reading
//!
//! Source files are read whole and decoded as UTF-8. Invalid byte sequences
//! never fail a read; they are dropped or replaced depending on the strategy.

use std::fs;
use std::io::Read;
use std::path::Path;

/// Strategy for handling non-UTF-8 content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodingStrategy {
    /// Silently drop invalid byte sequences
    #[default]
    Drop,
    /// Replace invalid byte sequences with U+FFFD
    Replace,
}

impl std::str::FromStr for EncodingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drop" => Ok(EncodingStrategy::Drop),
            "replace" => Ok(EncodingStrategy::Replace),
            _ => Err(format!("Unknown encoding strategy: {}", s)),
        }
    }
}

/// Decoded content of a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    pub content: String,
    /// Whether any invalid UTF-8 had to be dropped or replaced
    pub lossy: bool,
}

/// Read a file fully and decode it with the given strategy
pub fn read_source(path: &Path, strategy: EncodingStrategy) -> std::io::Result<SourceText> {
    let mut file = fs::File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(decode(bytes, strategy))
}

/// Decode bytes as UTF-8, tolerating invalid sequences
pub fn decode(bytes: Vec<u8>, strategy: EncodingStrategy) -> SourceText {
    match String::from_utf8(bytes) {
        Ok(content) => SourceText {
            content,
            lossy: false,
        },
        Err(e) => {
            let bytes = e.into_bytes();
            let content = match strategy {
                EncodingStrategy::Replace => String::from_utf8_lossy(&bytes).into_owned(),
                EncodingStrategy::Drop => {
                    let mut out = String::with_capacity(bytes.len());
                    for chunk in bytes.utf8_chunks() {
                        out.push_str(chunk.valid());
                    }
                    out
                }
            };
            SourceText {
                content,
                lossy: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_read_source_utf8() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("a.js");
        fs::write(&file_path, "console.log(1);").unwrap();

        let text = read_source(&file_path, EncodingStrategy::Drop).unwrap();
        assert_eq!(text.content, "console.log(1);");
        assert!(!text.lossy);
    }

    #[test]
    fn test_read_source_drops_invalid_bytes() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("bad.css");

        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(&[0xFF, 0xFE, b'b', b'o', b'd', b'y', 0xC3])
            .unwrap();

        let text = read_source(&file_path, EncodingStrategy::Drop).unwrap();
        assert_eq!(text.content, "body");
        assert!(text.lossy);
    }

    #[test]
    fn test_read_source_replaces_invalid_bytes() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("bad.css");
        fs::write(&file_path, [b'a', 0xFF, b'b']).unwrap();

        let text = read_source(&file_path, EncodingStrategy::Replace).unwrap();
        assert_eq!(text.content, "a\u{FFFD}b");
        assert!(text.lossy);
    }

    #[test]
    fn test_decode_keeps_multibyte_chars() {
        let text = decode("héllo 你好".as_bytes().to_vec(), EncodingStrategy::Drop);
        assert_eq!(text.content, "héllo 你好");
        assert!(!text.lossy);
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = read_source(Path::new("/nonexistent/file.js"), EncodingStrategy::Drop);
        assert!(result.is_err());
    }

    #[test]
    fn test_encoding_strategy_from_str() {
        assert_eq!("drop".parse::<EncodingStrategy>(), Ok(EncodingStrategy::Drop));
        assert_eq!("REPLACE".parse::<EncodingStrategy>(), Ok(EncodingStrategy::Replace));
        assert!("utf16".parse::<EncodingStrategy>().is_err());
        assert!("lossy".parse::<EncodingStrategy>().is_err());
        assert!("ignore".parse::<EncodingStrategy>().is_err());
        assert_eq!(EncodingStrategy::default(), EncodingStrategy::Drop);
    }
}
