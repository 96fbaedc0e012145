// Line-oriented resource files (dictionary, affix rules, frequency corpus,
// history log).
//
// Every resource is decoded as UTF-8 first. If that fails the bytes are
// reinterpreted as Latin-1 (ISO-8859-1), which maps each byte to the code
// point of the same value and therefore never fails.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::LoadError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// The encoding a resource was finally decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Latin1,
}

/// A decoded text resource.
#[derive(Debug, Clone)]
pub struct TextResource {
    pub path: PathBuf,
    pub text: String,
    pub encoding: Encoding,
}

impl TextResource {
    /// Iterate over `(line_index, trimmed_line)` pairs.
    ///
    /// Line indices are 0-based and count every physical line, including
    /// blank ones, so they can serve as frequency ranks.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.text.lines().enumerate().map(|(i, l)| (i, l.trim()))
    }

    /// Number of raw bytes of decoded text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Decode raw bytes: UTF-8 (optional BOM stripped), else Latin-1.
pub fn decode(bytes: &[u8]) -> (String, Encoding) {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(body) {
        Ok(s) => (s.to_string(), Encoding::Utf8),
        Err(_) => (body.iter().map(|&b| b as char).collect(), Encoding::Latin1),
    }
}

/// Read and decode a resource file.
///
/// A missing file yields [`LoadError::ResourceMissing`]; any other I/O
/// failure yields [`LoadError::Io`]. Decoding itself cannot fail.
pub fn read_text(path: &Path) -> Result<TextResource, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::ResourceMissing(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    let (text, encoding) = decode(&bytes);
    if encoding == Encoding::Latin1 {
        warn!(path = %path.display(), "resource is not valid UTF-8, decoded as Latin-1");
    }
    Ok(TextResource {
        path: path.to_path_buf(),
        text,
        encoding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn decode_utf8() {
        let (text, enc) = decode("Haustür\n".as_bytes());
        assert_eq!(text, "Haustür\n");
        assert_eq!(enc, Encoding::Utf8);
    }

    #[test]
    fn decode_strips_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"Hallo");
        let (text, enc) = decode(&bytes);
        assert_eq!(text, "Hallo");
        assert_eq!(enc, Encoding::Utf8);
    }

    #[test]
    fn decode_falls_back_to_latin1() {
        // "Tür" in ISO-8859-1: 0xFC is not valid UTF-8 on its own
        let bytes = [b'T', 0xFC, b'r'];
        let (text, enc) = decode(&bytes);
        assert_eq!(text, "Tür");
        assert_eq!(enc, Encoding::Latin1);
    }

    #[test]
    fn bom_is_stripped_before_latin1_fallback() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(&[b'T', 0xFC, b'r']);
        let (text, enc) = decode(&bytes);
        assert_eq!(text, "Tür");
        assert_eq!(enc, Encoding::Latin1);
    }

    #[test]
    fn read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_text(&dir.path().join("absent.txt")).unwrap_err();
        assert!(err.is_missing());
    }

    #[test]
    fn read_and_iterate_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "der\r\n\n  die \ndas").unwrap();
        let res = read_text(file.path()).unwrap();
        let lines: Vec<(usize, &str)> = res.lines().collect();
        assert_eq!(lines, vec![(0, "der"), (1, ""), (2, "die"), (3, "das")]);
        assert!(!res.is_empty());
    }

    #[test]
    fn read_latin1_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b'M', 0xFC, b'h', b'e', b'\n']).unwrap();
        let res = read_text(file.path()).unwrap();
        assert_eq!(res.encoding, Encoding::Latin1);
        assert_eq!(res.lines().next(), Some((0, "Mühe")));
    }
}
