//! Line-level access to one corpus file.
//!
//! A line is a maximal run of text ending in `\n` (or `\r\n`), or the
//! unterminated tail of the file. Every write re-renders the file from its
//! current on-disk content, so untouched lines keep their exact bytes and
//! line endings. Writes go through a temp file in the same directory that is
//! renamed over the original.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest as _, Sha256};
use tempfile::NamedTempFile;

use crate::error::CorpusError;

type Result<T> = std::result::Result<T, CorpusError>;

/// SHA-256 of a corpus file's bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileDigest([u8; 32]);

impl FileDigest {
    pub fn compute(data: &[u8]) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&Sha256::digest(data));
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileDigest({})", &self.to_hex()[..12])
    }
}

/// One UTF-8, line-oriented corpus file.
///
/// Mutating methods take `&mut self`, so at most one writer (and one
/// [`MaskingSession`](super::MaskingSession)) can hold a given handle.
#[derive(Debug)]
pub struct CorpusFile {
    path: PathBuf,
}

impl CorpusFile {
    /// Open an existing file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let meta = fs::metadata(&path).map_err(|e| CorpusError::io(&path, e))?;
        if !meta.is_file() {
            return Err(CorpusError::io(
                &path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|e| CorpusError::io(&self.path, e))
    }

    pub fn read_to_string(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| CorpusError::io(&self.path, e))
    }

    pub fn digest(&self) -> Result<FileDigest> {
        Ok(FileDigest::compute(&self.read_bytes()?))
    }

    pub fn line_count(&self) -> Result<usize> {
        Ok(raw_lines(&self.read_to_string()?).len())
    }

    /// All lines with their terminators stripped.
    pub fn read_lines(&self) -> Result<Vec<String>> {
        let text = self.read_to_string()?;
        Ok(raw_lines(&text)
            .into_iter()
            .map(|raw| split_ending(raw).0.to_string())
            .collect())
    }

    /// Line `index` without its terminator.
    pub fn read_line(&self, index: usize) -> Result<String> {
        let raw = self.read_raw_line(index)?;
        Ok(split_ending(&raw).0.to_string())
    }

    /// Line `index` exactly as stored, terminator included.
    pub fn read_raw_line(&self, index: usize) -> Result<String> {
        let text = self.read_to_string()?;
        let lines = raw_lines(&text);
        lines
            .get(index)
            .map(|raw| raw.to_string())
            .ok_or_else(|| self.out_of_range(index, lines.len()))
    }

    /// Replace the content of line `index`, keeping its terminator.
    pub fn write_line(&mut self, index: usize, text: &str) -> Result<()> {
        if text.contains('\n') {
            return Err(CorpusError::MultiLineContent { index });
        }
        self.rewrite(index, |raw| {
            let (_, ending) = split_ending(raw);
            format!("{text}{ending}")
        })
    }

    /// Replace line `index` with `raw`, terminator included.
    ///
    /// `raw` must hold exactly one line: a `\n` may only appear as its last
    /// character, and every line but the last must be terminated.
    pub fn write_raw_line(&mut self, index: usize, raw: &str) -> Result<()> {
        let body = raw.strip_suffix('\n').unwrap_or(raw);
        if raw.is_empty() || body.contains('\n') {
            return Err(CorpusError::MultiLineContent { index });
        }
        let line_count = self.line_count()?;
        if index + 1 < line_count && !raw.ends_with('\n') {
            return Err(CorpusError::UnterminatedLine { index });
        }
        self.rewrite(index, |_| raw.to_string())
    }

    /// Replace the whole file, recreating it if it no longer exists.
    ///
    /// Existing permissions are kept; a recreated file gets the temp file's.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let io_err = |e| CorpusError::io(&self.path, e);

        let perms = match fs::metadata(&self.path) {
            Ok(meta) => Some(meta.permissions()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(io_err(e)),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(data).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        if let Some(perms) = perms {
            tmp.as_file().set_permissions(perms).map_err(io_err)?;
        }
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    fn rewrite(&mut self, index: usize, replace: impl FnOnce(&str) -> String) -> Result<()> {
        let text = self.read_to_string()?;
        let lines = raw_lines(&text);
        let Some(current) = lines.get(index) else {
            return Err(self.out_of_range(index, lines.len()));
        };
        let replacement = replace(current);

        let mut out = String::with_capacity(text.len() + replacement.len());
        for (i, raw) in lines.iter().enumerate() {
            if i == index {
                out.push_str(&replacement);
            } else {
                out.push_str(raw);
            }
        }
        self.write_bytes(out.as_bytes())
    }

    fn out_of_range(&self, index: usize, line_count: usize) -> CorpusError {
        CorpusError::LineOutOfRange {
            path: self.path.clone(),
            index,
            line_count,
        }
    }
}

/// Split into lines, each keeping its terminator.
pub(crate) fn raw_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// `(content, terminator)` where terminator is `"\r\n"`, `"\n"` or `""`.
pub(crate) fn split_ending(raw: &str) -> (&str, &str) {
    if let Some(content) = raw.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = raw.strip_suffix('\n') {
        (content, "\n")
    } else {
        (raw, "")
    }
}
