//! Scoped blanking of a single target line.
//!
//! [`MaskingSession::begin`] blanks one line and [`MaskingSession::end`]
//! puts it back. If the session is dropped without `end` (early return,
//! panic, cancelled future) the same restoration runs from `Drop`. Either
//! way the file is checked against the digest taken before masking, and the
//! full pre-mask snapshot is rewritten if the line-level restore was not
//! enough to make it byte-identical.

use std::path::Path;

use tracing::{error, warn};

use super::file::{split_ending, CorpusFile, FileDigest};
use crate::error::{BenchError, CorpusError, Result};
use crate::metrics::METRICS;

/// Blank line `index`, keeping the line count. Returns the original line
/// exactly as stored, terminator included.
///
/// An unterminated last line is blanked to `"\n"` so it stays a line.
pub fn mask_line(file: &mut CorpusFile, index: usize) -> std::result::Result<String, CorpusError> {
    let original = file.read_raw_line(index)?;
    let blank = match split_ending(&original).1 {
        "" => "\n",
        ending => ending,
    };
    file.write_raw_line(index, blank)?;
    Ok(original)
}

/// Write `original` (as returned by [`mask_line`]) back to line `index`.
pub fn restore_line(
    file: &mut CorpusFile,
    index: usize,
    original: &str,
) -> std::result::Result<(), CorpusError> {
    file.write_raw_line(index, original)
}

/// An open mask on one line of a target file.
///
/// Holds the file mutably for its whole lifetime, so only one session per
/// file can be open at a time.
pub struct MaskingSession<'a> {
    file: &'a mut CorpusFile,
    index: usize,
    original: String,
    snapshot: Vec<u8>,
    digest: FileDigest,
    finished: bool,
}

impl<'a> MaskingSession<'a> {
    /// Snapshot the file, then blank line `index`.
    pub fn begin(file: &'a mut CorpusFile, index: usize) -> Result<Self> {
        let snapshot = file.read_bytes()?;
        let digest = FileDigest::compute(&snapshot);
        let original = mask_line(file, index)?;
        METRICS.inc_lines_masked();

        Ok(Self {
            file,
            index,
            original,
            snapshot,
            digest,
            finished: false,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// The masked line as it was before `begin`, terminator included.
    pub fn original_content(&self) -> &str {
        &self.original
    }

    /// Restore the line and verify the file matches its pre-mask digest.
    ///
    /// An error here means the corpus could not be returned to its original
    /// state and must be treated as fatal by the caller.
    pub fn end(mut self) -> Result<()> {
        self.finished = true;
        self.restore()
    }

    fn restore(&mut self) -> Result<()> {
        let line_restore = restore_line(self.file, self.index, &self.original)
            .and_then(|()| self.file.digest());
        let error = match line_restore {
            Ok(digest) if digest == self.digest => return Ok(()),
            Ok(_) => None,
            Err(e) => Some(e),
        };

        warn!(
            path = %self.file.path().display(),
            index = self.index,
            error = ?error,
            "line restore did not reproduce the original file, rewriting snapshot"
        );
        self.file.write_bytes(&self.snapshot)?;

        if self.file.digest()? != self.digest {
            return Err(BenchError::RestoreMismatch {
                path: self.file.path().to_path_buf(),
                index: self.index,
            });
        }
        Ok(())
    }
}

impl Drop for MaskingSession<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        if let Err(e) = self.restore() {
            error!(
                path = %self.file.path().display(),
                index = self.index,
                error = %e,
                "failed to restore masked line"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn corpus_with(content: &str) -> (tempfile::TempDir, CorpusFile) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tgt.txt");
        fs::write(&path, content).unwrap();
        let file = CorpusFile::open(&path).unwrap();
        (dir, file)
    }

    #[test]
    fn test_mask_line_blanks_and_returns_raw_original() {
        let (_d, mut file) = corpus_with("one\r\ntwo\nthree");
        let original = mask_line(&mut file, 0).unwrap();
        assert_eq!(original, "one\r\n");
        assert_eq!(file.read_to_string().unwrap(), "\r\ntwo\nthree");
        assert_eq!(file.line_count().unwrap(), 3);
    }

    #[test]
    fn test_mask_unterminated_last_line_keeps_count() {
        let (_d, mut file) = corpus_with("one\nlast");
        let original = mask_line(&mut file, 1).unwrap();
        assert_eq!(original, "last");
        assert_eq!(file.line_count().unwrap(), 2);
        assert_eq!(file.read_line(1).unwrap(), "");

        restore_line(&mut file, 1, &original).unwrap();
        assert_eq!(file.read_to_string().unwrap(), "one\nlast");
    }

    #[test]
    fn test_session_end_restores_bytes() {
        let content = "α line\n\nβ line\r\n";
        let (_d, mut file) = corpus_with(content);
        let session = MaskingSession::begin(&mut file, 2).unwrap();
        assert_eq!(session.original_content(), "β line\r\n");
        session.end().unwrap();
        assert_eq!(file.read_to_string().unwrap(), content);
    }

    #[test]
    fn test_session_drop_restores_bytes() {
        let content = "a\nb\nc\n";
        let (_d, mut file) = corpus_with(content);
        {
            let _session = MaskingSession::begin(&mut file, 1).unwrap();
        }
        assert_eq!(file.read_to_string().unwrap(), content);
    }

    #[test]
    fn test_session_begin_out_of_range_leaves_file_alone() {
        let content = "a\nb\n";
        let (_d, mut file) = corpus_with(content);
        assert!(MaskingSession::begin(&mut file, 5).is_err());
        assert_eq!(file.read_to_string().unwrap(), content);
    }
}
