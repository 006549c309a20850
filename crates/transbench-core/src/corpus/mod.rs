//! Aligned bilingual corpora on disk.
//!
//! A language directory holds two line-aligned text files: the shared
//! source-language file (same name in every directory) and one
//! target-language file. Line `i` of each file is the same verse; a blank
//! line marks an untranslated verse.
//!
//! # Modules
//!
//! - [`file`]: `CorpusFile`, line-level reads and atomic rewrites
//! - [`mask`]: `MaskingSession`, scoped blanking with guaranteed restore
//! - [`select`]: `ExampleSelector`, candidate filtering and sampling

pub mod file;
pub mod mask;
pub mod select;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CorpusError;

pub use file::{CorpusFile, FileDigest};
pub use mask::{mask_line, restore_line, MaskingSession};
pub use select::{Example, ExampleSelector};

/// Source and target files for one language pair.
#[derive(Debug)]
pub struct AlignedCorpus {
    /// Language code, taken from the directory name.
    pub code: String,
    /// Directory the agent is run in.
    pub dir: PathBuf,
    pub source: CorpusFile,
    pub target: CorpusFile,
}

impl AlignedCorpus {
    /// Open `source_file` and the first other `*.txt` file (by name) in `dir`.
    pub fn discover(dir: impl AsRef<Path>, source_file: &str) -> Result<Self, CorpusError> {
        let dir = dir.as_ref();
        let source_path = dir.join(source_file);
        if !source_path.is_file() {
            return Err(CorpusError::MissingSourceFile {
                dir: dir.to_path_buf(),
                name: source_file.to_string(),
            });
        }

        let target_path = text_files(dir)?
            .into_iter()
            .find(|p| p.file_name().map_or(true, |n| n != source_file))
            .ok_or_else(|| CorpusError::MissingTargetFile {
                dir: dir.to_path_buf(),
            })?;

        let code = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            code,
            dir: dir.to_path_buf(),
            source: CorpusFile::open(source_path)?,
            target: CorpusFile::open(target_path)?,
        })
    }
}

/// Every immediate subdirectory of `root` (sorted by name) that holds a
/// complete language pair. Incomplete directories are skipped.
pub fn discover_languages(
    root: impl AsRef<Path>,
    source_file: &str,
) -> Result<Vec<AlignedCorpus>, CorpusError> {
    let root = root.as_ref();
    let mut dirs: Vec<PathBuf> = fs::read_dir(root)
        .map_err(|e| CorpusError::io(root, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();

    let mut corpora = Vec::new();
    for dir in dirs {
        match AlignedCorpus::discover(&dir, source_file) {
            Ok(corpus) => corpora.push(corpus),
            Err(e @ (CorpusError::MissingSourceFile { .. } | CorpusError::MissingTargetFile { .. })) => {
                debug!(dir = %dir.display(), reason = %e, "skipping directory");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(corpora)
}

fn text_files(dir: &Path) -> Result<Vec<PathBuf>, CorpusError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| CorpusError::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();
    Ok(files)
}
