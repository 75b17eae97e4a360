//! Corpus discovery - list the WAV files of a dataset directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::NoisemixError;

/// List WAV files in `dir` at the given depth: 1 means `dir/*.wav`, 2 means
/// `dir/*/*.wav` (the usual speaker-subdirectory layout). Any other depth is
/// `UnsupportedDepth`.
///
/// Results are sorted lexicographically so that a fixed seed enumerates
/// clean/noise pairs in the same order on every run.
pub fn list_files(dir: &Path, depth: usize) -> Result<Vec<PathBuf>, NoisemixError> {
    let mut wavs = Vec::new();
    match depth {
        1 => collect_wavs(dir, &mut wavs)?,
        2 => {
            for entry in fs::read_dir(dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    collect_wavs(&path, &mut wavs)?;
                }
            }
        }
        other => return Err(NoisemixError::UnsupportedDepth(other)),
    }
    wavs.sort();
    Ok(wavs)
}

fn collect_wavs(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), NoisemixError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "wav") {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.wav"));
        touch(&dir.path().join("a.wav"));
        touch(&dir.path().join("notes.txt"));
        fs::create_dir(dir.path().join("spk1")).unwrap();
        touch(&dir.path().join("spk1").join("utt1.wav"));
        touch(&dir.path().join("spk1").join("utt2.wav"));
        dir
    }

    #[test]
    fn test_depth_one_lists_top_level_wavs_sorted() {
        let dir = fixture();
        let files = list_files(dir.path(), 1).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.wav", "b.wav"]);
    }

    #[test]
    fn test_depth_two_lists_subdirectory_wavs() {
        let dir = fixture();
        let files = list_files(dir.path(), 2).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["utt1.wav", "utt2.wav"]);
    }

    #[test]
    fn test_other_depths_rejected() {
        let dir = fixture();
        let err = list_files(dir.path(), 3).unwrap_err();
        assert!(matches!(err, NoisemixError::UnsupportedDepth(3)));
        let err = list_files(dir.path(), 0).unwrap_err();
        assert!(matches!(err, NoisemixError::UnsupportedDepth(0)));
    }
}
