//! Output file helpers.

use std::io;
use std::path::{Path, PathBuf};

/// Highest numeric suffix probed before giving up on finding a free name.
const MAX_FILE_INDEX: u32 = 1000;

/// Creates `dir` and its parents if missing.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dir)
}

/// First `<dir>/<prefix><N>.<ext>` that does not exist yet, counting from 0.
///
/// When every index up to `MAX_FILE_INDEX` is taken, index 0 is returned and
/// will be overwritten.
pub fn next_free_path(dir: &Path, prefix: &str, ext: &str) -> io::Result<PathBuf> {
    for i in 0..MAX_FILE_INDEX {
        let path = dir.join(format!("{prefix}{i}.{ext}"));
        if !path.try_exists()? {
            return Ok(path);
        }
    }

    let path = dir.join(format!("{prefix}0.{ext}"));
    log::warn!("no free file name under {}; overwriting {}", dir.display(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("quadlite-storage-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        ensure_dir(&dir).unwrap();
        dir
    }

    #[test]
    fn empty_dir_starts_at_zero() {
        let dir = temp_dir("empty");
        assert_eq!(next_free_path(&dir, "shot", "png").unwrap(), dir.join("shot0.png"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn skips_taken_indices() {
        let dir = temp_dir("taken");
        std::fs::write(dir.join("shot0.png"), b"").unwrap();
        std::fs::write(dir.join("shot1.png"), b"").unwrap();
        std::fs::write(dir.join("other2.png"), b"").unwrap();

        assert_eq!(next_free_path(&dir, "shot", "png").unwrap(), dir.join("shot2.png"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn gaps_are_reused() {
        let dir = temp_dir("gap");
        std::fs::write(dir.join("shot1.png"), b"").unwrap();
        assert_eq!(next_free_path(&dir, "shot", "png").unwrap(), dir.join("shot0.png"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
