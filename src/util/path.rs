use std::ffi::OsStr;
use std::path::{Path, PathBuf};

pub trait PathExt {
    fn has_extension(&self, ext: &str) -> bool;
    /// Path relative to `base`, or the path itself when no relative form exists.
    fn relative_to(&self, base: &Path) -> PathBuf;
}

impl PathExt for Path {
    fn has_extension(&self, ext: &str) -> bool {
        self.extension() == Some(OsStr::new(ext))
    }

    fn relative_to(&self, base: &Path) -> PathBuf {
        if !self.is_absolute() {
            return self.to_path_buf();
        }
        pathdiff::diff_paths(self, base).unwrap_or_else(|| self.to_path_buf())
    }
}

/// Forward slashes regardless of platform, for report output.
pub fn normalize_path_separator(s: &str) -> String {
    s.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_to() {
        let base = Path::new("/work/site");
        assert_eq!(
            Path::new("/work/site/parts/head.dorothy").relative_to(base),
            PathBuf::from("parts/head.dorothy")
        );
        assert_eq!(
            Path::new("/work/lib/a.dorothy").relative_to(base),
            PathBuf::from("../lib/a.dorothy")
        );
        assert_eq!(Path::new("-").relative_to(base), PathBuf::from("-"));
    }

    #[test]
    fn test_normalize_path_separator() {
        assert_eq!(normalize_path_separator(r"parts\head.dorothy"), "parts/head.dorothy");
    }

    #[test]
    fn test_has_extension() {
        assert!(Path::new("a/b.dorothy").has_extension("dorothy"));
        assert!(!Path::new("a/b.dorothy.txt").has_extension("dorothy"));
        assert!(!Path::new("a/b").has_extension("dorothy"));
    }
}
