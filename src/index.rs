//! The set of executable names used as candidates for "did you mean" suggestions.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Deduplicated command names, kept in the order the directory listed them.
///
/// Uniqueness is exact, case-sensitive string equality. The order only
/// matters to [`crate::suggest::closest`], where the earliest of several
/// equally close names wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandIndex {
    names: Vec<String>,
}

impl CommandIndex {
    /// List `dir` and collect every entry name that does not start with `.`.
    ///
    /// This never fails: an unreadable directory gives an empty index, and
    /// entries that cannot be read (or whose names are not UTF-8) are skipped.
    pub fn build(dir: &Path) -> Self {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("cannot list {}: {}; suggestions disabled", dir.display(), e);
                return Self::default();
            }
        };

        let index: Self = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| !name.starts_with('.'))
            .collect();
        log::info!("indexed {} commands from {}", index.len(), dir.display());
        index
    }

    /// Replace the whole index with a fresh listing of `dir`.
    pub fn rebuild(&mut self, dir: &Path) {
        *self = Self::build(dir);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Names in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CommandIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let names = iter
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| seen.insert(name.clone()))
            .collect();
        Self { names }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::path::PathBuf;

    fn make_bin_dir(tag: &str, files: &[&str]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("index_tests_{}_{}", std::process::id(), tag));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp bin dir");
        for f in files {
            File::create(dir.join(f)).expect("touch file");
        }
        dir
    }

    #[test]
    fn test_build_skips_hidden_entries() {
        let dir = make_bin_dir("hidden", &["ls", ".hidden", "cat", ".."]);
        let index = CommandIndex::build(&dir);
        let _ = fs::remove_dir_all(&dir);

        assert_eq!(index.len(), 2);
        assert!(index.contains("ls"));
        assert!(index.contains("cat"));
        assert!(!index.contains(".hidden"));
    }

    #[test]
    fn test_build_unreadable_dir_is_empty() {
        let index = CommandIndex::build(Path::new("/does/not/exist/anywhere"));
        assert!(index.is_empty());
    }

    #[test]
    fn test_collect_deduplicates_case_sensitively() {
        let index: CommandIndex = ["ls", "ps", "ls", "LS"].into_iter().collect();
        let names: Vec<&str> = index.iter().collect();
        assert_eq!(names, vec!["ls", "ps", "LS"]);
    }

    #[test]
    fn test_rebuild_replaces_previous_names() {
        let first = make_bin_dir("rebuild_a", &["alpha"]);
        let second = make_bin_dir("rebuild_b", &["beta"]);

        let mut index = CommandIndex::build(&first);
        assert!(index.contains("alpha"));
        index.rebuild(&second);
        let _ = fs::remove_dir_all(&first);
        let _ = fs::remove_dir_all(&second);

        assert!(!index.contains("alpha"));
        assert!(index.contains("beta"));
        assert_eq!(index.len(), 1);
    }
}
