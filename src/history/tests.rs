//! End-to-end behaviour of the history store against real and failing files.

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs::{self, OpenOptions};
    use std::io::{self, Write};
    use std::path::{Path, PathBuf};
    use std::thread;
    use std::time::Duration;

    use fs2::FileExt;
    use tempfile::tempdir;

    use crate::history::{
        Entry, FileStore, HistoryConfig, HistoryFiles, HistoryStore, HistoryType, LocalFileStore,
    };

    /// Passes through to disk except for `failing` paths, which cannot be
    /// opened at all, the way a file without read permission behaves.
    struct Unopenable {
        failing: Vec<PathBuf>,
        compactions: RefCell<Vec<PathBuf>>,
    }

    impl Unopenable {
        fn new(failing: Vec<PathBuf>) -> Self {
            Self {
                failing,
                compactions: RefCell::new(Vec::new()),
            }
        }

        fn check(&self, path: &Path) -> io::Result<()> {
            if self.failing.iter().any(|p| p == path) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "no access"));
            }
            Ok(())
        }
    }

    impl FileStore for Unopenable {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.check(path)?;
            LocalFileStore.read_to_string(path)
        }

        fn append(&self, path: &Path, record: &str) -> io::Result<()> {
            self.check(path)?;
            LocalFileStore.append(path, record)
        }

        fn compact_locked(
            &self,
            path: &Path,
            compact: &mut dyn FnMut(&str) -> String,
        ) -> io::Result<()> {
            self.compactions.borrow_mut().push(path.to_path_buf());
            self.check(path)?;
            LocalFileStore.compact_locked(path, compact)
        }
    }

    fn store_in(dir: &Path, history_max: i64) -> HistoryStore {
        HistoryStore::new(HistoryConfig::new(history_max, HistoryFiles::in_dir(dir)))
    }

    #[test]
    fn test_first_seen_duplicate_policy() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("history"),
            "a\tTitleA\nb\nb\tTitleB\na\tTitleA2\n",
        )
        .unwrap();
        let store = store_in(dir.path(), 10);

        assert_eq!(
            store.load(HistoryType::Url),
            vec![
                Entry::new("a", Some("TitleA".into())),
                Entry::new("b", None),
            ]
        );
    }

    #[test]
    fn test_load_caps_at_history_max() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), 5);
        for i in 0..12 {
            store.add(HistoryType::Command, &format!("cmd{}", i), None).unwrap();
        }

        let entries = store.load(HistoryType::Command);

        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].primary, "cmd0");
        assert_eq!(entries[4].primary, "cmd4");
    }

    #[test]
    fn test_cleanup_compacts_all_types() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), 10);
        store.add(HistoryType::Command, "open", None).unwrap();
        store.add(HistoryType::Command, "open", None).unwrap();
        store.add(HistoryType::Search, "needle", None).unwrap();
        store.add(HistoryType::Search, "needle", None).unwrap();
        store.add(HistoryType::Url, "https://a.org", Some("A")).unwrap();
        store.add(HistoryType::Url, "https://a.org", Some("A2")).unwrap();

        store.cleanup();

        assert_eq!(fs::read_to_string(dir.path().join("command")).unwrap(), "open\n");
        assert_eq!(fs::read_to_string(dir.path().join("search")).unwrap(), "needle\n");
        assert_eq!(
            fs::read_to_string(dir.path().join("history")).unwrap(),
            "https://a.org\tA\n"
        );
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history");
        fs::write(&path, "x\n\ny\tY\nx\tX\nz\ny\n  \nw\n").unwrap();
        let store = store_in(dir.path(), 3);

        store.cleanup();
        let first = fs::read(&path).unwrap();
        store.cleanup();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(String::from_utf8(first).unwrap(), "x\ny\tY\nz\n");
    }

    #[test]
    fn test_cleanup_leaves_no_duplicates() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), 100);
        for value in ["a", "b", "a", "c", "b", "a"] {
            store.add(HistoryType::Search, value, None).unwrap();
        }

        store.cleanup();

        let raw = fs::read_to_string(dir.path().join("search")).unwrap();
        let mut lines: Vec<_> = raw.lines().collect();
        let total = lines.len();
        lines.sort_unstable();
        lines.dedup();
        assert_eq!(lines.len(), total);
    }

    #[test]
    fn test_disabled_history_touches_nothing() {
        for history_max in [0, -1] {
            let dir = tempdir().unwrap();
            let command = dir.path().join("command");
            fs::write(&command, "dup\ndup\n").unwrap();
            let store = store_in(dir.path(), history_max);

            store.add(HistoryType::Command, "new", None).unwrap();
            store.add(HistoryType::Url, "https://a.org", Some("A")).unwrap();
            store.cleanup();

            assert_eq!(fs::read_to_string(&command).unwrap(), "dup\ndup\n");
            assert!(!dir.path().join("search").exists());
            assert!(!dir.path().join("history").exists());
        }
    }

    #[test]
    fn test_unopenable_file_is_skipped_per_type() {
        let dir = tempdir().unwrap();
        let command = dir.path().join("command");
        let search = dir.path().join("search");
        fs::write(&command, "a\na\n").unwrap();
        fs::write(&search, "s\ns\n").unwrap();

        let files = Unopenable::new(vec![command.clone()]);
        let store = HistoryStore::with_file_store(
            HistoryConfig::new(10, HistoryFiles::in_dir(dir.path())),
            files,
        );

        store.cleanup();

        // the failing file keeps its content, the others are still compacted
        assert_eq!(fs::read_to_string(&command).unwrap(), "a\na\n");
        assert_eq!(fs::read_to_string(&search).unwrap(), "s\n");
        assert!(store.load(HistoryType::Command).is_empty());
        assert_eq!(store.load(HistoryType::Search), vec![Entry::new("s", None)]);
    }

    #[test]
    fn test_directory_in_place_of_file() {
        let dir = tempdir().unwrap();
        let command = dir.path().join("command");
        let search = dir.path().join("search");
        fs::write(&command, "open\nset\nopen\n").unwrap();
        fs::create_dir(&search).unwrap();
        let store = store_in(dir.path(), 10);

        assert!(store.load(HistoryType::Search).is_empty());

        store.cleanup();

        assert!(search.is_dir());
        assert_eq!(fs::read_to_string(&command).unwrap(), "open\nset\n");
        assert!(dir.path().join("history").is_file());
    }

    #[test]
    fn test_cleanup_keeps_write_made_while_locked() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("command");
        fs::write(&path, "old\nold\n").unwrap();

        let peer = OpenOptions::new().read(true).write(true).open(&path).unwrap();
        FileExt::lock_exclusive(&peer).unwrap();

        let worker = {
            let path = path.clone();
            thread::spawn(move || {
                let files = HistoryFiles::new().with(HistoryType::Command, path);
                HistoryStore::new(HistoryConfig::new(10, files)).cleanup();
            })
        };

        // cleanup is now blocked on the lock; rewrite the file underneath it
        thread::sleep(Duration::from_millis(100));
        peer.set_len(0).unwrap();
        (&peer).write_all(b"old\nfresh\nfresh\n").unwrap();
        FileExt::unlock(&peer).unwrap();

        worker.join().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "old\nfresh\n");
    }

    #[test]
    fn test_surrounding_whitespace_is_dropped() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), 10);

        store.add(HistoryType::Command, "  ls ", None).unwrap();
        store.add(HistoryType::Command, "ls", None).unwrap();
        store.cleanup();

        assert_eq!(store.load(HistoryType::Command), vec![Entry::new("ls", None)]);
        assert_eq!(
            fs::read_to_string(dir.path().join("command")).unwrap(),
            "ls\n"
        );
    }

    #[test]
    fn test_cleanup_visits_every_type_in_order() {
        let dir = tempdir().unwrap();
        let files = Unopenable::new(vec![dir.path().join("command"), dir.path().join("search")]);
        let store = HistoryStore::with_file_store(
            HistoryConfig::new(10, HistoryFiles::in_dir(dir.path())),
            &files,
        );

        store.cleanup();

        assert_eq!(
            *files.compactions.borrow(),
            vec![
                dir.path().join("command"),
                dir.path().join("search"),
                dir.path().join("history"),
            ]
        );
        assert!(dir.path().join("history").exists());
    }

    #[test]
    fn test_unconfigured_type_is_ignored() {
        let dir = tempdir().unwrap();
        let files = HistoryFiles::new().with(HistoryType::Command, dir.path().join("cmds"));
        let store = HistoryStore::new(HistoryConfig::new(10, files));

        store.add(HistoryType::Url, "https://a.org", None).unwrap();
        store.add(HistoryType::Command, "quit", None).unwrap();
        store.cleanup();

        assert!(store.load(HistoryType::Url).is_empty());
        assert_eq!(store.load(HistoryType::Command), vec![Entry::new("quit", None)]);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_tab_inside_value_is_not_escaped() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), 10);

        store.add(HistoryType::Search, "left\tright", None).unwrap();

        assert_eq!(
            store.load(HistoryType::Search),
            vec![Entry::new("left", Some("right".into()))]
        );
    }
}
