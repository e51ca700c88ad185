//! File access used by the history store.
//!
//! Appends are plain unlocked writes; concurrent appenders from other
//! processes are tolerated since record order only matters until the next
//! compaction. Compaction holds an exclusive advisory lock on the target file
//! for the whole read-modify-write, blocking until any peer releases it, so a
//! peer's locked write is always part of what gets compacted.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use fs2::FileExt;
use tracing::warn;

use crate::utils::guard::OnDrop;

/// Storage capability the history store writes through.
pub trait FileStore {
    /// Whole file content. Missing files surface as `NotFound`.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Append `record` to the end of the file, creating it if needed.
    fn append(&self, path: &Path, record: &str) -> io::Result<()>;

    /// Under an exclusive lock, read the file, pass its content to `compact`
    /// and replace the file with the result. A missing file is created empty
    /// first; a file that cannot be opened is left untouched.
    fn compact_locked(
        &self,
        path: &Path,
        compact: &mut dyn FnMut(&str) -> String,
    ) -> io::Result<()>;
}

impl<T: FileStore + ?Sized> FileStore for &T {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn append(&self, path: &Path, record: &str) -> io::Result<()> {
        (**self).append(path, record)
    }

    fn compact_locked(
        &self,
        path: &Path,
        compact: &mut dyn FnMut(&str) -> String,
    ) -> io::Result<()> {
        (**self).compact_locked(path, compact)
    }
}

/// `FileStore` backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileStore;

impl FileStore for LocalFileStore {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn append(&self, path: &Path, record: &str) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        // one write per record keeps concurrent appenders from interleaving mid-line
        file.write_all(record.as_bytes())
    }

    fn compact_locked(
        &self,
        path: &Path,
        compact: &mut dyn FnMut(&str) -> String,
    ) -> io::Result<()> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        FileExt::lock_exclusive(&file)?;
        let _unlock = OnDrop::with(|| {
            if let Err(e) = FileExt::unlock(&file) {
                warn!("Failed to unlock {}: {}", path.display(), e);
            }
        });

        let mut handle: &File = &file;
        let mut bytes = Vec::new();
        handle.read_to_end(&mut bytes)?;
        let contents = compact(&String::from_utf8_lossy(&bytes));

        file.set_len(0)?;
        handle.seek(SeekFrom::Start(0))?;
        handle.write_all(contents.as_bytes())?;
        handle.flush()?;
        Ok(())
    }
}
