pub mod health;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::SystemTime;

use crate::error::{JournalError, JournalResult};
use crate::journal::types::{Entry, Store};

/// Durable handle on the persisted entry mapping.
///
/// Holds the last committed mapping in memory. Readers get an `Arc` snapshot
/// and never block each other; [`EntryStore::upsert`] holds the writer lock for
/// its whole read-modify-write cycle, so concurrent ingests cannot lose updates.
pub struct EntryStore {
    path: PathBuf,
    snapshot: RwLock<Snapshot>,
    writer: Mutex<()>,
}

struct Snapshot {
    entries: Arc<Store>,
    /// Stamp of the file the snapshot was read from or written to.
    stamp: Option<FileStamp>,
}

/// Cheap identity of the persisted file. Length catches rewrites that land
/// within one mtime tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: SystemTime,
    len: u64,
}

impl EntryStore {
    /// Open the store at `path`, creating its parent directory if needed.
    ///
    /// A missing file is an empty store. An unparsable file fails with
    /// [`JournalError::CorruptStore`].
    pub fn open(path: impl AsRef<Path>) -> JournalResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| JournalError::io(parent, e))?;
        }

        let entries = load_from(&path)?;
        tracing::info!(path = %path.display(), entries = entries.len(), "entry store opened");

        Ok(Self {
            snapshot: RwLock::new(Snapshot {
                entries: Arc::new(entries),
                stamp: file_stamp(&path),
            }),
            path,
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted mapping straight from disk.
    pub fn load(&self) -> JournalResult<Store> {
        load_from(&self.path)
    }

    /// Insert or overwrite `id`, then persist the whole mapping atomically.
    ///
    /// Returns `true` if an entry with the same id was replaced.
    pub fn upsert(&self, id: &str, entry: Entry) -> JournalResult<bool> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut store = load_from(&self.path)?;
        let replaced = store.insert(id.to_string(), entry).is_some();
        persist(&self.path, &store)?;

        let stamp = file_stamp(&self.path);
        let mut snapshot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        *snapshot = Snapshot {
            entries: Arc::new(store),
            stamp,
        };

        tracing::debug!(id, replaced, entries = snapshot.entries.len(), "entry committed");
        Ok(replaced)
    }

    /// The last committed mapping.
    ///
    /// If another process has rewritten the file since the snapshot was taken
    /// (different mtime or length), the snapshot is reloaded first.
    pub fn all(&self) -> JournalResult<Arc<Store>> {
        let on_disk = file_stamp(&self.path);
        {
            let snapshot = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
            if snapshot.stamp == on_disk {
                return Ok(Arc::clone(&snapshot.entries));
            }
        }

        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let entries = Arc::new(load_from(&self.path)?);
        let mut snapshot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        *snapshot = Snapshot {
            entries: Arc::clone(&entries),
            stamp: file_stamp(&self.path),
        };
        tracing::debug!(path = %self.path.display(), "snapshot reloaded from disk");
        Ok(entries)
    }

    pub fn get(&self, id: &str) -> JournalResult<Option<Entry>> {
        Ok(self.all()?.get(id).cloned())
    }

    /// Size of the persisted file in bytes, 0 if it does not exist yet.
    pub fn size_bytes(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }
}

/// Read and parse the mapping at `path`; a missing file is an empty store.
pub fn load_from(path: &Path) -> JournalResult<Store> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Store::new()),
        Err(e) => return Err(JournalError::io(path, e)),
    };

    serde_json::from_slice(&bytes).map_err(|source| JournalError::CorruptStore {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the mapping to a temp file beside `path`, fsync, then rename over it.
///
/// A failure at any step leaves the previous file untouched.
fn persist(path: &Path, store: &Store) -> JournalResult<()> {
    let bytes = serde_json::to_vec_pretty(store)?;
    let tmp_path = path.with_extension("json.tmp");

    let write_tmp = || -> std::io::Result<()> {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()
    };

    if let Err(e) = write_tmp() {
        let _ = fs::remove_file(&tmp_path);
        return Err(JournalError::io(&tmp_path, e));
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        JournalError::io(path, e)
    })
}

fn file_stamp(path: &Path) -> Option<FileStamp> {
    let metadata = fs::metadata(path).ok()?;
    Some(FileStamp {
        modified: metadata.modified().ok()?,
        len: metadata.len(),
    })
}
