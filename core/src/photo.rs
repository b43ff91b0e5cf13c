//! Photo storage collaborator.
//!
//! The desk only ever holds the returned `PhotoRef`; bytes never reach the
//! complaint store.

use crate::{error::DeskResult, types::PhotoRef};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};
use uuid::Uuid;

pub trait PhotoStore: Send + Sync {
    fn store(&self, bytes: &[u8], filename: &str) -> DeskResult<PhotoRef>;

    /// Remove a previously stored photo. Unknown references are ignored.
    fn discard(&self, photo: &PhotoRef) -> DeskResult<()>;
}

/// Keeps only `[A-Za-z0-9._-]`, so a client filename can never escape
/// the upload directory.
fn sanitize_filename(filename: &str) -> String {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "photo".to_string()
    } else {
        cleaned.to_string()
    }
}

pub struct DiskPhotoStore {
    dir: PathBuf,
}

impl DiskPhotoStore {
    /// Creates `dir` if it does not exist.
    pub fn open(dir: impl Into<PathBuf>) -> DeskResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

impl PhotoStore for DiskPhotoStore {
    fn store(&self, bytes: &[u8], filename: &str) -> DeskResult<PhotoRef> {
        let name = format!("{}-{}", Uuid::new_v4().simple(), sanitize_filename(filename));
        let path = self.dir.join(name);
        fs::write(&path, bytes)?;
        log::debug!("stored photo {} ({} bytes)", path.display(), bytes.len());
        Ok(path.to_string_lossy().into_owned())
    }

    fn discard(&self, photo: &PhotoRef) -> DeskResult<()> {
        let path = Path::new(photo);
        // Only files this store wrote.
        if path.parent() != Some(self.dir.as_path()) {
            return Ok(());
        }
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Photo store used in tests and with `:memory:` databases.
#[derive(Default)]
pub struct MemoryPhotoStore {
    photos: Mutex<HashMap<PhotoRef, Vec<u8>>>,
}

impl MemoryPhotoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, photo: &str) -> Option<Vec<u8>> {
        self.lock().get(photo).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PhotoRef, Vec<u8>>> {
        self.photos.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PhotoStore for MemoryPhotoStore {
    fn store(&self, bytes: &[u8], filename: &str) -> DeskResult<PhotoRef> {
        let reference = format!(
            "mem://{}-{}",
            Uuid::new_v4().simple(),
            sanitize_filename(filename)
        );
        self.lock().insert(reference.clone(), bytes.to_vec());
        Ok(reference)
    }

    fn discard(&self, photo: &PhotoRef) -> DeskResult<()> {
        self.lock().remove(photo);
        Ok(())
    }
}

impl<P: PhotoStore + ?Sized> PhotoStore for std::sync::Arc<P> {
    fn store(&self, bytes: &[u8], filename: &str) -> DeskResult<PhotoRef> {
        (**self).store(bytes, filename)
    }

    fn discard(&self, photo: &PhotoRef) -> DeskResult<()> {
        (**self).discard(photo)
    }
}
