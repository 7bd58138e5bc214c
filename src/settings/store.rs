use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use strum_macros::Display;

/// A single persisted text blob (settings document or runtime scratch line).
///
/// Writes are synchronous; a successful `write` means the text is committed.
pub trait TextStore: Send {
    /// Returns the stored text, or an empty string when nothing was stored yet.
    fn read(&self) -> Result<String, StoreError>;
    fn write(&mut self, text: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Display)]
pub enum StoreError {
    Io(std::io::Error),
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self { StoreError::Io(value) }
}

/// [`TextStore`] backed by a file on disk.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }
}

impl TextStore for FileStore {
    fn read(&self) -> Result<String, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, text: &str) -> Result<(), StoreError> {
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

/// In-memory [`TextStore`]; clones share the same text.
#[derive(Clone, Default)]
pub struct MemoryStore {
    text: Arc<Mutex<String>>,
}

impl MemoryStore {
    pub fn new(text: &str) -> Self { Self { text: Arc::new(Mutex::new(text.to_string())) } }

    pub fn contents(&self) -> String {
        self.text.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl TextStore for MemoryStore {
    fn read(&self) -> Result<String, StoreError> { Ok(self.contents()) }

    fn write(&mut self, text: &str) -> Result<(), StoreError> {
        *self.text.lock().unwrap_or_else(PoisonError::into_inner) = text.to_string();
        Ok(())
    }
}
