use crate::common::Map;
use crate::watch::event::EventSource;
use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque handle of a watched directory.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WatchKey(u32);

impl fmt::Display for WatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Directories registered with an [`EventSource`].
#[derive(Default)]
pub struct Registrations {
    keys: Map<WatchKey, PathBuf>,
    key_counter: u32,
}

impl Registrations {
    /// Starts watching `directory`. Registering an already watched directory returns its
    /// existing key.
    pub fn register<S: EventSource + ?Sized>(
        &mut self,
        source: &mut S,
        directory: &Path,
    ) -> crate::Result<WatchKey> {
        if let Some(key) = self.find(directory) {
            return Ok(key);
        }
        source.watch(directory)?;
        self.key_counter += 1;
        let key = WatchKey(self.key_counter);
        log::debug!("register: {} (key {key})", directory.display());
        self.keys.insert(key, directory.to_path_buf());
        Ok(key)
    }

    pub fn find(&self, directory: &Path) -> Option<WatchKey> {
        self.keys
            .iter()
            .find(|(_, dir)| dir.as_path() == directory)
            .map(|(key, _)| *key)
    }

    /// Returns the registration of the directory that contains `path`.
    pub fn find_parent(&self, path: &Path) -> Option<(WatchKey, &Path)> {
        let parent = path.parent()?;
        self.keys
            .iter()
            .find(|(_, dir)| dir.as_path() == parent)
            .map(|(key, dir)| (*key, dir.as_path()))
    }

    pub fn remove<S: EventSource + ?Sized>(
        &mut self,
        source: &mut S,
        key: WatchKey,
    ) -> Option<PathBuf> {
        let directory = self.keys.remove(&key)?;
        source.unwatch(&directory);
        Some(directory)
    }

    /// Drops registrations of directories that are no longer accessible and returns them.
    pub fn reset<S: EventSource + ?Sized>(&mut self, source: &mut S) -> Vec<PathBuf> {
        let invalid: Vec<WatchKey> = self
            .keys
            .iter()
            .filter(|(_, dir)| !dir.is_dir())
            .map(|(key, _)| *key)
            .collect();
        invalid
            .into_iter()
            .filter_map(|key| self.remove(source, key))
            .collect()
    }

    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.keys.values().map(|dir| dir.as_path())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
