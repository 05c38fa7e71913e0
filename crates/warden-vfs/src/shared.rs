//! A store shared between threads behind one whole-store lock.

use std::sync::{Arc, RwLock};

use crate::engine::Vfs;
use crate::error::{VfsError, VfsResult};

/// Cloneable handle to a [`Vfs`] guarded by a coarse reader/writer lock.
///
/// Each closure runs with the lock held for its whole duration, so
/// multi-step operations such as moves and recursive removals are never
/// observed half done.
#[derive(Debug, Clone, Default)]
pub struct SharedVfs {
    inner: Arc<RwLock<Vfs>>,
}

impl SharedVfs {
    /// Wrap a store.
    #[must_use]
    pub fn new(vfs: Vfs) -> Self {
        Self {
            inner: Arc::new(RwLock::new(vfs)),
        }
    }

    /// Run `f` with shared access.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::Poisoned`] if a writer panicked while holding the
    /// lock.
    pub fn read<T>(&self, f: impl FnOnce(&Vfs) -> T) -> VfsResult<T> {
        let guard = self
            .inner
            .read()
            .map_err(|e| VfsError::Poisoned(e.to_string()))?;
        Ok(f(&guard))
    }

    /// Run `f` with exclusive access.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::Poisoned`] if a writer panicked while holding the
    /// lock.
    pub fn write<T>(&self, f: impl FnOnce(&mut Vfs) -> T) -> VfsResult<T> {
        let mut guard = self
            .inner
            .write()
            .map_err(|e| VfsError::Poisoned(e.to_string()))?;
        Ok(f(&mut guard))
    }

    /// Run a fallible operation with exclusive access, flattening the result.
    ///
    /// # Errors
    ///
    /// Returns the operation's error or [`VfsError::Poisoned`].
    pub fn try_write<T>(&self, f: impl FnOnce(&mut Vfs) -> VfsResult<T>) -> VfsResult<T> {
        self.write(f)?
    }

    /// Run a fallible operation with shared access, flattening the result.
    ///
    /// # Errors
    ///
    /// Returns the operation's error or [`VfsError::Poisoned`].
    pub fn try_read<T>(&self, f: impl FnOnce(&Vfs) -> VfsResult<T>) -> VfsResult<T> {
        self.read(f)?
    }
}

impl From<Vfs> for SharedVfs {
    fn from(vfs: Vfs) -> Self {
        Self::new(vfs)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_concurrent_writers_serialize() {
        let shared = SharedVfs::new(Vfs::new());
        shared.try_write(|fs| fs.mkdir("/logs")).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared
                        .try_write(|fs| fs.append_file("/logs/all", &i.to_string(), true))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let content = shared.try_read(|fs| fs.read_file("/logs/all")).unwrap();
        assert_eq!(content.len(), 8);
    }

    #[test]
    fn test_errors_pass_through() {
        let shared = SharedVfs::from(Vfs::new());
        assert!(matches!(
            shared.try_read(|fs| fs.read_file("/missing")),
            Err(VfsError::NotFound(_))
        ));
        assert!(!shared.read(|fs| fs.exists("/missing")).unwrap());
    }
}
