use std::{
    fs::{File, OpenOptions},
    os::unix::fs::OpenOptionsExt,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

use fs2::FileExt;
use log::debug;

use super::{Error, Result};

/// Delay between two attempts to grab the lock
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Advisory `flock` on a file shared with other ipset users
///
/// Acquiring polls a non-blocking exclusive lock until the timeout elapses.
pub struct Locker {
    path: PathBuf,
    timeout: Duration,
}

/// Holds the lock until dropped
pub struct LockGuard {
    file: File,
    path: PathBuf,
}

impl Locker {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Locker {
            path: path.as_ref().to_path_buf(),
            timeout: Duration::from_secs(2),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn lock(&self) -> Result<LockGuard> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .mode(0o600)
            .open(&self.path)
            .map_err(|source| Error::LockOpen {
                path: self.path.clone(),
                source,
            })?;

        // The file is closed, and the lock released, on every early return
        let deadline = Instant::now() + self.timeout;
        loop {
            if file.try_lock_exclusive().is_ok() {
                debug!("IPSET [LOCK] [{}].", self.path.display());
                return Ok(LockGuard {
                    file,
                    path: self.path.clone(),
                });
            }
            if Instant::now() >= deadline {
                return Err(Error::LockTimeout {
                    path: self.path.clone(),
                    timeout: self.timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        FileExt::unlock(&self.file).ok();
        debug!("IPSET [UNLOCK] [{}].", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_lock_and_release() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ipset.lock");
        let locker = Locker::new(&path).timeout(Duration::from_millis(300));

        let guard = locker.lock().unwrap();
        assert!(path.exists());

        let err = Locker::new(&path)
            .timeout(Duration::from_millis(300))
            .lock()
            .err()
            .unwrap();
        assert!(matches!(err, Error::LockTimeout { .. }));

        drop(guard);
        assert!(locker.lock().is_ok());
    }

    #[test]
    fn test_lock_open_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("ipset.lock");
        let err = Locker::new(&path).lock().err().unwrap();
        assert!(matches!(err, Error::LockOpen { .. }));
    }
}
