//! Transport seam for documents hosted next to the running bot.
//!
//! The editor only ever moves whole files: pull the remote document down to
//! edit it, push the saved file back up. Everything else (connection setup,
//! authentication, retries) belongs to the implementation behind the trait.
//! A failed transfer surfaces as [`MenuError::Transfer`] and must leave the
//! caller's in-memory state untouched.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{MenuError, Result};

pub trait RemoteTransfer {
    /// Fetches the raw bytes of the remote file.
    fn download(&self, remote_path: &str) -> Result<Vec<u8>>;

    /// Uploads the local file to the remote path, replacing what is there.
    fn upload(&self, local_path: &Path, remote_path: &str) -> Result<()>;
}

/// In-memory transfer for testing.
///
/// Uses `RefCell` for interior mutability since menukit is single-threaded.
/// This keeps the trait methods on `&self` without dragging in locks.
pub struct InMemoryTransfer {
    files: RefCell<HashMap<String, Vec<u8>>>,
    simulate_failure: RefCell<bool>,
}

impl Default for InMemoryTransfer {
    fn default() -> Self {
        Self {
            files: RefCell::new(HashMap::new()),
            simulate_failure: RefCell::new(false),
        }
    }
}

impl InMemoryTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a file on the fake remote.
    pub fn seed(&self, remote_path: &str, bytes: impl Into<Vec<u8>>) {
        self.files
            .borrow_mut()
            .insert(remote_path.to_string(), bytes.into());
    }

    /// What the fake remote currently holds at the path, if anything.
    pub fn stored(&self, remote_path: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(remote_path).cloned()
    }

    /// Enable failure simulation for testing error handling.
    pub fn set_simulate_failure(&self, simulate: bool) {
        *self.simulate_failure.borrow_mut() = simulate;
    }
}

impl RemoteTransfer for InMemoryTransfer {
    fn download(&self, remote_path: &str) -> Result<Vec<u8>> {
        if *self.simulate_failure.borrow() {
            return Err(MenuError::Transfer("Simulated transfer error".to_string()));
        }
        self.files
            .borrow()
            .get(remote_path)
            .cloned()
            .ok_or_else(|| MenuError::Transfer(format!("Remote file not found: {}", remote_path)))
    }

    fn upload(&self, local_path: &Path, remote_path: &str) -> Result<()> {
        if *self.simulate_failure.borrow() {
            return Err(MenuError::Transfer("Simulated transfer error".to_string()));
        }
        let bytes = fs::read(local_path)?;
        self.files
            .borrow_mut()
            .insert(remote_path.to_string(), bytes);
        Ok(())
    }
}
