//! JSON snapshots of networks and evolution state.

use crate::error::{EvotradeError, Result};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

fn check_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(EvotradeError::Persistence("empty filename".to_string()));
    }
    Ok(())
}

pub fn save<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    check_path(path)?;
    let bytes = serde_json::to_vec(value)?;
    fs::write(path, bytes)?;
    Ok(())
}

pub fn load<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    check_path(path)?;
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Like [`load`], but logs the failure and returns `None`.
pub fn try_load<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Option<T> {
    let path = path.as_ref();
    match load(path) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Could not load {}: {}", path.display(), e);
            None
        }
    }
}
