use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

use crate::domain::{CookieJar, CookieJarError};

// In-memory cookie jar for one session.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: Mutex<HashMap<String, String>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieJar for MemoryCookieJar {
    fn get(&self, name: &str) -> Result<Option<String>, CookieJarError> {
        let cookies = self.cookies.lock().map_err(|_| CookieJarError::Poisoned)?;
        Ok(cookies.get(name).cloned())
    }

    fn set(&self, name: &str, value: &str) -> Result<(), CookieJarError> {
        let mut cookies = self.cookies.lock().map_err(|_| CookieJarError::Poisoned)?;
        cookies.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), CookieJarError> {
        let mut cookies = self.cookies.lock().map_err(|_| CookieJarError::Poisoned)?;
        cookies.remove(name);
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CookieFile {
    #[serde(default)]
    cookies: BTreeMap<String, String>,
}

/// Cookie jar persisted as a TOML file, so a CLI session survives restarts.
///
/// A missing file reads as an empty jar. Every write replaces the whole file
/// through a sibling temp file and a rename, so readers never see a partial
/// write. Writes start over from an empty jar when the file cannot be decoded.
#[derive(Debug)]
pub struct FileCookieJar {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileCookieJar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<CookieFile, CookieJarError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(toml::from_str(&raw)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(CookieFile::default()),
            Err(error) => Err(error.into()),
        }
    }

    fn store(&self, file: &CookieFile) -> Result<(), CookieJarError> {
        let raw = toml::to_string(file)?;
        let staging = self.staging_path();
        std::fs::write(&staging, raw)?;
        if let Err(error) = std::fs::rename(&staging, &self.path) {
            let _ = std::fs::remove_file(&staging);
            return Err(error.into());
        }
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }

    fn update(&self, apply: impl FnOnce(&mut CookieFile)) -> Result<(), CookieJarError> {
        let _guard = self.lock.lock().map_err(|_| CookieJarError::Poisoned)?;
        let mut file = match self.load() {
            Err(CookieJarError::Decode(error)) => {
                warn!(path = %self.path.display(), %error, "cookie file unreadable, starting empty");
                CookieFile::default()
            }
            other => other?,
        };
        apply(&mut file);
        self.store(&file)
    }
}

impl CookieJar for FileCookieJar {
    fn get(&self, name: &str) -> Result<Option<String>, CookieJarError> {
        let _guard = self.lock.lock().map_err(|_| CookieJarError::Poisoned)?;
        Ok(self.load()?.cookies.remove(name))
    }

    fn set(&self, name: &str, value: &str) -> Result<(), CookieJarError> {
        self.update(|file| {
            file.cookies.insert(name.to_string(), value.to_string());
        })
    }

    fn remove(&self, name: &str) -> Result<(), CookieJarError> {
        self.update(|file| {
            file.cookies.remove(name);
        })
    }
}
