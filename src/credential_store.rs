//! Persistent storage for the API credential.
//!
//! The store is a small JSON object on disk used as a key-value slot area;
//! the credential lives under [`CREDENTIAL_KEY`]. Other keys found in the
//! file are carried through every save untouched.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::types::Credential;

/// Key under which the credential is stored.
pub const CREDENTIAL_KEY: &str = "API_KEY";

const APP_DIR: &str = "amadeus";
const STORAGE_FILE: &str = "storage.json";

/// Persists a single credential across sessions.
///
/// `load` reads the file every time; `save` overwrites the slot and updates
/// the in-memory copy returned by [`CredentialStore::current`].
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    current: RwLock<Credential>,
}

impl CredentialStore {
    /// Opens the store at the default location, `<config dir>/amadeus/storage.json`,
    /// and loads the persisted credential.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Opens the store at `path` and loads the persisted credential.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let current = read_slot(&path)?;
        Ok(Self {
            path,
            current: RwLock::new(current),
        })
    }

    /// Returns the default storage path.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| {
            Error::io(
                "could not determine the configuration directory",
                std::io::Error::new(std::io::ErrorKind::NotFound, "no config dir"),
            )
        })?;
        Ok(base.join(APP_DIR).join(STORAGE_FILE))
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted credential; empty if none was ever saved.
    pub fn load(&self) -> Result<Credential> {
        read_slot(&self.path)
    }

    /// Returns the credential held in memory for subsequent requests.
    pub fn current(&self) -> Credential {
        match self.current.read() {
            Ok(current) => current.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Overwrites the persisted credential with `value` and updates the
    /// in-memory copy. Any string, including the empty string, is accepted.
    pub fn save(&self, value: Credential) -> Result<()> {
        let mut slots = read_slots(&self.path)?;
        slots.insert(
            CREDENTIAL_KEY.to_string(),
            Value::String(value.expose().to_string()),
        );
        write_slots(&self.path, &slots)?;
        match self.current.write() {
            Ok(mut current) => *current = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
        Ok(())
    }
}

fn read_slot(path: &Path) -> Result<Credential> {
    let slots = read_slots(path)?;
    Ok(match slots.get(CREDENTIAL_KEY) {
        Some(Value::String(secret)) => Credential::new(secret.clone()),
        _ => Credential::default(),
    })
}

fn read_slots(path: &Path) -> Result<Map<String, Value>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
        Err(err) => return Err(Error::io("failed to read credential storage", err)),
    };
    if content.trim().is_empty() {
        return Ok(Map::new());
    }
    serde_json::from_str(&content).map_err(|err| {
        Error::serialization("failed to parse credential storage", Some(Box::new(err)))
    })
}

fn write_slots(path: &Path, slots: &Map<String, Value>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| Error::io("failed to create credential storage directory", err))?;
    }
    let tmp_path = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(slots)?;
    {
        let mut file = fs::File::create(&tmp_path)
            .map_err(|err| Error::io("failed to create credential storage", err))?;
        restrict_permissions(&file)?;
        file.write_all(&bytes)
            .map_err(|err| Error::io("failed to write credential storage", err))?;
        file.sync_all()
            .map_err(|err| Error::io("failed to sync credential storage", err))?;
    }
    fs::rename(&tmp_path, path)
        .map_err(|err| Error::io("failed to replace credential storage", err))
}

#[cfg(unix)]
fn restrict_permissions(file: &fs::File) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))
        .map_err(|err| Error::io("failed to restrict credential storage permissions", err))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &fs::File) -> Result<()> {
    Ok(())
}
