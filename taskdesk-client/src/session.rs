/// Client session state
///
/// A [`Session`] holds the current bearer token and mirrors it to a
/// [`TokenStorage`] file, so a token obtained by `taskdesk login` is still
/// there for the next command. Build one at startup with
/// [`Session::restore`] and hand clones to whatever needs it; clones share
/// the same slot.
///
/// # Example
///
/// ```no_run
/// use taskdesk_client::session::{Session, TokenStorage};
///
/// # fn example() -> Result<(), taskdesk_client::error::ClientError> {
/// let session = Session::restore(TokenStorage::default_location()?)?;
/// if session.token().is_none() {
///     println!("Not logged in");
/// }
/// # Ok(())
/// # }
/// ```

use directories::ProjectDirs;
use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use crate::error::ClientError;

/// File-backed token slot
#[derive(Debug, Clone)]
pub struct TokenStorage {
    path: PathBuf,
}

impl TokenStorage {
    /// Storage at an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `token` in the platform configuration directory for taskdesk
    pub fn default_location() -> Result<Self, ClientError> {
        let dirs = ProjectDirs::from("", "", "taskdesk").ok_or(ClientError::NoConfigDir)?;
        Ok(Self::new(dirs.config_dir().join("token")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored token; a missing or blank file means none
    pub fn load(&self) -> Result<Option<String>, ClientError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the token, creating parent directories as needed
    pub fn save(&self, token: &str) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = create_private(&self.path)?;
        file.write_all(token.as_bytes())?;
        Ok(())
    }

    /// Removes the stored token; clearing an empty slot is not an error
    pub fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Opens `path` for writing, truncated and readable by the owner only
#[cfg(unix)]
fn create_private(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;

    // mode() only applies to new files
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> io::Result<File> {
    File::create(path)
}

/// Current authentication state, shared by clones
#[derive(Debug, Clone)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
    storage: Arc<TokenStorage>,
}

impl Session {
    /// Creates a session seeded from whatever `storage` holds
    pub fn restore(storage: TokenStorage) -> Result<Self, ClientError> {
        let token = storage.load()?;
        if token.is_some() {
            tracing::debug!(path = %storage.path().display(), "Restored stored token");
        }

        Ok(Self {
            token: Arc::new(RwLock::new(token)),
            storage: Arc::new(storage),
        })
    }

    /// The current token, if logged in
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Stores `token` in the slot and on disk
    pub fn login(&self, token: impl Into<String>) -> Result<(), ClientError> {
        let token = token.into();
        self.storage.save(&token)?;
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token);
        Ok(())
    }

    /// Clears the slot and the stored copy
    pub fn logout(&self) -> Result<(), ClientError> {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        self.storage.clear()
    }
}
