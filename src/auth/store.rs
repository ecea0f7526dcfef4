//! Disk-backed storage for the authorization state

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::state::AuthState;
use crate::error::{AuthError, Result};

/// Default state file, relative to the current working directory
pub const DEFAULT_STATE_FILE: &str = "token_credentials.json";

/// Reads and writes [`AuthState`] as JSON at a fixed path.
///
/// There is no locking: the store assumes a single process owns the file.
/// Two processes sharing one state file will overwrite each other silently.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_FILE)
    }
}

impl CredentialStore {
    /// Create a store for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the state file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state from disk
    ///
    /// A missing file is not an error and yields an empty state.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Io` if the file exists but cannot be read,
    /// or `AuthError::Decode` if its content is not a valid state.
    pub fn load(&self) -> Result<AuthState> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No state file, starting empty");
                return Ok(AuthState::default());
            }
            Err(e) => return Err(AuthError::io(&self.path, e)),
        };

        let state: AuthState =
            serde_json::from_str(&content).map_err(|e| AuthError::decode(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), phase = ?state.phase(), "Loaded auth state");

        Ok(state)
    }

    /// Save the state, replacing any previous content
    ///
    /// Nothing is done to recover from a partial write; retry on failure.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Io` if the file cannot be written.
    pub fn save(&self, state: &AuthState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| AuthError::io(parent, e))?;
        }

        let content = serde_json::to_string_pretty(state).map_err(AuthError::Encode)?;
        write_private(&self.path, content.as_bytes()).map_err(|e| AuthError::io(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), phase = ?state.phase(), "Saved auth state");
        Ok(())
    }

    /// Delete the state file if it exists
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Io` if the file exists but cannot be removed.
    pub fn delete(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::io(&self.path, e)),
        }
    }
}

/// Write `content` to `path`, readable by the owner only
#[cfg(unix)]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(content)
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::state::{AccessToken, AuthPhase};
    use tempfile::TempDir;

    #[test]
    fn test_default_path() {
        assert_eq!(CredentialStore::default().path(), Path::new(DEFAULT_STATE_FILE));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = CredentialStore::new(temp_dir.path().join("nonexistent.json"));

        let state = store.load().unwrap();
        assert_eq!(state, AuthState::default());
    }

    #[test]
    fn test_load_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = CredentialStore::new(&path).load();
        assert!(matches!(result, Err(AuthError::Decode { .. })));
    }

    #[test]
    fn test_load_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = CredentialStore::new(temp_dir.path()).load();
        assert!(matches!(result, Err(AuthError::Io { .. })));
    }

    #[test]
    fn test_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = CredentialStore::new(temp_dir.path().join("nested/dir/state.json"));

        let state = AuthState::finalized(AccessToken::new("tok", "sec"));
        store.save(&state).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.phase(), AuthPhase::Finalized);
    }

    #[test]
    fn test_save_truncates_previous_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        let store = CredentialStore::new(&path);

        store
            .save(&AuthState::pending("a-rather-long-request-token-value"))
            .unwrap();
        store.save(&AuthState::default()).unwrap();

        assert!(store.load().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_sets_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        CredentialStore::new(&path)
            .save(&AuthState::pending("req"))
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_tightens_existing_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        CredentialStore::new(&path)
            .save(&AuthState::pending("req"))
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(
            CredentialStore::new(&path).load().unwrap(),
            AuthState::pending("req")
        );
    }

    #[test]
    fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        let store = CredentialStore::new(&path);

        // Deleting a missing file is fine
        store.delete().unwrap();

        store.save(&AuthState::pending("req")).unwrap();
        assert!(path.exists());
        store.delete().unwrap();
        assert!(!path.exists());
    }
}
