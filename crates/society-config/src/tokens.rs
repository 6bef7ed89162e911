// File-backed session token store.
//
// One JSON file per profile holding `{ "accessToken", "refreshToken" }`,
// readable only by the owner on Unix. Every read goes to disk so separate
// CLI invocations share the session.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use society_api::{Error, TokenPair, TokenStore};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTokens {
    access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform data directory for `profile_name`.
    pub fn for_profile(profile_name: &str) -> Self {
        Self::new(crate::token_path(profile_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn storage_error(action: &str, path: &Path, e: &std::io::Error) -> Error {
    Error::TokenStorage(format!("cannot {action} {}: {e}", path.display()))
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::File::create(path)
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<TokenPair> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let stored: StoredTokens = serde_json::from_str(&raw).ok()?;
        Some(TokenPair::new(stored.access_token, stored.refresh_token))
    }

    fn save(&self, tokens: &TokenPair) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| storage_error("create", parent, &e))?;
        }

        let stored = StoredTokens {
            access_token: tokens.access_token.expose_secret().to_owned(),
            refresh_token: tokens
                .refresh_token
                .as_ref()
                .map(|t| t.expose_secret().to_owned()),
        };
        let json = serde_json::to_vec_pretty(&stored)
            .map_err(|e| Error::TokenStorage(e.to_string()))?;

        let mut file =
            open_private(&self.path).map_err(|e| storage_error("write", &self.path, &e))?;
        file.write_all(&json)
            .map_err(|e| storage_error("write", &self.path, &e))
    }

    fn clear(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("remove", &self.path, &e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("tokens").join("default.json"));
        assert!(store.load().is_none());

        store
            .save(&TokenPair::new("access-1", Some("refresh-1".into())))
            .unwrap();
        let access = store.access_token().unwrap();
        let refresh = store.refresh_token().unwrap();
        assert_eq!(access.expose_secret(), "access-1");
        assert_eq!(refresh.expose_secret(), "refresh-1");

        store.clear().unwrap();
        assert!(store.load().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn file_uses_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.json");
        let store = FileTokenStore::new(&path);
        store.save(&TokenPair::new("a", None)).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({ "accessToken": "a" }));
    }

    #[test]
    fn corrupt_file_reads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(FileTokenStore::new(&path).load().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.json");
        FileTokenStore::new(&path)
            .save(&TokenPair::new("a", None))
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
