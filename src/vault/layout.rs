//! On-disk layout of a vault directory.
//!
//! ```text
//! <vault_dir>/                 (0700)
//!   passwords.db               credential records + login attempts (0600)
//!   secret.key                 raw 32-byte AES key (0600)
//!   admin_credentials.secure   salt || PBKDF2 hash (0600)
//!   audit.db                   operation history (0600)
//!   config.toml                optional settings
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::{Result, VaultError};

/// Paths to every file that makes up one vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    dir: PathBuf,
}

impl VaultPaths {
    /// Name of the directory used under `$HOME` when none is given.
    pub const DEFAULT_DIR_NAME: &'static str = ".credvault";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$HOME/.credvault`.
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            VaultError::ConfigError("cannot determine home directory — pass --vault-dir".into())
        })?;
        Ok(Self::new(home.join(Self::DEFAULT_DIR_NAME)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn database(&self) -> PathBuf {
        self.dir.join("passwords.db")
    }

    pub fn key_file(&self) -> PathBuf {
        self.dir.join("secret.key")
    }

    pub fn admin_credentials(&self) -> PathBuf {
        self.dir.join("admin_credentials.secure")
    }

    pub fn config_file(&self) -> PathBuf {
        self.dir.join("config.toml")
    }

    /// A vault exists once its database has been created.
    pub fn exists(&self) -> bool {
        self.database().exists()
    }
}

/// Create `dir` (and parents) and restrict it to the owner.
pub fn ensure_private_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            VaultError::Storage(format!("cannot create vault directory {}: {e}", dir.display()))
        })?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700)).map_err(|e| {
            VaultError::Storage(format!("failed to restrict {}: {e}", dir.display()))
        })?;
    }

    Ok(())
}

/// Restrict an existing file to owner read/write.
pub fn restrict_file(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| {
            VaultError::Storage(format!("failed to restrict {}: {e}", path.display()))
        })?;
    }

    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}

/// Write `data` to a fresh owner-only temp file next to `path` and
/// fsync it.  Returns the temp path; the caller decides how to publish.
pub fn write_private_temp(path: &Path, data: &[u8]) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!(".{file_name}.{:08x}.tmp", rand::random::<u32>()));

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file: File = options.open(&tmp_path)?;
    let written = file.write_all(data).and_then(|()| file.sync_all());
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    Ok(tmp_path)
}

/// Atomically replace `path` with `data` (temp file + rename, 0600).
///
/// Readers never see a half-written file.
pub fn write_private_file(path: &Path, data: &[u8]) -> Result<()> {
    let tmp_path = write_private_temp(path, data)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn paths_live_inside_the_vault_dir() {
        let paths = VaultPaths::new("/home/user/.credvault");
        assert_eq!(
            paths.database(),
            PathBuf::from("/home/user/.credvault/passwords.db")
        );
        assert_eq!(
            paths.key_file(),
            PathBuf::from("/home/user/.credvault/secret.key")
        );
        assert_eq!(
            paths.admin_credentials(),
            PathBuf::from("/home/user/.credvault/admin_credentials.secure")
        );
    }

    #[test]
    fn write_private_file_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blob");

        write_private_file(&path, b"first").unwrap();
        write_private_file(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        // No temp files left behind.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn private_dir_and_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let vault_dir = dir.path().join("nested").join("vault");
        ensure_private_dir(&vault_dir).unwrap();

        let mode = fs::metadata(&vault_dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);

        let file = vault_dir.join("blob");
        write_private_file(&file, b"x").unwrap();
        let mode = fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
