//! Token store confined to one capability directory.

use std::io;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};

use crate::session::{
    domain::BearerToken,
    ports::{TokenStore, TokenStoreResult},
};

const TOKEN_FILE: &str = "token";

/// Persists the token as a single file inside a directory handle.
///
/// The store only ever touches `token` within the directory it was opened
/// on, so a misconfigured path cannot reach elsewhere on the filesystem.
#[derive(Debug)]
pub struct FileTokenStore {
    dir: Dir,
}

impl FileTokenStore {
    /// Opens (creating if needed) the directory that will hold the token.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory cannot be created or opened.
    pub fn open(path: &Utf8Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir })
    }

    /// Wraps an already opened directory.
    #[must_use]
    pub const fn from_dir(dir: Dir) -> Self {
        Self { dir }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> TokenStoreResult<Option<BearerToken>> {
        match self.dir.read_to_string(TOKEN_FILE) {
            Ok(contents) if contents.trim().is_empty() => Ok(None),
            Ok(contents) => Ok(Some(BearerToken::new(contents)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, token: &BearerToken) -> TokenStoreResult<()> {
        self.dir.write(TOKEN_FILE, token.expose())?;
        Ok(())
    }

    fn clear(&self) -> TokenStoreResult<()> {
        match self.dir.remove_file(TOKEN_FILE) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}
