// Local credential store: a `.env`-style file (by default `.env` in the
// working directory) holding `auth_token=<value>`. Only commands touch
// it; the session keeps its own copy of the token.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::CommandError;

const TOKEN_KEY: &str = "auth_token";

#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CredentialStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted token. A missing file or key yields `None`.
    pub fn load(&self) -> Result<Option<String>, CommandError> {
        let token = self
            .entries()?
            .into_iter()
            .filter(|(key, _)| key == TOKEN_KEY)
            .map(|(_, value)| value)
            .last();
        Ok(token.filter(|value| !value.is_empty()))
    }

    /// Persist the token, keeping any other keys already in the file.
    ///
    /// The new content is written to a sibling file and renamed over the
    /// store, so a concurrent `load` sees either the old or the new file.
    pub fn save(&self, token: &str) -> Result<(), CommandError> {
        let mut out = String::new();
        for (key, value) in self.entries()? {
            if key != TOKEN_KEY {
                out.push_str(&format!("{key}={}\n", quote(&value)));
            }
        }
        out.push_str(&format!("{TOKEN_KEY}={}\n", quote(token)));

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, out).map_err(|e| CommandError::io("error writing auth token", e))?;
        fs::rename(&tmp, &self.path).map_err(|e| CommandError::io("error saving auth token", e))?;
        tracing::debug!(path = %self.path.display(), "auth token stored");
        Ok(())
    }

    /// All key-value pairs in file order; a missing file has none.
    fn entries(&self) -> Result<Vec<(String, String)>, CommandError> {
        let iter = match dotenvy::from_path_iter(&self.path) {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
                return Ok(Vec::new())
            }
            Err(dotenvy::Error::Io(e)) => {
                return Err(CommandError::io("error reading credential file", e))
            }
            Err(e) => return Err(CommandError::Credentials(e.to_string())),
        };
        iter.map(|item| item.map_err(|e| CommandError::Credentials(e.to_string())))
            .collect()
    }
}

/// Values are written quoted unless plain, so the file reads back
/// verbatim (no comment stripping or `$` substitution).
fn quote(value: &str) -> String {
    let plain = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_.:/+=@".contains(c));
    if plain && !value.is_empty() {
        value.to_string()
    } else if !value.contains('\'') {
        format!("'{value}'")
    } else {
        let mut out = String::from("\"");
        for c in value.chars() {
            if matches!(c, '\\' | '"' | '$') {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('"');
        out
    }
}
