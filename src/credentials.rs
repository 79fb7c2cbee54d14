use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::messages::{fill, Msg};

/// API token posílaný v hlavičce `Authorization: Bearer ...`
#[derive(Clone, PartialEq)]
pub struct Token(String);

// token se nevypisuje ani v debug logu
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

#[derive(Debug)]
pub enum CredentialError {
    Missing(PathBuf),
    Unreadable(PathBuf, std::io::Error),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::Missing(path) => {
                f.write_str(&fill(Msg::FileMissing, &[&path.display()]))
            }
            CredentialError::Unreadable(path, e) => write!(
                f,
                "{}: {}",
                fill(Msg::FileUnreadable, &[&path.display()]),
                e
            ),
        }
    }
}

impl Error for CredentialError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CredentialError::Missing(_) => None,
            CredentialError::Unreadable(_, e) => Some(e),
        }
    }
}

impl Token {
    #[cfg(test)]
    pub fn new(value: impl Into<String>) -> Self {
        Token(value.into())
    }

    /// Načte token z prvního řádku souboru
    ///
    /// Tvar tokenu se nekontroluje, jen existence souboru.
    pub fn load(path: &Path) -> Result<Token, CredentialError> {
        if !path.exists() {
            return Err(CredentialError::Missing(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)
            .map_err(|e| CredentialError::Unreadable(path.to_path_buf(), e))?;
        let first_line = content.lines().next().unwrap_or("");
        Ok(Token(first_line.trim().to_string()))
    }

    /// Hodnota hlavičky `Authorization`
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}
