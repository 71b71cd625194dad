use std::fmt;
use std::path::PathBuf;

/// Result type for mastrace-index operations
pub type Result<T> = std::result::Result<T, Error>;

/// Snapshot load failures
///
/// Any of these aborts the whole load; no partial snapshot is returned.
#[derive(Debug)]
pub enum Error {
    /// Snapshot file does not exist
    NotFound(PathBuf),

    /// One of the six logging tables is absent
    MissingTable(&'static str),

    /// SQLite could not open or read the file
    Database(rusqlite::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound(path) => write!(f, "Snapshot not found: {}", path.display()),
            Error::MissingTable(table) => write!(
                f,
                "Snapshot is missing table '{}'. Is this a runtime logging database?",
                table
            ),
            Error::Database(err) => {
                let msg = err.to_string();
                if msg.contains("file is not a database") {
                    write!(f, "Not a SQLite database: {}", msg)
                } else {
                    write!(f, "Database error: {}", err)
                }
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Database(err) => Some(err),
            Error::NotFound(_) | Error::MissingTable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(err)
    }
}
