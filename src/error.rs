use std::error::Error as StdError;
use std::fmt;
use std::io::Error as IoError;

use serde_json::Error as JsonError;

use crate::http::HttpError;

/// The common result type between most library functions.
///
/// The library exposes functions which, for a result type, exposes only one type, rather than the
/// usual 2 (`Result<T, Error>`). This is because all functions that return a result return
/// gembot's [`Error`], so this is implied, and a "simpler" result is used.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A common error enum returned by most of the library's functionality within a custom
/// [`Result`].
///
/// The most common error type, the [`HttpError`], is wrapped around this in the form of the
/// [`Self::Http`] variant.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// An error while decoding or encoding a payload.
    Json(JsonError),
    /// An `std::io` error.
    Io(IoError),
    /// An error from the [`http`] module.
    ///
    /// [`http`]: crate::http
    Http(HttpError),
    /// A required configuration value is absent.
    MissingConfig(&'static str),
    /// A command produced no result before its task ended.
    Command(String),
}

impl From<JsonError> for Error {
    fn from(e: JsonError) -> Error {
        Error::Json(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Error {
        Error::Io(e)
    }
}

impl From<HttpError> for Error {
    fn from(e: HttpError) -> Error {
        Error::Http(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        HttpError::from(e).into()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(inner) => fmt::Display::fmt(&inner, f),
            Self::Io(inner) => fmt::Display::fmt(&inner, f),
            Self::Http(inner) => fmt::Display::fmt(&inner, f),
            Self::MissingConfig(name) => write!(f, "{name} is not configured"),
            Self::Command(msg) => f.write_str(msg),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Json(inner) => Some(inner),
            Self::Io(inner) => Some(inner),
            Self::Http(inner) => Some(inner),
            _ => None,
        }
    }
}
