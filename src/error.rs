use std::fmt;

#[derive(Debug)]
pub enum Error {
    InvalidDocument(String),
    UnknownElement(u16),
    /// No free character id is left for a new resource.
    IdsExhausted,
    Translation(String),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDocument(reason) => write!(f, "not a valid text document: {reason}"),
            Error::UnknownElement(id) => write!(f, "no text element with id {id}"),
            Error::IdsExhausted => write!(f, "no character id left for a new resource"),
            Error::Translation(e) => write!(f, "translation error: {e}"),
            Error::Json(e) => write!(f, "JSON error: {e}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
