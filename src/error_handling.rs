/*
    Errors tied to a place in the compiled source
*/

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::path::PathBuf;

/// What went wrong, independently of where. Each kind is an error of its
/// own and becomes the `source` of the located `Error` wrapping it.
pub trait ErrorType: StdError + PartialEq + 'static {}

// Line 0 means the error concerns the whole file
#[derive(Debug, PartialEq, Clone)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize,
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file.display())
        } else {
            write!(f, "{}:{}", self.file.display(), self.line)
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Error<T: ErrorType> {
    pub location: Location,
    pub error: T,
}

impl<T: ErrorType> Error<T> {
    pub fn new(file: impl Into<PathBuf>, line: usize, error: T) -> Self {
        Error {
            location: Location {
                file: file.into(),
                line,
            },
            error,
        }
    }
}

// `{:#}` highlights the location in bold red for a terminal
impl<T: ErrorType> Display for Error<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "\x1b[31;49;1m[{}]\x1b[39;49;1m  {}\x1b[0m", self.location, self.error)
        } else {
            write!(f, "[{}]  {}", self.location, self.error)
        }
    }
}

impl<T: ErrorType> StdError for Error<T> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.error)
    }
}
