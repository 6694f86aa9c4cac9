// src/code.rs
use std::fmt;

/// Outcome of library operations that report a code instead of a `Result`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Success,
    File,
    Http,
    Argument,
    /// A precondition did not hold, so nothing was done.
    Cancel,
    Unknown,
}

impl ErrorCode {
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Success => "Finished successfully",
            ErrorCode::File => "A file error occurred",
            ErrorCode::Http => "An HTTP error occurred",
            ErrorCode::Argument => "An argument is not valid",
            ErrorCode::Cancel => "The operation was cancelled",
            ErrorCode::Unknown => "An unknown error occurred",
        }
    }

    pub fn is_success(self) -> bool {
        self == ErrorCode::Success
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
