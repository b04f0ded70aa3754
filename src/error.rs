use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of a failure that is surfaced to the user. It is attached to an error chain
/// as context so that the binary can decide on an exit code without inspecting messages.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The home directory or its configuration file is missing or invalid.
    Config,
    /// A SQLite operation failed.
    Database,
    /// The spreadsheet could not be normalized into transactions.
    Parse,
    /// Reading or writing a file failed.
    Io,
}

impl ErrorType {
    /// The process exit code used when a command fails with this kind of error.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorType::Parse => 2,
            _ => 1,
        }
    }
}

impl Display for ErrorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorType::Config => "configuration error",
            ErrorType::Database => "database error",
            ErrorType::Parse => "statement error",
            ErrorType::Io => "file error",
        };
        f.write_str(s)
    }
}

/// Tags a fallible result with the public `ErrorType`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| e.into().context(error_type))
    }
}

/// Finds the `ErrorType` that was attached to `e`, if any.
pub fn error_type(e: &Error) -> Option<ErrorType> {
    e.downcast_ref::<ErrorType>().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_pub_result_attaches_type() {
        let r: std::result::Result<(), Error> = Err(anyhow!("boom"));
        let e = r.pub_result(ErrorType::Parse).unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Parse));
        assert_eq!(e.root_cause().to_string(), "boom");
    }

    #[test]
    fn test_untagged_error_has_no_type() {
        let e = anyhow!("plain");
        assert_eq!(error_type(&e), None);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ErrorType::Parse.exit_code(), 2);
        assert_eq!(ErrorType::Database.exit_code(), 1);
    }
}
