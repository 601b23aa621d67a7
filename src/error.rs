use thiserror::Error as ThisError;

use crate::{diagnostics::State, temporal::TemporalParseError};

/// Error type for hard failures of the marshaling core. Recoverable conditions like truncation
/// or placeholder substitution are not errors; they surface as diagnostics attached to the
/// statement together with a "success with info" status.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The server declared a column with a character set this driver has no conversion for.
    /// Without it the text copy engines cannot run at all, so this is detected when the result
    /// set is bound rather than on the first retrieval call.
    #[error(
        "The server uses character set number {number} for this column, which this driver does \
        not support. Text data of this column cannot be converted."
    )]
    UnknownCharset { number: u16 },
    /// The conversion subsystem failed decoding the source bytes in a way that placeholder
    /// substitution cannot recover, e.g. a value ending in the middle of a multi byte
    /// character.
    #[error("Unknown failure when converting character from server character set '{charset}'.")]
    ConversionFromSource { charset: &'static str },
    /// The conversion subsystem failed encoding into the result character set even after
    /// substituting the placeholder character.
    #[error("Unknown failure when converting character to result character set '{charset}'.")]
    ConversionToTarget { charset: &'static str },
    /// The application supplied a negative buffer length. Rejected before any copy is
    /// attempted; no transfer state is mutated.
    #[error("Invalid string or buffer length {length} supplied for the destination buffer.")]
    InvalidBufferLength { length: isize },
    /// A textual value could not be converted into a date, time or timestamp under the strict
    /// policy.
    #[error(transparent)]
    Temporal(#[from] TemporalParseError),
    /// The application referenced a column which is not part of the bound result set.
    #[error("Column index {index} is out of range of a result set with {count} columns.")]
    ColumnOutOfRange { index: usize, count: usize },
    /// A numeric column value could not be parsed into the bound numeric representation.
    #[error("The value '{text}' cannot be converted into the bound numeric type.")]
    InvalidNumericText { text: String },
}

impl Error {
    /// SQLSTATE reported to the application for this error.
    pub fn state(&self) -> State {
        match self {
            Error::UnknownCharset { .. }
            | Error::ConversionFromSource { .. }
            | Error::ConversionToTarget { .. } => State::GENERAL_ERROR,
            Error::InvalidBufferLength { .. } => State::INVALID_STRING_OR_BUFFER_LENGTH,
            Error::Temporal(_) => State::INVALID_DATETIME_FORMAT,
            Error::ColumnOutOfRange { .. } => State::INVALID_DESCRIPTOR_INDEX,
            Error::InvalidNumericText { .. } => State::INVALID_CHARACTER_VALUE_FOR_CAST,
        }
    }
}
