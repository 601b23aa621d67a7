//! Statement level diagnostics area.
//!
//! Every retrieval call may append status records (truncation, placeholder substitution, hard
//! errors). The area is cleared at the start of each new call and applications read the records
//! back in order, numbered from 1.

use std::fmt;

use log::{warn, Level};
use odbc_sys::SQLSTATE_SIZE;

/// A buffer large enough to hold an SQLSTATE code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct State(pub [u8; SQLSTATE_SIZE]);

impl State {
    /// String or binary data returned for a column resulted in the truncation of nonblank
    /// character or non-NULL binary data. If it was a string value, it was right-truncated.
    pub const STRING_DATA_RIGHT_TRUNCATION: State = State(*b"01004");
    /// The data value could not be converted into the type requested by the application. Also
    /// reported as a warning when characters have been replaced by a placeholder.
    pub const INVALID_CHARACTER_VALUE_FOR_CAST: State = State(*b"22018");
    /// A textual value is not a valid date, time or timestamp.
    pub const INVALID_DATETIME_FORMAT: State = State(*b"22007");
    /// Catch all state for failures without a more specific class.
    pub const GENERAL_ERROR: State = State(*b"HY000");
    /// The application passed a negative buffer length.
    pub const INVALID_STRING_OR_BUFFER_LENGTH: State = State(*b"HY090");
    /// The application referenced a column number outside the result set.
    pub const INVALID_DESCRIPTOR_INDEX: State = State(*b"07009");

    /// View status code as string slice for displaying. Must always succeed as status codes
    /// consist of ASCII characters only.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("?????")
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One diagnostic status record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Five character SQLSTATE code. The first two characters indicate the class, the next
    /// three the subclass.
    pub state: State,
    /// Native error code specific to the data source. Zero for conditions raised by the driver
    /// itself.
    pub native_error: i32,
    /// Human readable diagnostic message.
    pub message: String,
}

impl Record {
    /// A record raised by the driver itself rather than relayed from the server.
    pub fn driver(state: State, message: impl Into<String>) -> Self {
        Record {
            state,
            native_error: 0,
            message: message.into(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "State: {}, Native error: {}, Message: {}",
            self.state, self.native_error, self.message
        )
    }
}

/// Ordered collection of status records attached to a statement.
#[derive(Debug, Default)]
pub struct Diagnostics {
    records: Vec<Record>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all records. Called at the start of every new application level call.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Append a record and log it, so drivers running under a misbehaving application still
    /// leave a trace of what went wrong.
    pub fn push(&mut self, record: Record) {
        if log::max_level() >= Level::Warn {
            warn!("{}", record);
        }
        self.records.push(record);
    }

    /// Status record by its one based number, mirroring how applications address them.
    pub fn record(&self, rec_number: usize) -> Option<&Record> {
        rec_number.checked_sub(1).and_then(|i| self.records.get(i))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }
}
