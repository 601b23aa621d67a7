//! Result marshaling core of an ODBC driver speaking to a wire protocol database.
//!
//! The crate covers the path between a fetched row held in memory and the application's bound
//! buffers: standardized column metadata ([`catalog`]), character set conversion ([`charset`]),
//! incremental value transfer with resumption across calls ([`transfer`]), temporal text
//! parsing ([`temporal`]) and the [`statement::ResultSet`] context tying them together. The
//! network client, SQL parsing and cursor positioning live elsewhere.

pub mod catalog;
pub mod charset;
pub mod column;
pub mod diagnostics;
pub mod error;
pub mod escape;
pub mod statement;
pub mod temporal;
pub mod transfer;

pub use self::{
    column::{ColumnDescriptor, Nullability, ServerType},
    diagnostics::{Diagnostics, Record, State},
    error::Error,
    statement::{Fetched, ResultSet, StatementOptions, Target},
    transfer::{Copied, SqlResult},
};
// Rexports
pub use widestring::{U16Str, U16String};
/// Rexport `odbc-sys` as sys to enable applications to always use the same version as this crate.
pub use odbc_sys as sys;
