//! Result set context owning the per column metadata and transfer positions.
//!
//! [`ResultSet::bind`] performs the one time work when result metadata arrives: validating the
//! column character sets and consulting the type catalog. Afterwards [`ResultSet::get_data`]
//! moves field values of the current row into application buffers, choosing the copy engine
//! from the bound target and the column type.

use atoi::{FromRadix10Checked, FromRadix10SignedChecked};
use odbc_sys::{Date, Time, Timestamp};

use crate::{
    catalog::{self, CatalogOptions, ColumnInfo},
    charset::{self, Encoding},
    column::ColumnDescriptor,
    diagnostics::{Diagnostics, Record, State},
    error::Error,
    temporal,
    transfer::{
        copy_binary, copy_hex, copy_text, copy_wide, Copied, SqlResult, TransferOptions,
        TransferState,
    },
};

/// Application controlled attributes of a statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementOptions {
    /// Limit on the length of any retrieved value, in source bytes. Values beyond the limit are
    /// silently cut.
    pub max_length: Option<usize>,
    /// Coerce zero month or day components of dates and timestamps to 1 instead of failing.
    pub zero_date_to_min: bool,
    /// Connection level settings consulted by the type catalog. Its character set number also
    /// selects the narrow text encoding delivered to the application.
    pub catalog: CatalogOptions,
}

/// Application buffer into which one field value is retrieved.
#[derive(Debug)]
pub enum Target<'a> {
    /// Narrow character buffer. Binary columns are rendered as hexadecimal digits.
    Text(&'a mut [u8]),
    /// UTF-16 character buffer.
    WideText(&'a mut [u16]),
    /// Raw byte buffer.
    Binary(&'a mut [u8]),
    TinyInt(&'a mut i8),
    UTinyInt(&'a mut u8),
    SmallInt(&'a mut i16),
    USmallInt(&'a mut u16),
    Integer(&'a mut i32),
    UInteger(&'a mut u32),
    BigInt(&'a mut i64),
    UBigInt(&'a mut u64),
    Float(&'a mut f32),
    Double(&'a mut f64),
    /// Single bit. Any non zero integral value reads as 1.
    Bit(&'a mut u8),
    Date(&'a mut Date),
    Time(&'a mut Time),
    Timestamp(&'a mut Timestamp),
}

/// Outcome of one [`ResultSet::get_data`] call.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Fetched {
    /// The field is `NULL`. Nothing has been written to the target.
    Null,
    /// Data has been transferred into the target.
    Data(Copied),
}

struct BoundColumn {
    descriptor: ColumnDescriptor,
    info: ColumnInfo,
    encoding: &'static dyn Encoding,
    state: TransferState,
    /// Fixed size targets and `NULL` fields deliver their value exactly once per row.
    delivered_whole: bool,
}

/// A bound result set: column metadata plus the retrieval position of every column in the
/// current row. Row data itself stays with the protocol layer; field values are passed into
/// [`ResultSet::get_data`] by the caller.
pub struct ResultSet {
    options: StatementOptions,
    ansi: &'static dyn Encoding,
    columns: Vec<BoundColumn>,
    diagnostics: Diagnostics,
}

impl ResultSet {
    /// Validate the descriptors and compute the metadata of every column. Fails if any column
    /// (or the connection itself) uses a character set this driver cannot convert.
    pub fn bind(
        descriptors: Vec<ColumnDescriptor>,
        options: StatementOptions,
    ) -> Result<Self, Error> {
        let ansi = charset::from_number(options.catalog.ansi_charset).ok_or(
            Error::UnknownCharset {
                number: options.catalog.ansi_charset,
            },
        )?;
        let columns = descriptors
            .into_iter()
            .map(|descriptor| {
                let encoding =
                    charset::from_number(descriptor.charset).ok_or(Error::UnknownCharset {
                        number: descriptor.charset,
                    })?;
                let info = catalog::describe(&descriptor, &options.catalog);
                Ok(BoundColumn {
                    descriptor,
                    info,
                    encoding,
                    state: TransferState::new(),
                    delivered_whole: false,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(ResultSet {
            options,
            ansi,
            columns,
            diagnostics: Diagnostics::new(),
        })
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Cached standardized metadata of a column.
    pub fn describe(&self, column: usize) -> Result<&ColumnInfo, Error> {
        self.column(column).map(|bound| &bound.info)
    }

    /// Server reported descriptor of a column.
    pub fn descriptor(&self, column: usize) -> Result<&ColumnDescriptor, Error> {
        self.column(column).map(|bound| &bound.descriptor)
    }

    /// Diagnostic records of the most recent call.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// The cursor moved to a new row: every column starts over at the beginning of its value.
    pub fn next_row(&mut self) {
        for column in &mut self.columns {
            column.state.reset();
            column.delivered_whole = false;
        }
        self.diagnostics.clear();
    }

    /// Transfer (part of) the current row's field value of `column` into `target`.
    ///
    /// `value` carries the raw field bytes as fetched from the wire, `None` for `NULL`.
    /// Variable length targets may be filled over several calls; each call picks up where the
    /// previous one stopped and [`SqlResult::NoData`] signals the value is exhausted. Fixed
    /// size targets receive the whole value on the first call.
    pub fn get_data(
        &mut self,
        column: usize,
        value: Option<&[u8]>,
        target: Target<'_>,
    ) -> Result<SqlResult<Fetched>, Error> {
        self.diagnostics.clear();
        let index = column;
        let count = self.columns.len();
        let bound = self
            .columns
            .get_mut(index)
            .ok_or(Error::ColumnOutOfRange { index, count })?;

        let Some(value) = value else {
            if bound.delivered_whole {
                return Ok(SqlResult::NoData);
            }
            bound.delivered_whole = true;
            return Ok(SqlResult::Success(Fetched::Null));
        };

        let transfer = TransferOptions {
            max_length: self.options.max_length,
        };
        let result = match target {
            Target::Binary(dst) => Ok(copy_binary(&mut bound.state, transfer, value, dst)),
            Target::Text(dst) => {
                if bound.descriptor.is_binary() {
                    Ok(copy_hex(&mut bound.state, transfer, value, dst))
                } else {
                    copy_text(
                        &mut bound.state,
                        transfer,
                        bound.encoding,
                        self.ansi,
                        value,
                        dst,
                    )
                }
            }
            Target::WideText(dst) => {
                if bound.descriptor.is_binary() {
                    Ok(hex_wide(&mut bound.state, transfer, value, dst))
                } else {
                    copy_wide(&mut bound.state, transfer, bound.encoding, value, dst)
                }
            }
            fixed => {
                if bound.delivered_whole {
                    return Ok(SqlResult::NoData);
                }
                match write_fixed(value, fixed, self.options.zero_date_to_min) {
                    Ok(copied) => {
                        bound.delivered_whole = true;
                        Ok(SqlResult::Success(copied))
                    }
                    Err(error) => Err(error),
                }
            }
        };

        match result {
            Ok(outcome) => {
                if let SqlResult::SuccessWithInfo(copied) = &outcome {
                    if copied.truncated {
                        self.diagnostics.push(Record::driver(
                            State::STRING_DATA_RIGHT_TRUNCATION,
                            "String data, right truncated",
                        ));
                    }
                    if copied.replaced > 0 {
                        self.diagnostics.push(Record::driver(
                            State::INVALID_CHARACTER_VALUE_FOR_CAST,
                            format!(
                                "{} character(s) could not be converted and have been replaced",
                                copied.replaced
                            ),
                        ));
                    }
                }
                Ok(outcome.map(Fetched::Data))
            }
            Err(error) => {
                self.diagnostics
                    .push(Record::driver(error.state(), error.to_string()));
                Err(error)
            }
        }
    }

    fn column(&self, index: usize) -> Result<&BoundColumn, Error> {
        self.columns.get(index).ok_or(Error::ColumnOutOfRange {
            index,
            count: self.columns.len(),
        })
    }
}

/// Hexadecimal rendition of binary data into a wide buffer. The digits are plain ASCII, so the
/// narrow hex engine runs against a scratch buffer of the same capacity and the digits are
/// widened afterwards. Byte quantities double, one unit per digit.
fn hex_wide(
    state: &mut TransferState,
    options: TransferOptions,
    src: &[u8],
    dst: &mut [u16],
) -> SqlResult<Copied> {
    let mut scratch = vec![0u8; dst.len()];
    let result = copy_hex(state, options, src, &mut scratch);
    result.map(|copied| {
        // Include the terminating zero, present whenever the buffer is not empty.
        let written_with_nul = scratch.len().min(copied.bytes_written + 1);
        for (wide, narrow) in dst.iter_mut().zip(&scratch[..written_with_nul]) {
            *wide = u16::from(*narrow);
        }
        Copied {
            bytes_written: copied.bytes_written * 2,
            available: copied.available * 2,
            ..copied
        }
    })
}

/// Parse the textual field value and store it into a fixed size target.
fn write_fixed(value: &[u8], target: Target<'_>, zero_date_to_min: bool) -> Result<Copied, Error> {
    fn whole(bytes: usize) -> Copied {
        Copied {
            bytes_written: bytes,
            available: bytes,
            truncated: false,
            replaced: 0,
        }
    }

    fn signed(value: &[u8]) -> Result<i64, Error> {
        let digits = trim_leading_space(value);
        // Checked parsing: digit runs beyond the value range of the target are rejected
        // rather than wrapped.
        match i64::from_radix_10_signed_checked(digits) {
            (Some(parsed), consumed) if consumed > 0 => Ok(parsed),
            _ => Err(invalid_number(value)),
        }
    }

    fn unsigned(value: &[u8]) -> Result<u64, Error> {
        let digits = trim_leading_space(value);
        match u64::from_radix_10_checked(digits) {
            (Some(parsed), consumed) if consumed > 0 => Ok(parsed),
            _ => Err(invalid_number(value)),
        }
    }

    fn floating(value: &[u8]) -> Result<f64, Error> {
        std::str::from_utf8(value)
            .ok()
            .and_then(|text| text.trim().parse::<f64>().ok())
            .ok_or_else(|| invalid_number(value))
    }

    fn narrow<T: TryFrom<i64>>(value: &[u8]) -> Result<T, Error> {
        T::try_from(signed(value)?).map_err(|_| invalid_number(value))
    }

    fn narrow_unsigned<T: TryFrom<u64>>(value: &[u8]) -> Result<T, Error> {
        T::try_from(unsigned(value)?).map_err(|_| invalid_number(value))
    }

    use std::mem::size_of_val;
    match target {
        Target::TinyInt(out) => {
            *out = narrow(value)?;
            Ok(whole(size_of_val(out)))
        }
        Target::UTinyInt(out) => {
            *out = narrow_unsigned(value)?;
            Ok(whole(size_of_val(out)))
        }
        Target::SmallInt(out) => {
            *out = narrow(value)?;
            Ok(whole(size_of_val(out)))
        }
        Target::USmallInt(out) => {
            *out = narrow_unsigned(value)?;
            Ok(whole(size_of_val(out)))
        }
        Target::Integer(out) => {
            *out = narrow(value)?;
            Ok(whole(size_of_val(out)))
        }
        Target::UInteger(out) => {
            *out = narrow_unsigned(value)?;
            Ok(whole(size_of_val(out)))
        }
        Target::BigInt(out) => {
            *out = signed(value)?;
            Ok(whole(size_of_val(out)))
        }
        Target::UBigInt(out) => {
            *out = unsigned(value)?;
            Ok(whole(size_of_val(out)))
        }
        Target::Float(out) => {
            *out = floating(value)? as f32;
            Ok(whole(size_of_val(out)))
        }
        Target::Double(out) => {
            *out = floating(value)?;
            Ok(whole(size_of_val(out)))
        }
        Target::Bit(out) => {
            *out = u8::from(signed(value)? != 0);
            Ok(whole(size_of_val(out)))
        }
        Target::Date(out) => {
            let text = lossy_text(value);
            *out = temporal::parse_date(&text, zero_date_to_min)?;
            Ok(whole(size_of_val(out)))
        }
        Target::Time(out) => {
            let text = lossy_text(value);
            *out = temporal::parse_time(&text);
            Ok(whole(size_of_val(out)))
        }
        Target::Timestamp(out) => {
            let text = lossy_text(value);
            *out = temporal::parse_timestamp(&text, zero_date_to_min)?;
            Ok(whole(size_of_val(out)))
        }
        Target::Text(_) | Target::WideText(_) | Target::Binary(_) => {
            unreachable!("variable length targets are dispatched to the copy engines")
        }
    }
}

fn trim_leading_space(value: &[u8]) -> &[u8] {
    let start = value
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(value.len());
    &value[start..]
}

fn lossy_text(value: &[u8]) -> String {
    String::from_utf8_lossy(value).into_owned()
}

fn invalid_number(value: &[u8]) -> Error {
    Error::InvalidNumericText {
        text: String::from_utf8_lossy(value).into_owned(),
    }
}
