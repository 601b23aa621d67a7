//! The type catalog maps a server [`ColumnDescriptor`] to standardized ODBC column metadata:
//! SQL data type, type name, column size, decimal digits, transfer octet length, display size
//! and the default client side representation.
//!
//! Every function in here is a pure function of the descriptor and [`CatalogOptions`]. The
//! statement context calls [`describe`] once per column when a result set is bound and caches
//! the outcome in a [`ColumnInfo`].

use std::mem::size_of;

use odbc_sys::{CDataType, Date, SqlDataType, Time, Timestamp};

use crate::{charset, column::ColumnDescriptor, column::ServerType};

/// Connection level settings which influence the reported metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogOptions {
    /// The application negotiated ODBC 3. Temporal types report the versioned type codes
    /// (91/92/93) instead of the legacy ODBC 2 codes (9/10/11).
    pub odbc3: bool,
    /// Report 64 bit integer columns as `INTEGER`, for clients without 64 bit support.
    pub no_bigint: bool,
    /// Fixed length strings report the longest actual value as their transfer octet length,
    /// reflecting that the server pads them with spaces.
    pub pad_space: bool,
    /// Character set number the connection delivers narrow text in.
    pub ansi_charset: u16,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        CatalogOptions {
            odbc3: true,
            no_bigint: false,
            pad_space: false,
            ansi_charset: 8,
        }
    }
}

/// Standardized metadata of one bound column. Computed once from the [`ColumnDescriptor`] at
/// bind time, read only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnInfo {
    /// ODBC SQL data type code exposed to the application.
    pub sql_data_type: SqlDataType,
    /// Human readable type name, e.g. `"smallint unsigned"`. Empty for unknown types.
    pub type_name: String,
    /// Column size in characters. `None` where the concept does not apply.
    pub column_size: Option<u64>,
    /// Number of decimal digits. `None` where the concept does not apply.
    pub decimal_digits: Option<u16>,
    /// Length in bytes of the column data as transferred in its default binary representation.
    pub transfer_octet_length: Option<u64>,
    /// Maximum number of characters needed to display the column as text.
    pub display_size: Option<u64>,
    /// Client side representation used for columns bound with the default type.
    pub default_representation: CDataType,
}

/// Compute the full standardized metadata for one column.
pub fn describe(desc: &ColumnDescriptor, options: &CatalogOptions) -> ColumnInfo {
    let (sql_data_type, type_name) = sql_type_and_name(desc, options);
    ColumnInfo {
        sql_data_type,
        type_name,
        column_size: column_size(desc, false),
        decimal_digits: decimal_digits(desc),
        transfer_octet_length: transfer_octet_length(desc, options),
        display_size: display_size(desc),
        default_representation: default_representation(desc),
    }
}

/// ODBC SQL data type and type name of a column.
///
/// The name of an unsigned numeric column gains an `" unsigned"` suffix, while the type code is
/// shared with the signed variant. Unknown server types yield `UNKNOWN_TYPE` and an empty name.
pub fn sql_type_and_name(desc: &ColumnDescriptor, options: &CatalogOptions) -> (SqlDataType, String) {
    let unsigned_suffix = |base: &str| -> String {
        if desc.unsigned {
            format!("{base} unsigned")
        } else {
            base.to_owned()
        }
    };
    match desc.server_type {
        ServerType::Bit => {
            // A bit field wider than one bit is opaque binary data.
            let sql_type = if desc.length > 1 {
                SqlDataType::EXT_BINARY
            } else {
                SqlDataType::EXT_BIT
            };
            (sql_type, "bit".to_owned())
        }
        ServerType::Decimal | ServerType::NewDecimal => (SqlDataType::DECIMAL, "decimal".to_owned()),
        ServerType::Tiny => {
            // An 8 bit field is either a TINYINT or a single character, told apart by the
            // numeric flag.
            if desc.numeric {
                (SqlDataType::EXT_TINY_INT, unsigned_suffix("tinyint"))
            } else {
                (SqlDataType::CHAR, unsigned_suffix("char"))
            }
        }
        ServerType::Short => (SqlDataType::SMALLINT, unsigned_suffix("smallint")),
        ServerType::Int24 => (SqlDataType::INTEGER, unsigned_suffix("mediumint")),
        ServerType::Long => (SqlDataType::INTEGER, unsigned_suffix("integer")),
        ServerType::LongLong => {
            let sql_type = if options.no_bigint {
                SqlDataType::INTEGER
            } else {
                SqlDataType::EXT_BIG_INT
            };
            (sql_type, unsigned_suffix("bigint"))
        }
        ServerType::Float => (SqlDataType::REAL, unsigned_suffix("float")),
        ServerType::Double => (SqlDataType::DOUBLE, unsigned_suffix("double")),
        ServerType::Null => (SqlDataType::VARCHAR, "null".to_owned()),
        ServerType::Year => (SqlDataType::SMALLINT, "year".to_owned()),
        ServerType::Timestamp => (versioned_timestamp(options), "timestamp".to_owned()),
        ServerType::DateTime => (versioned_timestamp(options), "datetime".to_owned()),
        ServerType::Date | ServerType::NewDate => {
            let sql_type = if options.odbc3 {
                SqlDataType::DATE
            } else {
                // Legacy ODBC 2 SQL_DATE shares its code with SQL_DATETIME.
                SqlDataType::DATETIME
            };
            (sql_type, "date".to_owned())
        }
        ServerType::Time => {
            let sql_type = if options.odbc3 {
                SqlDataType::TIME
            } else {
                SqlDataType::EXT_TIME_OR_INTERVAL
            };
            (sql_type, "time".to_owned())
        }
        ServerType::String => {
            if desc.is_binary() {
                (SqlDataType::EXT_BINARY, "binary".to_owned())
            } else {
                (SqlDataType::CHAR, "char".to_owned())
            }
        }
        ServerType::Varchar | ServerType::VarString => {
            if desc.is_binary() {
                (SqlDataType::EXT_VAR_BINARY, "varbinary".to_owned())
            } else {
                (SqlDataType::VARCHAR, "varchar".to_owned())
            }
        }
        ServerType::Enum => (SqlDataType::CHAR, "enum".to_owned()),
        ServerType::Set => (SqlDataType::CHAR, "set".to_owned()),
        ServerType::TinyBlob => blob_type(desc, "tinyblob", "tinytext"),
        ServerType::Blob => blob_type(desc, "blob", "text"),
        ServerType::MediumBlob => blob_type(desc, "mediumblob", "mediumtext"),
        ServerType::LongBlob => blob_type(desc, "longblob", "longtext"),
        ServerType::Geometry => (SqlDataType::EXT_LONG_VAR_BINARY, "geometry".to_owned()),
        ServerType::Unknown => (SqlDataType::UNKNOWN_TYPE, String::new()),
    }
}

fn versioned_timestamp(options: &CatalogOptions) -> SqlDataType {
    if options.odbc3 {
        SqlDataType::TIMESTAMP
    } else {
        SqlDataType::EXT_TIMESTAMP
    }
}

fn blob_type(
    desc: &ColumnDescriptor,
    binary_name: &str,
    text_name: &str,
) -> (SqlDataType, String) {
    if desc.is_binary() {
        (SqlDataType::EXT_LONG_VAR_BINARY, binary_name.to_owned())
    } else {
        (SqlDataType::EXT_LONG_VARCHAR, text_name.to_owned())
    }
}

/// Column size in characters. With `actual` the longest value present in the result set is used
/// instead of the declared column length.
pub fn column_size(desc: &ColumnDescriptor, actual: bool) -> Option<u64> {
    let length = if actual { desc.max_length } else { desc.length };
    let size = match desc.server_type {
        ServerType::Tiny => {
            if desc.numeric {
                3
            } else {
                1
            }
        }
        ServerType::Short => 5,
        ServerType::Long => 10,
        ServerType::Float => 7,
        ServerType::Double => 15,
        ServerType::Null => 0,
        ServerType::LongLong => {
            if desc.unsigned {
                20
            } else {
                19
            }
        }
        ServerType::Int24 => 8,
        ServerType::Date => 10,
        ServerType::Time => 8,
        ServerType::Timestamp | ServerType::DateTime | ServerType::NewDate => 19,
        ServerType::Year => 4,
        ServerType::Decimal | ServerType::NewDecimal => decimal_width(desc, length),
        ServerType::Bit => {
            if length == 1 {
                1
            } else {
                length.div_ceil(8)
            }
        }
        ServerType::Enum
        | ServerType::Set
        | ServerType::Varchar
        | ServerType::VarString
        | ServerType::String
        | ServerType::TinyBlob
        | ServerType::MediumBlob
        | ServerType::LongBlob
        | ServerType::Blob
        | ServerType::Geometry => length,
        ServerType::Unknown => return None,
    };
    Some(size)
}

/// One character of the declared width goes to the sign (if the type can be negative) and one
/// to the decimal point (if there are fractional digits).
fn decimal_width(desc: &ColumnDescriptor, length: u64) -> u64 {
    let sign = u64::from(!desc.unsigned);
    let point = u64::from(desc.decimals > 0);
    length.saturating_sub(sign).saturating_sub(point)
}

/// Number of decimal digits of a column, or `None` where the concept does not apply.
pub fn decimal_digits(desc: &ColumnDescriptor) -> Option<u16> {
    match desc.server_type {
        ServerType::Decimal | ServerType::NewDecimal => Some(desc.decimals),
        // All exact numeric types.
        ServerType::Tiny
        | ServerType::Short
        | ServerType::Long
        | ServerType::LongLong
        | ServerType::Int24
        | ServerType::Year
        | ServerType::Time
        | ServerType::Timestamp
        | ServerType::DateTime => Some(0),
        // A bit field is an exact numeric only with a width of one.
        ServerType::Bit if desc.length == 1 => Some(0),
        _ => None,
    }
}

/// Length in bytes of the column data as transferred to the client in the default binary
/// representation of the type.
pub fn transfer_octet_length(desc: &ColumnDescriptor, options: &CatalogOptions) -> Option<u64> {
    let octets = match desc.server_type {
        ServerType::Tiny => 1,
        ServerType::Short => 2,
        ServerType::Int24 => 3,
        ServerType::Long => 4,
        ServerType::Float => 4,
        ServerType::Double => 8,
        ServerType::Null => 1,
        // Transferred as its text representation.
        ServerType::LongLong => 20,
        ServerType::Date => size_of::<Date>() as u64,
        ServerType::Time => size_of::<Time>() as u64,
        ServerType::Timestamp | ServerType::DateTime | ServerType::NewDate => {
            size_of::<Timestamp>() as u64
        }
        ServerType::Year => 1,
        ServerType::Decimal | ServerType::NewDecimal => decimal_width(desc, desc.length),
        // `length` holds the number of bits.
        ServerType::Bit => desc.length.div_ceil(8),
        ServerType::String => {
            let length = if options.pad_space {
                // The server pads fixed length strings; report the widest actual value.
                desc.max_length
            } else {
                desc.length
            };
            string_octet_length(desc, length, options)
        }
        ServerType::Enum
        | ServerType::Set
        | ServerType::Varchar
        | ServerType::VarString
        | ServerType::TinyBlob
        | ServerType::MediumBlob
        | ServerType::LongBlob
        | ServerType::Blob
        | ServerType::Geometry => string_octet_length(desc, desc.length, options),
        ServerType::Unknown => return None,
    };
    Some(octets)
}

fn string_octet_length(desc: &ColumnDescriptor, length: u64, options: &CatalogOptions) -> u64 {
    if desc.is_binary() {
        return length;
    }
    if desc.charset != options.ansi_charset {
        // Delivered after conversion into the connection character set, which may need more
        // bytes per character.
        let mbmaxlen = charset::from_number(options.ansi_charset)
            .map(|encoding| encoding.max_encoded_len() as u64)
            .unwrap_or(1);
        return length * mbmaxlen;
    }
    length
}

/// Maximum number of characters needed to display a value of the column as text.
pub fn display_size(desc: &ColumnDescriptor) -> Option<u64> {
    let unsigned = u64::from(desc.unsigned);
    let size = match desc.server_type {
        ServerType::Tiny => 3 + unsigned,
        ServerType::Short => 5 + unsigned,
        ServerType::Int24 => 8 + unsigned,
        ServerType::Long => 10 + unsigned,
        ServerType::Float => 14,
        ServerType::Double => 24,
        ServerType::Null => 1,
        ServerType::LongLong => 20,
        ServerType::Date => 10,
        ServerType::Time => 8,
        ServerType::Timestamp | ServerType::DateTime | ServerType::NewDate => 19,
        ServerType::Year => 4,
        ServerType::Decimal | ServerType::NewDecimal => desc.length,
        ServerType::Bit => {
            // Rendered as hex once wider than a single bit.
            if desc.length == 1 {
                1
            } else {
                desc.length.div_ceil(8) * 2
            }
        }
        ServerType::Enum
        | ServerType::Set
        | ServerType::Varchar
        | ServerType::VarString
        | ServerType::String
        | ServerType::TinyBlob
        | ServerType::MediumBlob
        | ServerType::LongBlob
        | ServerType::Blob
        | ServerType::Geometry => {
            if desc.is_binary() {
                // Two hex digits per byte.
                desc.length * 2
            } else {
                let mbmaxlen = charset::from_number(desc.charset)
                    .map(|encoding| encoding.max_encoded_len() as u64)
                    .unwrap_or(1);
                desc.length / mbmaxlen
            }
        }
        ServerType::Unknown => return None,
    };
    Some(size)
}

/// Default client side representation for a column which has not been bound explicitly.
pub fn default_representation(desc: &ColumnDescriptor) -> CDataType {
    match desc.server_type {
        ServerType::Bit => {
            if desc.length > 1 {
                CDataType::Binary
            } else {
                CDataType::Bit
            }
        }
        ServerType::Tiny => CDataType::STinyInt,
        ServerType::Year | ServerType::Short => CDataType::SShort,
        ServerType::Int24 | ServerType::Long => CDataType::SLong,
        ServerType::Float => CDataType::Float,
        ServerType::Double => CDataType::Double,
        ServerType::Timestamp | ServerType::DateTime => CDataType::TypeTimestamp,
        ServerType::NewDate | ServerType::Date => CDataType::TypeDate,
        ServerType::Time => CDataType::TypeTime,
        ServerType::Blob
        | ServerType::TinyBlob
        | ServerType::MediumBlob
        | ServerType::LongBlob
        | ServerType::Geometry => CDataType::Binary,
        // 64 bit integers are delivered as text to stay within every client's value range, and
        // everything else is textual to begin with.
        ServerType::LongLong
        | ServerType::Decimal
        | ServerType::NewDecimal
        | ServerType::Null
        | ServerType::Varchar
        | ServerType::VarString
        | ServerType::String
        | ServerType::Enum
        | ServerType::Set
        | ServerType::Unknown => CDataType::Char,
    }
}

/// Client side representation used when the caller binds with the default C type for a given
/// SQL data type.
pub fn default_c_type(sql_data_type: SqlDataType) -> CDataType {
    match sql_data_type {
        SqlDataType::EXT_BIG_INT => CDataType::SBigInt,
        SqlDataType::EXT_BIT => CDataType::Bit,
        SqlDataType::EXT_TINY_INT => CDataType::STinyInt,
        SqlDataType::SMALLINT => CDataType::SShort,
        SqlDataType::INTEGER => CDataType::SLong,
        SqlDataType::REAL | SqlDataType::FLOAT => CDataType::Float,
        SqlDataType::DOUBLE => CDataType::Double,
        SqlDataType::EXT_BINARY | SqlDataType::EXT_VAR_BINARY | SqlDataType::EXT_LONG_VAR_BINARY => {
            CDataType::Binary
        }
        SqlDataType::DATETIME | SqlDataType::DATE => CDataType::TypeDate,
        SqlDataType::EXT_TIME_OR_INTERVAL | SqlDataType::TIME => CDataType::TypeTime,
        SqlDataType::EXT_TIMESTAMP | SqlDataType::TIMESTAMP => CDataType::TypeTimestamp,
        // CHAR, VARCHAR, DECIMAL, NUMERIC and everything else is delivered as text.
        _ => CDataType::Char,
    }
}

/// Octet length of one bound C buffer element of the given type. Variable length types use the
/// declared buffer length.
pub fn bind_length(c_data_type: CDataType, length: u64) -> u64 {
    match c_data_type {
        CDataType::Bit | CDataType::STinyInt | CDataType::UTinyInt => 1,
        CDataType::SShort | CDataType::UShort => 2,
        CDataType::SLong | CDataType::ULong => 4,
        CDataType::Float => 4,
        CDataType::Double => 8,
        CDataType::SBigInt | CDataType::UBigInt => 8,
        CDataType::TypeDate => size_of::<Date>() as u64,
        CDataType::TypeTime => size_of::<Time>() as u64,
        CDataType::TypeTimestamp => size_of::<Timestamp>() as u64,
        // For CHAR, WCHAR, BINARY and friends the caller supplied length counts.
        _ => length,
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::column::BINARY_CHARSET_NUMBER;

    fn descriptor(server_type: ServerType) -> ColumnDescriptor {
        ColumnDescriptor {
            server_type,
            numeric: true,
            charset: 8,
            ..ColumnDescriptor::default()
        }
    }

    #[test_case(ServerType::Tiny, 3; "tinyint")]
    #[test_case(ServerType::Short, 5; "smallint")]
    #[test_case(ServerType::Long, 10; "integer")]
    #[test_case(ServerType::Float, 7; "float")]
    #[test_case(ServerType::Double, 15; "double")]
    #[test_case(ServerType::Int24, 8; "mediumint")]
    #[test_case(ServerType::Date, 10; "date")]
    #[test_case(ServerType::Time, 8; "time")]
    #[test_case(ServerType::DateTime, 19; "datetime")]
    #[test_case(ServerType::Year, 4; "year")]
    fn fixed_column_sizes(server_type: ServerType, expected: u64) {
        assert_eq!(Some(expected), column_size(&descriptor(server_type), false));
    }

    #[test]
    fn bigint_column_size_depends_on_sign() {
        let mut desc = descriptor(ServerType::LongLong);
        assert_eq!(Some(19), column_size(&desc, false));
        desc.unsigned = true;
        assert_eq!(Some(20), column_size(&desc, false));
    }

    /// A DECIMAL(7,2) is declared with length 9: seven digits, sign and decimal point. Its
    /// column size subtracts the sign and the point again.
    #[test]
    fn decimal_column_size_subtracts_sign_and_point() {
        let mut desc = descriptor(ServerType::NewDecimal);
        desc.length = 9;
        desc.decimals = 2;
        assert_eq!(Some(7), column_size(&desc, false));
        desc.unsigned = true;
        assert_eq!(Some(8), column_size(&desc, false));
        desc.decimals = 0;
        assert_eq!(Some(9), column_size(&desc, false));
    }

    #[test]
    fn single_bit_is_boolean_wider_bit_is_binary() {
        let options = CatalogOptions::default();
        let mut desc = descriptor(ServerType::Bit);
        desc.length = 1;
        assert_eq!(SqlDataType::EXT_BIT, sql_type_and_name(&desc, &options).0);
        assert_eq!(Some(1), column_size(&desc, false));
        assert_eq!(Some(0), decimal_digits(&desc));
        assert_eq!(Some(1), display_size(&desc));
        assert_eq!(CDataType::Bit, default_representation(&desc));

        desc.length = 17;
        assert_eq!(SqlDataType::EXT_BINARY, sql_type_and_name(&desc, &options).0);
        assert_eq!(Some(3), column_size(&desc, false));
        assert_eq!(None, decimal_digits(&desc));
        assert_eq!(Some(3), transfer_octet_length(&desc, &options));
        // Doubled for hex rendering.
        assert_eq!(Some(6), display_size(&desc));
        assert_eq!(CDataType::Binary, default_representation(&desc));
    }

    #[test]
    fn unsigned_suffix_shares_type_code() {
        let options = CatalogOptions::default();
        let mut desc = descriptor(ServerType::Short);
        let (signed_type, signed_name) = sql_type_and_name(&desc, &options);
        desc.unsigned = true;
        let (unsigned_type, unsigned_name) = sql_type_and_name(&desc, &options);
        assert_eq!(signed_type, unsigned_type);
        assert_eq!("smallint", signed_name);
        assert_eq!("smallint unsigned", unsigned_name);
    }

    #[test]
    fn bigint_downgrades_without_64bit_support() {
        let desc = descriptor(ServerType::LongLong);
        let mut options = CatalogOptions::default();
        assert_eq!(
            SqlDataType::EXT_BIG_INT,
            sql_type_and_name(&desc, &options).0
        );
        options.no_bigint = true;
        assert_eq!(SqlDataType::INTEGER, sql_type_and_name(&desc, &options).0);
    }

    #[test]
    fn temporal_codes_follow_negotiated_version() {
        let desc = descriptor(ServerType::Timestamp);
        let mut options = CatalogOptions::default();
        assert_eq!(SqlDataType::TIMESTAMP, sql_type_and_name(&desc, &options).0);
        options.odbc3 = false;
        assert_eq!(
            SqlDataType::EXT_TIMESTAMP,
            sql_type_and_name(&desc, &options).0
        );
    }

    #[test]
    fn char_binary_split_follows_charset_sentinel() {
        let options = CatalogOptions::default();
        let mut desc = descriptor(ServerType::String);
        desc.length = 20;
        let (sql_type, name) = sql_type_and_name(&desc, &options);
        assert_eq!(SqlDataType::CHAR, sql_type);
        assert_eq!("char", name);

        desc.charset = BINARY_CHARSET_NUMBER;
        let (sql_type, name) = sql_type_and_name(&desc, &options);
        assert_eq!(SqlDataType::EXT_BINARY, sql_type);
        assert_eq!("binary", name);
        assert_eq!(Some(40), display_size(&desc));
    }

    #[test]
    fn unknown_type_yields_sentinel_and_empty_name() {
        let desc = descriptor(ServerType::Unknown);
        let (sql_type, name) = sql_type_and_name(&desc, &CatalogOptions::default());
        assert_eq!(SqlDataType::UNKNOWN_TYPE, sql_type);
        assert!(name.is_empty());
        assert_eq!(None, column_size(&desc, false));
        assert_eq!(None, display_size(&desc));
    }

    #[test]
    fn text_in_foreign_charset_reports_converted_octet_length() {
        let options = CatalogOptions {
            ansi_charset: 45,
            ..CatalogOptions::default()
        };
        let mut desc = descriptor(ServerType::VarString);
        desc.length = 10;
        desc.charset = 8;
        // Conversion into utf8mb4 may take four bytes per character.
        assert_eq!(Some(40), transfer_octet_length(&desc, &options));
        desc.charset = 45;
        assert_eq!(Some(10), transfer_octet_length(&desc, &options));
    }

    #[test_case(SqlDataType::EXT_BIG_INT, CDataType::SBigInt; "bigint")]
    #[test_case(SqlDataType::EXT_BIT, CDataType::Bit; "bit")]
    #[test_case(SqlDataType::EXT_TINY_INT, CDataType::STinyInt; "tinyint")]
    #[test_case(SqlDataType::SMALLINT, CDataType::SShort; "smallint")]
    #[test_case(SqlDataType::INTEGER, CDataType::SLong; "integer")]
    #[test_case(SqlDataType::REAL, CDataType::Float; "real")]
    #[test_case(SqlDataType::DOUBLE, CDataType::Double; "double")]
    #[test_case(SqlDataType::EXT_VAR_BINARY, CDataType::Binary; "varbinary")]
    #[test_case(SqlDataType::DATE, CDataType::TypeDate; "date")]
    #[test_case(SqlDataType::TIME, CDataType::TypeTime; "time")]
    #[test_case(SqlDataType::TIMESTAMP, CDataType::TypeTimestamp; "timestamp")]
    #[test_case(SqlDataType::EXT_TIMESTAMP, CDataType::TypeTimestamp; "odbc2 timestamp")]
    #[test_case(SqlDataType::VARCHAR, CDataType::Char; "varchar")]
    #[test_case(SqlDataType::DECIMAL, CDataType::Char; "decimal")]
    fn default_c_types(sql_data_type: SqlDataType, expected: CDataType) {
        assert_eq!(expected, default_c_type(sql_data_type));
    }

    #[test]
    fn bind_length_of_fixed_and_variable_types() {
        assert_eq!(1, bind_length(CDataType::Bit, 99));
        assert_eq!(2, bind_length(CDataType::UShort, 99));
        assert_eq!(4, bind_length(CDataType::SLong, 99));
        assert_eq!(8, bind_length(CDataType::SBigInt, 99));
        assert_eq!(size_of::<Timestamp>() as u64, bind_length(CDataType::TypeTimestamp, 99));
        // Character and binary buffers use the caller supplied length.
        assert_eq!(99, bind_length(CDataType::Char, 99));
        assert_eq!(99, bind_length(CDataType::Binary, 99));
    }

    /// With `actual` the size reflects the longest value present in the result set instead of
    /// the declared column length.
    #[test]
    fn actual_column_size_uses_longest_value() {
        let mut desc = descriptor(ServerType::VarString);
        desc.length = 40;
        desc.max_length = 7;
        assert_eq!(Some(40), column_size(&desc, false));
        assert_eq!(Some(7), column_size(&desc, true));
    }

    /// Metadata is a pure function of the descriptor: describing twice yields the same result.
    #[test]
    fn describing_twice_is_idempotent() {
        let options = CatalogOptions::default();
        let mut desc = descriptor(ServerType::NewDecimal);
        desc.length = 12;
        desc.decimals = 4;
        assert_eq!(describe(&desc, &options), describe(&desc, &options));
    }
}
