/// Character set number the server uses to tag raw binary string data. A string or blob column
/// with this charset holds bytes, not text.
pub const BINARY_CHARSET_NUMBER: u16 = 63;

/// Column type tag as reported by the server protocol for a result field.
///
/// This enumeration is closed on purpose: the type catalog matches over it exhaustively, so
/// supporting a new server type is a compile time checked addition rather than a silent
/// fallthrough. Tags which this driver does not know about map to [`ServerType::Unknown`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServerType {
    /// Old style fixed point decimal, sent as text.
    Decimal,
    /// 8 bit integer, or a single character if the numeric flag is not set.
    Tiny,
    /// 16 bit integer.
    Short,
    /// 32 bit integer.
    Long,
    /// Single precision float.
    Float,
    /// Double precision float.
    Double,
    /// Column of the `NULL` type. Every value in it is `NULL`.
    Null,
    /// Automatic timestamp.
    Timestamp,
    /// 64 bit integer.
    LongLong,
    /// 24 bit integer.
    Int24,
    /// Calendar date.
    Date,
    /// Time of day, or a signed duration.
    Time,
    /// Date and time of day.
    DateTime,
    /// Year number.
    Year,
    /// Newer wire representation of a date. Treated like [`ServerType::Date`].
    NewDate,
    /// Variable length string. Not actually sent by servers, but part of the protocol.
    Varchar,
    /// Bit field of one or more bits.
    Bit,
    /// New style fixed point decimal, sent as text.
    NewDecimal,
    /// Enumeration, sent as text.
    Enum,
    /// Set, sent as text.
    Set,
    /// Blob with up to 2^8 - 1 bytes.
    TinyBlob,
    /// Blob with up to 2^24 - 1 bytes.
    MediumBlob,
    /// Blob with up to 2^32 - 1 bytes.
    LongBlob,
    /// Blob with up to 2^16 - 1 bytes.
    Blob,
    /// Variable length string.
    VarString,
    /// Fixed length string.
    String,
    /// Spatial value, always binary.
    Geometry,
    /// The server sent a type tag this driver does not know about. The type catalog reports it
    /// as the unknown SQL type with an empty type name.
    Unknown,
}

impl ServerType {
    /// Interpret a raw protocol type tag.
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            0 => ServerType::Decimal,
            1 => ServerType::Tiny,
            2 => ServerType::Short,
            3 => ServerType::Long,
            4 => ServerType::Float,
            5 => ServerType::Double,
            6 => ServerType::Null,
            7 => ServerType::Timestamp,
            8 => ServerType::LongLong,
            9 => ServerType::Int24,
            10 => ServerType::Date,
            11 => ServerType::Time,
            12 => ServerType::DateTime,
            13 => ServerType::Year,
            14 => ServerType::NewDate,
            15 => ServerType::Varchar,
            16 => ServerType::Bit,
            246 => ServerType::NewDecimal,
            247 => ServerType::Enum,
            248 => ServerType::Set,
            249 => ServerType::TinyBlob,
            250 => ServerType::MediumBlob,
            251 => ServerType::LongBlob,
            252 => ServerType::Blob,
            253 => ServerType::VarString,
            254 => ServerType::String,
            255 => ServerType::Geometry,
            _ => ServerType::Unknown,
        }
    }

    /// `true` for the string and blob types whose char/binary interpretation is decided by the
    /// column character set rather than the type tag itself.
    pub fn is_string_like(self) -> bool {
        matches!(
            self,
            ServerType::Enum
                | ServerType::Set
                | ServerType::Varchar
                | ServerType::VarString
                | ServerType::String
                | ServerType::TinyBlob
                | ServerType::MediumBlob
                | ServerType::LongBlob
                | ServerType::Blob
                | ServerType::Geometry
        )
    }
}

/// Indication of whether a column is nullable or not.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum Nullability {
    #[default]
    Unknown,
    Nullable,
    NoNulls,
}

/// Server reported metadata of one result column, as delivered by the protocol layer together
/// with the row data. Immutable once a result set is bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Type tag of the column.
    pub server_type: ServerType,
    /// Declared length. Characters for text types, bytes for binary types and bits for
    /// [`ServerType::Bit`].
    pub length: u64,
    /// Length of the longest value present in this result set. Only meaningful after the full
    /// result has been fetched; zero otherwise.
    pub max_length: u64,
    /// Number of decimal digits for fixed point types.
    pub decimals: u16,
    /// Values of the column are unsigned.
    pub unsigned: bool,
    /// The column is numeric. Distinguishes an 8 bit integer from a single character column,
    /// which share the [`ServerType::Tiny`] tag.
    pub numeric: bool,
    /// Character set number of the column data. [`BINARY_CHARSET_NUMBER`] marks raw bytes.
    pub charset: u16,
    /// Indicates whether the column is nullable or not.
    pub nullability: Nullability,
}

impl ColumnDescriptor {
    /// `true` if the column holds raw bytes rather than text. Driven by the charset sentinel,
    /// not by the type tag.
    pub fn is_binary(&self) -> bool {
        self.charset == BINARY_CHARSET_NUMBER
    }

    /// `true` if the column could contain `NULL` values. Columns with unknown nullability are
    /// assumed to be nullable.
    pub fn could_be_nullable(&self) -> bool {
        match self.nullability {
            Nullability::Nullable | Nullability::Unknown => true,
            Nullability::NoNulls => false,
        }
    }
}

impl Default for ColumnDescriptor {
    fn default() -> Self {
        ColumnDescriptor {
            server_type: ServerType::Unknown,
            length: 0,
            max_length: 0,
            decimals: 0,
            unsigned: false,
            numeric: false,
            charset: 0,
            nullability: Nullability::Unknown,
        }
    }
}
