//! File format descriptors for `COPY INTO` and `CREATE FILE FORMAT`.
//!
//! [`CopyFormatter`] is the untyped core: a file kind (or the name of a
//! pre-created format) plus an ordered option list. [`CsvFormatter`],
//! [`JsonFormatter`] and [`ParquetFormatter`] wrap it with validated setters.
//! A validated setter checks its argument before touching the option list,
//! so a failed call leaves the formatter unchanged.

use super::error::OptionError;
use super::render::{format_bool, ordered, quote_option_string, RenderOptions};

const CSV_JSON_COMPRESSION: &[&str] = &[
    "AUTO",
    "GZIP",
    "BZ2",
    "BROTLI",
    "ZSTD",
    "DEFLATE",
    "RAW_DEFLATE",
    "NONE",
];
const PARQUET_COMPRESSION: &[&str] = &["AUTO", "LZO", "SNAPPY", "NONE"];
const BINARY_FORMATS: &[&str] = &["HEX", "BASE64", "UTF8"];
const ENCLOSING_CHARACTERS: &[&str] = &["\"", "'"];

/// File type handled by a formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Json,
    Parquet,
}

impl FileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Csv => "csv",
            FileKind::Json => "json",
            FileKind::Parquet => "parquet",
        }
    }
}

/// Either an inline file type or a reference to a named file format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatKind {
    File(FileKind),
    Named(String),
}

/// An option value inside a `FILE_FORMAT=(...)` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatValue {
    Str(String),
    Bool(bool),
    Int(i64),
    List(Vec<String>),
    /// The `NONE` keyword.
    None,
}

impl FormatValue {
    pub fn render(&self) -> String {
        match self {
            FormatValue::Str(s) => quote_option_string(s),
            FormatValue::Bool(b) => format_bool(*b).to_string(),
            FormatValue::Int(n) => n.to_string(),
            FormatValue::List(items) => format!(
                "({})",
                items
                    .iter()
                    .map(|i| quote_option_string(i))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            FormatValue::None => "NONE".to_string(),
        }
    }

    fn from_optional(value: Option<&str>) -> Self {
        match value {
            Some(v) => FormatValue::Str(v.to_string()),
            None => FormatValue::None,
        }
    }
}

impl From<&str> for FormatValue {
    fn from(s: &str) -> Self {
        FormatValue::Str(s.to_string())
    }
}

impl From<String> for FormatValue {
    fn from(s: String) -> Self {
        FormatValue::Str(s)
    }
}

impl From<bool> for FormatValue {
    fn from(b: bool) -> Self {
        FormatValue::Bool(b)
    }
}

impl From<i64> for FormatValue {
    fn from(n: i64) -> Self {
        FormatValue::Int(n)
    }
}

impl From<u64> for FormatValue {
    fn from(n: u64) -> Self {
        FormatValue::Int(n as i64)
    }
}

// ============================================================================
// Validation helpers
// ============================================================================

fn one_of(option: &'static str, value: &str, allowed: &'static [&'static str]) -> Result<String, OptionError> {
    let upper = value.to_ascii_uppercase();
    if allowed.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(OptionError::NotAllowed {
            option,
            value: value.to_string(),
            allowed,
        })
    }
}

/// Decode backslash escape sequences the way the warehouse does for
/// delimiter options: `\t \n \r \\ \' \" \0`, `\xHH`, `\uHHHH` and octal
/// `\NNN`. Returns `None` for a malformed sequence.
pub fn decode_escapes(text: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let decoded = match chars.next()? {
            't' => '\t',
            'n' => '\n',
            'r' => '\r',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'x' => hex_char(&mut chars, 2)?,
            'u' => hex_char(&mut chars, 4)?,
            d @ '0'..='7' => {
                let mut value = d.to_digit(8)?;
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                char::from_u32(value)?
            }
            _ => return None,
        };
        out.push(decoded);
    }

    Some(out)
}

fn hex_char(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, digits: usize) -> Option<char> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}

fn single_char_or_none(option: &'static str, value: Option<&str>) -> Result<FormatValue, OptionError> {
    let Some(raw) = value else {
        return Ok(FormatValue::None);
    };
    match decode_escapes(raw) {
        Some(decoded) if decoded.chars().count() == 1 => Ok(FormatValue::Str(raw.to_string())),
        _ => Err(OptionError::NotSingleChar {
            option,
            value: raw.to_string(),
        }),
    }
}

// ============================================================================
// CopyFormatter
// ============================================================================

/// A file format: kind plus ordered options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "builders have no effect until used"]
pub struct CopyFormatter {
    pub kind: FormatKind,
    options: Vec<(String, FormatValue)>,
}

impl CopyFormatter {
    pub fn new(kind: FileKind) -> Self {
        Self {
            kind: FormatKind::File(kind),
            options: Vec::new(),
        }
    }

    /// Refer to a file format created beforehand with `CREATE FILE FORMAT`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            kind: FormatKind::Named(name.into()),
            options: Vec::new(),
        }
    }

    /// Set an option by name. Setting an existing option replaces its value
    /// in place.
    pub fn option(&mut self, name: impl Into<String>, value: impl Into<FormatValue>) -> &mut Self {
        let name = name.into().to_ascii_uppercase();
        let value = value.into();
        match self.options.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.options.push((name, value)),
        }
        self
    }

    pub fn options(&self) -> &[(String, FormatValue)] {
        &self.options
    }

    pub fn get(&self, name: &str) -> Option<&FormatValue> {
        self.options
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Space-separated `NAME<sep>value` pairs, sorted in deterministic mode.
    pub fn options_sql(&self, separator: &str, opts: RenderOptions) -> String {
        ordered(&self.options, opts)
            .into_iter()
            .map(|(name, value)| format!("{}{}{}", name, separator, value.render()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `FILE_FORMAT=(TYPE=csv ...)` or `FILE_FORMAT=(format_name = name)`.
    pub fn to_sql(&self, opts: RenderOptions) -> String {
        match &self.kind {
            FormatKind::Named(name) => format!("FILE_FORMAT=(format_name = {})", name),
            FormatKind::File(kind) if self.options.is_empty() => {
                format!("FILE_FORMAT=(TYPE={})", kind.as_str())
            }
            FormatKind::File(kind) => format!(
                "FILE_FORMAT=(TYPE={} {})",
                kind.as_str(),
                self.options_sql("=", opts)
            ),
        }
    }
}

// ============================================================================
// Typed formatters
// ============================================================================

macro_rules! formatter_common {
    ($name:ident, $compression:expr) => {
        impl $name {
            pub fn new() -> Self {
                Self(CopyFormatter::new(Self::KIND))
            }

            pub fn compression(&mut self, compression: &str) -> Result<&mut Self, OptionError> {
                let value = one_of("COMPRESSION", compression, $compression)?;
                self.0.option("COMPRESSION", value);
                Ok(self)
            }

            pub fn trim_space(&mut self, trim: bool) -> &mut Self {
                self.0.option("TRIM_SPACE", trim);
                self
            }

            pub fn null_if(&mut self, values: &[&str]) -> &mut Self {
                self.0.option(
                    "NULL_IF",
                    FormatValue::List(values.iter().map(|v| v.to_string()).collect()),
                );
                self
            }

            /// Set an arbitrary option without validation.
            pub fn option(&mut self, name: &str, value: impl Into<FormatValue>) -> &mut Self {
                self.0.option(name, value);
                self
            }

            pub fn formatter(&self) -> &CopyFormatter {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<$name> for CopyFormatter {
            fn from(f: $name) -> Self {
                f.0
            }
        }

        impl From<&mut $name> for CopyFormatter {
            fn from(f: &mut $name) -> Self {
                f.0.clone()
            }
        }
    };
}

/// Options shared by the text formats (CSV and JSON).
macro_rules! text_format_options {
    ($name:ident) => {
        impl $name {
            pub fn file_extension(&mut self, extension: Option<&str>) -> &mut Self {
                self.0
                    .option("FILE_EXTENSION", FormatValue::from_optional(extension));
                self
            }

            pub fn date_format(&mut self, format: &str) -> &mut Self {
                self.0.option("DATE_FORMAT", format);
                self
            }

            pub fn time_format(&mut self, format: &str) -> &mut Self {
                self.0.option("TIME_FORMAT", format);
                self
            }

            pub fn timestamp_format(&mut self, format: &str) -> &mut Self {
                self.0.option("TIMESTAMP_FORMAT", format);
                self
            }

            pub fn binary_format(&mut self, format: &str) -> Result<&mut Self, OptionError> {
                let value = one_of("BINARY_FORMAT", format, BINARY_FORMATS)?;
                self.0.option("BINARY_FORMAT", value);
                Ok(self)
            }

            pub fn replace_invalid_characters(&mut self, replace: bool) -> &mut Self {
                self.0.option("REPLACE_INVALID_CHARACTERS", replace);
                self
            }

            pub fn skip_byte_order_mark(&mut self, skip: bool) -> &mut Self {
                self.0.option("SKIP_BYTE_ORDER_MARK", skip);
                self
            }
        }
    };
}

/// CSV file format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFormatter(CopyFormatter);

formatter_common!(CsvFormatter, CSV_JSON_COMPRESSION);
text_format_options!(CsvFormatter);

impl CsvFormatter {
    const KIND: FileKind = FileKind::Csv;

    pub fn record_delimiter(&mut self, delimiter: Option<&str>) -> Result<&mut Self, OptionError> {
        let value = single_char_or_none("RECORD_DELIMITER", delimiter)?;
        self.0.option("RECORD_DELIMITER", value);
        Ok(self)
    }

    pub fn field_delimiter(&mut self, delimiter: Option<&str>) -> Result<&mut Self, OptionError> {
        let value = single_char_or_none("FIELD_DELIMITER", delimiter)?;
        self.0.option("FIELD_DELIMITER", value);
        Ok(self)
    }

    pub fn skip_header(&mut self, lines: u64) -> &mut Self {
        self.0.option("SKIP_HEADER", lines);
        self
    }

    pub fn skip_blank_lines(&mut self, skip: bool) -> &mut Self {
        self.0.option("SKIP_BLANK_LINES", skip);
        self
    }

    pub fn escape(&mut self, escape: Option<&str>) -> Result<&mut Self, OptionError> {
        let value = single_char_or_none("ESCAPE", escape)?;
        self.0.option("ESCAPE", value);
        Ok(self)
    }

    pub fn escape_unenclosed_field(&mut self, escape: Option<&str>) -> Result<&mut Self, OptionError> {
        let value = single_char_or_none("ESCAPE_UNENCLOSED_FIELD", escape)?;
        self.0.option("ESCAPE_UNENCLOSED_FIELD", value);
        Ok(self)
    }

    pub fn field_optionally_enclosed_by(&mut self, enclosed_by: Option<&str>) -> Result<&mut Self, OptionError> {
        let value = match enclosed_by {
            None => FormatValue::None,
            Some(c) if ENCLOSING_CHARACTERS.contains(&c) => FormatValue::Str(c.to_string()),
            Some(other) => {
                return Err(OptionError::NotAllowed {
                    option: "FIELD_OPTIONALLY_ENCLOSED_BY",
                    value: other.to_string(),
                    allowed: ENCLOSING_CHARACTERS,
                })
            }
        };
        self.0.option("FIELD_OPTIONALLY_ENCLOSED_BY", value);
        Ok(self)
    }

    pub fn error_on_column_count_mismatch(&mut self, error: bool) -> &mut Self {
        self.0.option("ERROR_ON_COLUMN_COUNT_MISMATCH", error);
        self
    }

    pub fn empty_field_as_null(&mut self, empty_as_null: bool) -> &mut Self {
        self.0.option("EMPTY_FIELD_AS_NULL", empty_as_null);
        self
    }

    pub fn encoding(&mut self, encoding: &str) -> &mut Self {
        self.0.option("ENCODING", encoding);
        self
    }
}

/// JSON file format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFormatter(CopyFormatter);

formatter_common!(JsonFormatter, CSV_JSON_COMPRESSION);
text_format_options!(JsonFormatter);

impl JsonFormatter {
    const KIND: FileKind = FileKind::Json;

    pub fn enable_octal(&mut self, enable: bool) -> &mut Self {
        self.0.option("ENABLE_OCTAL", enable);
        self
    }

    pub fn allow_duplicate(&mut self, allow: bool) -> &mut Self {
        self.0.option("ALLOW_DUPLICATE", allow);
        self
    }

    pub fn strip_outer_array(&mut self, strip: bool) -> &mut Self {
        self.0.option("STRIP_OUTER_ARRAY", strip);
        self
    }

    pub fn strip_null_values(&mut self, strip: bool) -> &mut Self {
        self.0.option("STRIP_NULL_VALUES", strip);
        self
    }

    pub fn ignore_utf8_errors(&mut self, ignore: bool) -> &mut Self {
        self.0.option("IGNORE_UTF8_ERRORS", ignore);
        self
    }
}

/// Parquet file format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParquetFormatter(CopyFormatter);

formatter_common!(ParquetFormatter, PARQUET_COMPRESSION);

impl ParquetFormatter {
    const KIND: FileKind = FileKind::Parquet;

    pub fn snappy_compression(&mut self, snappy: bool) -> &mut Self {
        self.0.option("SNAPPY_COMPRESSION", snappy);
        self
    }

    pub fn binary_as_text(&mut self, as_text: bool) -> &mut Self {
        self.0.option("BINARY_AS_TEXT", as_text);
        self
    }
}
