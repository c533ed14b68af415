//! Options trailing a `CREATE TABLE`, such as `WAREHOUSE = wh` or
//! `TARGET_LAG = '10 seconds'`.
//!
//! Factories validate their input and return [`TableOptionResult`]. A failed
//! factory call is not an immediate error: `CreateTable` stores the `Err`
//! and reports it with every other problem when the table is rendered.

use std::fmt;

use super::error::TableOptionError;
use super::identifier::Ident;
use super::query::Query;
use super::render::RenderOptions;
use super::token::{Token, TokenStream};

pub type TableOptionResult = Result<TableOption, TableOptionError>;

/// Render ranking. Higher priorities render first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Lowest,
    Low,
    Medium,
    High,
    Highest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
        }
    }

    fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "second" | "seconds" => Some(TimeUnit::Seconds),
            "minute" | "minutes" => Some(TimeUnit::Minutes),
            "hour" | "hours" => Some(TimeUnit::Hours),
            "day" | "days" => Some(TimeUnit::Days),
            _ => None,
        }
    }
}

/// Freshness target of a dynamic table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetLag {
    Time { time: u32, unit: TimeUnit },
    Downstream,
}

impl fmt::Display for TargetLag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetLag::Time { time, unit } => write!(f, "{} {}", time, unit.as_str()),
            TargetLag::Downstream => f.write_str("DOWNSTREAM"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    Auto,
    Full,
    Incremental,
}

impl RefreshMode {
    fn as_str(self) -> &'static str {
        match self {
            RefreshMode::Auto => "AUTO",
            RefreshMode::Full => "FULL",
            RefreshMode::Incremental => "INCREMENTAL",
        }
    }
}

/// A single table option.
#[derive(Debug, Clone, PartialEq)]
pub enum TableOption {
    Warehouse(Ident),
    TargetLag(TargetLag),
    RefreshMode(RefreshMode),
    ExternalVolume(String),
    BaseLocation(String),
    Catalog(String),
    Comment(String),
    /// `AS <query>`, always rendered last.
    AsQuery(Box<Query>),
}

fn require_non_empty(option: &'static str, value: &str) -> Result<(), TableOptionError> {
    if value.trim().is_empty() {
        Err(TableOptionError::new(option, "value must not be empty"))
    } else {
        Ok(())
    }
}

impl TableOption {
    pub fn warehouse(name: &str) -> TableOptionResult {
        require_non_empty("WAREHOUSE", name)?;
        Ok(TableOption::Warehouse(Ident::new(name)))
    }

    pub fn target_lag(time: u32, unit: TimeUnit) -> TableOptionResult {
        if time == 0 {
            return Err(TableOptionError::new(
                "TARGET_LAG",
                "time must be greater than zero",
            ));
        }
        Ok(TableOption::TargetLag(TargetLag::Time { time, unit }))
    }

    pub fn target_lag_downstream() -> TableOptionResult {
        Ok(TableOption::TargetLag(TargetLag::Downstream))
    }

    /// Parse `'<n> <unit>'` or `DOWNSTREAM`.
    pub fn parse_target_lag(text: &str) -> TableOptionResult {
        let text = text.trim();
        if text.eq_ignore_ascii_case("downstream") {
            return Self::target_lag_downstream();
        }
        let invalid = || {
            TableOptionError::new(
                "TARGET_LAG",
                format!("expected '<n> <unit>' or DOWNSTREAM, got '{}'", text),
            )
        };
        let mut parts = text.split_whitespace();
        let (Some(time), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let time = time.parse().map_err(|_| invalid())?;
        let unit = TimeUnit::parse(unit).ok_or_else(invalid)?;
        Self::target_lag(time, unit)
    }

    pub fn refresh_mode(mode: &str) -> TableOptionResult {
        let mode = match mode.trim().to_ascii_uppercase().as_str() {
            "AUTO" => RefreshMode::Auto,
            "FULL" => RefreshMode::Full,
            "INCREMENTAL" => RefreshMode::Incremental,
            _ => {
                return Err(TableOptionError::new(
                    "REFRESH_MODE",
                    format!("expected AUTO, FULL or INCREMENTAL, got '{}'", mode),
                ))
            }
        };
        Ok(TableOption::RefreshMode(mode))
    }

    pub fn external_volume(volume: &str) -> TableOptionResult {
        require_non_empty("EXTERNAL_VOLUME", volume)?;
        Ok(TableOption::ExternalVolume(volume.to_string()))
    }

    pub fn base_location(location: &str) -> TableOptionResult {
        require_non_empty("BASE_LOCATION", location)?;
        Ok(TableOption::BaseLocation(location.to_string()))
    }

    pub fn catalog(catalog: &str) -> TableOptionResult {
        require_non_empty("CATALOG", catalog)?;
        Ok(TableOption::Catalog(catalog.to_string()))
    }

    /// The default Iceberg catalog, `CATALOG = 'SNOWFLAKE'`.
    pub fn snowflake_catalog() -> TableOptionResult {
        Self::catalog("SNOWFLAKE")
    }

    pub fn comment(text: &str) -> TableOptionResult {
        Ok(TableOption::Comment(text.to_string()))
    }

    pub fn as_query(query: Query) -> TableOptionResult {
        Ok(TableOption::AsQuery(Box::new(query)))
    }

    /// The option keyword.
    pub fn name(&self) -> &'static str {
        match self {
            TableOption::Warehouse(_) => "WAREHOUSE",
            TableOption::TargetLag(_) => "TARGET_LAG",
            TableOption::RefreshMode(_) => "REFRESH_MODE",
            TableOption::ExternalVolume(_) => "EXTERNAL_VOLUME",
            TableOption::BaseLocation(_) => "BASE_LOCATION",
            TableOption::Catalog(_) => "CATALOG",
            TableOption::Comment(_) => "COMMENT",
            TableOption::AsQuery(_) => "AS",
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            TableOption::Warehouse(_)
            | TableOption::TargetLag(_)
            | TableOption::RefreshMode(_)
            | TableOption::ExternalVolume(_)
            | TableOption::BaseLocation(_)
            | TableOption::Catalog(_) => Priority::High,
            TableOption::Comment(_) => Priority::Medium,
            TableOption::AsQuery(_) => Priority::Lowest,
        }
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        if let TableOption::AsQuery(query) = self {
            ts.push(Token::As).space().append(&query.to_tokens());
            return ts;
        }

        ts.raw(self.name()).space().push(Token::Eq).space();
        match self {
            TableOption::Warehouse(name) => {
                ts.push(Token::Ident(name.clone()));
            }
            TableOption::TargetLag(TargetLag::Downstream) => {
                ts.raw("DOWNSTREAM");
            }
            TableOption::TargetLag(lag) => {
                ts.push(Token::LitString(lag.to_string()));
            }
            TableOption::RefreshMode(mode) => {
                ts.raw(mode.as_str());
            }
            TableOption::ExternalVolume(value)
            | TableOption::BaseLocation(value)
            | TableOption::Catalog(value)
            | TableOption::Comment(value) => {
                ts.push(Token::LitString(value.clone()));
            }
            TableOption::AsQuery(_) => {}
        }
        ts
    }
}

/// Sort options by priority, then by name, both descending.
pub fn sort_options(options: &mut [&TableOption]) {
    options.sort_by(|a, b| {
        b.priority()
            .cmp(&a.priority())
            .then_with(|| b.name().cmp(a.name()))
    });
}

/// Render options in their canonical order, separated by spaces.
pub fn options_to_sql(options: &[TableOption], opts: RenderOptions) -> String {
    let mut refs: Vec<&TableOption> = options.iter().collect();
    sort_options(&mut refs);
    refs.iter()
        .map(|o| o.to_tokens().serialize(opts))
        .collect::<Vec<_>>()
        .join(" ")
}
