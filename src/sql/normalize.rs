//! Case normalization between Snowflake's uppercase storage convention and
//! the lowercase logical names used by callers.
//!
//! `normalize_name` is applied to names read back from the warehouse;
//! `denormalize_name` to names about to be sent to it.

use super::identifier::{Ident, IdentifierPreparer};

const PREPARER: IdentifierPreparer = IdentifierPreparer;

/// Convert a warehouse-reported name into its logical spelling.
///
/// - `""` becomes a quote-marked empty name.
/// - An all-uppercase name whose lowercase form needs no quoting becomes
///   lowercase.
/// - An all-lowercase name is case-sensitive in the warehouse, so it is
///   marked as quoted.
/// - Anything else is returned unchanged.
pub fn normalize_name(name: &str) -> Ident {
    if name.is_empty() {
        return Ident::quoted("");
    }
    let lower = name.to_lowercase();
    if name.to_uppercase() == name && !PREPARER.requires_quotes(&lower) {
        Ident::new(lower)
    } else if lower == name {
        Ident::quoted(name)
    } else {
        Ident::new(name)
    }
}

/// Convert a logical name into the spelling the warehouse stores.
pub fn denormalize_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let lower = name.to_lowercase();
    if lower == name && !PREPARER.requires_quotes(&lower) {
        name.to_uppercase()
    } else {
        name.to_string()
    }
}

/// Denormalize an [`Ident`]; quote-marked names keep their spelling.
pub fn denormalize_ident(ident: &Ident) -> String {
    if ident.is_quoted() {
        ident.value.clone()
    } else {
        denormalize_name(&ident.value)
    }
}

/// Denormalize and quote a name for use inside metadata statements.
///
/// An explicit empty identifier renders as `""`.
pub fn quote_for_sql(name: &str) -> String {
    if name.is_empty() {
        return PREPARER.quote_identifier("");
    }
    let denormalized = denormalize_name(name);
    // An uppercase denormalized name is stored uppercase, so it stays bare.
    if denormalized != name {
        denormalized
    } else {
        PREPARER.quote_str(&denormalized)
    }
}

/// Denormalize and quote each present part, then join with `.`.
///
/// A part that already contains dots (for example `db.schema`) is split
/// quote-aware first.
pub fn denormalize_quote_join(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .flatten()
        .flat_map(|part| PREPARER.split_qualified(part))
        .map(|segment| quote_for_sql(&segment))
        .collect::<Vec<_>>()
        .join(".")
}
