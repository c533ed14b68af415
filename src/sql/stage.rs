//! External stages and the DDL that creates stages and file formats.
//!
//! Stage and file format names are written verbatim, as they appear in the
//! warehouse (`MY_DB.MY_SCHEMA.AZURE_STAGE`), without identifier quoting.

use super::error::{CompileError, CompileResult};
use super::formatter::{CopyFormatter, FormatKind};
use super::render::RenderOptions;
use super::storage::StorageLocation;
use super::token::{Token, TokenStream};

// ============================================================================
// ExternalStage
// ============================================================================

/// A reference to a named stage, `@[namespace.]name[/path]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "builders have no effect until used"]
pub struct ExternalStage {
    pub name: String,
    pub namespace: Option<String>,
    pub path: Option<String>,
    /// Named file format applied when the stage is read as a table.
    pub file_format: Option<String>,
}

impl ExternalStage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            path: None,
            file_format: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.namespace = (!namespace.is_empty()).then_some(namespace);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = path.trim_matches('/');
        self.path = (!path.is_empty()).then(|| path.to_string());
        self
    }

    pub fn with_file_format(mut self, format_name: impl Into<String>) -> Self {
        self.file_format = Some(format_name.into());
        self
    }

    /// A stage reference below `parent`. The parent's path, if any, is kept as
    /// a prefix.
    pub fn from_parent(parent: &ExternalStage, path: &str) -> Self {
        let path = path.trim_matches('/');
        let path = match (&parent.path, path.is_empty()) {
            (Some(prefix), false) => format!("{}/{}", prefix, path),
            (Some(prefix), true) => prefix.clone(),
            (None, _) => path.to_string(),
        };
        ExternalStage {
            path: None,
            file_format: None,
            ..parent.clone()
        }
        .with_path(path)
    }

    /// `namespace.name` without the `@` sigil or path.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.name),
            None => self.name.clone(),
        }
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.raw(format!("@{}", self.qualified_name()));
        if let Some(path) = &self.path {
            ts.raw(format!("/{}", path));
        }
        if let Some(format_name) = &self.file_format {
            ts.space().raw(format!("(file_format => {})", format_name));
        }
        ts
    }

    pub fn to_sql(&self, opts: RenderOptions) -> String {
        self.to_tokens().serialize(opts)
    }
}

// ============================================================================
// CREATE STAGE
// ============================================================================

/// `CREATE [OR REPLACE ][TEMPORARY ]STAGE ns.name URL='...'`
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "builders have no effect until used"]
pub struct CreateStage {
    pub stage: ExternalStage,
    pub location: StorageLocation,
    pub or_replace: bool,
    pub temporary: bool,
}

impl CreateStage {
    pub fn new(stage: ExternalStage, location: impl Into<StorageLocation>) -> Self {
        Self {
            stage,
            location: location.into(),
            or_replace: false,
            temporary: false,
        }
    }

    pub fn or_replace(mut self) -> Self {
        self.or_replace = true;
        self
    }

    pub fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    pub fn to_tokens(&self, opts: RenderOptions) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Create).space();
        if self.or_replace {
            ts.push(Token::Or).space().push(Token::Replace).space();
        }
        if self.temporary {
            ts.push(Token::Temporary).space();
        }
        ts.push(Token::Stage)
            .space()
            .raw(self.stage.qualified_name())
            .space()
            .push(Token::Url)
            .raw(format!("={}", self.location.quoted_uri()));

        for clause in self.location.trailing_clauses(opts) {
            ts.space().raw(clause);
        }
        ts
    }

    pub fn to_sql(&self, opts: RenderOptions) -> String {
        self.to_tokens(opts).serialize(opts)
    }
}

// ============================================================================
// CREATE FILE FORMAT
// ============================================================================

/// `CREATE [OR REPLACE ]FILE FORMAT name TYPE='csv' OPTION = value ...`
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "builders have no effect until used"]
pub struct CreateFileFormat {
    pub name: String,
    pub formatter: CopyFormatter,
    pub or_replace: bool,
}

impl CreateFileFormat {
    pub fn new(name: impl Into<String>, formatter: impl Into<CopyFormatter>) -> Self {
        Self {
            name: name.into(),
            formatter: formatter.into(),
            or_replace: false,
        }
    }

    pub fn or_replace(mut self) -> Self {
        self.or_replace = true;
        self
    }

    pub fn to_tokens(&self, opts: RenderOptions) -> CompileResult<TokenStream> {
        let kind = match &self.formatter.kind {
            FormatKind::File(kind) => *kind,
            FormatKind::Named(name) => return Err(CompileError::NamedFileFormat(name.clone())),
        };

        let mut ts = TokenStream::new();
        ts.push(Token::Create).space();
        if self.or_replace {
            ts.push(Token::Or).space().push(Token::Replace).space();
        }
        ts.push(Token::FileFormat)
            .space()
            .raw(&self.name)
            .space()
            .raw(format!("TYPE='{}'", kind.as_str()));

        let options = self.formatter.options_sql(" = ", opts);
        if !options.is_empty() {
            ts.space().raw(options);
        }
        Ok(ts)
    }

    pub fn to_sql(&self, opts: RenderOptions) -> CompileResult<String> {
        Ok(self.to_tokens(opts)?.serialize(opts))
    }
}
