//! External storage locations: S3 buckets and Azure containers.
//!
//! A location renders as a quoted URI. Its credentials and encryption
//! settings render as separate `CREDENTIALS=(...)` / `ENCRYPTION=(...)`
//! clauses, which the enclosing statement places at the end.

use super::error::OptionError;
use super::render::{ordered, quote_option_string, RenderOptions};

type Attributes = Vec<(&'static str, String)>;

/// `NAME=(K='v' K2='v2')`, or `None` when there are no attributes.
fn attribute_clause(name: &str, attributes: &Attributes, opts: RenderOptions) -> Option<String> {
    if attributes.is_empty() {
        return None;
    }
    let body = ordered(attributes, opts)
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, quote_option_string(v)))
        .collect::<Vec<_>>()
        .join(" ");
    Some(format!("{}=({})", name, body))
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim_matches('/');
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

// ============================================================================
// AWS
// ============================================================================

/// An S3 bucket with an optional key prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "builders have no effect until used"]
pub struct AwsBucket {
    pub bucket: String,
    pub path: Option<String>,
    credentials: Attributes,
    encryption: Attributes,
}

impl AwsBucket {
    pub fn new(bucket: impl Into<String>, path: Option<&str>) -> Self {
        Self {
            bucket: bucket.into(),
            path: path.and_then(non_empty),
            credentials: Vec::new(),
            encryption: Vec::new(),
        }
    }

    /// Parse `s3://bucket[/path]`.
    pub fn from_uri(uri: &str) -> Result<Self, OptionError> {
        let rest = uri
            .strip_prefix("s3://")
            .ok_or_else(|| OptionError::InvalidBucketUri(uri.to_string()))?;
        let (bucket, path) = match rest.split_once('/') {
            Some((bucket, path)) => (bucket, Some(path)),
            None => (rest, None),
        };
        if bucket.is_empty() {
            return Err(OptionError::InvalidBucketUri(uri.to_string()));
        }
        Ok(Self::new(bucket, path))
    }

    /// Authenticate with an IAM role. Replaces any earlier credentials.
    pub fn credentials_role(mut self, role: impl Into<String>) -> Self {
        self.credentials = vec![("AWS_ROLE", role.into())];
        self
    }

    /// Authenticate with access keys. Replaces any earlier credentials.
    pub fn credentials_keys(
        mut self,
        key_id: impl Into<String>,
        secret_key: impl Into<String>,
        token: Option<&str>,
    ) -> Self {
        let mut credentials = vec![
            ("AWS_KEY_ID", key_id.into()),
            ("AWS_SECRET_KEY", secret_key.into()),
        ];
        if let Some(token) = token {
            credentials.push(("AWS_TOKEN", token.to_string()));
        }
        self.credentials = credentials;
        self
    }

    /// Client-side encryption. Replaces any earlier encryption setting.
    pub fn encryption_aws_cse(mut self, master_key: impl Into<String>) -> Self {
        self.encryption = vec![("TYPE", "AWS_CSE".into()), ("MASTER_KEY", master_key.into())];
        self
    }

    pub fn encryption_aws_sse_s3(mut self) -> Self {
        self.encryption = vec![("TYPE", "AWS_SSE_S3".into())];
        self
    }

    pub fn encryption_aws_sse_kms(mut self, kms_key_id: Option<&str>) -> Self {
        let mut encryption = vec![("TYPE", "AWS_SSE_KMS".to_string())];
        if let Some(key) = kms_key_id {
            encryption.push(("KMS_KEY_ID", key.to_string()));
        }
        self.encryption = encryption;
        self
    }

    pub fn uri(&self) -> String {
        match &self.path {
            Some(path) => format!("s3://{}/{}", self.bucket, path),
            None => format!("s3://{}", self.bucket),
        }
    }
}

// ============================================================================
// Azure
// ============================================================================

const AZURE_BLOB_HOST: &str = ".blob.core.windows.net";

/// An Azure blob container with an optional path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "builders have no effect until used"]
pub struct AzureContainer {
    pub account: String,
    pub container: String,
    pub path: Option<String>,
    credentials: Attributes,
    encryption: Attributes,
}

impl AzureContainer {
    pub fn new(account: impl Into<String>, container: impl Into<String>, path: Option<&str>) -> Self {
        Self {
            account: account.into(),
            container: container.into(),
            path: path.and_then(non_empty),
            credentials: Vec::new(),
            encryption: Vec::new(),
        }
    }

    /// Parse `azure://<account>.blob.core.windows.net/<container>[/path]`.
    pub fn from_uri(uri: &str) -> Result<Self, OptionError> {
        let invalid = || OptionError::InvalidContainerUri(uri.to_string());

        let rest = uri.strip_prefix("azure://").ok_or_else(invalid)?;
        let (host, location) = rest.split_once('/').ok_or_else(invalid)?;
        let account = host.strip_suffix(AZURE_BLOB_HOST).ok_or_else(invalid)?;
        let (container, path) = match location.split_once('/') {
            Some((container, path)) => (container, Some(path)),
            None => (location, None),
        };
        if account.is_empty() || container.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(account, container, path))
    }

    /// Authenticate with a shared access signature token.
    pub fn credentials(mut self, sas_token: impl Into<String>) -> Self {
        self.credentials = vec![("AZURE_SAS_TOKEN", sas_token.into())];
        self
    }

    pub fn encryption_azure_cse(mut self, master_key: impl Into<String>) -> Self {
        self.encryption = vec![("TYPE", "AZURE_CSE".into()), ("MASTER_KEY", master_key.into())];
        self
    }

    pub fn uri(&self) -> String {
        let base = format!("azure://{}{}/{}", self.account, AZURE_BLOB_HOST, self.container);
        match &self.path {
            Some(path) => format!("{}/{}", base, path),
            None => base,
        }
    }
}

// ============================================================================
// StorageLocation
// ============================================================================

/// Either kind of external storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    Aws(AwsBucket),
    Azure(AzureContainer),
}

impl StorageLocation {
    pub fn uri(&self) -> String {
        match self {
            StorageLocation::Aws(b) => b.uri(),
            StorageLocation::Azure(c) => c.uri(),
        }
    }

    /// The URI as a quoted literal.
    pub fn quoted_uri(&self) -> String {
        quote_option_string(&self.uri())
    }

    fn attributes(&self) -> (&Attributes, &Attributes) {
        match self {
            StorageLocation::Aws(b) => (&b.credentials, &b.encryption),
            StorageLocation::Azure(c) => (&c.credentials, &c.encryption),
        }
    }

    pub fn credentials_clause(&self, opts: RenderOptions) -> Option<String> {
        attribute_clause("CREDENTIALS", self.attributes().0, opts)
    }

    pub fn encryption_clause(&self, opts: RenderOptions) -> Option<String> {
        attribute_clause("ENCRYPTION", self.attributes().1, opts)
    }

    /// Credentials then encryption, each only when set.
    pub fn trailing_clauses(&self, opts: RenderOptions) -> Vec<String> {
        [self.credentials_clause(opts), self.encryption_clause(opts)]
            .into_iter()
            .flatten()
            .collect()
    }
}

impl From<AwsBucket> for StorageLocation {
    fn from(bucket: AwsBucket) -> Self {
        StorageLocation::Aws(bucket)
    }
}

impl From<AzureContainer> for StorageLocation {
    fn from(container: AzureContainer) -> Self {
        StorageLocation::Azure(container)
    }
}
