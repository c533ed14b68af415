//! Configuration: connection URLs and the TOML settings file.

mod settings;
mod url;

pub use settings::{
    expand_env_vars, ConnectionSettings, DialectSettings, RenderSettings, Settings, SettingsError,
};
pub use url::{parse_bool, ConnectArgs, ConnectionUrl, ParamValue, UrlBuilder, UrlError, UrlResult};
