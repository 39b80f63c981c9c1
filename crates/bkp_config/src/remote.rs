use crate::definitions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BkpRemoteServerConfig {
    pub name: String,

    #[serde(default = "BkpRemoteServerConfig::default_host")]
    pub host: String,

    #[serde(default = "BkpRemoteServerConfig::default_port")]
    pub port: i64,

    #[serde(default)]
    pub tls: bool,

    /// Authentication token sent with every request as the
    /// `authenticationToken` cookie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl BkpRemoteServerConfig {
    fn default_host() -> String {
        definitions::REMOTE_SERVER_HOST.to_owned()
    }

    fn default_port() -> i64 {
        definitions::REMOTE_SERVER_PORT
    }

    /// Checks the value of the tls field and returns the appropriate form
    /// of the http protocol to be used, either http or https.
    pub fn http_protocol(&self) -> &'static str {
        if self.tls { "https" } else { "http" }
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.http_protocol(), self.host, self.port)
    }

    pub fn api_url(&self) -> String {
        format!("{}{}", self.base_url(), definitions::REMOTE_SERVER_API_PATH)
    }
}

impl Default for BkpRemoteServerConfig {
    fn default() -> Self {
        Self {
            name: definitions::REMOTE_SERVER_NAME.to_owned(),
            host: Self::default_host(),
            port: Self::default_port(),
            tls: false,
            token: None,
        }
    }
}
