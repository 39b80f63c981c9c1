pub const VERSION: &str = "0.1.0";
pub const TOOL_DIR: &str = ".bkp";
pub const TOOL_DEFAULT_CONFIG_FILE: &str = "config.yaml";

pub const REMOTE_SERVER_NAME: &str = "demo_server";
pub const REMOTE_SERVER_HOST: &str = "127.0.0.1";
pub const REMOTE_SERVER_PORT: i64 = 80;
pub const REMOTE_SERVER_API_PATH: &str = "/api/";

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

pub const DEFAULT_FULL_COMPRESSION: &str = "native";
pub const DEFAULT_CONCURRENCY: u64 = 0;
pub const DEFAULT_FULL_INTERVAL: u64 = 0;
pub const DEFAULT_OFFLINE_SNAPSHOT: bool = false;
pub const DEFAULT_REPORT_WHEN: &str = "failure";
pub const DEFAULT_TIMEOUT: u64 = 0;

pub fn default_config() -> String {
    format!(
        r"poll-interval: {DEFAULT_POLL_INTERVAL_SECS}
remote:
  - name: {REMOTE_SERVER_NAME}
    host: {REMOTE_SERVER_HOST}
    port: {REMOTE_SERVER_PORT}
    tls: false
settings-defaults:
  full:
    compression: {DEFAULT_FULL_COMPRESSION}
    concurrency: {DEFAULT_CONCURRENCY}
    full-interval: {DEFAULT_FULL_INTERVAL}
    offline-snapshot: {DEFAULT_OFFLINE_SNAPSHOT}
    report-when: {DEFAULT_REPORT_WHEN}
    timeout: {DEFAULT_TIMEOUT}
"
    )
}
