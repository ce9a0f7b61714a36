use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::networking::peer::NodeAddr;

pub const DEFAULT_NODE_HOST: &str = "localhost";
pub const DEFAULT_NODE_PORT: u32 = 8766;
/// Connect timeout of fire-and-forget commands.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 1000;
/// Connect timeout of commands that wait for a response.
pub const DEFAULT_WAIT_CONNECT_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 30000;
pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 30000;

/// Settings of a `NodeClient`.
///
/// `node_host`/`node_port` is the address of our own node. It goes into the
/// `addr_from` field of outgoing requests and is the target of the node
/// management commands. `auth_token` is sent with those management commands
/// and is fixed for the lifetime of the client.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub node_host: String,
    pub node_port: u32,
    pub auth_token: Option<String>,
    pub connect_timeout_ms: u64,
    pub wait_connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub write_timeout_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        ClientSettings {
            node_host: String::from(DEFAULT_NODE_HOST),
            node_port: DEFAULT_NODE_PORT,
            auth_token: None,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            wait_connect_timeout_ms: DEFAULT_WAIT_CONNECT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            write_timeout_ms: DEFAULT_WRITE_TIMEOUT_MS,
        }
    }
}

impl ClientSettings {
    /// Loads settings from the config file `config_name` (any format the
    /// `config` crate understands, the file may be missing) and from
    /// `SQLCHAIN_*` environment variables, which win over the file.
    pub fn load(config_name: &str) -> Result<ClientSettings, ConfigError> {
        let mut settings = Config::default();
        settings.set_default("node_host", DEFAULT_NODE_HOST)?;
        settings.set_default("node_port", DEFAULT_NODE_PORT as i64)?;
        settings.set_default("connect_timeout_ms", DEFAULT_CONNECT_TIMEOUT_MS as i64)?;
        settings.set_default(
            "wait_connect_timeout_ms",
            DEFAULT_WAIT_CONNECT_TIMEOUT_MS as i64,
        )?;
        settings.set_default("read_timeout_ms", DEFAULT_READ_TIMEOUT_MS as i64)?;
        settings.set_default("write_timeout_ms", DEFAULT_WRITE_TIMEOUT_MS as i64)?;

        settings.merge(File::with_name(config_name).required(false))?;
        settings.merge(Environment::with_prefix("SQLCHAIN"))?;

        settings.try_into()
    }

    pub fn node_address(&self) -> NodeAddr {
        NodeAddr::new(&self.node_host, self.node_port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn wait_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn test_load_defaults_without_file() {
        let settings = ClientSettings::load("this_config_does_not_exist").unwrap();
        assert_eq!(settings, ClientSettings::default());
        assert_eq!(settings.node_address(), NodeAddr::new("localhost", 8766));
        assert_eq!(settings.connect_timeout(), Duration::from_secs(1));
        assert_eq!(settings.wait_connect_timeout(), Duration::from_secs(2));
        assert_eq!(settings.write_timeout(), Duration::from_secs(30));
    }

    #[test]
    #[serial_test::serial]
    fn test_load_from_environment() {
        std::env::set_var("SQLCHAIN_AUTH_TOKEN", "adminsecret");
        std::env::set_var("SQLCHAIN_NODE_PORT", "9000");
        let settings = ClientSettings::load("this_config_does_not_exist");
        std::env::remove_var("SQLCHAIN_AUTH_TOKEN");
        std::env::remove_var("SQLCHAIN_NODE_PORT");

        let settings = settings.unwrap();
        assert_eq!(settings.auth_token, Some(String::from("adminsecret")));
        assert_eq!(settings.node_port, 9000);
        assert_eq!(settings.node_host, DEFAULT_NODE_HOST);
    }
}
