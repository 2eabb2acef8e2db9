// Configuration module entry point
// Compiled-in values and runtime state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::Config;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ROOT: &str = ".";

impl Config {
    /// Build the configuration from the compiled-in values.
    /// There is no configuration file, no flag and no environment source:
    /// changing the port means changing `DEFAULT_PORT`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("server.root", DEFAULT_ROOT)?
            .set_default("server.backlog", 128)?
            .set_default("server.keep_alive", true)?
            .set_default("logging.access_log", true)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// URL printed at startup; wildcard hosts are shown as `localhost`
    pub fn public_url(&self) -> String {
        let host = match self.server.host.as_str() {
            "0.0.0.0" | "::" | "" => "localhost",
            other => other,
        };
        format!("http://{host}:{}/", self.server.port)
    }
}
