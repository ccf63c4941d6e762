use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Command-line flags. Anything given here wins over file and environment.
#[derive(Debug, Default, Parser)]
#[command(name = "nopaste", version, about = "Minimal content-addressed pastebin")]
pub struct Cli {
    /// Data directory.
    #[arg(long = "data", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Server address, either `host:port` or `:port`.
    #[arg(long, value_name = "ADDR")]
    pub addr: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Directory holding one file per paste. Default: "data".
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Listen address. Default: ":8989".
    #[serde(default = "default_addr")]
    pub addr: String,
}

fn default_data_dir() -> PathBuf {
    "data".into()
}
fn default_addr() -> String {
    ":8989".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            addr: default_addr(),
        }
    }
}

impl AppConfig {
    pub fn load(cli: Cli) -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("NOPASTE_CONFIG").unwrap_or_else(|_| "config/nopaste".to_string());

        let mut builder = Config::builder()
            .set_default("data_dir", "data")?
            .set_default("addr", ":8989")?
            .add_source(File::with_name(&config_path).required(false))
            // e.g. NOPASTE__DATA_DIR=/var/lib/nopaste
            .add_source(Environment::with_prefix("NOPASTE").separator("__"));

        if let Some(dir) = cli.data_dir {
            builder = builder.set_override("data_dir", dir.to_string_lossy().into_owned())?;
        }
        if let Some(addr) = cli.addr {
            builder = builder.set_override("addr", addr)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Resolve [`AppConfig::addr`] to a bindable socket address.
    ///
    /// A bare `:port` listens on all interfaces.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = self.addr.trim();
        let candidate = match addr.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}"),
            None => addr.to_string(),
        };

        candidate
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| ConfigError::Message(format!("invalid listen address: {addr:?}")))
    }
}
