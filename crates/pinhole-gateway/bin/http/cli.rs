use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "PINHOLE_LISTEN_ADDR";
pub const DATA_FILE_ENV: &str = "PINHOLE_DATA_FILE";
pub const SEED_ENV: &str = "SEED";
pub const COLLISION_RETRIES_ENV: &str = "PINHOLE_COLLISION_RETRIES";
pub const PUBLIC_BASE_URL_ENV: &str = "PINHOLE_PUBLIC_BASE_URL";
pub const LOG_FORMAT_ENV: &str = "PINHOLE_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DATA_FILE: &str = "urls.txt";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080/x";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[value(name = "json")]
    Json,
    #[value(name = "pretty")]
    Pretty,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "pinhole")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Append-only log holding every url.
    #[arg(long, env = DATA_FILE_ENV, default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    /// Secret the code generator is seeded from; a built-in seed is used when unset.
    #[arg(long, env = SEED_ENV, hide_env_values = true)]
    pub seed: Option<String>,

    /// Extra attempts on a generated code collision; 0 fails the request.
    #[arg(long, env = COLLISION_RETRIES_ENV, default_value_t = 0)]
    pub collision_retries: u32,

    /// Prefix of the `short_url` returned to clients.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormat::Json
    )]
    pub log_format: LogFormat,
}
