//! Configuration shared by binaries.

use std::path::PathBuf;

use clap::Args;

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Data store settings.
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// Directory holding the persisted carts, items, products and counters
    #[arg(long, env = "VALLMERE_DATA_DIR", default_value = ".vallmere")]
    pub data_dir: PathBuf,
}

/// Load `.env` into the process environment when present.
pub fn load_dotenv() {
    _ = dotenvy::dotenv();
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        store: StoreConfig,

        #[command(flatten)]
        logging: LoggingConfig,
    }

    #[test]
    fn flags_override_defaults() -> Result<(), clap::Error> {
        let parsed = Harness::try_parse_from([
            "harness",
            "--data-dir",
            "/tmp/carts",
            "--log-format",
            "json",
            "--log-level",
            "debug",
        ])?;

        assert_eq!(parsed.store.data_dir, PathBuf::from("/tmp/carts"));
        assert_eq!(parsed.logging.log_format, LogFormat::Json);
        assert_eq!(parsed.logging.log_level, "debug");

        Ok(())
    }
}
