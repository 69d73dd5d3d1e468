//! Command-line arguments for sevtrack-api
//!
//! Every option can also be supplied through its environment variable.

use clap::Parser;
use sevtrack_common::config::ConfigOverrides;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "sevtrack-api")]
#[command(about = "Bug report intake service with external severity classification")]
#[command(version)]
pub struct Cli {
    /// TOML config file (default: <config dir>/sevtrack/config.toml if present)
    #[arg(short, long, env = "SEVTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "SEVTRACK_HOST")]
    pub host: Option<String>,

    /// SQLite connection string, e.g. sqlite://sevtrack.db
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Program used to run the classifier scripts
    #[arg(long, env = "SEVTRACK_INTERPRETER")]
    pub interpreter: Option<String>,

    /// Script classifying a single report
    #[arg(long, env = "SEVTRACK_SINGLE_SCRIPT")]
    pub single_script: Option<PathBuf>,

    /// Script classifying a batch of reports
    #[arg(long, env = "SEVTRACK_BATCH_SCRIPT")]
    pub batch_script: Option<PathBuf>,

    /// Kill a classifier run after this many seconds (0 or unset: wait forever)
    #[arg(long, env = "SEVTRACK_CLASSIFIER_TIMEOUT_SECS")]
    pub classifier_timeout_secs: Option<u64>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            host: self.host.clone(),
            database_url: self.database_url.clone(),
            interpreter: self.interpreter.clone(),
            single_script: self.single_script.clone(),
            batch_script: self.batch_script.clone(),
            classifier_timeout_secs: self.classifier_timeout_secs,
        }
    }
}
