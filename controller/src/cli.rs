use std::path::PathBuf;

use clap::Parser;

/// Time-of-day heater control daemon.
#[derive(Debug, Parser)]
#[command(name = "thermd", version)]
pub struct Args {
    /// key=value configuration file
    #[arg(short, long, default_value = "thermd.conf")]
    pub config: PathBuf,
}
