mod cli;
mod clock;
mod control_loop;
mod host;
mod remote;
mod sensor;
mod shutdown;
mod status_store;

use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    host::run(cli::Args::parse()).await
}
