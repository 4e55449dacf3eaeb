#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Entry point for the deprivation map API server.

use std::path::PathBuf;

use clap::Parser;
use depriv_map_server::{ServerConfig, ServerError, run_server};

/// Serve the PPFI / IMD deprivation map dashboard API.
#[derive(Parser)]
#[command(name = "depriv_map_server")]
#[command(about = "Serve the PPFI / IMD deprivation map dashboard API")]
struct Cli {
    /// Directory holding the LSOA and LAD boundary files and the
    /// comparison CSV.
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Address to bind.
    #[arg(long = "bind", env = "BIND_ADDR", default_value = "127.0.0.1")]
    bind_addr: String,

    /// Port to bind.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
}

#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    run_server(ServerConfig {
        data_dir: cli.data_dir,
        bind_addr: cli.bind_addr,
        port: cli.port,
    })
    .await
}
