// ABOUTME: LiftLog API server binary
// ABOUTME: Loads configuration from the environment, applies CLI overrides and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

//! # LiftLog API Server Binary
//!
//! Starts the multi-tenant fitness tracking REST API.

use anyhow::Result;
use clap::Parser;
use liftlog_server::config::{DatabaseUrl, ServerConfig};
use liftlog_server::{logging, server};
use tracing::info;

#[derive(Parser)]
#[command(name = "liftlog-server")]
#[command(about = "LiftLog - multi-tenant fitness tracking REST API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override host interface
    #[arg(long)]
    host: Option<String>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(url) = args.database_url {
        config.database.url = DatabaseUrl::parse_url(&url)?;
    }
    config.validate()?;

    info!("Starting LiftLog API");
    info!("{}", config.summary());

    server::run(config).await
}
