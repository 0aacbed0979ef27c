//! Serve command implementation for the kiln CLI.
//!
//! Starts the bundle HTTP service with a filesystem or remote store.

use std::path::PathBuf;
use std::sync::Arc;

use kiln_core::{ArtifactStore, FsStore, PipelineOptions};
use kiln_server::{RemoteStore, ServerConfig};

use crate::colors;

pub struct ServeArgs {
    pub host: String,
    pub port: u16,
    pub workdir: Option<String>,
    pub store_dir: String,
    pub store_endpoint: Option<String>,
    pub public_base: String,
    pub allowed_origins: Vec<String>,
    pub fallback: bool,
}

/// Start the bundle service.
pub async fn execute(args: ServeArgs) -> anyhow::Result<()> {
    let store: Arc<dyn ArtifactStore> = match &args.store_endpoint {
        Some(endpoint) => Arc::new(RemoteStore::new(endpoint.clone(), args.public_base.clone())),
        None => Arc::new(FsStore::new(&args.store_dir, args.public_base.clone())),
    };

    let mut options = PipelineOptions::default();
    options.auto_fallback = args.fallback;
    if let Some(workdir) = &args.workdir {
        options.workdir = PathBuf::from(workdir);
    }

    println!(
        "\n{}kiln{} - bundle pipeline service",
        colors::BOLD,
        colors::RESET
    );
    println!("{}", "─".repeat(50));
    println!(
        "{}  ◆ Server:{} http://{}:{}",
        colors::CYAN,
        colors::RESET,
        args.host,
        args.port
    );
    match &args.store_endpoint {
        Some(endpoint) => println!(
            "{}  ◆ Store:{} remote ({})",
            colors::CYAN,
            colors::RESET,
            endpoint
        ),
        None => println!(
            "{}  ◆ Store:{} {}",
            colors::CYAN,
            colors::RESET,
            args.store_dir
        ),
    }
    println!(
        "{}  ◆ Workdir:{} {}",
        colors::CYAN,
        colors::RESET,
        options.workdir.display()
    );
    println!("{}", "─".repeat(50));
    println!("{}Press Ctrl+C to stop{}", colors::GREEN, colors::RESET);
    println!();

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        allowed_origins: args.allowed_origins,
    };

    kiln_server::serve(store, options, config).await
}
