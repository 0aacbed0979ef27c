//! kiln CLI - on-demand front-end bundle pipeline.

mod bundle;
mod colors;
mod serve;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "On-demand front-end bundle pipeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bundle HTTP service
    Serve {
        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "4400")]
        port: u16,

        /// Directory for ephemeral build projects
        #[arg(long)]
        workdir: Option<String>,

        /// Directory for the filesystem artifact store
        #[arg(long, default_value = "./kiln-store")]
        store_dir: String,

        /// Remote store endpoint (S3-compatible, including bucket).
        /// When set, the filesystem store is not used.
        #[arg(long)]
        store_endpoint: Option<String>,

        /// Public base URL stored assets are served under
        #[arg(long, default_value = "/static")]
        public_base: String,

        /// Additional exact origins allowed by CORS (repeatable)
        #[arg(long = "allow-origin")]
        allowed_origins: Vec<String>,

        /// Retry a failed bundle with the alternate backend
        #[arg(long)]
        fallback: bool,
    },

    /// Run one bundle request from a JSON file and write the artifacts locally
    Bundle {
        /// Path to the request JSON file
        request: String,

        /// Output directory
        #[arg(short, long, default_value = "./dist")]
        output: String,

        /// Retry a failed bundle with the alternate backend
        #[arg(long)]
        fallback: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            workdir,
            store_dir,
            store_endpoint,
            public_base,
            allowed_origins,
            fallback,
        } => {
            serve::execute(serve::ServeArgs {
                host,
                port,
                workdir,
                store_dir,
                store_endpoint,
                public_base,
                allowed_origins,
                fallback,
            })
            .await?;
        }

        Commands::Bundle {
            request,
            output,
            fallback,
        } => {
            bundle::execute(&request, &output, fallback).await?;
        }
    }

    Ok(())
}
