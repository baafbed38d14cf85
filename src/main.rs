use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use linecook::{api, config::ServerConfig, outline, render};

#[derive(Parser)]
#[command(name = "linecook")]
#[command(about = "Task outline with effective-date roll-up and Gantt timeline")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port for HTTP API (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (overrides LINECOOK_BIND)
        #[arg(short, long)]
        bind: Option<String>,

        /// Directory holding doc.json (overrides LINECOOK_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Print the outline with effective dates
    Show {
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Print the week grid of the visible dated tasks
    Timeline {
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "linecook=debug,tower_http=debug".into()),
    );

    // stderr keeps `show`/`timeline` output clean on stdout
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting LineCook server on {}", config.address());

    let store = config.open_store()?;
    let app = api::create_router(store);

    let listener = tokio::net::TcpListener::bind(config.address()).await?;
    tracing::info!("LineCook server listening on http://{}", config.address());

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = ServerConfig::from_env();

    match cli.command {
        Some(Commands::Serve {
            port,
            bind,
            data_dir,
        }) => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if data_dir.is_some() {
                config.data_dir = data_dir;
            }
            serve(config).await?;
        }
        Some(Commands::Show { data_dir }) => {
            if data_dir.is_some() {
                config.data_dir = data_dir;
            }
            let stored = config.open_store()?.current();
            print!("{}", render::render_outline(&stored.doc.tasks));
        }
        Some(Commands::Timeline { data_dir }) => {
            if data_dir.is_some() {
                config.data_dir = data_dir;
            }
            let stored = config.open_store()?.current();
            match outline::build_timeline(&stored.doc.tasks) {
                Some(timeline) => print!("{}", render::render_timeline(&timeline)),
                None => println!("No dated tasks"),
            }
        }
        None => serve(config).await?,
    }

    Ok(())
}
