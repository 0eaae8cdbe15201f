use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use webpad::preview::{compose, data_uri, SourceBundle};
use webpad::web::{run_server, ServerConfig, WebAppState};
use webpad::{util, Config, WebpadCore};

#[derive(Parser)]
#[command(name = "webpad")]
#[command(about = "HTML/CSS/JavaScript playground with a sandboxed live preview")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the playground server
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long, short = 'p')]
        port: Option<u16>,

        /// Data directory (default: ~/.webpad)
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Print the composed preview document for three source files
    Compose {
        /// Markup file
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,

        /// Stylesheet file
        #[arg(long, value_name = "FILE")]
        css: Option<PathBuf>,

        /// Script file
        #[arg(long, value_name = "FILE")]
        js: Option<PathBuf>,

        /// Print the document as a data: URI
        #[arg(long)]
        data_uri: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            data_dir,
        } => serve(host, port, data_dir).await,
        Commands::Compose {
            html,
            css,
            js,
            data_uri: as_uri,
        } => {
            let bundle = SourceBundle::new(
                read_fragment(html.as_deref())?,
                read_fragment(css.as_deref())?,
                read_fragment(js.as_deref())?,
            );
            let document = compose(&bundle);
            if as_uri {
                println!("{}", data_uri(&document));
            } else {
                print!("{}", document);
            }
            Ok(())
        }
    }
}

async fn serve(host: Option<String>, port: Option<u16>, data_dir: Option<PathBuf>) -> Result<()> {
    util::init_data_dir(data_dir);

    // Initialize logging to file (~/.webpad/logs/webpad.log)
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .init();

    let mut config = Config::load();
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }

    let server_config = ServerConfig::from(&config.server);
    let core = WebpadCore::open_default(config).context("Failed to open database")?;
    println!(
        "webpad listening on http://{}:{}",
        server_config.host, server_config.port
    );
    run_server(WebAppState::new(core), server_config).await
}

/// A missing flag means an empty fragment.
fn read_fragment(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => Ok(String::new()),
    }
}
