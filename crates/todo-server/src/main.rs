use clap::Parser;
use std::path::PathBuf;

use todo_server::config::{default_database_path, DEFAULT_HOST, DEFAULT_PORT};
use todo_server::logging::init_logging;
use todo_server::{run_server, ServerConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "todo-server")]
#[command(about = "Todo list REST API backed by SQLite")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Address to bind
    #[arg(long, env = "TODO_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Server port
    #[arg(long, env = "TODO_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// SQLite database file
    #[arg(long, env = "TODO_DATABASE")]
    database: Option<PathBuf>,

    /// Number of HTTP workers
    #[arg(long, env = "TODO_WORKERS")]
    workers: Option<usize>,
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            database_path: cli.database.unwrap_or_else(default_database_path),
            workers: cli.workers,
            debug: cli.debug,
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(cli.debug);

    let config = ServerConfig::from(cli);
    log::info!("Starting todo server on {}", config.bind_addr());
    log::debug!("Server configuration: {:?}", config);

    run_server(config).await?;
    Ok(())
}
