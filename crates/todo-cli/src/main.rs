use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{self, Write};
use std::path::PathBuf;
use uuid::Uuid;

use todo_core::{
    default_data_dir, JsonFileStorage, TodoEvents, TodoFilter, TodoPatch, TodoPersistence,
    TodoPresenter, TodoStore, TodoView,
};

mod ids;
mod view;

use ids::resolve_id;
use view::TerminalView;

const TODO_FILE: &str = "todos.json";

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Manage a todo list stored in a local JSON file")]
#[command(version)]
struct Cli {
    /// JSON file holding the list
    #[arg(long, env = "TODO_FILE")]
    file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a todo
    Add {
        /// Todo text; several words are joined with spaces
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Show todos
    List {
        /// all, active or completed
        #[arg(long, short, default_value = "all")]
        filter: TodoFilter,
    },
    /// Flip a todo between open and completed
    Toggle {
        /// Full id or a unique prefix
        id: String,
    },
    /// Change a todo's text or completion
    Edit {
        id: String,
        #[arg(long)]
        text: Option<String>,
        #[arg(long, conflicts_with = "undone")]
        done: bool,
        #[arg(long)]
        undone: bool,
    },
    /// Delete a todo
    Rm { id: String },
    /// Delete every completed todo
    Clear,
    /// Mark every todo completed (or open with --undone)
    ToggleAll {
        #[arg(long)]
        undone: bool,
    },
}

fn init_logging(debug: bool) {
    let filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.debug);

    let path = cli
        .file
        .unwrap_or_else(|| default_data_dir().join(TODO_FILE));
    log::debug!("Using todo file {:?}", path);

    let store = TodoStore::open(JsonFileStorage::new(&path)).await;
    let mut presenter = TodoPresenter::new(store, TerminalView::new(io::stdout()));

    let command = cli.command.unwrap_or(Commands::List {
        filter: TodoFilter::All,
    });
    run(&mut presenter, command).await
}

async fn run<P, V>(presenter: &mut TodoPresenter<P, V>, command: Commands) -> Result<()>
where
    P: TodoPersistence,
    V: TodoView,
{
    match command {
        Commands::Add { text } => {
            presenter.on_create(&text.join(" ")).await?;
        }
        Commands::List { filter } => presenter.on_filter(filter),
        Commands::Toggle { id } => {
            if let Some(id) = lookup(presenter, &id)? {
                presenter.on_toggle(id).await?;
            }
        }
        Commands::Edit {
            id,
            text,
            done,
            undone,
        } => {
            let patch = TodoPatch {
                text,
                completed: if done {
                    Some(true)
                } else if undone {
                    Some(false)
                } else {
                    None
                },
            };
            if patch.is_empty() {
                bail!("Nothing to change, pass --text, --done or --undone");
            }
            if let Some(id) = lookup(presenter, &id)? {
                presenter.on_update(id, patch).await?;
            }
        }
        Commands::Rm { id } => {
            if let Some(id) = lookup(presenter, &id)? {
                presenter.on_delete(id).await?;
            }
        }
        Commands::Clear => {
            let removed = presenter.on_clear_completed().await?;
            eprintln!("{}", format!("Removed {} completed todo(s)", removed).dimmed());
        }
        Commands::ToggleAll { undone } => {
            presenter.on_toggle_all(!undone).await?;
        }
    }
    Ok(())
}

/// Resolve `raw` against the current list; unknown ids are reported and skipped.
fn lookup<P, V>(presenter: &mut TodoPresenter<P, V>, raw: &str) -> Result<Option<Uuid>>
where
    P: TodoPersistence,
    V: TodoView,
{
    let id = resolve_id(presenter.store().items(), raw)?;
    match id {
        Some(id) if presenter.store().get(id).is_some() => Ok(Some(id)),
        _ => {
            eprintln!("{}", format!("No todo matches '{}'", raw).yellow());
            presenter.refresh();
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn file_presenter(
        path: &std::path::Path,
    ) -> TodoPresenter<JsonFileStorage, TerminalView<Vec<u8>>> {
        let store = TodoStore::open(JsonFileStorage::new(path)).await;
        TodoPresenter::new(store, TerminalView::new(Vec::new()))
    }

    #[tokio::test]
    async fn commands_persist_between_runs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(TODO_FILE);

        let mut presenter = file_presenter(&path).await;
        let add = Commands::Add {
            text: vec!["buy".into(), "milk".into()],
        };
        run(&mut presenter, add).await.unwrap();

        let mut presenter = file_presenter(&path).await;
        assert_eq!(presenter.store().items()[0].text, "buy milk");
        let id = presenter.store().items()[0].id.to_string();

        run(&mut presenter, Commands::Toggle { id: id[..8].into() })
            .await
            .unwrap();
        run(&mut presenter, Commands::Clear).await.unwrap();

        let presenter = file_presenter(&path).await;
        assert!(presenter.store().is_empty());
    }

    #[tokio::test]
    async fn edit_requires_a_change() {
        let dir = tempdir().unwrap();
        let mut presenter = file_presenter(&dir.path().join(TODO_FILE)).await;
        let edit = Commands::Edit {
            id: "abc".into(),
            text: None,
            done: false,
            undone: false,
        };
        assert!(run(&mut presenter, edit).await.is_err());
    }

    #[tokio::test]
    async fn unknown_id_is_skipped() {
        let dir = tempdir().unwrap();
        let mut presenter = file_presenter(&dir.path().join(TODO_FILE)).await;
        run(
            &mut presenter,
            Commands::Add {
                text: vec!["stay".into()],
            },
        )
        .await
        .unwrap();

        run(&mut presenter, Commands::Rm { id: "zzzz".into() })
            .await
            .unwrap();
        assert_eq!(presenter.store().len(), 1);
    }

    #[tokio::test]
    async fn blank_add_is_rejected() {
        let dir = tempdir().unwrap();
        let mut presenter = file_presenter(&dir.path().join(TODO_FILE)).await;
        let add = Commands::Add {
            text: vec!["  ".into()],
        };
        assert!(run(&mut presenter, add).await.is_err());
        assert!(presenter.store().is_empty());
    }
}
