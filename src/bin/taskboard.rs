//! Command-line front end for a task board stored in a `SQLite` file.
//!
//! ```text
//! taskboard <DATABASE> <COMMAND> [ARGS]
//! ```
//!
//! Run `taskboard --help` for the command list.
//!
//! Due dates are RFC 3339 timestamps such as `2026-05-01T17:00:00Z`. When
//! `TASKBOARD_CONFIG` names a JSON file it is read as a `BoardConfig`, for
//! example:
//!
//! ```json
//! { "seed_sample_tasks": true, "failure_alert_threshold": 5 }
//! ```
//!
//! Diagnostics are logged to stderr; `TASKBOARD_LOG` sets the filter.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use eyre::WrapErr;
use mockable::DefaultClock;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use taskboard::task::{
    adapters::sqlite::{SqliteStoreConfig, SqliteTaskStore},
    domain::{ParseTaskStatusError, Priority, Task, TaskId, TaskStatus},
    services::{BoardConfig, CreateTaskRequest, TaskBoard},
};
use taskboard::telemetry::init_tracing;
use tokio::runtime::Builder;
use tracing::debug;

const CONFIG_ENV: &str = "TASKBOARD_CONFIG";

/// Task board backed by a `SQLite` file
#[derive(Debug, Parser)]
#[command(name = "taskboard", about = "Track tasks through New, Ongoing and Done")]
struct Cli {
    /// Database file; created on first use
    #[arg(value_name = "DATABASE")]
    database: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// Show tasks per column
    List {
        /// Only show this column (New, Ongoing or Done)
        #[arg(value_parser = parse_status)]
        status: Option<TaskStatus>,
    },

    /// Create a task
    Add {
        title: String,
        description: String,
        /// low, medium or high; anything else reads as medium
        priority: Option<String>,
        /// RFC 3339 deadline, applied once the task starts
        #[arg(value_parser = parse_due)]
        due: Option<DateTime<Utc>>,
    },

    /// Move a task from New to Ongoing
    Start {
        id: TaskId,
        #[arg(value_parser = parse_due)]
        due: Option<DateTime<Utc>>,
    },

    /// Move a task from Ongoing to Done
    Complete { id: TaskId },

    /// Move a task from Ongoing back to New
    SendBack { id: TaskId },

    /// Move a task from Done back to Ongoing
    Reopen {
        id: TaskId,
        #[arg(value_parser = parse_due)]
        due: Option<DateTime<Utc>>,
    },

    /// Apply any permitted transition by status name
    Move {
        id: TaskId,
        status: String,
        #[arg(value_parser = parse_due)]
        due: Option<DateTime<Utc>>,
    },

    /// Delete a task
    Remove { id: TaskId },

    /// Show ongoing tasks past their due date
    Overdue,
}

fn main() -> eyre::Result<()> {
    let installed = init_tracing("warn");
    let cli = Cli::parse();
    debug!(installed, database = %cli.database.display(), "taskboard starting");

    let config = load_config()?;
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("failed to start the async runtime")?;
    runtime.block_on(run(cli, config))
}

fn load_config() -> eyre::Result<BoardConfig> {
    env::var_os(CONFIG_ENV).map_or_else(
        || Ok(BoardConfig::default()),
        |path| {
            BoardConfig::from_json_file(&path)
                .wrap_err_with(|| format!("{CONFIG_ENV} points at an unusable file"))
        },
    )
}

async fn run(cli: Cli, config: BoardConfig) -> eyre::Result<()> {
    let store = Arc::new(SqliteTaskStore::new(SqliteStoreConfig::for_path(
        &cli.database,
    )));
    let mut board = TaskBoard::open(store, Arc::new(DefaultClock), config).await;
    let mut stdout = io::stdout().lock();

    let outcome = execute(&mut board, cli.command, &mut stdout);
    let flushed = board.flush().await;
    board.shutdown().await;

    outcome?;
    flushed.wrap_err("changes were not saved")?;
    Ok(())
}

fn execute(
    board: &mut TaskBoard<DefaultClock>,
    command: Command,
    out: &mut impl Write,
) -> eyre::Result<()> {
    match command {
        Command::List { status } => {
            let statuses = status.map_or_else(|| TaskStatus::ALL.to_vec(), |only| vec![only]);
            for column in statuses {
                writeln!(out, "{column} ({})", board.counts().get(column))?;
                for task in board.column(column) {
                    write_task(out, &task)?;
                }
            }
        }
        Command::Add {
            title,
            description,
            priority,
            due,
        } => {
            let mut request = CreateTaskRequest::new(title, description)
                .with_priority(Priority::from_optional_label(priority.as_deref()));
            if let Some(due_date) = due {
                request = request.with_due_date(due_date);
            }
            let task = board.create(request)?;
            writeln!(out, "{}", task.id())?;
        }
        Command::Start { id, due } => write_task(out, &board.start(id, due)?)?,
        Command::Complete { id } => write_task(out, &board.complete(id)?)?,
        Command::SendBack { id } => write_task(out, &board.send_back(id)?)?,
        Command::Reopen { id, due } => write_task(out, &board.reopen(id, due)?)?,
        Command::Move { id, status, due } => {
            write_task(out, &board.transition_named(id, &status, due)?)?;
        }
        Command::Remove { id } => {
            let line = board
                .remove(id)
                .map_or_else(|| format!("no task {id}"), |task| format!("removed {}", task.id()));
            writeln!(out, "{line}")?;
        }
        Command::Overdue => {
            for task in board.overdue() {
                write_task(out, &task)?;
            }
        }
    }
    Ok(())
}

fn write_task(out: &mut impl Write, task: &Task) -> io::Result<()> {
    write!(
        out,
        "{}  [{}] {:<7} {}",
        task.id(),
        task.priority(),
        task.status().as_str(),
        task.title()
    )?;
    if let Some(due) = task.due_date() {
        write!(out, "  due {}", due.to_rfc3339())?;
    }
    writeln!(out)
}

fn parse_status(value: &str) -> Result<TaskStatus, ParseTaskStatusError> {
    TaskStatus::try_from(value)
}

fn parse_due(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|due| due.with_timezone(&Utc))
}
