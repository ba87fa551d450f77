/*
[INPUT]:  Parsed subcommand, selection controller, SIGINT while executing
[OUTPUT]: Rendered task list, history, and action results on stdout
[POS]:    CLI presentation layer - stateless view over the task store
[UPDATE]: When adding subcommands or changing what is printed
*/

mod prompt;
mod render;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use taskdeck_adapter::TaskGateway;
use taskdeck_sync::{SearchOutcome, SelectionController, SyncError, TaskRow};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "taskdeck", version, about = "Manage and run remote command tasks")]
pub struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show all tasks, or one task by id
    List {
        #[arg(long)]
        id: Option<String>,
    },
    /// Create a task, or replace an existing one with the same id
    Create {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long = "command", value_name = "SHELL")]
        shell: Option<String>,
    },
    /// Delete a task
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Find tasks by partial name; an empty term lists everything
    Search {
        #[arg(default_value = "")]
        term: String,
    },
    /// Run a task's command once on the backend
    Execute { id: String },
    /// Show a task's execution history
    History { id: String },
    /// Print the effective configuration
    Config,
}

pub async fn run<G: TaskGateway>(
    command: Command,
    controller: &mut SelectionController<G>,
) -> Result<()> {
    match command {
        Command::List { id: None } => {
            controller.reset_search().await.context("load tasks")?;
            println!("{}", render::task_table(&controller.visible_tasks()));
        }
        Command::List { id: Some(id) } => {
            let task = controller
                .synchronizer()
                .fetch_one(&id)
                .await
                .with_context(|| format!("load task {id}"))?;
            let row = TaskRow::from(&task);
            println!("{}", render::task_table(std::slice::from_ref(&row)));
        }
        Command::Create {
            id,
            name,
            owner,
            shell,
        } => {
            let draft = prompt::complete_draft(id, name, owner, shell)?;
            let task = controller
                .create_task(&draft)
                .await
                .context("create task")?;
            println!(
                "{}",
                style(format!("Task {} created successfully.", task.id)).green()
            );
            println!("{}", render::task_table(&controller.visible_tasks()));
        }
        Command::Delete { id, yes } => {
            if !yes && !prompt::confirm_delete(&id)? {
                println!("{}", style("Aborted.").yellow());
                return Ok(());
            }
            controller
                .delete_task(&id)
                .await
                .with_context(|| format!("delete task {id}"))?;
            println!("{}", style(format!("Task {id} deleted successfully.")).green());
        }
        Command::Search { term } => {
            controller.set_search_term(term);
            match controller.trigger_search().await.context("search tasks")? {
                SearchOutcome::NoMatches => {
                    println!(
                        "{}",
                        style("No tasks found matching the search term.").yellow()
                    );
                }
                SearchOutcome::Matches { .. } | SearchOutcome::Reset { .. } => {
                    println!("{}", render::task_table(&controller.visible_tasks()));
                }
            }
        }
        Command::Execute { id } => {
            open_history(controller, &id).await?;
            println!("{}", style(format!("Executing task {id}...")).cyan());
            let cancel = cancel_on_ctrl_c();
            match controller.execute_with_cancel(&id, &cancel).await {
                Ok(report) => {
                    println!(
                        "Task execution complete. Status: {}",
                        render::last_outcome(report.outcome)
                    );
                }
                Err(err @ SyncError::Execution { .. }) => {
                    if let Some(task) = controller.selected_task() {
                        println!("{}", render::history(&task));
                    }
                    return Err(err).context("execute task");
                }
                Err(err) => return Err(err).context("execute task"),
            }
            if let Some(task) = controller.selected_task() {
                println!("{}", render::history(&task));
            }
        }
        Command::History { id } => {
            open_history(controller, &id).await?;
            if let Some(task) = controller.selected_task() {
                println!("{}", render::history(&task));
            }
        }
        Command::Config => {}
    }
    Ok(())
}

/// Load the catalogue and open the history view, as clicking a row would.
async fn open_history<G: TaskGateway>(
    controller: &mut SelectionController<G>,
    id: &str,
) -> Result<()> {
    controller.reset_search().await.context("load tasks")?;
    if controller.open_history(id).is_none() {
        bail!("task {id} not found");
    }
    Ok(())
}

/// Token cancelled by the first Ctrl-C. Only the execute wait installs it;
/// every other command keeps the default SIGINT behaviour.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT, abandoning execution");
        token.cancel();
    });
    cancel
}
