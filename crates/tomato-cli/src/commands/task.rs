//! Task management commands for CLI.

use chrono::Utc;
use clap::Subcommand;
use tomato_core::storage::{self, SqliteStore};

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the top of the list
    Add {
        /// Task text (1-200 characters)
        content: String,
    },
    /// List tasks, newest first
    List {
        /// Print the stored JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Edit a task
    Edit {
        /// Task ID
        id: String,
        /// New text
        #[arg(long)]
        content: Option<String>,
        /// Duration in minutes (clamped to 1-120)
        #[arg(long)]
        duration: Option<f64>,
    },
    /// Delete a task
    Remove {
        /// Task ID
        id: String,
    },
    /// Flip a task's completed flag
    Toggle {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> CmdResult {
    let mut store = SqliteStore::open()?;
    let mut tasks = storage::load_tasks(&store);

    match action {
        TaskAction::Add { content } => {
            let task = tasks.add(&content, Utc::now())?.clone();
            storage::save_tasks(&mut store, &tasks)?;
            println!("Task created: {}", task.id);
            print_json(&task)?;
        }
        TaskAction::List { json } => {
            if json {
                return print_json(&tasks);
            }
            if tasks.is_empty() {
                println!("No tasks yet.");
            }
            for task in tasks.tasks() {
                let mark = if task.completed { "x" } else { " " };
                let minutes = task
                    .duration
                    .map(|m| format!("{m:.0} min"))
                    .unwrap_or_else(|| "-".into());
                println!("[{mark}] {}  {:>8}  {}", task.id, minutes, task.content);
            }
        }
        TaskAction::Edit {
            id,
            content,
            duration,
        } => {
            if content.is_none() && duration.is_none() {
                return Err("nothing to edit: pass --content and/or --duration".into());
            }
            let task = tasks.edit(&id, content.as_deref(), duration)?.clone();
            storage::save_tasks(&mut store, &tasks)?;
            print_json(&task)?;
        }
        TaskAction::Remove { id } => {
            let task = tasks.remove(&id)?;
            storage::save_tasks(&mut store, &tasks)?;
            println!("Task removed: {}", task.id);
        }
        TaskAction::Toggle { id } => {
            let completed = tasks.toggle_complete(&id)?;
            storage::save_tasks(&mut store, &tasks)?;
            let state = if completed { "completed" } else { "open" };
            println!("Task {id} is now {state}");
        }
    }
    Ok(())
}
