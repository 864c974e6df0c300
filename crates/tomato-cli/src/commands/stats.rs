//! Task statistics in the local time zone.

use chrono::Local;
use clap::Subcommand;
use tomato_core::stats::{bucket_tasks, today_share};
use tomato_core::storage::{self, SqliteStore};
use tomato_core::StatsRange;

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Tasks created per hour today
    Day,
    /// Tasks created per day over the last seven days
    Week,
    /// Tasks created per week of the current month
    Month,
    /// Minutes per task created today
    Today,
}

pub fn run(action: StatsAction) -> CmdResult {
    let store = SqliteStore::open()?;
    let tasks = storage::load_tasks(&store);
    let now = Local::now();

    let range = match action {
        StatsAction::Day => StatsRange::Day,
        StatsAction::Week => StatsRange::Week,
        StatsAction::Month => StatsRange::Month,
        StatsAction::Today => return print_json(&today_share(tasks.tasks(), &now)),
    };
    print_json(&bucket_tasks(tasks.tasks(), range, &now))
}
