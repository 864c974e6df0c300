//! Task statistics for charts.
//!
//! Buckets count tasks by creation time relative to `now`, in whatever time
//! zone `now` carries. Rendering the charts is left to the front-end.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsRange {
    /// Hourly buckets for today.
    Day,
    /// Daily buckets for the last seven days, today included.
    Week,
    /// Seven-day buckets covering the current month.
    Month,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

/// One slice of today's time-share chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskShare {
    pub name: String,
    pub minutes: f64,
    /// Share of today's total, rounded to one decimal.
    pub percentage: f64,
}

pub fn bucket_tasks<Tz: TimeZone>(
    tasks: &[Task],
    range: StatsRange,
    now: &DateTime<Tz>,
) -> Vec<Bucket> {
    let tz = now.timezone();
    let created: Vec<DateTime<Tz>> = tasks
        .iter()
        .filter_map(|t| tz.timestamp_millis_opt(t.timestamp).single())
        .collect();
    let today = now.date_naive();

    match range {
        StatsRange::Day => (0..24)
            .map(|hour| Bucket {
                label: format!("{hour}:00"),
                count: created
                    .iter()
                    .filter(|at| at.date_naive() == today && at.hour() == hour)
                    .count(),
            })
            .collect(),
        StatsRange::Week => (0..7u64)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(back)))
            .map(|date| Bucket {
                label: date.format("%a").to_string(),
                count: created.iter().filter(|at| at.date_naive() == date).count(),
            })
            .collect(),
        StatsRange::Month => {
            let last_day = days_in_month(today.year(), today.month());
            (1..=last_day)
                .step_by(7)
                .enumerate()
                .map(|(week, first)| {
                    let last = (first + 6).min(last_day);
                    Bucket {
                        label: format!("Week {}", week + 1),
                        count: created
                            .iter()
                            .filter(|at| {
                                let date = at.date_naive();
                                date.year() == today.year()
                                    && date.month() == today.month()
                                    && (first..=last).contains(&date.day())
                            })
                            .count(),
                    }
                })
                .collect()
        }
    }
}

/// Time share of the tasks created today.
pub fn today_share<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> Vec<TaskShare> {
    let tz = now.timezone();
    let today = now.date_naive();
    let todays: Vec<&Task> = tasks
        .iter()
        .filter(|t| {
            tz.timestamp_millis_opt(t.timestamp)
                .single()
                .is_some_and(|at| at.date_naive() == today)
        })
        .collect();
    let total: f64 = todays.iter().map(|t| t.effective_minutes()).sum();

    todays
        .into_iter()
        .map(|t| {
            let minutes = t.effective_minutes();
            let percentage = if total > 0.0 {
                (minutes / total * 1000.0).round() / 10.0
            } else {
                0.0
            };
            TaskShare {
                name: t.content.clone(),
                minutes,
                percentage,
            }
        })
        .collect()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}
