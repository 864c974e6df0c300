//! Task list with optional per-task duration.
//!
//! The list is kept newest first. Durations are minutes and may be
//! fractional once work phases are accrued onto them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

pub const MAX_CONTENT_CHARS: usize = 200;
/// Minutes assumed for a task without a recorded duration.
pub const DEFAULT_TASK_MINUTES: f64 = 25.0;
pub const DURATION_RANGE: (f64, f64) = (1.0, 120.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub content: String,
    /// Creation time, epoch milliseconds.
    pub timestamp: i64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl Task {
    pub fn effective_minutes(&self) -> f64 {
        self.duration.unwrap_or(DEFAULT_TASK_MINUTES)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_inner(self) -> Vec<Task> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Add a task at the front of the list.
    ///
    /// # Errors
    ///
    /// Rejects content that is blank after trimming or longer than
    /// [`MAX_CONTENT_CHARS`].
    pub fn add(&mut self, content: &str, now: DateTime<Utc>) -> Result<&Task, ValidationError> {
        let content = validate_content(content)?;
        self.tasks.insert(
            0,
            Task {
                id: Uuid::new_v4().to_string(),
                content,
                timestamp: now.timestamp_millis(),
                completed: false,
                duration: None,
            },
        );
        Ok(&self.tasks[0])
    }

    /// Edit content and/or duration. Duration is clamped to 1..=120 minutes.
    pub fn edit(
        &mut self,
        id: &str,
        content: Option<&str>,
        duration: Option<f64>,
    ) -> Result<&Task, ValidationError> {
        let content = content.map(validate_content).transpose()?;
        let task = self.find_mut(id)?;
        if let Some(content) = content {
            task.content = content;
        }
        if let Some(minutes) = duration {
            task.duration = Some(clamp_duration(minutes));
        }
        Ok(task)
    }

    pub fn remove(&mut self, id: &str) -> Result<Task, ValidationError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ValidationError::TaskNotFound(id.to_string()))?;
        Ok(self.tasks.remove(index))
    }

    /// Flip the completed flag, returning the new value.
    pub fn toggle_complete(&mut self, id: &str) -> Result<bool, ValidationError> {
        let task = self.find_mut(id)?;
        task.completed = !task.completed;
        Ok(task.completed)
    }

    /// Add worked minutes to a task. Returns false if the id is unknown.
    pub fn accrue(&mut self, id: &str, minutes: f64) -> bool {
        if !minutes.is_finite() || minutes <= 0.0 {
            return self.get(id).is_some();
        }
        match self.find_mut(id) {
            Ok(task) => {
                task.duration = Some(task.duration.unwrap_or(0.0) + minutes);
                true
            }
            Err(_) => false,
        }
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Task, ValidationError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ValidationError::TaskNotFound(id.to_string()))
    }
}

fn validate_content(content: &str) -> Result<String, ValidationError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    let len = trimmed.chars().count();
    if len > MAX_CONTENT_CHARS {
        return Err(ValidationError::TooLong {
            len,
            max: MAX_CONTENT_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

fn clamp_duration(minutes: f64) -> f64 {
    if minutes.is_finite() {
        minutes.clamp(DURATION_RANGE.0, DURATION_RANGE.1)
    } else {
        DEFAULT_TASK_MINUTES
    }
}
