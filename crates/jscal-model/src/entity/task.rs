use serde::{Deserialize, Serialize};

use super::common::Progress;
use super::marker::TaskType;
use super::{Common, Schedule, Scheduled};
use crate::temporal::{Duration, LocalDateTime, UtcDateTime};

/// An action item, assignment or to-do.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "@type", default)]
    object_type: TaskType,
    #[serde(flatten)]
    pub common: Common,
    #[serde(flatten)]
    pub schedule: Schedule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<LocalDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<LocalDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<Duration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_updated: Option<UtcDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<u8>,
}

impl Task {
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            common: Common::with_uid(uid),
            ..Self::default()
        }
    }
}

impl Scheduled for Task {
    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn schedule_mut(&mut self) -> &mut Schedule {
        &mut self.schedule
    }

    fn start(&self) -> Option<LocalDateTime> {
        self.start
    }

    /// Moves `due` along with `start` so the task keeps its length.
    fn set_start(&mut self, start: Option<LocalDateTime>) {
        if let (Some(old), Some(new), Some(due)) = (self.start, start, self.due)
            && let Some(shifted) = due.naive().checked_add_signed(new.naive() - old.naive())
        {
            self.due = Some(LocalDateTime::new(shifted));
        }
        self.start = start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_wire_names() {
        let mut task = Task::new("t1");
        task.due = Some("2024-02-01T17:00:00".parse().unwrap());
        task.estimated_duration = Some(Duration::hms(2, 0, 0));
        task.progress = Some(Progress::InProcess);
        task.percent_complete = Some(40);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["@type"], "Task");
        assert_eq!(json["due"], "2024-02-01T17:00:00");
        assert_eq!(json["estimatedDuration"], "PT2H");
        assert_eq!(json["progress"], "in-process");
        assert_eq!(json["percentComplete"], 40);
    }

    #[test]
    fn occurrence_shifts_due() {
        let mut task = Task::new("t1");
        task.start = Some("2024-02-01T09:00:00".parse().unwrap());
        task.due = Some("2024-02-01T17:00:00".parse().unwrap());
        let occurrence = task
            .occurrence("2024-02-08T09:00:00".parse().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(occurrence.due.unwrap().to_string(), "2024-02-08T17:00:00");
    }
}
