/*
[INPUT]:  Task JSON as served by the execution backend
[OUTPUT]: Typed Task / TaskExecution records with serde support
[POS]:    Data layer - task records shared by gateway and store
[UPDATE]: When the backend task schema changes
*/

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::requests::TaskDraft;

/// A named, owned, remotely executable command and its execution history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub command: String,
    /// Oldest first. Server-managed; only ever replaced wholesale.
    #[serde(default, deserialize_with = "serde_helpers::deserialize_executions")]
    pub task_executions: Vec<TaskExecution>,
}

impl Task {
    /// Most recently appended execution, if any.
    pub fn last_execution(&self) -> Option<&TaskExecution> {
        self.task_executions.last()
    }

    pub fn execution_count(&self) -> usize {
        self.task_executions.len()
    }

    /// Mutable fields as an upsert payload.
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            id: self.id.clone(),
            name: self.name.clone(),
            owner: self.owner.clone(),
            command: self.command.clone(),
        }
    }
}

/// One completed remote run of a task's command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskExecution {
    #[serde(with = "serde_helpers::timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "serde_helpers::timestamp")]
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub output: String,
}

impl TaskExecution {
    pub fn duration(&self) -> TimeDelta {
        self.end_time - self.start_time
    }
}

mod serde_helpers {
    use super::TaskExecution;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize_executions<'de, D>(deserializer: D) -> Result<Vec<TaskExecution>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let executions: Option<Vec<TaskExecution>> = Option::deserialize(deserializer)?;
        Ok(executions.unwrap_or_default())
    }

    /// RFC 3339 on output; RFC 3339 or zone-less ISO-8601 (read as UTC) on input.
    pub mod timestamp {
        use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

        pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = String::deserialize(deserializer)?;
            parse(&raw).map_err(serde::de::Error::custom)
        }

        pub(crate) fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
            let raw = raw.trim();
            if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
                return Ok(parsed.with_timezone(&Utc));
            }
            NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT)
                .map(|naive| naive.and_utc())
                .map_err(|err| format!("invalid timestamp {raw:?}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_task_deserializes_backend_shape() {
        let value = json!({
            "id": "TSK-1",
            "name": "Check Disk Space",
            "owner": "Jane Doe",
            "command": "df -h /mnt/data",
            "taskExecutions": [{
                "startTime": "2025-10-19T10:00:00Z",
                "endTime": "2025-10-19T10:00:05Z",
                "output": "ok\nExit Code: 0"
            }]
        });

        let task: Task = serde_json::from_value(value).expect("deserialize task");
        assert_eq!(task.id, "TSK-1");
        assert_eq!(task.execution_count(), 1);
        let execution = task.last_execution().expect("one execution");
        assert_eq!(execution.duration(), TimeDelta::seconds(5));
        assert_eq!(execution.output, "ok\nExit Code: 0");
    }

    #[test]
    fn test_missing_or_null_executions_are_empty() {
        let missing: Task = serde_json::from_value(json!({
            "id": "a", "name": "n", "owner": "o", "command": "c"
        }))
        .expect("missing executions");
        assert!(missing.task_executions.is_empty());

        let null: Task = serde_json::from_value(json!({
            "id": "a", "name": "n", "owner": "o", "command": "c", "taskExecutions": null
        }))
        .expect("null executions");
        assert!(null.task_executions.is_empty());
    }

    #[test]
    fn test_local_date_time_is_read_as_utc() {
        let execution: TaskExecution = serde_json::from_value(json!({
            "startTime": "2025-10-19T10:00:00.123456",
            "endTime": "2025-10-19T10:00:01",
            "output": ""
        }))
        .expect("naive timestamps");

        let expected = Utc.with_ymd_and_hms(2025, 10, 19, 10, 0, 1).unwrap();
        assert_eq!(execution.end_time, expected);
        assert!(execution.start_time < execution.end_time);
    }

    #[test]
    fn test_offset_timestamp_is_normalized() {
        let parsed = serde_helpers::timestamp::parse("2025-10-19T12:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 10, 19, 10, 0, 0).unwrap());
        assert!(serde_helpers::timestamp::parse("yesterday").is_err());
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: "TSK-2".to_string(),
            name: "echo".to_string(),
            owner: "ops".to_string(),
            command: "echo hi".to_string(),
            task_executions: Vec::new(),
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["taskExecutions"], json!([]));
        assert_eq!(task.to_draft().id, "TSK-2");
    }
}
