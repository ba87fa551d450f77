/*
[INPUT]:  TaskExecution output text
[OUTPUT]: Success/failure verdicts and per-task history summaries
[POS]:    Domain logic - execution outcome evaluation (pure)
[UPDATE]: When the backend changes how it reports exit status
*/

use std::fmt;
use taskdeck_adapter::{Task, TaskExecution};

/// Marker the backend appends to a successful run's output.
pub const SUCCESS_MARKER: &str = "Exit Code: 0";

/// Verdict for a single execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "SUCCESS"),
            Outcome::Failure => write!(f, "FAILED"),
        }
    }
}

/// Verdict of the most recent execution of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastOutcome {
    NoHistory,
    Completed(Outcome),
}

impl fmt::Display for LastOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastOutcome::NoHistory => write!(f, "no history"),
            LastOutcome::Completed(outcome) => outcome.fmt(f),
        }
    }
}

/// Substring check only: the exit code is never parsed, so output that
/// merely prints "Exit Code: 0" (or "Exit Code: 01") counts as success.
pub fn evaluate(output: &str) -> Outcome {
    if output.contains(SUCCESS_MARKER) {
        Outcome::Success
    } else {
        Outcome::Failure
    }
}

pub fn evaluate_execution(execution: &TaskExecution) -> Outcome {
    evaluate(&execution.output)
}

pub fn last_outcome(task: &Task) -> LastOutcome {
    task.last_execution()
        .map(|execution| LastOutcome::Completed(evaluate_execution(execution)))
        .unwrap_or(LastOutcome::NoHistory)
}

/// Counts over a task's full history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistorySummary {
    pub runs: usize,
    pub successes: usize,
    pub failures: usize,
    pub last: LastOutcome,
}

impl HistorySummary {
    pub fn of(task: &Task) -> Self {
        let successes = task
            .task_executions
            .iter()
            .filter(|execution| evaluate_execution(execution) == Outcome::Success)
            .count();
        let runs = task.execution_count();
        Self {
            runs,
            successes,
            failures: runs - successes,
            last: last_outcome(task),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn execution(output: &str) -> TaskExecution {
        let start = Utc.with_ymd_and_hms(2025, 10, 19, 10, 0, 0).unwrap();
        TaskExecution {
            start_time: start,
            end_time: start + chrono::TimeDelta::seconds(3),
            output: output.to_string(),
        }
    }

    fn task(outputs: &[&str]) -> Task {
        Task {
            id: "TSK-1".to_string(),
            name: "Check Disk Space".to_string(),
            owner: "Jane Doe".to_string(),
            command: "df -h".to_string(),
            task_executions: outputs.iter().map(|o| execution(o)).collect(),
        }
    }

    #[rstest]
    #[case("ok\nExit Code: 0", Outcome::Success)]
    #[case("Filesystem  Size\nExit Code: 0\n", Outcome::Success)]
    #[case("boom\nExit Code: 1", Outcome::Failure)]
    #[case("killed\nExit Code: 137", Outcome::Failure)]
    #[case("", Outcome::Failure)]
    #[case("exit code: 0", Outcome::Failure)]
    // textual match: incidental markers count, real exit code is ignored
    #[case("echo 'Exit Code: 0'\nExit Code: 2", Outcome::Success)]
    #[case("Exit Code: 01", Outcome::Success)]
    fn test_evaluate(#[case] output: &str, #[case] expected: Outcome) {
        assert_eq!(evaluate(output), expected);
    }

    #[test]
    fn test_last_outcome_uses_most_recent_execution() {
        assert_eq!(last_outcome(&task(&[])), LastOutcome::NoHistory);
        assert_eq!(
            last_outcome(&task(&["Exit Code: 1", "Exit Code: 0"])),
            LastOutcome::Completed(Outcome::Success)
        );
        assert_eq!(
            last_outcome(&task(&["Exit Code: 0", "Exit Code: 1"])),
            LastOutcome::Completed(Outcome::Failure)
        );
    }

    #[test]
    fn test_history_summary_counts() {
        let summary = HistorySummary::of(&task(&["Exit Code: 0", "Exit Code: 3", "Exit Code: 0"]));
        assert_eq!(summary.runs, 3);
        assert_eq!(summary.successes, 2);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.last.to_string(), "SUCCESS");

        let empty = HistorySummary::of(&task(&[]));
        assert_eq!(empty.runs, 0);
        assert_eq!(empty.last.to_string(), "no history");
    }
}
