/*
[INPUT]:  Task rows, tasks with execution history, outcomes
[OUTPUT]: Terminal-ready text (colored when stdout is a tty)
[POS]:    CLI rendering helpers
[UPDATE]: When list or history layout changes
*/

use chrono::Local;
use console::style;
use taskdeck_adapter::Task;
use taskdeck_sync::outcome::evaluate_execution;
use taskdeck_sync::{HistorySummary, LastOutcome, Outcome, TaskRow};

const HEADERS: [&str; 5] = ["ID", "NAME", "OWNER", "COMMAND", "RUNS"];

pub fn outcome(outcome: Outcome) -> String {
    match outcome {
        Outcome::Success => style(outcome).green().bold().to_string(),
        Outcome::Failure => style(outcome).red().bold().to_string(),
    }
}

pub fn last_outcome(last: LastOutcome) -> String {
    match last {
        LastOutcome::NoHistory => style(last).dim().to_string(),
        LastOutcome::Completed(verdict) => outcome(verdict),
    }
}

pub fn task_table(rows: &[TaskRow]) -> String {
    if rows.is_empty() {
        return style("No tasks.").dim().to_string();
    }

    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|row| {
            [
                row.id.clone(),
                row.name.clone(),
                row.owner.clone(),
                row.command.clone(),
                row.runs.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    let header = pad_columns(&HEADERS.map(str::to_string), &widths);
    lines.push(style(format!("{header}  LAST")).bold().to_string());
    for (row, cells) in rows.iter().zip(&cells) {
        lines.push(format!(
            "{}  {}",
            pad_columns(cells, &widths),
            last_outcome(row.last)
        ));
    }
    lines.join("\n")
}

fn pad_columns(cells: &[String; 5], widths: &[usize; 5]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
}

/// History view: last output first, then every run newest first.
pub fn history(task: &Task) -> String {
    let summary = HistorySummary::of(task);
    let mut lines = vec![
        style(format!("Execution History: {} ({})", task.name, task.id))
            .bold()
            .to_string(),
        format!("Command: {}", style(&task.command).cyan()),
        String::new(),
        style("Last Execution Output:").bold().to_string(),
    ];
    match task.last_execution() {
        Some(execution) => lines.push(execution.output.trim_end().to_string()),
        None => lines.push(style("No execution history available.").dim().to_string()),
    }

    lines.push(String::new());
    lines.push(
        style(format!(
            "History ({}) - {} succeeded, {} failed",
            summary.runs, summary.successes, summary.failures
        ))
        .bold()
        .to_string(),
    );
    for execution in task.task_executions.iter().rev() {
        let start = execution.start_time.with_timezone(&Local);
        let end = execution.end_time.with_timezone(&Local);
        lines.push(format!(
            "{}  {}  {:>6}s  {}",
            start.format("%Y-%m-%d %H:%M:%S"),
            end.format("%H:%M:%S"),
            execution.duration().num_seconds(),
            outcome(evaluate_execution(execution))
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use taskdeck_adapter::TaskExecution;

    fn task(outputs: &[&str]) -> Task {
        let start = Utc.with_ymd_and_hms(2025, 10, 19, 10, 0, 0).unwrap();
        Task {
            id: "TSK-1".to_string(),
            name: "Check Disk Space".to_string(),
            owner: "Jane Doe".to_string(),
            command: "df -h".to_string(),
            task_executions: outputs
                .iter()
                .map(|output| TaskExecution {
                    start_time: start,
                    end_time: start + chrono::TimeDelta::seconds(4),
                    output: output.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_task_table_aligns_columns() {
        console::set_colors_enabled(false);
        let rows = vec![
            TaskRow::from(&task(&["Exit Code: 0"])),
            TaskRow::from(&Task {
                id: "TSK-100".to_string(),
                ..task(&[])
            }),
        ];
        let table = task_table(&rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID       NAME"));
        assert!(lines[1].ends_with("SUCCESS"));
        assert!(lines[2].ends_with("no history"));
    }

    #[test]
    fn test_empty_table() {
        console::set_colors_enabled(false);
        assert_eq!(task_table(&[]), "No tasks.");
    }

    #[test]
    fn test_history_lists_newest_first() {
        console::set_colors_enabled(false);
        let text = history(&task(&["first\nExit Code: 1", "second\nExit Code: 0"]));
        assert!(text.contains("Execution History: Check Disk Space (TSK-1)"));
        assert!(text.contains("History (2) - 1 succeeded, 1 failed"));

        assert!(text.contains("Last Execution Output:\nsecond\nExit Code: 0"));

        let success = text.rfind("SUCCESS").expect("success row");
        let failure = text.rfind("FAILED").expect("failure row");
        assert!(success < failure);
    }

    #[test]
    fn test_history_without_runs() {
        console::set_colors_enabled(false);
        let text = history(&task(&[]));
        assert!(text.contains("No execution history available."));
        assert!(text.contains("History (0)"));
    }
}
