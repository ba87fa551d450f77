/*
[INPUT]:  Partially supplied task fields, delete requests
[OUTPUT]: Complete TaskDraft, delete confirmation
[POS]:    CLI interactive input
[UPDATE]: When task creation fields change
*/

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use taskdeck_adapter::TaskDraft;

/// Ask for any field not given on the command line.
pub fn complete_draft(
    id: Option<String>,
    name: Option<String>,
    owner: Option<String>,
    command: Option<String>,
) -> Result<TaskDraft> {
    let theme = ColorfulTheme::default();
    let id = ask(&theme, id, "Task ID (e.g., TSK-005)")?;
    let name = ask(&theme, name, "Task Name (e.g., Check Disk Space)")?;
    let owner = ask(&theme, owner, "Owner (e.g., Jane Doe)")?;
    let command = ask(&theme, command, "Shell Command (e.g., df -h /mnt/data)")?;
    Ok(TaskDraft::new(id, name, owner, command))
}

fn ask(theme: &ColorfulTheme, value: Option<String>, prompt: &str) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .interact_text()
        .with_context(|| format!("read input for {prompt:?}"))
}

pub fn confirm_delete(id: &str) -> Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Delete task {id}?"))
        .default(false)
        .interact()
        .context("read delete confirmation")
}
