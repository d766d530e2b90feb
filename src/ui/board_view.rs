//! Text rendering of the board, the detail overlay and toasts.

use std::fmt::Write as _;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::ui::icons::{CARD, CHECK, COLUMN, CROSS, DRAGGING, SCENE};
use crate::workflow::board::BoardState;
use crate::workflow::models::{AdBlockGroup, Task};
use crate::workflow::notify::{Notification, Severity};

/// Render every column left to right as stacked sections.
///
/// `dragging` marks the card currently held by the pointer; it is still
/// drawn in its origin column.
pub fn render_board(board: &BoardState, dragging: Option<i64>) -> String {
    let mut out = String::new();
    if board.account().is_none() {
        let _ = writeln!(out, "{}", style("Select an account to see its workflow board.").dim());
        return out;
    }

    for (stage, tasks) in board.columns() {
        let _ = writeln!(
            out,
            "{}{} {}",
            COLUMN,
            style(stage).bold(),
            style(format!("({})", tasks.len())).dim()
        );
        if tasks.is_empty() {
            let _ = writeln!(out, "    {}", style("no tasks").dim());
        }
        for task in tasks {
            let marker = if dragging == Some(task.id) {
                DRAGGING.to_string()
            } else {
                CARD.to_string()
            };
            let _ = writeln!(out, "  {}{}", marker, card_line(task));
        }
    }
    out
}

fn card_line(task: &Task) -> String {
    let mut line = format!("{} {}", style(format!("#{}", task.id)).cyan(), task.name);
    if let Some(owner) = task.assigned_to.as_deref().filter(|o| !o.is_empty()) {
        let _ = write!(line, " {}", style(format!("@{}", owner)).dim());
    }
    let tags: Vec<&str> = [&task.format, &task.angle]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .filter(|f| !f.is_empty())
        .collect();
    if !tags.is_empty() {
        let _ = write!(line, " {}", style(format!("[{}]", tags.join(", "))).yellow());
    }
    line
}

/// Render the detail overlay for a task.
pub fn render_task_detail(task: Option<&Task>, groups: &[AdBlockGroup]) -> String {
    let mut out = String::new();
    if let Some(task) = task {
        let _ = writeln!(out, "{} {}", style(format!("#{}", task.id)).cyan(), style(&task.name).bold());
        let _ = writeln!(out, "  Stage: {}", task.stage);
        let fields = [
            ("Assigned to", &task.assigned_to),
            ("Market awareness", &task.market_awareness),
            ("Angle", &task.angle),
            ("Format", &task.format),
            ("Theme", &task.theme),
            ("Avatar", &task.avatar),
        ];
        for (label, value) in fields {
            if let Some(value) = value.as_deref() {
                let _ = writeln!(out, "  {}: {}", label, value);
            }
        }
        let _ = writeln!(out, "  Created: {}", task.created_at.format("%Y-%m-%d %H:%M"));
        out.push('\n');
    }

    if groups.is_empty() {
        let _ = writeln!(out, "{}", style("No ad blocks available.").dim());
        return out;
    }
    for group in groups {
        let _ = writeln!(out, "{}", style(&group.version).bold().underlined());
        for scene in &group.scenes {
            let _ = writeln!(out, "  {}Scene {}: {}", SCENE, scene.scene, scene.script);
            let extras = [
                ("Visual", &scene.visual),
                ("Audio", &scene.audio),
                ("Text overlay", &scene.text_overlay),
                ("Screenshot", &scene.screenshot_url),
            ];
            for (label, value) in extras {
                if let Some(value) = value.as_deref() {
                    let _ = writeln!(out, "      {}: {}", style(label).dim(), value);
                }
            }
        }
    }
    out
}

pub fn render_notification(notification: &Notification) -> String {
    let (icon, message) = match notification.severity {
        Severity::Success => (&CHECK, style(&notification.message).green()),
        Severity::Error => (&CROSS, style(&notification.message).red()),
    };
    match &notification.description {
        Some(description) => format!("{}{}\n   {}", icon, message, description),
        None => format!("{}{}", icon, message),
    }
}

/// Spinner shown on stderr while waiting on a webhook.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        bar.set_style(spinner_style);
    }
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
