use crate::{
    rows::{Row, ScheduleAction, SchedulePreview, slice_chars},
    settings::NonDefaultSettings,
};
use bkp_models::dtos::JobMode;

pub const HEADERS: [&str; 5] = ["Id", "Name", "Modes", "Schedules", "Notes"];

/// A table cell made of one or more lines of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub lines: Vec<String>,
}

impl Cell {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl From<Vec<String>> for Cell {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

impl From<&str> for Cell {
    fn from(line: &str) -> Self {
        Self {
            lines: vec![line.to_owned()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowDescription {
    pub cells: Vec<Cell>,
}

impl RowDescription {
    pub fn texts(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.text()).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Name,
    Mode,
}

fn mode_order(mode: Option<JobMode>) -> u8 {
    match mode {
        Some(JobMode::Delta) => 0,
        Some(JobMode::Full) => 1,
        None => 2,
    }
}

/// Stable sort of the rows, the way the table orders them.
pub fn sort_rows(rows: &mut [Row], key: SortKey) {
    rows.sort_by(|a, b| match key {
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Mode => mode_order(a.mode).cmp(&mode_order(b.mode)),
    });
}

pub fn compression_title(compression: &str) -> &str {
    match compression {
        "native" => "GZIP",
        other => other,
    }
}

fn state_title(enabled: bool) -> &'static str {
    if enabled { "Enabled" } else { "Disabled" }
}

pub fn describe_settings(settings: &NonDefaultSettings) -> Vec<String> {
    let mut lines = vec![];
    if let Some(report_when) = &settings.report_when {
        lines.push(format!("Report when: {report_when}"));
    }
    if let Some(concurrency) = settings.concurrency {
        lines.push(format!("Concurrency: {concurrency}"));
    }
    if let Some(timeout) = settings.timeout {
        lines.push(format!("Timeout: {timeout} hours"));
    }
    if let Some(full_interval) = settings.full_interval {
        lines.push(format!("Full backup interval: {full_interval}"));
    }
    if let Some(offline_snapshot) = settings.offline_snapshot {
        lines.push(format!("Offline snapshot: {}", state_title(offline_snapshot)));
    }
    if let Some(compression) = &settings.compression {
        lines.push(format!("Compression: {}", compression_title(compression)));
    }
    lines
}

pub fn describe_schedule(preview: &SchedulePreview) -> Vec<String> {
    let title = match preview.schedule.name.as_deref() {
        Some(name) if !name.is_empty() => format!("Name: {name}"),
        _ => format!("Cron: {}", preview.schedule.cron),
    };
    let action = match &preview.action {
        ScheduleAction::Run { .. } => "Run".to_string(),
        ScheduleAction::Cancel { run_id, .. } => {
            format!("Cancel run {}", slice_chars(run_id, 0, 8))
        }
    };
    let mut state = format!("{} · {action}", state_title(preview.schedule.enabled));
    if let Some(log) = &preview.last_run {
        state.push_str(&format!(" · Last run: {}", log.status));
    }
    vec![format!("{title} ({})", preview.short_id), state]
}

/// Renders a row as the five cells of the overview table.
pub fn describe(row: &Row) -> RowDescription {
    let modes = row
        .modes
        .iter()
        .map(|m| m.title().to_owned())
        .collect::<Vec<_>>();
    let schedules = row
        .schedules
        .iter()
        .flat_map(describe_schedule)
        .collect::<Vec<_>>();

    RowDescription {
        cells: vec![
            row.short_id.as_str().into(),
            row.name.as_str().into(),
            modes.into(),
            schedules.into(),
            describe_settings(&row.settings).into(),
        ],
    }
}
