use std::io::Write;

use serde::Serialize;
use turn_index_core::{AppViewModel, TurnRole, TurnSummary};
use turn_index_engine::PlatformId;

use crate::cli::OutputFormat;

#[derive(Debug, Serialize)]
pub(crate) struct Report {
    pub platform: PlatformId,
    pub platform_label: String,
    pub encoding: String,
    pub snapshots: Vec<IndexSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<NavigationReport>,
}

/// The index as the sidebar showed it at one point of the session.
#[derive(Debug, Serialize)]
pub(crate) struct IndexSnapshot {
    pub stage: String,
    /// Whether the view changed since the previous snapshot.
    pub changed: bool,
    pub turns: Vec<TurnEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TurnEntry {
    pub index: usize,
    pub role: &'static str,
    pub label: String,
    pub preview: String,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct NavigationReport {
    pub index: usize,
    pub scrolled: bool,
    pub style_before: Option<String>,
    pub style_highlighted: Option<String>,
    pub style_restored: Option<String>,
}

impl IndexSnapshot {
    pub fn from_view(stage: impl Into<String>, view: &AppViewModel, turns: &[TurnSummary]) -> Self {
        Self {
            stage: stage.into(),
            changed: view.dirty,
            turns: view
                .rows
                .iter()
                .zip(turns)
                .map(|(row, turn)| TurnEntry {
                    index: row.index,
                    role: role_tag(turn.role),
                    label: row.role_label.clone(),
                    preview: row.preview.clone(),
                    selected: row.selected,
                })
                .collect(),
            empty_state: view.empty_state,
        }
    }
}

fn role_tag(role: TurnRole) -> &'static str {
    match role {
        TurnRole::User => "user",
        TurnRole::Assistant => "assistant",
    }
}

pub(crate) fn write_report(
    out: &mut impl Write,
    report: &Report,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => write_text(out, report)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_text(out: &mut impl Write, report: &Report) -> std::io::Result<()> {
    writeln!(
        out,
        "{} ({}), decoded as {}",
        report.platform_label, report.platform, report.encoding
    )?;
    for snapshot in &report.snapshots {
        let marker = if snapshot.changed { "" } else { " (unchanged)" };
        writeln!(out)?;
        writeln!(out, "== {}{} ==", snapshot.stage, marker)?;
        if let Some(empty) = snapshot.empty_state {
            writeln!(out, "{empty}")?;
        }
        for turn in &snapshot.turns {
            let cursor = if turn.selected { '>' } else { ' ' };
            writeln!(
                out,
                "{cursor} {:>3}  {:<10} {}",
                turn.index, turn.label, turn.preview
            )?;
        }
    }
    if let Some(nav) = &report.navigation {
        writeln!(out)?;
        if nav.scrolled {
            writeln!(out, "Navigated to turn {}", nav.index)?;
        } else {
            writeln!(out, "Turn {} could not be reached", nav.index)?;
        }
        writeln!(out, "  style before:      {}", style_or_none(&nav.style_before))?;
        writeln!(out, "  style highlighted: {}", style_or_none(&nav.style_highlighted))?;
        writeln!(out, "  style restored:    {}", style_or_none(&nav.style_restored))?;
    }
    Ok(())
}

fn style_or_none(style: &Option<String>) -> &str {
    style.as_deref().unwrap_or("(none)")
}
