//! Frame layout for the design-system preview.
//!
//! Mirrors the orchestrator wireframe: a header banner with the project name
//! and Clean/Dirty chips, one surface card per live step gate, and a sticky
//! approval footer with Yes/No buttons.
//!
//! All token-to-terminal conversion happens in [`Paint::build`], before a
//! frame is drawn, so drawing itself is infallible.

use super::paint::{cells_from_px, color_from_hex, style_from_descriptor};
use super::FooterFocus;
use crate::components::{base_button, status_chip, surface_card, Interaction};
use crate::gate::{GateSnapshot, StepGateView};
use crate::resolver::ResolvedTokenSet;
use crate::state::GateStatus;
use crate::variants::{palette_for, Intent};
use anyhow::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const BUTTON_WIDTH: usize = 16;

/// Terminal styles derived from the resolved token snapshot.
pub struct Paint {
    pub root: Style,
    pub header: Style,
    pub muted: Style,
    pub card_border: Style,
    pub card_text: Style,
    pub chip_clean: Style,
    pub chip_dirty: Style,
    pub approve_button: Style,
    pub reject_button: Style,
    pub buttons_enabled: bool,
    pub button_gap: u16,
    pub error: Style,
}

impl Paint {
    /// Builds the frame's styles from the current theme and gate snapshot.
    pub fn build(
        resolved: &ResolvedTokenSet,
        snapshot: &GateSnapshot,
        focus: FooterFocus,
    ) -> Result<Self> {
        let buttons_enabled = snapshot.active_prompt().is_some();

        let header_palette = palette_for(Intent::Primary, resolved)?;
        let header = Style::default()
            .bg(color_from_hex(&header_palette.background)?)
            .fg(color_from_hex(&header_palette.foreground)?)
            .add_modifier(Modifier::BOLD);

        let root = Style::default()
            .bg(color_from_hex(resolved.color("background")?)?)
            .fg(color_from_hex(resolved.color("secondary_text")?)?);
        let muted = Style::default().fg(color_from_hex(resolved.color("secondary")?)?);
        let error = Style::default()
            .fg(color_from_hex(resolved.color("danger")?)?)
            .add_modifier(Modifier::BOLD);

        let card = surface_card(resolved)?;
        let card_border = Style::default().fg(color_from_hex(resolved.color("border")?)?);
        let card_text = style_from_descriptor(&card)?;

        let clean = status_chip(GateStatus::Clean, resolved)?;
        let dirty = status_chip(GateStatus::Dirty, resolved)?;
        let chip_clean = Style::default()
            .fg(color_from_hex(&clean.foreground)?)
            .add_modifier(Modifier::BOLD);
        let chip_dirty = Style::default()
            .fg(color_from_hex(&dirty.foreground)?)
            .add_modifier(Modifier::BOLD);

        let interaction_for = |button: FooterFocus| {
            if focus == button {
                Interaction::Hover
            } else {
                Interaction::Idle
            }
        };
        let approve = base_button(
            Intent::Primary,
            interaction_for(FooterFocus::Approve),
            !buttons_enabled,
            resolved,
        )?;
        let reject = base_button(
            Intent::Secondary,
            interaction_for(FooterFocus::Reject),
            !buttons_enabled,
            resolved,
        )?;

        Ok(Self {
            root,
            header,
            muted,
            card_border,
            card_text,
            chip_clean,
            chip_dirty,
            approve_button: style_from_descriptor(&approve)?,
            reject_button: style_from_descriptor(&reject)?,
            buttons_enabled,
            button_gap: cells_from_px(resolved.spacing("md")?)?,
            error,
        })
    }

    fn chip(&self, status: GateStatus) -> Style {
        match status {
            GateStatus::Clean => self.chip_clean,
            GateStatus::Dirty => self.chip_dirty,
        }
    }
}

/// Draws one frame of the preview.
pub fn draw(frame: &mut Frame, paint: &Paint, snapshot: &GateSnapshot, error: Option<&str>) {
    frame.render_widget(Block::default().style(paint.root), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, paint, snapshot, chunks[0]);
    draw_gates(frame, paint, snapshot, chunks[1]);
    draw_footer(frame, paint, snapshot, chunks[2]);
    draw_status_line(frame, paint, error, chunks[3]);
}

fn draw_header(frame: &mut Frame, paint: &Paint, snapshot: &GateSnapshot, area: Rect) {
    let step_label = match snapshot.active_step.as_deref() {
        Some(active) => snapshot
            .gates
            .iter()
            .find(|gate| gate.step_id == active)
            .map(|gate| gate.title.clone())
            .unwrap_or_else(|| active.to_string()),
        None => "Complete".to_string(),
    };
    let chips = snapshot
        .gates
        .iter()
        .map(|gate| format!("{}: {}", gate.step_id, gate.status.label()))
        .collect::<Vec<_>>()
        .join(" | ");
    let text = format!(" 【{}】 — {} — {} ", snapshot.project_name, step_label, chips);
    frame.render_widget(Paragraph::new(text).style(paint.header), area);
}

fn draw_gates(frame: &mut Frame, paint: &Paint, snapshot: &GateSnapshot, area: Rect) {
    let mut constraints: Vec<Constraint> = snapshot
        .gates
        .iter()
        .map(|_| Constraint::Length(3))
        .collect();
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (gate, gate_area) in snapshot.gates.iter().zip(areas.iter()) {
        draw_gate_card(frame, paint, snapshot, gate, *gate_area);
    }

    let archive = Paragraph::new(format!("  archived gates: {}", snapshot.archived))
        .style(paint.muted);
    frame.render_widget(archive, areas[snapshot.gates.len()]);
}

fn draw_gate_card(
    frame: &mut Frame,
    paint: &Paint,
    snapshot: &GateSnapshot,
    gate: &StepGateView,
    area: Rect,
) {
    let is_active = snapshot.active_step.as_deref() == Some(gate.step_id.as_str());
    let marker = if is_active { "▸ " } else { "  " };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(paint.card_border)
        .title(format!("{}{} · {}", marker, gate.step_id, gate.title));

    let decision = match gate.decision {
        Some(decision) => format!("decision: {}", decision),
        None => "decision: none".to_string(),
    };
    let line = Line::from(vec![
        Span::styled(format!(" {} ", gate.status.label()), paint.chip(gate.status)),
        Span::raw("  "),
        Span::styled(decision, paint.muted),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(paint.card_text).block(block),
        area,
    );
}

fn draw_footer(frame: &mut Frame, paint: &Paint, snapshot: &GateSnapshot, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let prompt = match snapshot.active_prompt() {
        Some(prompt) => prompt.to_string(),
        None if snapshot.complete => "Project complete.".to_string(),
        None => "Waiting for step work to complete...".to_string(),
    };
    frame.render_widget(Paragraph::new(format!(" {}", prompt)), rows[0]);

    let gap = " ".repeat(paint.button_gap as usize);
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(centered_label("Approve (y)", BUTTON_WIDTH), paint.approve_button),
        Span::raw(gap),
        Span::styled(centered_label("Reject (n)", BUTTON_WIDTH), paint.reject_button),
    ]);
    frame.render_widget(Paragraph::new(line), rows[1]);
}

fn draw_status_line(frame: &mut Frame, paint: &Paint, error: Option<&str>, area: Rect) {
    let paragraph = match error {
        Some(error) => Paragraph::new(format!(" {}", error)).style(paint.error),
        None => Paragraph::new(
            " c complete · i invalidate · y/n decide · o reopen · r reload theme · q quit",
        )
        .style(paint.muted),
    };
    frame.render_widget(paragraph, area);
}

fn centered_label(text: &str, width: usize) -> String {
    let text_width = UnicodeWidthStr::width(text);
    if text_width >= width {
        return text.to_string();
    }
    let left = (width - text_width) / 2;
    let right = width - text_width - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use crate::state::ProjectGates;
    use crate::tokens::TokenStore;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(snapshot: &GateSnapshot, error: Option<&str>) -> String {
        let resolved = resolve(&TokenStore::builtin().unwrap());
        let paint = Paint::build(&resolved, snapshot, FooterFocus::Approve).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal
            .draw(|frame| draw(frame, &paint, snapshot, error))
            .unwrap();
        format!("{:?}", terminal.backend().buffer())
    }

    #[test]
    fn test_frame_shows_project_and_gate_state() {
        let snapshot = GateSnapshot::from(&ProjectGates::new("demo"));
        let rendered = render(&snapshot, None);
        assert!(rendered.contains("demo"), "missing project name");
        assert!(rendered.contains("DIRTY"), "missing status chip");
        assert!(rendered.contains("Project Handshake"), "missing step title");
        assert!(rendered.contains("Approve (y)"), "missing approve button");
    }

    #[test]
    fn test_frame_shows_error_line() {
        let snapshot = GateSnapshot::from(&ProjectGates::new("demo"));
        let rendered = render(&snapshot, Some("invalid gate transition"));
        assert!(rendered.contains("invalid gate transition"));
    }

    #[test]
    fn test_buttons_disabled_until_gate_is_clean() {
        let mut project = ProjectGates::new("demo");
        let resolved = resolve(&TokenStore::builtin().unwrap());

        let paint = Paint::build(
            &resolved,
            &GateSnapshot::from(&project),
            FooterFocus::Approve,
        )
        .unwrap();
        assert!(!paint.buttons_enabled);

        project
            .gate_mut("step_0")
            .unwrap()
            .transition(crate::state::StepEvent::WorkCompleted)
            .unwrap();
        let paint = Paint::build(
            &resolved,
            &GateSnapshot::from(&project),
            FooterFocus::Approve,
        )
        .unwrap();
        assert!(paint.buttons_enabled);
    }

    #[test]
    fn test_centered_label() {
        assert_eq!(centered_label("ab", 6), "  ab  ");
        assert_eq!(centered_label("abc", 6), " abc  ");
        assert_eq!(centered_label("toolongtext", 4), "toolongtext");
    }
}
