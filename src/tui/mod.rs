//! Interactive preview of the design system and step gates.
//!
//! The preview is the rendering boundary: it owns the transient focus flag
//! that becomes the buttons' hover state, funnels every key press through
//! the gate machine, and re-renders from watch-channel snapshots. A failed
//! transition leaves the prior, consistent state on screen with the error in
//! the status line.

mod paint;
pub mod ui;

pub use paint::{cells_from_px, color_from_hex, style_from_descriptor};

use crate::gate::{GateCommand, GateMachine, GateSnapshot};
use crate::resolver::ResolvedTokenSet;
use crate::state::StepEvent;
use crate::structured_logger::StructuredLogger;
use crate::theme::ThemeCell;
use crate::tokens::{TokenStore, DEFAULT_TOKEN_DOCUMENT};
use anyhow::{Context, Result};
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// Which footer button holds keyboard focus. Focus renders as the hover
/// interaction; it lives here, never in the gate or token model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterFocus {
    Approve,
    Reject,
}

impl FooterFocus {
    fn toggled(self) -> Self {
        match self {
            FooterFocus::Approve => FooterFocus::Reject,
            FooterFocus::Reject => FooterFocus::Approve,
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

/// The preview application.
pub struct PreviewApp {
    machine: GateMachine,
    snapshot_rx: watch::Receiver<GateSnapshot>,
    theme: ThemeCell,
    theme_rx: watch::Receiver<Arc<ResolvedTokenSet>>,
    tokens_path: Option<PathBuf>,
    logger: Arc<StructuredLogger>,
    focus: FooterFocus,
    last_error: Option<String>,
}

impl PreviewApp {
    pub fn new(
        machine: GateMachine,
        snapshot_rx: watch::Receiver<GateSnapshot>,
        store: &TokenStore,
        tokens_path: Option<PathBuf>,
        logger: Arc<StructuredLogger>,
    ) -> Self {
        let (theme, theme_rx) = ThemeCell::new(store);
        Self {
            machine,
            snapshot_rx,
            theme,
            theme_rx,
            tokens_path,
            logger,
            focus: FooterFocus::Approve,
            last_error: None,
        }
    }

    /// The gate machine, for saving session state after the preview exits.
    pub fn machine(&self) -> &GateMachine {
        &self.machine
    }

    /// Runs the preview until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(std::io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
        let backend = ratatui::backend::CrosstermBackend::new(std::io::stdout());
        let mut terminal = ratatui::Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal).await;

        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut ratatui::Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        let mut events = EventStream::new();
        loop {
            let snapshot = self.snapshot_rx.borrow().clone();
            let resolved = Arc::clone(&self.theme_rx.borrow());
            let paint = ui::Paint::build(&resolved, &snapshot, self.focus)?;
            terminal.draw(|frame| {
                ui::draw(frame, &paint, &snapshot, self.last_error.as_deref())
            })?;

            match events.next().await {
                Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    if matches!(self.handle_key(key, &snapshot), Flow::Quit) {
                        break;
                    }
                }
                // Resizes are handled by ratatui on the next draw.
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err).context("terminal event stream failed"),
                None => break,
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, snapshot: &GateSnapshot) -> Flow {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
                self.focus = self.focus.toggled();
            }
            KeyCode::Char('c') => self.apply_to_active(snapshot, StepEvent::WorkCompleted),
            KeyCode::Char('i') => self.apply_to_active(snapshot, StepEvent::WorkInvalidated),
            KeyCode::Char('y') => self.apply_to_active(snapshot, StepEvent::UserApproves),
            KeyCode::Char('n') => self.apply_to_active(snapshot, StepEvent::UserRejects),
            KeyCode::Enter => {
                let event = match self.focus {
                    FooterFocus::Approve => StepEvent::UserApproves,
                    FooterFocus::Reject => StepEvent::UserRejects,
                };
                self.apply_to_active(snapshot, event);
            }
            KeyCode::Char('o') => self.reopen_last_archived(),
            KeyCode::Char('r') => self.reload_theme(),
            _ => {}
        }
        Flow::Continue
    }

    fn apply_to_active(&mut self, snapshot: &GateSnapshot, event: StepEvent) {
        let Some(step_id) = snapshot.active_step.clone() else {
            self.last_error = Some("project is complete".to_string());
            return;
        };
        self.apply(GateCommand::Step { step_id, event });
    }

    fn apply(&mut self, command: GateCommand) {
        match self.machine.apply(command) {
            Ok(_) => self.last_error = None,
            Err(err) => self.last_error = Some(err.to_string()),
        }
    }

    fn reopen_last_archived(&mut self) {
        let step_id = self
            .machine
            .project()
            .archived
            .last()
            .map(|gate| gate.step_id.clone());
        match step_id {
            Some(step_id) => self.apply(GateCommand::Reopen { step_id }),
            None => self.last_error = Some("no archived step to reopen".to_string()),
        }
    }

    /// Reloads the token document and swaps the theme wholesale. On failure
    /// the previous theme stays active.
    fn reload_theme(&mut self) {
        let document = match &self.tokens_path {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(err) => {
                    self.last_error = Some(format!("failed to read {}: {}", path.display(), err));
                    return;
                }
            },
            None => DEFAULT_TOKEN_DOCUMENT.to_string(),
        };
        match self.theme.load_document(&document) {
            Ok(()) => {
                self.logger
                    .log_theme_loaded(self.theme.current().fingerprint());
                self.last_error = None;
            }
            Err(err) => self.last_error = Some(err.to_string()),
        }
    }
}
