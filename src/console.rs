//! Terminal front end
//!
//! Collapsible parameter sections on the left, run controls, banner and
//! valuation results on the right. Background events are drained between
//! frames so every workspace mutation happens on this loop.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::stdout;
use std::time::Duration;
use tracing::{debug, warn};

use crate::event::EventReceiver;
use crate::lifecycle::{RequestState, SubmitOutcome};
use crate::notify::Severity;
use crate::params::{Section, SetOutcome};
use crate::workspace::{Workspace, INTERRUPT_LABEL};

/// A selectable line in the parameter panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Section(usize),
    Item { section: usize, item: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Navigation state over the parameter panel. At most one section is
/// expanded at a time.
#[derive(Debug, Default)]
pub struct Form {
    expanded: Option<usize>,
    cursor: usize,
    field: usize,
}

impl Form {
    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    pub fn field(&self) -> usize {
        self.field
    }

    pub fn rows(&self, sections: &[Section]) -> Vec<Row> {
        let mut rows = Vec::new();
        for (s, section) in sections.iter().enumerate() {
            rows.push(Row::Section(s));
            if self.expanded == Some(s) {
                rows.extend((0..section.items().len()).map(|item| Row::Item { section: s, item }));
            }
        }
        rows
    }

    pub fn selected(&self, sections: &[Section]) -> Option<Row> {
        self.rows(sections).get(self.cursor).copied()
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.field = 0;
    }

    pub fn move_down(&mut self, sections: &[Section]) {
        let len = self.rows(sections).len();
        if self.cursor + 1 < len {
            self.cursor += 1;
            self.field = 0;
        }
    }

    /// Expand the section under the cursor, collapsing any other
    pub fn toggle(&mut self, sections: &[Section]) {
        let Some(Row::Section(s)) = self.selected(sections) else {
            return;
        };
        self.expanded = if self.expanded == Some(s) { None } else { Some(s) };
        // Keep the cursor on the same header after the rows shift.
        self.cursor = self
            .rows(sections)
            .iter()
            .position(|r| *r == Row::Section(s))
            .unwrap_or(0);
    }

    pub fn next_field(&mut self, field_count: usize) {
        if field_count > 0 {
            self.field = (self.field + 1) % field_count;
        }
    }

    pub fn prev_field(&mut self, field_count: usize) {
        if field_count > 0 {
            self.field = (self.field + field_count - 1) % field_count;
        }
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
        self.cursor = 0;
        self.field = 0;
    }
}

pub struct ValuationConsole {
    workspace: Workspace,
    events: EventReceiver,
    form: Form,
}

impl ValuationConsole {
    pub fn new(workspace: Workspace, events: EventReceiver) -> Self {
        Self {
            workspace,
            events,
            form: Form::default(),
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub async fn run(mut self) -> Result<()> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

        let outcome = self.event_loop(&mut terminal).await;

        disable_raw_mode()?;
        stdout().execute(LeaveAlternateScreen)?;
        outcome
    }

    async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        let frame_rate = Duration::from_millis(50);

        loop {
            terminal.draw(|f| ui(f, &self.workspace, &self.form))?;

            // Background events
            self.workspace.pump(&mut self.events);

            if event::poll(frame_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key.code) == Control::Quit {
                        break;
                    }
                }
            }

            // Let spawned tasks make progress between frames.
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Control {
        let sections = self.workspace.store().sections();
        match code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Up => self.form.move_up(),
            KeyCode::Down => self.form.move_down(sections),
            KeyCode::Enter => self.form.toggle(sections),
            KeyCode::Right | KeyCode::Tab => {
                let count = self.selected_field_count();
                self.form.next_field(count);
            }
            KeyCode::Left | KeyCode::BackTab => {
                let count = self.selected_field_count();
                self.form.prev_field(count);
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => self.edit(Some(c)),
            KeyCode::Backspace => self.edit(None),
            KeyCode::F(5) => {
                if let SubmitOutcome::Rejected(state) = self.workspace.submit() {
                    debug!(%state, "Run ignored");
                }
            }
            KeyCode::F(6) => {
                self.workspace.cancel();
            }
            KeyCode::F(9) => {
                self.workspace.reset();
                self.form.collapse();
            }
            _ => {}
        }
        Control::Continue
    }

    fn selected_field_count(&self) -> usize {
        let sections = self.workspace.store().sections();
        match self.form.selected(sections) {
            Some(Row::Item { section, item }) => sections[section].items()[item].kind().fields().len(),
            _ => 0,
        }
    }

    /// Append `c` to the selected field, or drop its last character
    fn edit(&mut self, c: Option<char>) {
        let sections = self.workspace.store().sections();
        let Some(Row::Item { section, item }) = self.form.selected(sections) else {
            return;
        };
        let section = &sections[section];
        let param = &section.items()[item];
        let Some(&field) = param.kind().fields().get(self.form.field()) else {
            return;
        };

        let mut text = param.distribution().get(field).map(|v| v.display()).unwrap_or_default();
        match c {
            Some(c) => text.push(c),
            None => {
                text.pop();
            }
        }

        let (section_key, item_key) = (section.key().to_string(), param.key().to_string());
        match self.workspace.set_field(&section_key, &item_key, field, text) {
            Ok(SetOutcome::Applied) => {}
            Ok(SetOutcome::Ignored) => debug!(item = %item_key, "Edit ignored"),
            Err(e) => warn!("Edit rejected: {}", e),
        }
    }
}

fn ui(f: &mut Frame, workspace: &Workspace, form: &Form) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3), Constraint::Length(1)])
        .split(f.area());

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[0]);

    render_parameters(f, main_chunks[0], workspace, form);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(main_chunks[1]);
    render_controls(f, side[0], workspace);
    render_results(f, side[1], workspace);

    // Banner
    let banner = match workspace.banner() {
        Some(b) => {
            let color = match b.severity {
                Severity::Success => Color::Green,
                Severity::Error => Color::Red,
                Severity::Warning => Color::Yellow,
            };
            Paragraph::new(b.message.as_str()).style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        }
        None => Paragraph::new(""),
    };
    f.render_widget(banner.block(Block::default().borders(Borders::ALL).title(" Status ")), chunks[1]);

    let footer = Paragraph::new(
        " ↑/↓: Move | ←/→/Tab: Field | ENTER: Section | F5: Run | F6: Interrupt | F9: Reset | ESC: Quit ",
    )
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, chunks[2]);
}

fn render_parameters(f: &mut Frame, area: Rect, workspace: &Workspace, form: &Form) {
    let sections = workspace.store().sections();
    let selected = form.selected(sections);

    let items: Vec<ListItem> = form
        .rows(sections)
        .into_iter()
        .map(|row| {
            let is_selected = selected == Some(row);
            match row {
                Row::Section(s) => {
                    let marker = if form.expanded() == Some(s) { "▾" } else { "▸" };
                    let mut style = Style::default().add_modifier(Modifier::BOLD);
                    if is_selected {
                        style = style.fg(Color::Cyan);
                    }
                    ListItem::new(Line::from(Span::styled(format!("{} {}", marker, sections[s].title()), style)))
                }
                Row::Item { section, item } => {
                    let param = &sections[section].items()[item];
                    let mut spans = vec![
                        Span::from(format!("   {} ", param.label())),
                        Span::styled(format!("[{}] ", param.kind()), Style::default().fg(Color::DarkGray)),
                    ];
                    for (i, (field, value)) in param.distribution().entries().into_iter().enumerate() {
                        let focused = is_selected && i == form.field();
                        let (text, mut style) = if value.is_empty() {
                            (field.placeholder().to_string(), Style::default().fg(Color::DarkGray))
                        } else {
                            (format!("{}: {}", field, value.display()), Style::default())
                        };
                        if focused {
                            style = style.fg(Color::Black).bg(Color::Cyan);
                        }
                        spans.push(Span::styled(text, style));
                        spans.push(Span::from("  "));
                    }
                    ListItem::new(Line::from(spans))
                }
            }
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Parameters "));
    f.render_widget(list, area);
}

fn render_controls(f: &mut Frame, area: Rect, workspace: &Workspace) {
    let state = workspace.state();
    let color = match state {
        RequestState::Idle => Color::Green,
        RequestState::Generating => Color::Yellow,
        RequestState::Cancelling | RequestState::Cancelled => Color::Magenta,
    };

    let mut lines = vec![Line::from(vec![
        Span::styled("[F5] ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(workspace.run_label(), Style::default().fg(color)),
    ])];
    if workspace.can_interrupt() {
        lines.push(Line::from(vec![
            Span::styled("[F6] ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(INTERRUPT_LABEL, Style::default().fg(Color::Red)),
        ]));
    }

    let controls = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Valuation "));
    f.render_widget(controls, area);
}

fn render_results(f: &mut Frame, area: Rect, workspace: &Workspace) {
    let block = Block::default().borders(Borders::ALL).title(" Results ");
    let Some(view) = workspace.view() else {
        f.render_widget(block, area);
        return;
    };

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(vec![Span::styled("Market Cap: ", bold), Span::from(view.market_cap.clone())]),
        Line::from(vec![
            Span::styled("Price / Share: ", bold),
            Span::from(view.price_per_share.clone()),
        ]),
        Line::from(""),
    ];
    for row in &view.rows {
        lines.push(Line::from(Span::styled(row.label.clone(), bold.fg(Color::Cyan))));
        lines.push(Line::from(format!(
            "  Equity {}  Per Share {}  P/V {}  PNL {}",
            row.equity_value, row.equity_value_per_share, row.price_to_value, row.pnl
        )));
    }
    if !view.reports.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Reports", bold)));
        for report in &view.reports {
            lines.push(Line::from(format!("  {} ({} bytes)", report.name, report.html.len())));
        }
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}
