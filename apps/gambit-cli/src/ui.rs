use std::{
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};

use anyhow::Result;
use crossterm::{
    event::{self, Event as CEvent, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gambit_dashboard::DashboardReport;
use gambit_types::{game::PlayerColor, time_control::TimeControlCategory};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs},
    Frame, Terminal,
};

use crate::report::{format_rate, games_parsed_line, lifetime_cells, partition_lines};

pub enum UiMessage {
    Status(String),
    Report(Box<DashboardReport>),
    Failed(String),
}

struct UiState {
    status: String,
    report: Option<DashboardReport>,
    selected: usize,
}

impl UiState {
    fn category(&self) -> TimeControlCategory {
        TimeControlCategory::ALL[self.selected]
    }

    fn next(&mut self) {
        self.selected = (self.selected + 1) % TimeControlCategory::ALL.len();
    }

    fn previous(&mut self) {
        let len = TimeControlCategory::ALL.len();
        self.selected = (self.selected + len - 1) % len;
    }
}

pub fn run(receiver: Receiver<UiMessage>, title: String) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let res = run_loop(&mut terminal, receiver, title.as_str());

    terminal.show_cursor()?;
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    res
}

fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    receiver: Receiver<UiMessage>,
    title: &str,
) -> Result<()> {
    let mut state = UiState {
        status: String::from("Starting"),
        report: None,
        selected: TimeControlCategory::ALL
            .iter()
            .position(|c| *c == TimeControlCategory::Blitz)
            .unwrap_or(0),
    };

    loop {
        loop {
            match receiver.try_recv() {
                Ok(UiMessage::Status(status)) => state.status = status,
                Ok(UiMessage::Report(report)) => {
                    state.status = match &report.fetch_error {
                        Some(err) => format!("Failed to retrieve games: {err}"),
                        None => games_parsed_line(&report),
                    };
                    state.report = Some(*report);
                }
                Ok(UiMessage::Failed(err)) => state.status = err,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        terminal.draw(|f| draw(f, &state, title))?;

        if event::poll(Duration::from_millis(100))? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => state.next(),
                    KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => state.previous(),
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

fn draw(f: &mut Frame, state: &UiState, title: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(9),
                Constraint::Length(3),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(f.size());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw(state.status.clone()),
        Span::raw("  "),
        Span::styled("←/→", Style::default().fg(Color::Yellow)),
        Span::raw(" mode  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit"),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Summary"));
    f.render_widget(header, chunks[0]);

    draw_lifetime(f, chunks[1], state);

    let titles: Vec<Line> = TimeControlCategory::ALL
        .iter()
        .map(|category| Line::from(category.label()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(state.selected)
        .block(Block::default().borders(Borders::ALL).title("Game mode"))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[2]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[3]);
    for (color, area) in PlayerColor::ALL.into_iter().zip(panes.iter()) {
        draw_partition(f, *area, state, color);
    }
}

fn draw_lifetime(f: &mut Frame, area: Rect, state: &UiState) {
    let header = Row::new(["Mode", "Games", "Wins", "Draws", "Losses", "Win %"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = match &state.report {
        Some(report) => report
            .lifetime
            .iter()
            .map(|snapshot| Row::new(lifetime_cells(snapshot).map(Cell::from)))
            .collect(),
        None => Vec::new(),
    };
    let widths = [
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("All time"));
    f.render_widget(table, area);
}

fn draw_partition(f: &mut Frame, area: Rect, state: &UiState, color: PlayerColor) {
    let category = state.category();
    let pane_title = format!("{category} as {color}");
    let (fg, bg) = match color {
        PlayerColor::White => (Color::Black, Color::Gray),
        PlayerColor::Black => (Color::White, Color::Black),
    };

    let lines: Vec<Line> = match &state.report {
        Some(report) => {
            let stats = report.summary.partition(category, color);
            let mut lines: Vec<Line> = partition_lines(stats)
                .into_iter()
                .map(Line::from)
                .collect();
            if stats.played > 0 {
                lines.push(Line::from(format!(
                    "Win {}  Draw {}  Loss {}",
                    format_rate(stats.win_rate()),
                    format_rate(stats.draw_rate()),
                    format_rate(stats.loss_rate())
                )));
            }
            lines
        }
        None => vec![Line::from("Loading...")],
    };

    let pane = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(pane_title, Style::default().fg(fg).bg(bg))),
    );
    f.render_widget(pane, area);
}
