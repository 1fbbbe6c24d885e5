use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use donation_ledger::{format_amount, CategoryBucket, DerivedView, Field, LoadReport, ViewState};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Upper bound on how long the loop blocks waiting for input
const IDLE_POLL: Duration = Duration::from_millis(250);

pub struct App {
    pub view: ViewState,
    pub derived: DerivedView,
    pub report: LoadReport,
    pub state: TableState,
    /// Header cursor, index into Field::ALL
    pub header_cursor: usize,
}

impl App {
    pub fn new(view: ViewState, report: LoadReport) -> Self {
        let derived = view.derive();
        Self {
            view,
            derived,
            report,
            state: TableState::default(),
            header_cursor: 0,
        }
    }

    fn refresh(&mut self) {
        self.derived = self.view.derive();
        if self.derived.rows.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    /// Apply a debounced query if one is due
    pub fn tick(&mut self, now: Instant) {
        if self.view.tick(now) {
            self.refresh();
        }
    }

    pub fn click_header(&mut self, field: Field) {
        self.view.click_header(field);
        self.refresh();
    }

    pub fn cursor_field(&self) -> Field {
        Field::ALL[self.header_cursor]
    }

    pub fn header_left(&mut self) {
        self.header_cursor = if self.header_cursor == 0 {
            Field::ALL.len() - 1
        } else {
            self.header_cursor - 1
        };
    }

    pub fn header_right(&mut self) {
        self.header_cursor = (self.header_cursor + 1) % Field::ALL.len();
    }

    pub fn next(&mut self) {
        let len = self.derived.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.derived.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.derived.rows.len();
        if len == 0 {
            return;
        }
        let i = self.state.selected().map(|i| (i + 20).min(len - 1)).unwrap_or(0);
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let i = self.state.selected().map(|i| i.saturating_sub(20)).unwrap_or(0);
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("UI loop failed: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| ui(f, app))?;

        // Wake up in time for a pending query
        let timeout = if app.view.debouncer().is_pending() {
            app.view.debouncer().remaining(Instant::now())
        } else {
            IDLE_POLL
        };
        if !event::poll(timeout)? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let now = Instant::now();
        match key.code {
            KeyCode::Esc => return Ok(()),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
            KeyCode::Char(c) => app.view.push_char(c, now),
            KeyCode::Backspace => app.view.pop_char(now),
            KeyCode::F(n) if (1..=Field::ALL.len() as u8).contains(&n) => {
                app.click_header(Field::ALL[usize::from(n) - 1]);
            }
            KeyCode::Left => app.header_left(),
            KeyCode::Right => app.header_right(),
            KeyCode::Enter => app.click_header(app.cursor_field()),
            KeyCode::Down => app.next(),
            KeyCode::Up => app.previous(),
            KeyCode::PageDown => app.page_down(),
            KeyCode::PageUp => app.page_up(),
            KeyCode::Home if !app.derived.rows.is_empty() => app.state.select(Some(0)),
            KeyCode::End if !app.derived.rows.is_empty() => {
                app.state.select(Some(app.derived.rows.len() - 1));
            }
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search box
            Constraint::Min(0),    // Table + totals
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_search(f, chunks[0], app);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
        .split(chunks[1]);

    render_table(f, content_chunks[0], app);
    render_totals(f, content_chunks[1], app);
    render_status_bar(f, chunks[2], app);
}

fn render_search(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(" Search: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(app.view.input().to_string()),
        Span::styled("█", Style::default().fg(Color::DarkGray)),
    ];
    if app.view.debouncer().is_pending() {
        spans.push(Span::styled("  …", Style::default().fg(Color::DarkGray)));
    }

    let search = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" last name [first name] "),
    );

    f.render_widget(search, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let sort = app.view.sort();
    let header_cells = Field::ALL.iter().enumerate().map(|(i, field)| {
        let mut title = field.title().to_string();
        if sort.column == Some(*field) {
            title.push(' ');
            title.push_str(sort.direction.arrow());
        }

        let mut style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        if i == app.header_cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        Cell::from(title).style(style)
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.derived.rows.iter().map(|row| {
        let color = hex_color(row.color);
        let cells = row.record.values().map(|value| Cell::from(truncate(value, 24)));
        Row::new(cells).style(Style::default().fg(color)).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Min(16),
            Constraint::Length(11),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" Donations ({}) ", app.derived.rows.len())),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_totals(f: &mut Frame, area: Rect, app: &App) {
    let totals = &app.derived.totals;

    let mut content = vec![Line::from("")];
    for (bucket, total) in &totals.buckets {
        content.push(Line::from(vec![
            Span::styled(
                format!("  {:<24}", bucket.label()),
                Style::default().fg(hex_color(bucket.color())),
            ),
            Span::raw(format!("{:>14}", format_amount(total.amount()))),
        ]));
    }

    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled(
            format!("  {:<24}", "Total"),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{:>14}", format_amount(totals.grand_total())),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]));
    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        format!(
            "  Not totalled: {} {}/{}, {} unclassified",
            totals.display_only,
            CategoryBucket::Green.key(),
            CategoryBucket::Atlantica.key(),
            totals.unclassified
        ),
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    let panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Totals by Party "),
    );

    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.derived.rows.len();

    let status_spans = vec![
        Span::styled(
            format!(" Row: {}/{} ", selected, total),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!(
            "| {} records from {} sources | ",
            app.view.records().len(),
            app.report.sources.len()
        )),
        Span::styled("F1-F8", Style::default().fg(Color::Yellow)),
        Span::raw(" Sort | "),
        Span::styled("←/→ Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Header | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Nav | "),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

/// "#RRGGBB" → terminal colour
fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Color::White;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::White,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
