//! Terminal preview.
//! Renders the parsed configuration as a themed page: profile header,
//! section headers, and link rows revealed in a staggered cascade.
//! Keyboard: Down/Up move the selection through the rendered links, Enter
//! opens the selected link in the system browser, r reloads, q or Esc quits.

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::info;

use crate::config::{Content, LinksConfig, Theme};

/// How often the event loop wakes up to advance the entrance cascade.
const TICK: Duration = Duration::from_millis(100);

/// Delay added per link position before its row is revealed. One step per
/// flattened index reproduces the page's staggered cascade.
const ENTRANCE_STEP: Duration = Duration::from_millis(100);

/// Messages delivered to the preview loop by the reload driver.
#[derive(Debug)]
pub enum AppEvent {
    /// A load finished; the rendered page is fully replaced.
    Loaded(LinksConfig),
    /// Retrieval or parse failed; the container shows the fixed error view.
    LoadFailed,
}

/// One renderable row of the page body. Link rows carry the flattened index
/// that drives both keyboard order and the entrance cascade; this registry
/// replaces any re-query of the view tree on keystrokes.
enum Row {
    Header {
        title: String,
        description: Option<String>,
    },
    Link(LinkRow),
}

struct LinkRow {
    index: usize,
    title: String,
    url: String,
    icon: String,
    description: Option<String>,
}

/// Terminal colors for the two visual modes.
struct Palette {
    background: Color,
    text: Color,
    dim: Color,
    accent: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            background: Color::White,
            text: Color::Black,
            dim: Color::DarkGray,
            accent: Color::Blue,
        },
        Theme::Dark => Palette {
            background: Color::Black,
            text: Color::White,
            dim: Color::DarkGray,
            accent: Color::Cyan,
        },
    }
}

/// Preview state. Rebuilt wholesale on every load outcome: a render pass
/// clears the previous rows before appending the new ones, so no partial
/// content survives a reload.
pub struct App {
    rows: Vec<Row>,
    link_count: usize,
    selected: Option<usize>,
    theme: Theme,
    name: String,
    bio: String,
    avatar: String,
    page_title: String,
    failed: bool,
    status: String,
    loaded_at: Instant,
    should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            link_count: 0,
            selected: None,
            theme: Theme::Dark,
            name: String::new(),
            bio: String::new(),
            avatar: String::new(),
            page_title: String::new(),
            failed: false,
            status: "Loading...".to_string(),
            loaded_at: Instant::now(),
            should_quit: false,
        }
    }

    /// Applies one load outcome, replacing all rendered state.
    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Loaded(config) => self.apply_config(&config),
            AppEvent::LoadFailed => {
                self.rows.clear();
                self.link_count = 0;
                self.selected = None;
                self.failed = true;
                self.status = "Error loading links".to_string();
            }
        }
    }

    fn apply_config(&mut self, config: &LinksConfig) {
        self.rows.clear();
        self.link_count = 0;
        match config.content() {
            Content::Sections(sections) => {
                for section in sections {
                    self.rows.push(Row::Header {
                        title: section.title.clone(),
                        description: section.description.clone(),
                    });
                    for link in &section.links {
                        self.push_link(link);
                    }
                }
            }
            Content::Links(links) => {
                for link in links {
                    self.push_link(link);
                }
            }
            Content::Empty => {}
        }
        self.theme = config.profile.theme();
        self.name = config.profile.display_name().to_string();
        self.bio = config.profile.display_bio().to_string();
        self.avatar = config.profile.avatar_url().to_string();
        self.page_title = config.profile.page_title();
        self.failed = false;
        self.selected = None;
        self.status = format!("{} links", self.link_count);
        // Replay the entrance cascade from the top
        self.loaded_at = Instant::now();
    }

    fn push_link(&mut self, link: &crate::config::Link) {
        self.rows.push(Row::Link(LinkRow {
            index: self.link_count,
            title: link.title.clone(),
            url: link.url.clone(),
            icon: link.icon.clone().unwrap_or_else(|| "🔗".to_string()),
            description: link.description.clone(),
        }));
        self.link_count += 1;
    }

    fn handle_key(&mut self, key: KeyCode, reload: &UnboundedSender<()>) {
        match key {
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down => self.focus_next(),
            KeyCode::Up => self.focus_previous(),
            KeyCode::Enter => self.activate_selected(),
            KeyCode::Char('r' | 'R') => {
                if reload.send(()).is_ok() {
                    self.status = "Reloading...".to_string();
                }
            }
            _ => {}
        }
    }

    /// Moves the selection to the next link; a no-op on the last one.
    /// With nothing selected yet, the first press lands on the first link.
    fn focus_next(&mut self) {
        match self.selected {
            None if self.link_count > 0 => self.selected = Some(0),
            Some(index) if index + 1 < self.link_count => self.selected = Some(index + 1),
            _ => {}
        }
    }

    /// Moves the selection to the previous link; a no-op on the first one
    /// and while nothing is selected.
    fn focus_previous(&mut self) {
        if let Some(index) = self.selected {
            if index > 0 {
                self.selected = Some(index - 1);
            }
        }
    }

    /// Opens the selected link in the system browser. Tracking is a logged
    /// side effect and never blocks the navigation attempt.
    fn activate_selected(&mut self) {
        let Some(selected) = self.selected else {
            return;
        };
        let Some((title, url)) = self.rows.iter().find_map(|row| match row {
            Row::Link(link) if link.index == selected => {
                Some((link.title.clone(), link.url.clone()))
            }
            _ => None,
        }) else {
            return;
        };
        info!("Link clicked: {title} -> {url}");
        self.status = match webbrowser::open(&url) {
            Ok(()) => format!("Opened {url}"),
            Err(err) => format!("Failed to open {url}: {err}"),
        };
    }

    /// Runs the preview until quit, restoring the terminal afterwards.
    pub fn run(
        mut self,
        events: &mut UnboundedReceiver<AppEvent>,
        reload: &UnboundedSender<()>,
    ) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to initialize terminal")?;

        let result = self.event_loop(&mut terminal, events, reload);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        events: &mut UnboundedReceiver<AppEvent>,
        reload: &UnboundedSender<()>,
    ) -> Result<()> {
        execute!(io::stdout(), SetTitle(self.page_title.as_str()))?;
        loop {
            let mut reloaded = false;
            while let Ok(event) = events.try_recv() {
                reloaded = matches!(event, AppEvent::Loaded(_)) || reloaded;
                self.apply_event(event);
            }
            if reloaded {
                execute!(io::stdout(), SetTitle(self.page_title.as_str()))?;
            }

            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, reload);
                    }
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame) {
        let colors = palette(self.theme);
        let base = Style::default().bg(colors.background).fg(colors.text);
        frame.render_widget(Block::default().style(base), frame.area());

        let areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Profile header
                Constraint::Min(0),    // Links
                Constraint::Length(3), // Status bar
            ])
            .split(frame.area());

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                self.name.clone(),
                Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(self.bio.clone()),
            Line::from(Span::styled(self.avatar.clone(), Style::default().fg(colors.dim))),
        ])
        .block(Block::default().borders(Borders::ALL).style(base));
        frame.render_widget(header, areas[0]);

        let body_area = areas[1];
        let (lines, selected_line) = self.body_lines(&colors);
        let inner_height = body_area.height.saturating_sub(2) as usize;
        let scroll = selected_line
            .filter(|line| *line >= inner_height)
            .map(|line| (line + 1 - inner_height) as u16)
            .unwrap_or(0);
        let body = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).style(base))
            .scroll((scroll, 0));
        frame.render_widget(body, body_area);

        let help = Line::from(vec![
            Span::styled("[↑↓]", Style::default().fg(colors.accent)),
            Span::raw(" Navigate  "),
            Span::styled("[Enter]", Style::default().fg(colors.accent)),
            Span::raw(" Open  "),
            Span::styled("[R]", Style::default().fg(colors.accent)),
            Span::raw(" Reload  "),
            Span::styled("[Q]", Style::default().fg(colors.accent)),
            Span::raw(" Quit    "),
            Span::styled(self.status.clone(), Style::default().fg(colors.dim)),
        ]);
        let status = Paragraph::new(vec![help])
            .block(Block::default().borders(Borders::ALL).style(base));
        frame.render_widget(status, areas[2]);
    }

    /// Builds the body lines and the line number of the selected link, for
    /// scrolling it into view.
    fn body_lines(&self, colors: &Palette) -> (Vec<Line<'_>>, Option<usize>) {
        if self.failed {
            return (
                vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "⚠️  Error Loading Links",
                        Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        "Please check your links.json file",
                        Style::default().fg(colors.dim),
                    )),
                ],
                None,
            );
        }

        let elapsed = self.loaded_at.elapsed();
        let mut lines = Vec::new();
        let mut selected_line = None;
        for row in &self.rows {
            match row {
                Row::Header { title, description } => {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        title.clone(),
                        Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
                    )));
                    if let Some(description) = description {
                        lines.push(Line::from(Span::styled(
                            description.clone(),
                            Style::default().fg(colors.dim),
                        )));
                    }
                }
                Row::Link(link) => {
                    if !is_revealed(elapsed, link.index) {
                        continue;
                    }
                    let is_selected = self.selected == Some(link.index);
                    let marker = if is_selected { "▶ " } else { "  " };
                    let style = if is_selected {
                        Style::default().fg(colors.accent).add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default().fg(colors.text)
                    };
                    if is_selected {
                        selected_line = Some(lines.len());
                    }
                    lines.push(Line::from(vec![
                        Span::raw(marker.to_string()),
                        Span::styled(format!("{} {}", link.icon, link.title), style),
                    ]));
                    if let Some(description) = &link.description {
                        lines.push(Line::from(Span::styled(
                            format!("     {description}"),
                            Style::default().fg(colors.dim),
                        )));
                    }
                }
            }
        }
        (lines, selected_line)
    }
}

/// Entrance cascade gate: link `index` becomes visible `index` steps after
/// the page was (re)built.
fn is_revealed(elapsed: Duration, index: usize) -> bool {
    elapsed >= ENTRANCE_STEP * index as u32
}
