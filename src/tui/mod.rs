//! Ratatui-based terminal dashboard.
//!
//! Shows the title, error banners, three summary cards, and the two charts.
//! `r` re-renders through the fetch cache, `c` clears the cache first.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Terminal,
};

use crate::app::pipeline::Loader;
use crate::dashboard::{Body, Chart, Dashboard, MetricCard};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::DashboardChart;

/// Start the TUI.
pub fn run(loader: Loader) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(loader);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    loader: Loader,
    dashboard: Option<Dashboard>,
    status: String,
}

impl App {
    fn new(loader: Loader) -> Self {
        Self {
            loader,
            dashboard: None,
            status: "Fetching real time government data...".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        // Paint the loading frame before the first (blocking) fetch.
        self.draw_frame(terminal)?;
        self.render_pass(false);

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                self.draw_frame(terminal)?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Char('r') => {
                            self.status = "Refreshing...".to_string();
                            self.draw_frame(terminal)?;
                            self.render_pass(false);
                        }
                        KeyCode::Char('c') => {
                            self.status = "Cache cleared, fetching...".to_string();
                            self.draw_frame(terminal)?;
                            self.render_pass(true);
                        }
                        _ => {}
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn draw_frame<B: ratatui::backend::Backend>(&self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        terminal
            .draw(|f| self.draw(f))
            .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
        Ok(())
    }

    fn render_pass(&mut self, clear_cache: bool) {
        if clear_cache {
            self.loader.clear_cache();
        }
        let output = self.loader.load();
        let fetched = output
            .index
            .fetched_at
            .into_iter()
            .chain(output.waste.fetched_at)
            .min()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "-".to_string());
        let [index_stats, waste_stats] = self.loader.cache_stats();
        self.status = format!(
            "fetched: {fetched} | cache hits: {}",
            index_stats.hits + waste_stats.hits
        );
        self.dashboard = Some(Dashboard::build(&output));
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let banner_height = self
            .dashboard
            .as_ref()
            .map(|d| d.banners.len() as u16)
            .filter(|n| *n > 0)
            .map(|n| n + 2)
            .unwrap_or(0);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(banner_height),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_banners(frame, chunks[1]);
        self.draw_body(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                crate::dashboard::TITLE,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(crate::dashboard::SUBTITLE, Style::default().fg(Color::Gray))),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_banners(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(dash) = &self.dashboard else {
            return;
        };
        if dash.banners.is_empty() {
            return;
        }
        let lines: Vec<Line> = dash
            .banners
            .iter()
            .map(|b| Line::from(Span::styled(b.as_str(), Style::default().fg(Color::Red))))
            .collect();
        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Errors").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let panels = match self.dashboard.as_ref().map(|d| &d.body) {
            None => {
                let msg = Paragraph::new(self.status.as_str())
                    .style(Style::default().fg(Color::Yellow))
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(msg, area);
                return;
            }
            Some(Body::Warning(text)) => {
                let msg = Paragraph::new(*text)
                    .style(Style::default().fg(Color::Yellow))
                    .wrap(Wrap { trim: true })
                    .block(Block::default().title("Warning").borders(Borders::ALL));
                frame.render_widget(msg, area);
                return;
            }
            Some(Body::Ready(panels)) => panels,
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(0)])
            .split(area);
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(25), Constraint::Percentage(25), Constraint::Percentage(50)])
            .split(rows[0]);
        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        draw_card(frame, cards[0], &panels.index_card);
        draw_card(frame, cards[1], &panels.waste_card);

        let note: Vec<Line> = panels
            .note
            .iter()
            .map(|line| Line::from(format!("* {line}")))
            .collect();
        let p = Paragraph::new(Text::from(note))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Analyst Note").borders(Borders::ALL));
        frame.render_widget(p, cards[2]);

        draw_chart(frame, charts[0], &panels.index_chart);
        draw_chart(frame, charts[1], &panels.waste_chart);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "r refresh  c clear cache  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_card(frame: &mut ratatui::Frame<'_>, area: Rect, card: &MetricCard) {
    let delta_color = match card.delta {
        Some(d) if d < 0.0 => Color::Red,
        Some(_) => Color::Green,
        None => Color::Gray,
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(card.value.as_str(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(card.delta_text(), Style::default().fg(delta_color))),
    ];
    let p = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .block(Block::default().title(card.title).borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn draw_chart(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &Chart) {
    let block = Block::default()
        .title(format!("{}: {}", chart.heading, chart.title))
        .title_bottom(chart.caption)
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);
    frame.render_widget(DashboardChart { chart }, inner);
}
