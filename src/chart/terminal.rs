use super::{format_price, BarChart, Chart, ChartRenderer, LineChart};
use anyhow::{bail, Context, Result};
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::{
    Axis, Bar, BarChart as BarChartWidget, BarGroup, Block, Chart as ChartWidget, Dataset,
    GraphType, Paragraph,
};
use ratatui::{Frame, Terminal};
use std::io::{self, IsTerminal, Stdout};
use tracing::debug;

const PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::LightRed,
    Color::LightBlue,
];
const X_LABEL_COUNT: usize = 5;
const BAR_RESOLUTION: u64 = 10_000;
const BAR_GAP: u16 = 2;

/// Draws charts on the alternate screen and waits for `q`, `Esc` or `Enter`.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ChartRenderer for TerminalRenderer {
    fn show(&mut self, chart: &Chart) -> Result<()> {
        if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
            bail!("Charts need an interactive terminal (TTY)");
        }

        debug!("Showing chart: {}", chart.title());

        let mut terminal = ScreenGuard::enter()?;
        loop {
            terminal
                .0
                .draw(|frame| draw(frame, chart))
                .context("Failed to draw chart")?;

            if let Event::Key(key) = event::read().context("Failed to read terminal event")? {
                if key.kind == KeyEventKind::Press
                    && matches!(
                        key.code,
                        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter
                    )
                {
                    break;
                }
            }
        }

        Ok(())
    }
}

// Restores the terminal on every exit path
struct ScreenGuard(Terminal<CrosstermBackend<Stdout>>);

impl ScreenGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout));
        match terminal {
            Ok(terminal) => Ok(Self(terminal)),
            Err(e) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                let _ = disable_raw_mode();
                Err(e).context("Failed to set up terminal")
            }
        }
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.0.backend_mut(), LeaveAlternateScreen);
        let _ = self.0.show_cursor();
    }
}

fn draw(frame: &mut Frame, chart: &Chart) {
    let [body, footer] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    match chart {
        Chart::Line(line) => draw_line(frame, body, line),
        Chart::Bar(bar) => draw_bar(frame, body, bar),
    }

    frame.render_widget(
        Paragraph::new(Line::from("press q, Esc or Enter to close").dim()).centered(),
        footer,
    );
}

fn title_block(title: &str) -> Block<'_> {
    Block::bordered().title(
        Line::from(title)
            .centered()
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
}

fn draw_line(frame: &mut Frame, area: Rect, chart: &LineChart) {
    let data: Vec<Vec<(f64, f64)>> = chart
        .series
        .iter()
        .map(|series| {
            series
                .points
                .iter()
                .map(|p| (p.date.timestamp() as f64, p.price))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = chart
        .series
        .iter()
        .zip(&data)
        .enumerate()
        .map(|(i, (series, points))| {
            Dataset::default()
                .name(series.label.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(PALETTE[i % PALETTE.len()]))
                .data(points)
        })
        .collect();

    let ([x_min, x_max], [y_min, y_max]) = chart.bounds().unwrap_or(([0.0, 1.0], [0.0, 1.0]));
    let y_labels = [y_min, (y_min + y_max) / 2.0, y_max].map(format_price);

    let widget = ChartWidget::new(datasets)
        .block(title_block(&chart.title))
        .x_axis(
            Axis::default()
                .title(chart.x_label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(chart.date_labels(X_LABEL_COUNT)),
        )
        .y_axis(
            Axis::default()
                .title(chart.y_label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );

    frame.render_widget(widget, area);
}

fn draw_bar(frame: &mut Frame, area: Rect, chart: &BarChart) {
    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .zip(chart.scaled_heights(BAR_RESOLUTION))
        .enumerate()
        .map(|(i, (bar, height))| {
            Bar::default()
                .value(height)
                .label(Line::from(bar.label.clone()))
                .text_value(format_price(bar.price))
                .style(Style::default().fg(PALETTE[i % PALETTE.len()]))
        })
        .collect();

    let width = bar_width(area.width, bars.len());
    let block = title_block(&chart.title).title_bottom(
        Line::from(format!("{} / {}", chart.x_label, chart.y_label))
            .centered()
            .dim(),
    );

    let widget = BarChartWidget::default()
        .block(block)
        .bar_width(width)
        .bar_gap(BAR_GAP)
        .max(BAR_RESOLUTION)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(widget, area);
}

fn bar_width(available: u16, count: usize) -> u16 {
    let count = u16::try_from(count.max(1)).unwrap_or(u16::MAX);
    let usable = available.saturating_sub(BAR_GAP.saturating_mul(count).saturating_add(2));
    (usable / count).clamp(3, 20)
}
