use crate::app::App;
use crate::ui::widgets::status::HIGHLIGHT;
use marketing_dashboard::domain::ChartDataPoint;
use marketing_dashboard::format::{format_count, format_currency, format_percentage};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Tabs};
use ratatui::Frame;

pub const CHART_TABS: [&str; 2] = ["Spend / Conversions", "CTR"];

const PALETTE: [Color; 10] = [
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Blue,
    Color::LightRed,
    Color::LightGreen,
    Color::LightCyan,
    Color::LightMagenta,
    Color::LightYellow,
];

pub const fn channel_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

pub fn render_chart_tabs(app: &App, f: &mut Frame<'_>, area: Rect) {
    let titles = CHART_TABS
        .iter()
        .map(|title| TextLine::from(*title))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .select(app.chart_tab_index)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD))
        .divider(Span::raw("|"));

    f.render_widget(tabs, area);
}

pub fn render_chart_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(4)])
        .split(area);
    render_chart_tabs(app, f, chunks[0]);

    let points = &app.snapshot.chart;
    if points.is_empty() {
        render_empty(f, chunks[1], "Channel Performance");
        return;
    }

    if app.chart_tab_index == 0 {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        render_spend_chart(points, f, split[0]);
        render_conversions_chart(points, f, split[1]);
    } else {
        render_ctr_chart(points, f, chunks[1]);
    }
}

fn render_empty(f: &mut Frame<'_>, area: Rect, title: &str) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let paragraph = Paragraph::new("No data for the current filters")
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar_height(value: f64) -> u64 {
    value.max(0.0).round() as u64
}

fn render_bars(f: &mut Frame<'_>, area: Rect, title: &str, bars: &[Bar<'_>], max: u64) {
    let chart = BarChart::default()
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .data(BarGroup::default().bars(bars))
        .max(max.max(1))
        .bar_gap(1)
        .bar_width(8);

    f.render_widget(chart, area);
}

fn bar<'a>(index: usize, point: &'a ChartDataPoint, value: u64, text: String) -> Bar<'a> {
    Bar::default()
        .value(value)
        .text_value(text)
        .label(TextLine::from(point.name.as_str()))
        .style(Style::default().fg(channel_color(index)))
        .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
}

fn render_spend_chart(points: &[ChartDataPoint], f: &mut Frame<'_>, area: Rect) {
    let bars: Vec<Bar<'_>> = points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            bar(
                index,
                point,
                bar_height(point.spend),
                format_currency(point.spend),
            )
        })
        .collect();
    let max = points.iter().map(|p| bar_height(p.spend)).max().unwrap_or(0);
    render_bars(f, area, "Spend by Channel", &bars, max);
}

fn render_conversions_chart(points: &[ChartDataPoint], f: &mut Frame<'_>, area: Rect) {
    let bars: Vec<Bar<'_>> = points
        .iter()
        .enumerate()
        .map(|(index, point)| bar(index, point, point.conversions, format_count(point.conversions)))
        .collect();
    let max = points.iter().map(|p| p.conversions).max().unwrap_or(0);
    render_bars(f, area, "Conversions by Channel", &bars, max);
}

// Bars are in hundredths of a percent so small CTRs still show.
fn render_ctr_chart(points: &[ChartDataPoint], f: &mut Frame<'_>, area: Rect) {
    let bars: Vec<Bar<'_>> = points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            bar(
                index,
                point,
                bar_height(point.ctr * 100.0),
                format_percentage(point.ctr),
            )
        })
        .collect();
    let max = points
        .iter()
        .map(|p| bar_height(p.ctr * 100.0))
        .max()
        .unwrap_or(0);
    render_bars(f, area, "CTR by Channel", &bars, max);
}
