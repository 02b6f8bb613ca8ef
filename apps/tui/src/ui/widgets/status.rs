use crate::app::{App, AppScreen, InputMode};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use ratatui::Frame;

pub const HIGHLIGHT: Color = Color::Rgb(0, 0, 238);

fn key_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Title, screen tabs and the active filter summary or search box.
pub fn render_header(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("== Marketing Dashboard ==")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(10)])
        .split(inner);

    let selected = match app.screen {
        AppScreen::Dashboard => 0,
        AppScreen::Grouped => 1,
    };
    let tabs = Tabs::new(vec![TextLine::from("Dashboard"), TextLine::from("Grouped")])
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD))
        .divider(Span::raw("|"));
    f.render_widget(tabs, chunks[0]);

    f.render_widget(
        Paragraph::new(filter_summary(app)).alignment(Alignment::Right),
        chunks[1],
    );
}

fn filter_summary(app: &App) -> TextLine<'_> {
    if app.input_mode == InputMode::Search {
        return TextLine::from(vec![
            Span::styled("Search: ", key_style()),
            Span::raw(app.search.buffer.as_str()),
            Span::styled("_", Style::default().fg(Color::Gray)),
        ]);
    }

    let filters = &app.state().filters;
    if filters.is_empty() {
        return TextLine::from(Span::styled(
            "No filters",
            Style::default().fg(Color::Gray),
        ));
    }

    let mut parts = Vec::new();
    if !filters.channels.is_empty() {
        parts.push(format!("channels: {}", join(&filters.channels)));
    }
    if !filters.regions.is_empty() {
        parts.push(format!("regions: {}", join(&filters.regions)));
    }
    if !filters.search_query.is_empty() {
        parts.push(format!("search: {:?}", filters.search_query));
    }
    if let Some(range) = filters.spend_range {
        parts.push(format!("spend: {}-{}", range.min, range.max));
    }

    TextLine::from(vec![
        Span::styled(
            format!("{} active ", filters.active_count()),
            Style::default().fg(Color::Green),
        ),
        Span::raw(parts.join(" | ")),
    ])
}

fn join<'a>(values: impl IntoIterator<Item = &'a String>) -> String {
    values
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn render_status_bar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    let records = app.metadata.as_ref().map_or_else(String::new, |metadata| {
        format!("{} records loaded ", metadata.total_records)
    });

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(24)])
        .split(area);

    f.render_widget(
        Paragraph::new(Span::styled(app.status_message.as_str(), style)),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(Span::styled(records, Style::default().fg(Color::Gray)))
            .alignment(Alignment::Right),
        chunks[1],
    );
}

/// One line of `key: description` hints.
pub fn render_shortcuts(f: &mut Frame<'_>, area: Rect, shortcuts: &[(&str, &str)]) {
    let mut spans = Vec::with_capacity(shortcuts.len() * 2);
    for (key, description) in shortcuts {
        spans.push(Span::styled(*key, key_style()));
        spans.push(Span::raw(format!(": {description}   ")));
    }

    f.render_widget(
        Paragraph::new(TextLine::from(spans)).alignment(Alignment::Center),
        area,
    );
}
