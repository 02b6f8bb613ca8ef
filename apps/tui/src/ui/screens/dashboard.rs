use crate::app::App;
use crate::ui::widgets::cards::render_metric_cards;
use crate::ui::widgets::charts::render_chart_panel;
use crate::ui::widgets::status::{render_header, render_shortcuts, render_status_bar};
use crate::ui::widgets::tables::render_records_table;
use ratatui::layout::{Constraint, Direction, Layout, Margin};
use ratatui::Frame;

const SHORTCUTS: [(&str, &str); 8] = [
    ("1-7", "Sort"),
    ("0", "Unsort"),
    ("←/→", "Page"),
    ("+/-", "Page size"),
    ("/", "Search"),
    ("f", "Filters"),
    ("Tab", "Grouped"),
    ("?", "Help"),
];

pub fn render_dashboard(app: &mut App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Metric cards
            Constraint::Min(8),    // Table and charts
            Constraint::Length(1), // Status
            Constraint::Length(1), // Shortcuts
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_header(app, f, layout[0]);
    render_metric_cards(&app.snapshot.metrics, f, layout[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(layout[2]);
    render_records_table(app, f, body[0]);
    render_chart_panel(app, f, body[1]);

    render_status_bar(app, f, layout[3]);
    render_shortcuts(f, layout[4], &SHORTCUTS);
}
