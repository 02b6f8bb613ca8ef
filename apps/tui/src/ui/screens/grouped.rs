use crate::app::App;
use crate::ui::widgets::charts::channel_color;
use crate::ui::widgets::status::{render_header, render_shortcuts, render_status_bar};
use crate::ui::widgets::tables::{header_style, selected_style};
use marketing_dashboard::calculations::{calculate_cpa, calculate_ctr};
use marketing_dashboard::format::{format_count, format_currency, format_percentage};
use marketing_dashboard::presentation::{FlatRow, RegionGroup, Row as GroupRow};
use marketing_dashboard::MarketingRecord;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

const SHORTCUTS: [(&str, &str); 6] = [
    ("↑/↓", "Navigate"),
    ("Enter", "Expand/Collapse"),
    ("e", "Expand all"),
    ("c", "Collapse all"),
    ("Tab", "Dashboard"),
    ("q", "Quit"),
];

fn region_cells(group: &RegionGroup, expanded: bool) -> Vec<Cell<'static>> {
    let marker = if expanded { "▼" } else { "▶" };
    vec![
        Cell::from(format!("{marker} {}", group.region)),
        Cell::from(group.totals.count.to_string()),
        Cell::from(format_currency(group.totals.spend)),
        Cell::from(format_count(group.totals.impressions)),
        Cell::from(format_count(group.totals.clicks)),
        Cell::from(format_count(group.totals.conversions)),
        Cell::from(format_percentage(group.ctr())),
        Cell::from(format_currency(group.cpa())),
    ]
}

fn channel_cells(record: &MarketingRecord, is_last: bool) -> Vec<Cell<'static>> {
    let connector = if is_last { "└─" } else { "├─" };
    vec![
        Cell::from(format!("  {connector} {}", record.channel)),
        Cell::from(format!("#{}", record.id)),
        Cell::from(format_currency(record.spend)),
        Cell::from(format_count(record.impressions)),
        Cell::from(format_count(record.clicks)),
        Cell::from(format_count(record.conversions)),
        Cell::from(format_percentage(calculate_ctr(
            record.clicks,
            record.impressions,
        ))),
        Cell::from(format_currency(calculate_cpa(record.spend, record.conversions))),
    ]
}

/// Region to channel tree over the filtered records. Only the rows inside
/// the viewport are resolved and drawn.
pub fn render_grouped(app: &mut App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Tree
            Constraint::Length(1), // Status
            Constraint::Length(1), // Shortcuts
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_header(app, f, layout[0]);

    let total_rows = app.grouped.len();
    let block = Block::default()
        .title(format!(
            "Regions ({} groups, {} rows)",
            app.grouped.groups().len(),
            total_rows
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.grouped.is_empty() {
        f.render_widget(
            Paragraph::new("No records match the current filters")
                .block(block)
                .alignment(Alignment::Center),
            layout[1],
        );
    } else {
        let height = layout[1].height.saturating_sub(3) as usize;
        let visible = app
            .grouped_viewport
            .follow(total_rows, height, app.selected_group_row);

        let header = Row::new(vec![
            Cell::from("Region / Channel"),
            Cell::from("Records"),
            Cell::from("Spend"),
            Cell::from("Impressions"),
            Cell::from("Clicks"),
            Cell::from("Conversions"),
            Cell::from("CTR"),
            Cell::from("CPA"),
        ])
        .style(header_style());

        let selected = app.selected_group_row;
        let grouped = &app.grouped;
        let rows = visible.filter_map(|index| {
            let group_index = match grouped.rows().get(index)? {
                FlatRow::Region { group, .. } | FlatRow::Channel { group, .. } => *group,
            };
            let row = match grouped.row(index)? {
                GroupRow::Region { group, expanded } => Row::new(region_cells(group, expanded))
                    .style(
                        Style::default()
                            .fg(channel_color(group_index))
                            .add_modifier(Modifier::BOLD),
                    ),
                GroupRow::Channel {
                    record, is_last, ..
                } => Row::new(channel_cells(record, is_last)),
            };
            Some(if index == selected {
                row.style(selected_style())
            } else {
                row
            })
        });

        let widths = [
            Constraint::Min(22),
            Constraint::Length(8),
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(1);
        f.render_widget(table, layout[1]);
    }

    render_status_bar(app, f, layout[2]);
    render_shortcuts(f, layout[3], &SHORTCUTS);
}
