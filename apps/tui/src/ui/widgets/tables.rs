use crate::app::App;
use crate::ui::widgets::status::HIGHLIGHT;
use marketing_dashboard::calculations::{calculate_cpa, calculate_ctr};
use marketing_dashboard::domain::{MarketingRecord, PageItem, PaginationConfig, SortConfig, SortField};
use marketing_dashboard::format::{format_count, format_currency, format_percentage};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub fn selected_style() -> Style {
    Style::default()
        .bg(HIGHLIGHT)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Column title with the digit that sorts by it and the direction arrow
/// when it is the active sort column.
fn column_title(field: SortField, index: usize, sorting: SortConfig) -> String {
    let arrow = if sorting.field == Some(field) {
        sorting.direction.arrow()
    } else {
        ""
    };
    format!("{}:{} {arrow}", index + 1, field.label())
}

fn record_cells(record: &MarketingRecord) -> Vec<Cell<'static>> {
    vec![
        Cell::from(record.id.to_string()),
        Cell::from(record.channel.clone()),
        Cell::from(record.region.clone()),
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

/// The current page of records. Only the rows that fit are built.
pub fn render_records_table(app: &mut App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(1)])
        .split(area);

    let page = app.snapshot.page.clone();
    let pagination = app.state().pagination;
    let sorting = app.state().sorting;

    let title = format!(
        "Records ({} matching)",
        format_count(pagination.total_records as u64)
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if page.is_empty() {
        let message = if pagination.total_records == 0 {
            "No records match the current filters"
        } else {
            "No records on this page"
        };
        f.render_widget(
            Paragraph::new(message)
                .block(block)
                .alignment(Alignment::Center),
            chunks[0],
        );
        render_pagination(pagination, f, chunks[1]);
        return;
    }

    // Borders and header take three rows.
    let height = chunks[0].height.saturating_sub(3) as usize;
    let visible = app
        .table_viewport
        .follow(page.len(), height, app.selected_row);

    let mut header_cells: Vec<Cell<'_>> = SortField::ALL
        .iter()
        .enumerate()
        .map(|(index, field)| Cell::from(column_title(*field, index, sorting)))
        .collect();
    header_cells.push(Cell::from("CTR"));
    header_cells.push(Cell::from("CPA"));
    let header = Row::new(header_cells).style(header_style());

    let start = visible.start;
    let rows = page[visible].iter().enumerate().map(|(i, record)| {
        let row = Row::new(record_cells(record));
        if start + i == app.selected_row {
            row.style(selected_style())
        } else {
            row
        }
    });

    let widths = [
        Constraint::Length(7),
        Constraint::Min(12),
        Constraint::Min(10),
        Constraint::Length(13),
        Constraint::Length(13),
        Constraint::Length(10),
        Constraint::Length(13),
        Constraint::Length(8),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, chunks[0]);

    render_pagination(pagination, f, chunks[1]);
}

fn render_pagination(pagination: PaginationConfig, f: &mut Frame<'_>, area: Rect) {
    let (first, last) = pagination.record_span();
    let mut spans = vec![Span::styled(
        format!(
            "{first}-{last} of {}  ",
            format_count(pagination.total_records as u64)
        ),
        Style::default().fg(Color::Gray),
    )];

    let arrow_style = |enabled: bool| {
        if enabled {
            header_style()
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    spans.push(Span::styled("< ", arrow_style(pagination.has_previous_page())));
    for item in pagination.page_numbers() {
        match item {
            PageItem::Page(number) if number == pagination.current_page => {
                spans.push(Span::styled(format!("[{number}]"), selected_style()));
            }
            PageItem::Page(number) => spans.push(Span::raw(format!(" {number} "))),
            PageItem::Gap => spans.push(Span::raw(" ... ")),
        }
    }
    spans.push(Span::styled(" >", arrow_style(pagination.has_next_page())));
    spans.push(Span::styled(
        format!("   {} per page", pagination.page_size),
        Style::default().fg(Color::Gray),
    ));

    f.render_widget(
        Paragraph::new(TextLine::from(spans)).alignment(Alignment::Center),
        area,
    );
}
