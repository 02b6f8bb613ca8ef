use crate::app::state::{App, FilterSection};
use crate::ui::widgets::popup::open_popup;
use crate::ui::widgets::status::render_shortcuts;
use crate::ui::widgets::tables::selected_style;
use marketing_dashboard::presentation::visible_range;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Tabs};
use ratatui::Frame;

const SECTIONS: [FilterSection; 3] = [
    FilterSection::Channels,
    FilterSection::Regions,
    FilterSection::Spend,
];

pub fn render_filter_popup(app: &App, f: &mut Frame<'_>) {
    let inner = open_popup(f, 60, 70, "Filters");
    let [tabs_area, body, hints] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(inner);

    let selected = SECTIONS
        .iter()
        .position(|section| *section == app.filter_popup.section)
        .unwrap_or(0);
    let tabs = Tabs::new(
        SECTIONS
            .iter()
            .map(|section| TextLine::from(section.title()))
            .collect::<Vec<_>>(),
    )
    .select(selected)
    .style(Style::default().fg(Color::Gray))
    .highlight_style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
    .divider(Span::raw("|"));
    f.render_widget(tabs, tabs_area);

    match app.filter_popup.section {
        FilterSection::Spend => render_spend_section(app, f, body),
        FilterSection::Channels | FilterSection::Regions => render_option_list(app, f, body),
    }

    render_shortcuts(
        f,
        hints,
        &[("Tab", "Section"), ("Enter", "Apply"), ("Esc", "Close")],
    );
}

fn render_option_list(app: &App, f: &mut Frame<'_>, area: Rect) {
    let [query_area, list_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);

    let query = Paragraph::new(TextLine::from(vec![
        Span::raw(app.filter_popup.query.as_str()),
        Span::styled("_", Style::default().fg(Color::Gray)),
    ]))
    .block(Block::default().title("Narrow").borders(Borders::ALL));
    f.render_widget(query, query_area);

    let filters = &app.state().filters;
    let chosen = match app.filter_popup.section {
        FilterSection::Channels => &filters.channels,
        _ => &filters.regions,
    };

    let options = app.filter_options();
    let height = list_area.height.saturating_sub(2) as usize;
    let cursor = app.filter_popup.cursor;
    let offset = cursor.saturating_sub(height.saturating_sub(1));
    let window = visible_range(options.len(), offset, height);

    let items: Vec<ListItem<'_>> = options[window.clone()]
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let mark = if chosen.contains(*option) { "[x]" } else { "[ ]" };
            let item = ListItem::new(format!("{mark} {option}"));
            if window.start + i == cursor {
                item.style(selected_style())
            } else {
                item
            }
        })
        .collect();

    let title = format!("{} ({} selected)", app.filter_popup.section.title(), chosen.len());
    let list = if items.is_empty() {
        List::new(vec![ListItem::new("No matching options")])
    } else {
        List::new(items)
    };
    f.render_widget(
        list.block(Block::default().title(title).borders(Borders::ALL)),
        list_area,
    );
}

fn render_spend_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let [input_area, info_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);

    let input = Paragraph::new(TextLine::from(vec![
        Span::raw(app.filter_popup.spend_input.as_str()),
        Span::styled("_", Style::default().fg(Color::Gray)),
    ]))
    .block(
        Block::default()
            .title("Spend range (min-max)")
            .borders(Borders::ALL),
    );
    f.render_widget(input, input_area);

    let mut lines = vec![TextLine::from(Span::styled(
        "Leave empty and press Enter to clear the range.",
        Style::default().fg(Color::Gray),
    ))];
    if let Some((min, max)) = app.metadata.as_ref().and_then(|m| m.spend_range) {
        lines.push(TextLine::from(format!("Dataset spend: {min:.2} - {max:.2}")));
    }
    f.render_widget(Paragraph::new(lines), info_area);
}
