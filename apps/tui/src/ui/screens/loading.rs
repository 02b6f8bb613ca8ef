use crate::app::App;
use crate::ui::widgets::popup::centered_rect;
use ratatui::layout::{Alignment, Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, WhichUse, BRAILLE_SIX};

pub fn render_loading(app: &mut App, f: &mut Frame<'_>) {
    let area = centered_rect(50, 30, f.area());
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

    let [_, spinner_row, path_row, _] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(inner);
    let [spinner_area] = Layout::horizontal([Constraint::Length(36)])
        .flex(ratatui::layout::Flex::Center)
        .areas(spinner_row);

    let label = if app.status_message.is_empty() {
        "Loading marketing data...".to_string()
    } else {
        app.status_message.clone()
    };
    let throbber = Throbber::default()
        .label(label)
        .style(Style::default().fg(Color::White))
        .throbber_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .throbber_set(BRAILLE_SIX)
        .use_type(WhichUse::Spin);
    f.render_stateful_widget(throbber, spinner_area, &mut app.throbber_state);

    let path = Paragraph::new(app.config.data_path.display().to_string())
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(path, path_row);
}
