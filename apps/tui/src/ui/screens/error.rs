use crate::app::App;
use crate::ui::widgets::popup::centered_rect;
use crate::ui::widgets::status::render_shortcuts;
use ratatui::layout::{Alignment, Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_error(app: &App, f: &mut Frame<'_>) {
    let area = centered_rect(70, 40, f.area());
    let [body, hints] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

    let message = app.state().error.as_deref().unwrap_or("Unknown error");
    let text = Text::from(vec![
        TextLine::from(Span::styled(
            "Failed to load marketing data",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(message.to_string()),
        TextLine::from(""),
        TextLine::from(Span::styled(
            format!("Source: {}", app.config.data_path.display()),
            Style::default().fg(Color::Gray),
        )),
    ]);

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .title("Error")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, body);

    render_shortcuts(f, hints, &[("r", "Retry"), ("q", "Quit")]);
}
