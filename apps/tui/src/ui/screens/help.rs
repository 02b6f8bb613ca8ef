use crate::ui::widgets::popup::open_popup;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

const SECTIONS: [(&str, &[(&str, &str)]); 4] = [
    (
        "Global",
        &[
            ("Tab", "Switch between dashboard and grouped view"),
            ("/", "Search channel, region or id"),
            ("f", "Open filters"),
            ("x", "Reset filters"),
            ("r", "Reload data"),
            ("F1 / ?", "Toggle help"),
            ("q / Esc", "Quit"),
        ],
    ),
    (
        "Dashboard",
        &[
            ("1-7", "Sort by column, again to flip direction"),
            ("0", "Clear sorting"),
            ("←/→  n/p", "Previous / next page"),
            ("Home/End", "First / last page"),
            ("+/-", "Change page size"),
            ("↑/↓  j/k", "Move selection"),
            ("c", "Switch chart"),
        ],
    ),
    (
        "Grouped",
        &[
            ("Enter/Space", "Expand or collapse region"),
            ("e / c", "Expand / collapse all"),
            ("PgUp/PgDn", "Jump 10 rows"),
        ],
    ),
    (
        "Filters",
        &[
            ("type", "Narrow the option list"),
            ("Enter/Space", "Toggle option or apply spend range"),
            ("Tab", "Next section"),
        ],
    ),
];

pub fn render_help(f: &mut Frame<'_>) {
    let inner = open_popup(f, 70, 80, "Help");

    let mut lines = Vec::new();
    for (title, keys) in SECTIONS {
        lines.push(TextLine::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for (key, description) in keys {
            lines.push(TextLine::from(vec![
                Span::styled(
                    format!("  {key:<14}"),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(*description),
            ]));
        }
        lines.push(TextLine::from(""));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
