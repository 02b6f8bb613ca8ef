use marketing_dashboard::calculations::calculate_conversion_rate;
use marketing_dashboard::domain::ComputedMetrics;
use marketing_dashboard::format::{format_count, format_currency, format_percentage};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

struct Card {
    title: &'static str,
    value: String,
    color: Color,
}

fn metric_cards(metrics: &ComputedMetrics) -> [Card; 8] {
    [
        Card {
            title: "Spend",
            value: format_currency(metrics.total_spend),
            color: Color::Cyan,
        },
        Card {
            title: "Impressions",
            value: format_count(metrics.total_impressions),
            color: Color::Blue,
        },
        Card {
            title: "Clicks",
            value: format_count(metrics.total_clicks),
            color: Color::Magenta,
        },
        Card {
            title: "Conversions",
            value: format_count(metrics.total_conversions),
            color: Color::Green,
        },
        Card {
            title: "CTR",
            value: format_percentage(metrics.overall_ctr),
            color: Color::Yellow,
        },
        Card {
            title: "CPA",
            value: format_currency(metrics.overall_cpa),
            color: Color::LightRed,
        },
        Card {
            title: "ROI",
            value: format_percentage(metrics.average_roi),
            color: if metrics.average_roi < 0.0 {
                Color::Red
            } else {
                Color::LightGreen
            },
        },
        Card {
            title: "Conv. Rate",
            value: format_percentage(calculate_conversion_rate(
                metrics.total_conversions,
                metrics.total_clicks,
            )),
            color: Color::LightCyan,
        },
    ]
}

/// Row of metric cards over the filtered view.
pub fn render_metric_cards(metrics: &ComputedMetrics, f: &mut Frame<'_>, area: Rect) {
    let cards = metric_cards(metrics);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, cards.len() as u32); cards.len()])
        .split(area);

    for (card, chunk) in cards.iter().zip(chunks.iter()) {
        let text = Text::from(vec![TextLine::from(Span::styled(
            card.value.clone(),
            Style::default().fg(card.color).add_modifier(Modifier::BOLD),
        ))]);
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(card.title)
                    .title_style(Style::default().fg(Color::Gray))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(card.color)),
            );
        f.render_widget(paragraph, *chunk);
    }
}
