//! Pure rendering helpers shared by the components.
//!
//! Models build `Text` values; `render` is the only function that touches
//! a frame.

use ratatui::Frame;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;

use super::theme;

/// Draw a model's view into the whole frame area.
pub fn render(view: &Text<'_>, frame: &mut Frame) {
    let area = frame.area();
    frame.render_widget(Paragraph::new(view.clone()), area);
}

/// Flatten styled text into plain lines joined by `\n`.
pub fn plain(text: &Text<'_>) -> String {
    text.lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number of terminal rows a view occupies, at least one.
pub fn height(text: &Text<'_>) -> u16 {
    u16::try_from(text.lines.len()).unwrap_or(u16::MAX).max(1)
}

/// Footer line of `key description` pairs.
pub fn help_line(pairs: &[(&str, &str)]) -> Line<'static> {
    let body = pairs
        .iter()
        .map(|(key, what)| format!("{key} {what}"))
        .collect::<Vec<_>>()
        .join(" · ");
    Line::from(Span::styled(body, theme::STYLE_HELP))
}
