//! Source pane rendering with reduction highlighting
//!
//! Shows the expression as typed, with the source span of the node reduced
//! in the current step highlighted, followed by the partially reduced form
//! of the whole expression.

use super::utils::{clamp_scroll, pane_block, visible_height};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Per-character style for the expression text
fn char_style(c: char, highlighted: bool) -> Style {
    let style = match c {
        '0'..='9' => Style::default().fg(DEFAULT_THEME.number),
        '+' | '-' | '*' | '/' => Style::default().fg(DEFAULT_THEME.operator),
        '(' | ')' => Style::default().fg(DEFAULT_THEME.primary),
        c if c.is_whitespace() => Style::default(),
        // Anything else would have failed to lex
        _ => Style::default().fg(DEFAULT_THEME.error),
    };

    if highlighted {
        style
            .bg(DEFAULT_THEME.highlight_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

/// Split `source` into display lines, highlighting chars whose offset falls
/// in `span`.
pub(crate) fn highlight_source(
    source: &str,
    span: Option<(usize, usize)>,
) -> Vec<Line<'static>> {
    let in_span = |offset: usize| span.is_some_and(|(s, e)| offset >= s && offset < e);

    let mut lines = Vec::new();
    let mut spans = Vec::new();

    // Offsets count chars, including the newlines themselves
    for (offset, c) in source.chars().enumerate() {
        if c == '\n' {
            lines.push(Line::from(std::mem::take(&mut spans)));
            continue;
        }
        spans.push(Span::styled(c.to_string(), char_style(c, in_span(offset))));
    }
    lines.push(Line::from(spans));

    lines
}

/// Render the source pane
#[allow(clippy::too_many_arguments)]
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source: &str,
    highlight: Option<(usize, usize)>,
    rendered: &str,
    result: Option<i64>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Expression ", is_focused);

    let mut lines = highlight_source(source, highlight);
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("⇒ ", Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(rendered.to_string(), Style::default().fg(DEFAULT_THEME.fg)),
    ]));

    if let Some(value) = result {
        lines.push(Line::from(vec![
            Span::styled("= ", Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(
                value.to_string(),
                Style::default()
                    .fg(DEFAULT_THEME.success)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    clamp_scroll(lines.len(), visible_height(area), scroll_offset);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((*scroll_offset as u16, 0));
    frame.render_widget(paragraph, area);
}
