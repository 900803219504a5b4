//! Token stream pane rendering

use super::utils::{clamp_scroll, pane_block, visible_height};
use crate::parser::lexer::{Token, TokenKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{List, ListItem, Padding},
    Frame,
};

/// One row per token: kind, lexeme, and position
pub(crate) fn token_row(token: &Token) -> String {
    let loc = token.location();
    format!(
        "{:<13} {:<8} @{}:{}",
        token.kind().to_string(),
        token.lexeme(),
        loc.line,
        loc.column
    )
}

/// Render the tokens pane
pub fn render_tokens_pane(
    frame: &mut Frame,
    area: Rect,
    tokens: &[Token],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Tokens ", is_focused).padding(Padding::new(1, 0, 0, 0));

    let visible_height = visible_height(area);
    clamp_scroll(tokens.len(), visible_height, scroll_offset);

    let visible_items: Vec<ListItem> = tokens
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|token| {
            let color = match token.kind() {
                TokenKind::Number => DEFAULT_THEME.number,
                TokenKind::Invalid => DEFAULT_THEME.error,
                TokenKind::EndOfInput => DEFAULT_THEME.comment,
                _ => DEFAULT_THEME.operator,
            };
            ListItem::new(token_row(token)).style(Style::default().fg(color))
        })
        .collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}
