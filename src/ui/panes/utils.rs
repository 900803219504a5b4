//! Helpers shared by every pane

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered block with a focus-dependent border color
pub(crate) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Number of content rows inside a bordered pane (min 1)
pub(crate) fn visible_height(area: Rect) -> usize {
    area.height.saturating_sub(2).max(1) as usize
}

/// Clamp `scroll_offset` so the last page stays full; resets it when
/// everything fits.
pub(crate) fn clamp_scroll(
    total_items: usize,
    visible_height: usize,
    scroll_offset: &mut usize,
) {
    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_scroll() {
        let mut offset = usize::MAX;
        clamp_scroll(10, 4, &mut offset);
        assert_eq!(offset, 6);

        let mut offset = 3;
        clamp_scroll(2, 4, &mut offset);
        assert_eq!(offset, 0);
    }
}
