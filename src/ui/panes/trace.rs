//! Reduction trace pane rendering
//!
//! Lists every reduction up to the current step, newest last. When the
//! history ends in an error, the error is appended once the last step is
//! reached.

use super::utils::{clamp_scroll, pane_block, visible_height};
use crate::evaluator::errors::EvalError;
use crate::snapshot::Reduction;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the trace pane
pub fn render_trace_pane(
    frame: &mut Frame,
    area: Rect,
    reductions: &[&Reduction],
    error: Option<&EvalError>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Trace ", is_focused);

    if reductions.is_empty() && error.is_none() {
        let paragraph = Paragraph::new("(nothing reduced yet)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let last = reductions.len().saturating_sub(1);

    let total_items = reductions.len() + usize::from(error.is_some());
    let visible_height = visible_height(area);
    clamp_scroll(total_items, visible_height, scroll_offset);

    let mut visible_items: Vec<ListItem> = reductions
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(i, r)| {
            let style = if i == last {
                Style::default()
                    .fg(DEFAULT_THEME.resolved)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };
            ListItem::new(format!("#{:<3} {}", i + 1, r.describe())).style(style)
        })
        .collect();

    // The error row sits just past the last reduction
    if let Some(e) = error {
        if visible_items.len() < visible_height {
            visible_items.push(
                ListItem::new(format!("error: {}", e))
                    .style(Style::default().fg(DEFAULT_THEME.error)),
            );
        }
    }

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}
