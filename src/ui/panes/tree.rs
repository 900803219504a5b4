//! Expression tree pane rendering
//!
//! Draws the parsed tree as an indented outline in pre-order. Nodes already
//! reduced carry their value, and the node reduced in the current step is
//! highlighted.

use super::utils::{clamp_scroll, pane_block, visible_height};
use crate::parser::ast::{Expr, NodeId, TreeIndex};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use rustc_hash::FxHashMap;

/// Deepest indentation drawn; nodes below it share the last column
const MAX_INDENT: usize = 32;

/// Build the outline for nodes `first..first + count`. Line n of the full
/// outline is the node with pre-order id n.
pub(crate) fn tree_lines(
    index: &TreeIndex<'_>,
    reduced: &FxHashMap<NodeId, i64>,
    current: Option<NodeId>,
    first: usize,
    count: usize,
) -> Vec<Line<'static>> {
    let end = first.saturating_add(count).min(index.node_count());
    (first..end)
        .map(|id| node_line(index, id, reduced, current))
        .collect()
}

fn node_line(
    index: &TreeIndex<'_>,
    id: NodeId,
    reduced: &FxHashMap<NodeId, i64>,
    current: Option<NodeId>,
) -> Line<'static> {
    let indent = "  ".repeat(index.depth(id).min(MAX_INDENT));
    let mut spans = vec![Span::styled(
        indent,
        Style::default().fg(DEFAULT_THEME.comment),
    )];

    match index.node(id) {
        Expr::Literal { value, .. } => {
            spans.push(Span::styled(
                value.to_string(),
                Style::default().fg(DEFAULT_THEME.number),
            ));
        }
        Expr::BinaryOp { op, location, .. } => {
            spans.push(Span::styled(
                op.to_string(),
                Style::default()
                    .fg(DEFAULT_THEME.operator)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!("  @{}:{}", location.line, location.column),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            if let Some(value) = reduced.get(&id) {
                spans.push(Span::styled(
                    format!("  = {}", value),
                    Style::default().fg(DEFAULT_THEME.resolved),
                ));
            }
        }
    }

    let mut line = Line::from(spans);
    if current == Some(id) {
        line.style = Style::default().bg(DEFAULT_THEME.current_line_bg);
    }
    line
}

/// Render the tree pane
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    expr: &Expr,
    reduced: &FxHashMap<NodeId, i64>,
    current: Option<NodeId>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Tree ", is_focused);
    let index = TreeIndex::new(expr);

    let visible_height = visible_height(area);
    clamp_scroll(index.node_count(), visible_height, scroll_offset);

    let lines = tree_lines(&index, reduced, current, *scroll_offset, visible_height);
    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_tree_lines_preorder() {
        let expr = Parser::new("3 + 5 * 2").parse().unwrap();
        let mut resolved = FxHashMap::default();
        resolved.insert(2, 10);

        let index = TreeIndex::new(&expr);
        let lines = tree_lines(&index, &resolved, Some(2), 0, 10);
        let rendered: Vec<String> = lines.iter().map(text).collect();

        assert_eq!(
            rendered,
            vec!["+  @1:3", "  3", "  *  @1:7  = 10", "    5", "    2"]
        );
        assert_eq!(lines[2].style.bg, Some(DEFAULT_THEME.current_line_bg));
        assert_eq!(lines[0].style.bg, None);
    }

    #[test]
    fn test_tree_lines_window() {
        let source = vec!["1"; 1000].join(" - ");
        let expr = Parser::new(&source).parse().unwrap();
        let index = TreeIndex::new(&expr);

        let lines = tree_lines(&index, &FxHashMap::default(), None, 997, 5);
        let rendered: Vec<String> = lines.iter().map(text).collect();

        // The two innermost operators, then the first three literals
        let deep = "  ".repeat(MAX_INDENT);
        assert_eq!(
            rendered,
            vec![
                format!("{}-  @1:7", deep),
                format!("{}-  @1:3", deep),
                format!("{}1", deep),
                format!("{}1", deep),
                format!("{}1", deep),
            ]
        );

        let tail = tree_lines(&index, &FxHashMap::default(), None, 1997, 10);
        assert_eq!(tail.len(), 2);
    }
}
