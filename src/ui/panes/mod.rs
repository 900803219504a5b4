//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Expression text with the current reduction highlighted
//! - [`trace`]: Reductions performed so far
//! - [`tree`]: Expression tree outline with resolved values
//! - [`tokens`]: Token stream produced by the lexer
//! - [`status`]: Status bar with keybindings and evaluation state
//! - `utils`: Block styling and scroll clamping shared by the panes
//!
//! Each pane module exports a stateless `render_*` function; scroll offsets
//! live in [`crate::ui::App`].

mod utils;

pub mod source;
pub mod status;
pub mod tokens;
pub mod trace;
pub mod tree;

// Re-export render functions for convenience
pub use source::render_source_pane;
pub use status::render_status_bar;
pub use tokens::render_tokens_pane;
pub use trace::render_trace_pane;
pub use tree::render_tree_pane;
