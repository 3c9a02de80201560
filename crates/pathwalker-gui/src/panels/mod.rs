/// Panels composing the PathWalker window.

pub mod log_panel;
pub mod scan_panel;
