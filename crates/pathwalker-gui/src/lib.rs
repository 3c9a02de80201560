/// PathWalker GUI — egui-based desktop frontend.
///
/// This crate contains all UI code. Business logic lives in `pathwalker-core`.
pub mod app;
pub mod panels;
pub mod state;
pub mod widgets;

pub use app::PathWalkerApp;
