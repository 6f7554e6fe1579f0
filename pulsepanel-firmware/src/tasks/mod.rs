//! Embassy async tasks
//!
//! One edge task and one panel task per channel; they share nothing but the
//! channel's pulse counter.

pub mod edge;
pub mod panel;

pub use edge::edge_task;
pub use panel::{panel_task, Panel, PanelTiming};
