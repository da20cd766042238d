//! Terminal host for the marquee engine.
//!
//! Measures rows in terminal cells, turns mouse motion into pointer
//! enter/leave events and draws each row from its render hints.

pub mod app;
pub mod event;
pub mod input;
pub mod keymap;
pub mod layout;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use layout::CellLayout;
pub use theme::Theme;
