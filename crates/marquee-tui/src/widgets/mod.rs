mod headline_list;
mod marquee;
mod status_bar;

pub use headline_list::HeadlineListWidget;
pub use marquee::{visible_text, MarqueeWidget};
pub use status_bar::StatusBarWidget;
