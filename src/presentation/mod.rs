pub mod adapter;
pub mod thread_view;

pub use adapter::PresentationAdapter;
pub use thread_view::{RenderedItem, ScoreBadge, ThreadView};
