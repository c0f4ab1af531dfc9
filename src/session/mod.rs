pub mod filter_session;
pub mod report;
pub mod stats;

pub use filter_session::{FilterSession, SessionState};
pub use report::{ReadingExperience, ThreadReport};
pub use stats::{ScoreDistribution, SessionStats};
