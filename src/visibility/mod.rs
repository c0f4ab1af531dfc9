pub mod engine;

pub use engine::{Decisions, VisibilityEngine};
