pub mod builder;

pub use builder::{Hierarchy, HierarchyBuilder};
