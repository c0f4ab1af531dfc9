pub mod keywords;
pub mod scorer;

pub use keywords::{KeywordFile, KeywordTable};
pub use scorer::Scorer;
