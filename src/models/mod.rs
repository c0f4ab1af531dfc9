pub mod decision;
pub mod item;
pub mod loaders;
pub mod score;
pub mod thread;

pub use decision::VisibilityDecision;
pub use item::{Item, Position};
pub use loaders::{load_all_thread_files, load_keyword_file, load_toml_to_thread_page};
pub use score::{Score, ScoreTier};
pub use thread::ThreadPage;
