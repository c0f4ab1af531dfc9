pub mod toml_loader;

pub use toml_loader::{load_all_thread_files, load_keyword_file, load_toml_to_thread_page};
