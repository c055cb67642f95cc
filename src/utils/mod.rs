mod path;

pub use path::{clean_dir, clean_path};
