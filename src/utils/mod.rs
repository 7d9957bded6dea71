pub mod path_format;
pub mod size_format;

pub use path_format::shorten_path;
pub use size_format::format_size;
