mod collect;
mod error;

pub use collect::{collect, is_directory, is_valid_json_file};
pub use error::ClassifyError;
