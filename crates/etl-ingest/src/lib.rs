pub mod header;
pub mod lines;

pub use header::{UNNAMED_COLUMN, parse_headers, resolve_header, resolve_indices};
pub use lines::{RawFile, read_lines, split_header};
