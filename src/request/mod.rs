mod builder;

pub use builder::{build_client, build_request, MARKER_HEADER, MARKER_VALUE};
