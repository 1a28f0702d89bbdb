pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod reporter;
pub mod request;
