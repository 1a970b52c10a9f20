// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod category;
pub mod config;
pub mod deck;
pub mod error;
pub mod ingest;
pub mod loader;
pub mod question;
pub mod runtime;
pub mod sampler;
pub mod session;
pub mod source;
pub mod stats;
pub mod summary;
pub mod ui;
