// Library surface for headless/integration tests and reuse.
// The binary in main.rs only wires terminal, CLI and logging around it.
pub mod app;
pub mod app_dirs;
pub mod celebration;
pub mod config;
pub mod engine;
pub mod generator;
pub mod input;
pub mod leaderboard;
pub mod logging;
pub mod reporter;
pub mod runtime;
pub mod session;
pub mod store;
pub mod ui;
pub mod util;
