pub mod browse;
pub mod config;
pub mod context;
pub mod detail;
pub mod progress;
pub mod prompts;
pub mod search;
pub mod watched;
