pub mod catalog;
pub mod config;
pub mod explain;
pub mod output;
pub mod profile;
pub mod ranking;
pub mod scoring;
pub mod session;
pub mod telemetry;
