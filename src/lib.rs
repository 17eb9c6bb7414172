//! plant-doctor
//!
//! 植物の写真をGeminiで診断し、レポートを表示・出力する

pub mod acquisition;
pub mod ai_provider;
pub mod app;
pub mod cli;
pub mod config;
pub mod diagnosis;
pub mod error;
pub mod logging;
pub mod report;
pub mod session;
