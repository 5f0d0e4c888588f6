// src/services/mod.rs
pub mod catalog;
pub mod gemini;
pub mod history;
pub mod relay;
pub mod session;
