pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod notification;
pub mod pipeline;
pub mod summarization;
pub mod transcription;
pub mod twiml;
