pub mod api;
pub mod client;
pub mod config;
pub mod data_models;
pub mod error;
pub mod panel;
pub mod render;
