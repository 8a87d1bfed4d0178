pub mod app;
pub mod cli;
pub mod config;
pub mod diplomas;
pub mod logging;
pub mod portal;
pub mod state;
pub mod utils;
pub mod web;
