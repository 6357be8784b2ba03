pub mod cli;
pub mod config;
pub mod interaction;
pub mod persistence;
pub mod render;
pub mod world;
