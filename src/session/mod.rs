pub mod config;
pub mod observer;
pub mod render_loop;
pub mod screens;
