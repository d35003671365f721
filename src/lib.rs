pub mod config;
pub mod frame_loop;
pub mod gui;
pub mod math;
pub mod model;
pub mod render;
