pub mod browse;
pub mod mvi;
pub mod render;
pub mod view;
