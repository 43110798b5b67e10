pub mod config_ops;
pub mod grid_ops;
