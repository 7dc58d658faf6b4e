pub mod manager;

pub use manager::{apply_env, default_data_dir, load_config, save_config};
