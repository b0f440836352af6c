pub mod config;
pub mod files;
pub mod store;

pub use config::{load_settings, save_settings, Settings};
pub use files::{
    atomic_write, ensure_data_dir, ensure_dir, get_data_dir, init_local_data_dir, logs_dir,
    settings_file,
};
pub use store::{keys, load_or_default, save_json, save_or_warn, FileStore, KeyValueStore};

#[cfg(test)]
pub use store::MemoryStore;
