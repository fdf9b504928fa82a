//! Configuration: types, default paths, XML loading and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{
    default_config_path, default_log_path, default_music_dir, default_rules_db_path,
    path_has_symlink_ancestor, CONFIG_ENV_VAR,
};
pub use types::{Config, LogLevel};
pub use xml::{create_template_config, load_config_from_xml_path, load_or_init, LoadResult};

/// Music folder under the home directory used when nothing else is configured.
pub const MUSIC_DIR_DEFAULT: &str = "Documents/Downloaded Music";
