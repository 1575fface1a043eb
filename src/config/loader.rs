//! Configuration file loading

use super::file::{ConfigFile, CONFIG_FILE_NAME};
use crate::infra::{FileSystem, RealFileSystem};
use anyhow::{Context, Result};
use std::path::Path;

/// Loads `.fn-footprint.toml` through a [`FileSystem`]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from .fn-footprint.toml in the given directory
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fn_footprint::config::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load(Path::new("."))?;
    /// println!("Row limit: {:?}", config.report_limit());
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(project_root: &Path) -> Result<ConfigFile> {
        Self::load_with_fs(project_root, &RealFileSystem)
    }

    /// Load config with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(project_root: &Path, fs: &FS) -> Result<ConfigFile> {
        let config_path = project_root.join(CONFIG_FILE_NAME);

        let contents = match fs.read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!(
                    "no {} in {}, using defaults",
                    CONFIG_FILE_NAME,
                    project_root.display()
                );
                return Ok(ConfigFile::default());
            }
            Err(e) => {
                return Err(e).context("Failed to read .fn-footprint.toml");
            }
        };

        let config: ConfigFile =
            toml_edit::de::from_str(&contents).context("Failed to parse .fn-footprint.toml")?;

        // Reject bad mnemonics at load time rather than at first use
        config
            .call_mnemonics()
            .context("Invalid [calls] configuration")?;

        Ok(config)
    }
}
