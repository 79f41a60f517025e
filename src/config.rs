//! Run configuration.
//!
//! Values come from three layers, highest precedence first: command-line
//! flags (or their environment variables), an optional YAML config file,
//! and built-in defaults. The merged [`Config`] is immutable for the run.
//!
//! ```yaml
//! image_dir: assets/images
//! width: 640
//! height: 0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ImgfindError;

/// Resolved settings for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Root of the directory tree scanned for images.
    pub image_dir: PathBuf,
    /// Width used when a reference has no directive; 0 = unconstrained.
    pub default_width: u32,
    /// Height used when a reference has no directive; 0 = unconstrained.
    pub default_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("."),
            default_width: 0,
            default_height: 0,
        }
    }
}

/// Contents of a YAML config file. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub image_dir: Option<PathBuf>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ConfigFile {
    /// Load a config file. A relative `image_dir` is taken relative to the
    /// file's own directory.
    pub fn load(path: &Path) -> Result<Self, ImgfindError> {
        let yaml = fs::read_to_string(path).map_err(ImgfindError::Io)?;
        let mut file = Self::from_yaml_str(&yaml, path)?;

        if let (Some(dir), Some(base)) = (&file.image_dir, path.parent()) {
            if dir.is_relative() && !base.as_os_str().is_empty() {
                file.image_dir = Some(base.join(dir));
            }
        }
        Ok(file)
    }

    fn from_yaml_str(yaml: &str, path: &Path) -> Result<Self, ImgfindError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|source| ImgfindError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values given on the command line (or through the environment).
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub image_dir: Option<PathBuf>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Config {
    /// Merge overrides over an optional config file over the defaults.
    pub fn layered(file: Option<&ConfigFile>, overrides: &ConfigOverrides) -> Self {
        let defaults = Config::default();
        let file = file.cloned().unwrap_or_default();

        Config {
            image_dir: overrides
                .image_dir
                .clone()
                .or(file.image_dir)
                .unwrap_or(defaults.image_dir),
            default_width: overrides
                .width
                .or(file.width)
                .unwrap_or(defaults.default_width),
            default_height: overrides
                .height
                .or(file.height)
                .unwrap_or(defaults.default_height),
        }
    }

    /// Load `config_path` if given and merge `overrides` over it.
    pub fn load(
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ImgfindError> {
        let file = config_path.map(ConfigFile::load).transpose()?;
        let config = Config::layered(file.as_ref(), overrides);
        log::debug!("configuration: {config:?}");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unconstrained_current_dir() {
        let config = Config::layered(None, &ConfigOverrides::default());
        assert_eq!(config.image_dir, PathBuf::from("."));
        assert_eq!(config.default_width, 0);
        assert_eq!(config.default_height, 0);
    }

    #[test]
    fn overrides_beat_file_which_beats_defaults() {
        let file = ConfigFile {
            image_dir: Some(PathBuf::from("from-file")),
            width: Some(640),
            height: Some(480),
        };
        let overrides = ConfigOverrides {
            width: Some(320),
            ..Default::default()
        };

        let config = Config::layered(Some(&file), &overrides);
        assert_eq!(config.image_dir, PathBuf::from("from-file"));
        assert_eq!(config.default_width, 320);
        assert_eq!(config.default_height, 480);
    }

    #[test]
    fn load_resolves_relative_image_dir_against_config_location() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("imgfind.yaml");
        fs::write(&path, "image_dir: pictures\nwidth: 200\n").expect("write config");

        let file = ConfigFile::load(&path).expect("load config");
        assert_eq!(file.image_dir, Some(temp.path().join("pictures")));
        assert_eq!(file.width, Some(200));
        assert_eq!(file.height, None);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let file = ConfigFile::from_yaml_str("  \n", Path::new("empty.yaml")).expect("parse");
        assert_eq!(file, ConfigFile::default());
    }

    #[test]
    fn unknown_keys_and_bad_values_are_rejected() {
        let err = ConfigFile::from_yaml_str("colour: red\n", Path::new("bad.yaml"))
            .expect_err("unknown key");
        assert!(matches!(err, ImgfindError::ConfigParse { .. }));

        let err = ConfigFile::from_yaml_str("width: -3\n", Path::new("bad.yaml"))
            .expect_err("negative width");
        assert!(matches!(err, ImgfindError::ConfigParse { .. }));
    }
}
