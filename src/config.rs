use std::path::Path;

use log::error;
use serde::{Deserialize, Serialize};

use crate::{error::Result, painter::PaintMode, picture::VOUT_MAX_PICTURES};

pub const CONFIG_NAME: &str = "vout-gtk";

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct VoutConfig {
    /// Display name to open. Accepted and ignored.
    display: Option<String>,
    /// Bypass the window manager when going fullscreen. Accepted and ignored.
    alt_fullscreen: bool,
    /// Existing drawable to paint into instead of a new window. Accepted and
    /// ignored.
    drawable: i64,
    width: u32,
    height: u32,
    fullscreen: bool,
    paint_mode: PaintMode,
    direct_buffers: usize,
}

impl Default for VoutConfig {
    fn default() -> Self {
        Self {
            display: None,
            alt_fullscreen: false,
            drawable: -1,
            width: 320,
            height: 240,
            fullscreen: true,
            paint_mode: PaintMode::Rotate,
            direct_buffers: 1,
        }
    }
}

impl VoutConfig {
    /// Loads the user's settings, falling back to defaults.
    pub fn load() -> Self {
        match confy::load::<VoutConfig>(CONFIG_NAME, None) {
            Err(e) => {
                error!("Couldn't load settings. Using defaults. '{}'", e);
                VoutConfig::default()
            }
            Ok(config) => config,
        }
    }

    pub fn load_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(confy::load_path(path)?)
    }

    pub fn store_path(&self, path: impl AsRef<Path>) -> Result<()> {
        Ok(confy::store_path(path, self)?)
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    pub fn set_display(&mut self, display: Option<String>) {
        self.display = display;
    }

    pub fn alt_fullscreen(&self) -> bool {
        self.alt_fullscreen
    }

    pub fn set_alt_fullscreen(&mut self, alt_fullscreen: bool) {
        self.alt_fullscreen = alt_fullscreen;
    }

    pub fn drawable(&self) -> i64 {
        self.drawable
    }

    pub fn set_drawable(&mut self, drawable: i64) {
        self.drawable = drawable;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    pub fn paint_mode(&self) -> PaintMode {
        self.paint_mode
    }

    pub fn set_paint_mode(&mut self, paint_mode: PaintMode) {
        self.paint_mode = paint_mode;
    }

    /// Pool ceiling, always within `1..=VOUT_MAX_PICTURES`.
    pub fn direct_buffers(&self) -> usize {
        self.direct_buffers.clamp(1, VOUT_MAX_PICTURES)
    }

    pub fn set_direct_buffers(&mut self, direct_buffers: usize) {
        self.direct_buffers = direct_buffers;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_handheld() {
        let config = VoutConfig::default();
        assert_eq!((config.width(), config.height()), (320, 240));
        assert!(config.fullscreen());
        assert_eq!(config.drawable(), -1);
        assert_eq!(config.display(), None);
        assert!(!config.alt_fullscreen());
        assert_eq!(config.paint_mode(), PaintMode::Rotate);
        assert_eq!(config.direct_buffers(), 1);
    }

    #[test]
    fn pool_ceiling_is_clamped() {
        let mut config = VoutConfig::default();
        config.set_direct_buffers(0);
        assert_eq!(config.direct_buffers(), 1);
        config.set_direct_buffers(100);
        assert_eq!(config.direct_buffers(), VOUT_MAX_PICTURES);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vout.toml");
        assert_eq!(VoutConfig::load_path(&path).unwrap(), VoutConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn stored_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vout.toml");

        let mut config = VoutConfig::default();
        config.set_paint_mode(PaintMode::Direct);
        config.set_direct_buffers(3);
        config.set_display(Some(":1".into()));
        config.store_path(&path).unwrap();

        let loaded = VoutConfig::load_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vout.toml");
        std::fs::write(&path, "paint_mode = \"direct\"\n").unwrap();

        let loaded = VoutConfig::load_path(&path).unwrap();
        assert_eq!(loaded.paint_mode(), PaintMode::Direct);
        assert_eq!((loaded.width(), loaded.height()), (320, 240));
    }
}
