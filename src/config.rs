use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use unicode_width::UnicodeWidthChar;

use crate::error::{GameError, Result};
use crate::food::DEFAULT_FOOD_GLYPH;
use crate::snake::DEFAULT_BODY_GLYPH;

const CONFIG_APP_DIR: &str = "wrap-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Movement tick interval in milliseconds.
pub const DEFAULT_MOVE_INTERVAL_MS: u64 = 200;

/// Render tick interval in milliseconds.
pub const DEFAULT_RENDER_INTERVAL_MS: u64 = 80;

/// Leading segments ignored by the self-collision check.
///
/// Changing this shifts when a tight turn ends the game.
pub const DEFAULT_COLLISION_SKIP: usize = 4;

/// Starting snake length.
pub const DEFAULT_INITIAL_LENGTH: usize = 6;

/// Glyph for empty cells.
pub const DEFAULT_BACKGROUND_GLYPH: char = '·';

/// Rows kept free below the play field.
pub const RESERVED_ROWS: u16 = 1;

/// Tunables for one session, readable from a JSON file.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub move_interval_ms: u64,
    pub render_interval_ms: u64,
    pub collision_skip: usize,
    pub initial_length: usize,
    pub background_glyph: char,
    pub body_glyph: char,
    pub food_glyph: char,
    /// Clear the whole terminal before every frame instead of letting
    /// ratatui send only the changed cells.
    pub clear_each_frame: bool,
    /// Fixed RNG seed for reproducible food placement.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            move_interval_ms: DEFAULT_MOVE_INTERVAL_MS,
            render_interval_ms: DEFAULT_RENDER_INTERVAL_MS,
            collision_skip: DEFAULT_COLLISION_SKIP,
            initial_length: DEFAULT_INITIAL_LENGTH,
            background_glyph: DEFAULT_BACKGROUND_GLYPH,
            body_glyph: DEFAULT_BODY_GLYPH,
            food_glyph: DEFAULT_FOOD_GLYPH,
            clear_each_frame: true,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Loads `explicit` if given, else the per-user config file, else defaults.
    ///
    /// A missing explicit file is an error; a missing per-user file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_path(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw).map_err(|source| GameError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(raw: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Rejects settings the game loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.move_interval_ms == 0 || self.render_interval_ms == 0 {
            return Err(GameError::InvalidConfig(
                "tick intervals must be at least 1 ms".to_owned(),
            ));
        }

        if self.initial_length == 0 {
            return Err(GameError::InvalidConfig(
                "initial_length must be at least 1".to_owned(),
            ));
        }

        for (name, glyph) in [
            ("background_glyph", self.background_glyph),
            ("body_glyph", self.body_glyph),
            ("food_glyph", self.food_glyph),
        ] {
            if glyph.width() != Some(1) {
                return Err(GameError::InvalidConfig(format!(
                    "{name} {glyph:?} must occupy exactly one terminal column"
                )));
            }
        }

        if self.collision_skip == 0 {
            return Err(GameError::InvalidConfig(
                "collision_skip must be at least 1, the head is segment 0".to_owned(),
            ));
        }

        Ok(())
    }

    #[must_use]
    pub fn move_interval(&self) -> Duration {
        Duration::from_millis(self.move_interval_ms)
    }

    #[must_use]
    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render_interval_ms)
    }
}

/// Returns the platform-correct per-user config path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(CONFIG_APP_DIR);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}

/// Play-field size for a terminal of `columns` × `rows`.
pub fn grid_size_for_terminal(columns: u16, rows: u16) -> io::Result<(u16, u16)> {
    let height = rows.saturating_sub(RESERVED_ROWS);
    if columns == 0 || height == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("terminal {columns}x{rows} is too small to play in"),
        ));
    }
    Ok((columns, height))
}
