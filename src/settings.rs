//! Game settings and preferences
//!
//! UX tuning only; nothing here changes the algebra. Persisted separately
//! from the game in LocalStorage on the web.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{BASE_DIFFICULTY, MAX_DIFFICULTY};

/// Errors loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Setting out of range: {0}")]
    OutOfRange(&'static str),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Drag and drop ===
    /// Fraction of the dragged card's area that must cover another card to offer a merge
    pub merge_overlap_threshold: f32,
    /// Position of the equals line as a fraction of the board width
    pub midline_fraction: f32,

    // === Dialogs ===
    /// How long a failed merge dialog stays up before closing itself (ms)
    pub merge_error_dismiss_ms: u64,

    // === Run ===
    /// Fixed seed for reproducible runs (random when unset)
    pub seed: Option<u64>,
    /// Difficulty a new game starts at
    pub start_difficulty: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            merge_overlap_threshold: 0.3,
            midline_fraction: 0.5,
            merge_error_dismiss_ms: 1500,
            seed: None,
            start_difficulty: BASE_DIFFICULTY,
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.merge_overlap_threshold) {
            return Err(SettingsError::OutOfRange("merge_overlap_threshold"));
        }
        if !(0.0..=1.0).contains(&self.midline_fraction) {
            return Err(SettingsError::OutOfRange("midline_fraction"));
        }
        if !(BASE_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.start_difficulty) {
            return Err(SettingsError::OutOfRange("start_difficulty"));
        }
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "equation_balance_settings";

    /// Environment variable holding settings JSON for native runs
    pub const ENV_VAR: &'static str = "EQUATION_BALANCE_SETTINGS";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native: settings JSON from the environment, else defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var(Self::ENV_VAR) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", Self::ENV_VAR);
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", Self::ENV_VAR, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.merge_overlap_threshold, 0.3);
        assert_eq!(settings.midline_fraction, 0.5);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let settings = Settings::from_json(r#"{"merge_error_dismiss_ms": 800, "seed": 42}"#).unwrap();
        assert_eq!(settings.merge_error_dismiss_ms, 800);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.merge_overlap_threshold, 0.3);
    }

    #[test]
    fn test_rejects_bad_settings() {
        assert!(matches!(
            Settings::from_json(r#"{"merge_overlap_threshold": 1.5}"#),
            Err(SettingsError::OutOfRange("merge_overlap_threshold"))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"start_difficulty": 1e18}"#),
            Err(SettingsError::OutOfRange("start_difficulty"))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"start_difficulty": 0.5}"#),
            Err(SettingsError::OutOfRange("start_difficulty"))
        ));
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            seed: Some(7),
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
