// minibrowser Settings Engine
// Manages user settings: loading, updating individual values, and resetting to
// defaults. The record is held in memory; the shell persists it through the
// storage gateway on every change.

use serde_json::Value;

use crate::storage::gateway::{StorageGateway, KEY_SETTINGS};
use crate::types::errors::SettingsError;
use crate::types::settings::Settings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load_from(&mut self, store: &dyn StorageGateway) -> &Settings;
    fn get(&self) -> &Settings;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn reset(&mut self);
    fn to_record(&self) -> Value;
}

/// In-memory settings store seeded from the persistence gateway.
pub struct SettingsEngine {
    settings: Settings,
}

impl SettingsEngine {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
        }
    }
}

impl Default for SettingsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the gateway. An absent record, a read failure, or
    /// a record that no longer deserializes all degrade to defaults; missing
    /// individual keys fall back per field via serde.
    fn load_from(&mut self, store: &dyn StorageGateway) -> &Settings {
        self.settings = match store.load(KEY_SETTINGS) {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(error = %e, "stored settings unreadable, using defaults");
                    Settings::default()
                }
            },
            Ok(None) => Settings::default(),
            Err(e) => {
                tracing::warn!(error = %e, "settings read failed, using defaults");
                Settings::default()
            }
        };
        &self.settings
    }

    /// Returns the current in-memory settings.
    fn get(&self) -> &Settings {
        &self.settings
    }

    /// Updates one setting by its flat camelCase key (`"httpsOnly"`,
    /// `"startupTabMode"`, ...). The whole record is round-tripped through
    /// `serde_json::Value` so the new value is validated against the field's
    /// real type before it sticks.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("key cannot be empty".to_string()));
        }

        let mut record = serde_json::to_value(&self.settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;

        match record.as_object_mut() {
            Some(map) => {
                if !map.contains_key(key) {
                    return Err(SettingsError::InvalidKey(format!(
                        "key '{}' not found in settings",
                        key
                    )));
                }
                map.insert(key.to_string(), value);
            }
            None => {
                return Err(SettingsError::SerializationError(
                    "settings record is not an object".to_string(),
                ));
            }
        }

        self.settings = serde_json::from_value(record).map_err(|e| {
            SettingsError::InvalidValue(format!("invalid value for key '{}': {}", key, e))
        })?;
        Ok(())
    }

    /// Resets all settings to factory defaults.
    fn reset(&mut self) {
        self.settings = Settings::default();
    }

    /// The full record as persisted under the `settings` key.
    fn to_record(&self) -> Value {
        serde_json::to_value(&self.settings).unwrap_or(Value::Null)
    }
}
