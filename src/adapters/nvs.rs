//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ConfigPort`] and [`StoragePort`] for the Growlight system.
//! Two blobs live in the `growlight` namespace: the tunable configuration
//! (`syscfg`) and the last-known runtime state (`laststate`), both encoded
//! with postcard.
//!
//! Config validation is strict: all fields are range-checked before
//! persistence and rejected (never clamped) when invalid — a remote config
//! channel must not be able to lift the UV ceiling or collapse the button
//! debounce.  On the host the backend is an in-memory map so every test
//! runs without flash.

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::{SavedState, SystemConfig};
use log::{info, warn};

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const CONFIG_NAMESPACE: &str = "growlight";
const CONFIG_KEY: &str = "syscfg";
const STATE_KEY: &str = "laststate";

#[allow(dead_code)]
const MAX_BLOB_SIZE: usize = 4000;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: std::cell::RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsAdapter {
    /// Create a new NvsAdapter and initialise NVS flash.
    ///
    /// Returns `Err(ConfigError::IoError)` if flash initialisation fails
    /// unrecoverably.  On first boot or after a version mismatch the NVS
    /// partition is erased and re-initialised automatically.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(ConfigError::IoError);
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: std::cell::RefCell::new(HashMap::new()),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// Open an NVS namespace, execute a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(namespace: &str, write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut ns_buf = [0u8; 16];
        let ns_bytes = namespace.as_bytes();
        let len = ns_bytes.len().min(15);
        ns_buf[..len].copy_from_slice(&ns_bytes[..len]);

        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(ns_buf.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }

    /// Load a blob from the config namespace.  `Ok(None)` means not found.
    fn load_blob(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(CONFIG_NAMESPACE, key);
            Ok(self.store.borrow().get(&composite).cloned())
        }

        #[cfg(target_os = "espidf")]
        {
            let mut key_buf = [0u8; 16];
            let kb = key.as_bytes();
            let kl = kb.len().min(15);
            key_buf[..kl].copy_from_slice(&kb[..kl]);

            let result = Self::with_nvs_handle(CONFIG_NAMESPACE, false, |handle| {
                let mut size: usize = 0;
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        key_buf.as_ptr() as *const _,
                        core::ptr::null_mut(),
                        &mut size,
                    )
                };
                if ret == ESP_ERR_NVS_NOT_FOUND {
                    return Err(ESP_ERR_NVS_NOT_FOUND);
                }
                if ret != ESP_OK || size == 0 || size > MAX_BLOB_SIZE {
                    return Err(ret);
                }

                let mut buf = vec![0u8; size];
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        key_buf.as_ptr() as *const _,
                        buf.as_mut_ptr() as *mut _,
                        &mut size,
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(buf)
            });

            match result {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => Ok(None),
                Err(e) => {
                    warn!("NvsAdapter: NVS read error {} for '{}'", e, key);
                    Err(ConfigError::IoError)
                }
            }
        }
    }

    /// Store a blob in the config namespace.
    fn store_blob(&self, key: &str, bytes: &[u8]) -> Result<(), ConfigError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(CONFIG_NAMESPACE, key);
            self.store.borrow_mut().insert(composite, bytes.to_vec());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let mut key_buf = [0u8; 16];
            let kb = key.as_bytes();
            let kl = kb.len().min(15);
            key_buf[..kl].copy_from_slice(&kb[..kl]);

            let result = Self::with_nvs_handle(CONFIG_NAMESPACE, true, |handle| {
                let ret = unsafe {
                    nvs_set_blob(
                        handle,
                        key_buf.as_ptr() as *const _,
                        bytes.as_ptr() as *const _,
                        bytes.len(),
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            });
            result.map_err(|e| {
                warn!("NvsAdapter: NVS write error {} for '{}'", e, key);
                ConfigError::IoError
            })
        }
    }
}

fn validate_config(cfg: &SystemConfig) -> Result<(), ConfigError> {
    if cfg.night_start_min >= 24 * 60 {
        return Err(ConfigError::ValidationFailed(
            "night_start_min must be below 1440",
        ));
    }
    if cfg.sunrise_start_min >= cfg.day_start_min
        || cfg.day_start_min >= cfg.sunset_start_min
        || cfg.sunset_start_min >= cfg.night_start_min
    {
        return Err(ConfigError::ValidationFailed(
            "schedule breakpoints must be strictly increasing",
        ));
    }
    if !(60..=86_400).contains(&cfg.manual_timeout_secs) {
        return Err(ConfigError::ValidationFailed(
            "manual_timeout_secs must be 60–86400",
        ));
    }
    if !(0.1..=32.0).contains(&cfg.fade_step) {
        return Err(ConfigError::ValidationFailed(
            "fade_step must be 0.1–32.0",
        ));
    }
    if !(1..=128).contains(&cfg.brightness_step) {
        return Err(ConfigError::ValidationFailed(
            "brightness_step must be 1–128",
        ));
    }
    for watts in [cfg.white_max_watts, cfg.red_max_watts, cfg.uv_max_watts] {
        if !(0.5..=100.0).contains(&watts) {
            return Err(ConfigError::ValidationFailed(
                "channel wattage must be 0.5–100.0",
            ));
        }
    }
    if !(5..=200).contains(&cfg.debounce_ms) {
        return Err(ConfigError::ValidationFailed("debounce_ms must be 5–200"));
    }
    if !(100..=2000).contains(&cfg.double_click_ms) {
        return Err(ConfigError::ValidationFailed(
            "double_click_ms must be 100–2000",
        ));
    }
    if cfg.long_press_ms <= cfg.debounce_ms || cfg.long_press_ms > 10_000 {
        return Err(ConfigError::ValidationFailed(
            "long_press_ms must exceed debounce_ms and stay below 10s",
        ));
    }
    if !(1..=1000).contains(&cfg.control_loop_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "control_loop_interval_ms must be 1–1000",
        ));
    }
    if !(5..=3600).contains(&cfg.telemetry_interval_secs) {
        return Err(ConfigError::ValidationFailed(
            "telemetry_interval_secs must be 5–3600",
        ));
    }
    Ok(())
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        match self.load_blob(CONFIG_KEY) {
            Ok(Some(bytes)) => {
                let cfg: SystemConfig =
                    postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
                info!("NvsAdapter: loaded config ({} bytes)", bytes.len());
                Ok(cfg)
            }
            Ok(None) => {
                info!("NvsAdapter: no stored config, using defaults");
                Ok(SystemConfig::default())
            }
            Err(_) => {
                warn!("NvsAdapter: config read failed, using defaults");
                Ok(SystemConfig::default())
            }
        }
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        self.store_blob(CONFIG_KEY, &bytes)?;
        info!("NvsAdapter: config saved ({} bytes)", bytes.len());
        Ok(())
    }

    fn load_state(&self) -> Result<SavedState, ConfigError> {
        match self.load_blob(STATE_KEY) {
            Ok(Some(bytes)) => {
                let state: SavedState =
                    postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
                info!("NvsAdapter: restored runtime state {:?}", state.targets);
                Ok(state)
            }
            Ok(None) => {
                info!("NvsAdapter: no stored state, starting dark");
                Ok(SavedState::default())
            }
            Err(_) => {
                warn!("NvsAdapter: state read failed, starting dark");
                Ok(SavedState::default())
            }
        }
    }

    fn save_state(&self, state: &SavedState) -> Result<(), ConfigError> {
        let bytes = postcard::to_allocvec(state).map_err(|_| ConfigError::IoError)?;
        self.store_blob(STATE_KEY, &bytes)
    }
}

impl StoragePort for NvsAdapter {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            match self.store.borrow().get(&composite) {
                Some(data) => {
                    let len = data.len().min(buf.len());
                    buf[..len].copy_from_slice(&data[..len]);
                    Ok(len)
                }
                None => Err(StorageError::NotFound),
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(namespace, false, |handle| {
                let mut key_buf = [0u8; 16];
                let kb = key.as_bytes();
                let kl = kb.len().min(15);
                key_buf[..kl].copy_from_slice(&kb[..kl]);

                let mut size = buf.len();
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        key_buf.as_ptr() as *const _,
                        buf.as_mut_ptr() as *mut _,
                        &mut size,
                    )
                };
                if ret == ESP_ERR_NVS_NOT_FOUND {
                    return Err(ESP_ERR_NVS_NOT_FOUND);
                }
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(size)
            });
            match result {
                Ok(size) => Ok(size),
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => Err(StorageError::NotFound),
                Err(_) => Err(StorageError::IoError),
            }
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            self.store.borrow_mut().insert(composite, data.to_vec());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(namespace, true, |handle| {
                let mut key_buf = [0u8; 16];
                let kb = key.as_bytes();
                let kl = kb.len().min(15);
                key_buf[..kl].copy_from_slice(&kb[..kl]);

                let ret = unsafe {
                    nvs_set_blob(
                        handle,
                        key_buf.as_ptr() as *const _,
                        data.as_ptr() as *const _,
                        data.len(),
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            });
            result.map_err(|_| StorageError::IoError)
        }
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            self.store.borrow_mut().remove(&composite);
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(namespace, true, |handle| {
                let mut key_buf = [0u8; 16];
                let kb = key.as_bytes();
                let kl = kb.len().min(15);
                key_buf[..kl].copy_from_slice(&kb[..kl]);

                let ret = unsafe { nvs_erase_key(handle, key_buf.as_ptr() as *const _) };
                if ret != ESP_OK && ret != ESP_ERR_NVS_NOT_FOUND {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            });
            result.map_err(|_| StorageError::IoError)
        }
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            self.store.borrow().contains_key(&composite)
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(namespace, false, |handle| {
                let mut key_buf = [0u8; 16];
                let kb = key.as_bytes();
                let kl = kb.len().min(15);
                key_buf[..kl].copy_from_slice(&kb[..kl]);

                let ret = unsafe {
                    nvs_find_key(handle, key_buf.as_ptr() as *const _, core::ptr::null_mut())
                };
                Ok(ret == ESP_OK)
            });
            result.unwrap_or(false)
        }
    }
}

impl Default for NvsAdapter {
    fn default() -> Self {
        // Last-resort fallback when flash init fails; runs without
        // persistence for this session.
        Self::new().unwrap_or_else(|_| Self {
            #[cfg(not(target_os = "espidf"))]
            store: std::cell::RefCell::new(HashMap::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::Language;

    #[test]
    fn default_config_passes_validation() {
        let cfg = SystemConfig::default();
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn rejects_unordered_breakpoints() {
        let cfg = SystemConfig {
            day_start_min: 300,
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&cfg),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn rejects_zero_brightness_step() {
        let cfg = SystemConfig {
            brightness_step: 0,
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&cfg),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn rejects_absurd_fade_step() {
        let cfg = SystemConfig {
            fade_step: 1000.0,
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&cfg),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn save_rejects_invalid_config_without_writing() {
        let nvs = NvsAdapter::new().unwrap();
        let cfg = SystemConfig {
            manual_timeout_secs: 0,
            ..Default::default()
        };
        assert!(nvs.save(&cfg).is_err());
        // A following load must fall back to defaults, not the bad config.
        let loaded = nvs.load().unwrap();
        assert_eq!(loaded.manual_timeout_secs, SystemConfig::default().manual_timeout_secs);
    }

    #[test]
    fn config_save_load_roundtrip() {
        let nvs = NvsAdapter::new().unwrap();
        let cfg = SystemConfig {
            uv_ceiling: 150,
            brightness_step: 10,
            ..Default::default()
        };
        nvs.save(&cfg).unwrap();
        let loaded = nvs.load().unwrap();
        assert_eq!(loaded.uv_ceiling, 150);
        assert_eq!(loaded.brightness_step, 10);
    }

    #[test]
    fn state_save_load_roundtrip() {
        let nvs = NvsAdapter::new().unwrap();
        let state = SavedState {
            targets: [100, 255, 60],
            language: Language::En,
            power_save: true,
        };
        nvs.save_state(&state).unwrap();
        assert_eq!(nvs.load_state().unwrap(), state);
    }

    #[test]
    fn missing_state_defaults_dark() {
        let nvs = NvsAdapter::new().unwrap();
        let state = nvs.load_state().unwrap();
        assert_eq!(state.targets, [0, 0, 0]);
        assert!(!state.power_save);
    }

    #[test]
    fn storage_round_trip() {
        let mut nvs = NvsAdapter::new().unwrap();
        let data = b"hello NVS";
        nvs.write("test_ns", "greeting", data).unwrap();
        assert!(nvs.exists("test_ns", "greeting"));

        let mut buf = [0u8; 64];
        let len = nvs.read("test_ns", "greeting", &mut buf).unwrap();
        assert_eq!(&buf[..len], data);

        nvs.delete("test_ns", "greeting").unwrap();
        assert!(!nvs.exists("test_ns", "greeting"));
    }

    #[test]
    fn storage_read_missing_key() {
        let nvs = NvsAdapter::new().unwrap();
        let mut buf = [0u8; 64];
        assert!(matches!(
            nvs.read("ns", "nope", &mut buf),
            Err(StorageError::NotFound)
        ));
    }

    #[test]
    fn namespace_isolation() {
        let mut nvs = NvsAdapter::new().unwrap();
        nvs.write("ns_a", "key", b"alpha").unwrap();
        nvs.write("ns_b", "key", b"bravo").unwrap();

        let mut buf = [0u8; 64];
        let len = nvs.read("ns_a", "key", &mut buf).unwrap();
        assert_eq!(&buf[..len], b"alpha");

        let len = nvs.read("ns_b", "key", &mut buf).unwrap();
        assert_eq!(&buf[..len], b"bravo");
    }
}
