//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ConfigPort`] for the PulseGate firmware.  The system
//! configuration is a single `postcard` blob in the `pulsegate` namespace.
//! All fields are range-checked before persistence — a bad blob on flash
//! falls back to defaults rather than bricking the command link.

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;
use log::{info, warn};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const CONFIG_NAMESPACE: &str = "pulsegate";
const CONFIG_KEY: &[u8] = b"syscfg\0";

#[cfg(target_os = "espidf")]
const MAX_BLOB_SIZE: usize = 256;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: std::cell::RefCell<Option<Vec<u8>>>,
}

impl NvsAdapter {
    /// Create a new NvsAdapter and initialise NVS flash.
    ///
    /// On first boot or after a version mismatch the NVS partition is
    /// erased and re-initialised automatically.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                let ret2 = unsafe { nvs_flash_erase() };
                if ret2 != ESP_OK {
                    return Err(ConfigError::IoError);
                }
                let ret3 = unsafe { nvs_flash_init() };
                if ret3 != ESP_OK {
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
            store: std::cell::RefCell::new(None),
        })
    }

    /// Open an NVS namespace, execute a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut ns_buf = [0u8; 16];
        let ns_bytes = CONFIG_NAMESPACE.as_bytes();
        ns_buf[..ns_bytes.len()].copy_from_slice(ns_bytes);

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
}

fn validate_config(cfg: &SystemConfig) -> Result<(), ConfigError> {
    if !(9_600..=921_600).contains(&cfg.link_baud) {
        return Err(ConfigError::ValidationFailed(
            "link_baud must be 9600–921600",
        ));
    }
    if cfg.loop_delay_ms > 100 {
        return Err(ConfigError::ValidationFailed(
            "loop_delay_ms must be 0–100",
        ));
    }
    if !(5..=3_600).contains(&cfg.telemetry_interval_secs) {
        return Err(ConfigError::ValidationFailed(
            "telemetry_interval_secs must be 5–3600",
        ));
    }
    Ok(())
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        #[cfg(not(target_os = "espidf"))]
        {
            if let Some(bytes) = self.store.borrow().as_deref() {
                let cfg: SystemConfig =
                    postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
                info!("NvsAdapter: loaded config from store");
                Ok(cfg)
            } else {
                info!("NvsAdapter: no stored config, using defaults");
                Ok(SystemConfig::default())
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(false, |handle| {
                let mut size: usize = 0;

                // First call: get size
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        CONFIG_KEY.as_ptr() as *const _,
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
                        CONFIG_KEY.as_ptr() as *const _,
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
                Ok(bytes) => {
                    let cfg: SystemConfig =
                        postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
                    info!("NvsAdapter: loaded config from NVS ({} bytes)", bytes.len());
                    Ok(cfg)
                }
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => {
                    info!("NvsAdapter: no stored config, using defaults");
                    Ok(SystemConfig::default())
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS read error {}, using defaults", e);
                    Ok(SystemConfig::default())
                }
            }
        }
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        validate_config(config)?;

        #[cfg(not(target_os = "espidf"))]
        {
            let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
            *self.store.borrow_mut() = Some(bytes);
            info!("NvsAdapter: config saved (simulation)");
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
            let result = Self::with_nvs_handle(true, |handle| {
                let ret = unsafe {
                    nvs_set_blob(
                        handle,
                        CONFIG_KEY.as_ptr() as *const _,
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
            match result {
                Ok(()) => {
                    info!("NvsAdapter: config saved to NVS ({} bytes)", bytes.len());
                    Ok(())
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS write error {}", e);
                    Err(ConfigError::IoError)
                }
            }
        }
    }
}
