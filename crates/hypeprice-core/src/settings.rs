//! Persisted user settings: cost model plus sort and store selections.
//!
//! Values live in a string-valued key-value store and are coerced back on
//! load. Storage failures are logged and dropped; the caller always gets a
//! usable [`Settings`] and a save never fails from its point of view.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::cost::{CostModel, Origin, Shipping};
use crate::error::StoreError;
use crate::pipeline::{SortOption, StoreFilter};

const KEY_SORT_OPTION: &str = "sortOption";
const KEY_STORE_FILTER: &str = "storeFilter";
const KEY_SHIPPING_COST: &str = "shippingCost";
const KEY_SHIPPING_MODE: &str = "shippingMode";
const KEY_APPLY_TAX: &str = "applyTax";
const KEY_TAX_THRESHOLD: &str = "taxThreshold";
const KEY_ORIGIN_COUNTRY: &str = "originCountry";
const KEY_WEIGHT_LBS: &str = "weightLbs";

const MODE_MANUAL: &str = "manual";
const MODE_DERIVED: &str = "derived";

/// A string-valued key-value backend.
pub trait KeyValueStore {
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store; nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Store backed by a flat JSON object of strings on disk.
///
/// The file is re-read on every access and rewritten on every `set`, so two
/// processes sharing a file see last-write-wins behaviour. A file that does
/// not parse reads as an error and is overwritten by the next `set`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| StoreError::Malformed {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        // A corrupt file is replaced wholesale by the next write.
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(e @ StoreError::Malformed { .. }) => {
                tracing::warn!(error = %e, "discarding unreadable settings file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_owned(), value.to_owned());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(&entries).map_err(|e| StoreError::Malformed {
            path: self.path.clone(),
            source: e,
        })?;
        std::fs::write(&self.path, body).map_err(io_err)
    }
}

/// Everything the user can adjust that survives a restart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub cost_model: CostModel,
    pub sort_option: SortOption,
    pub store_filter: StoreFilter,
}

/// Owns a [`KeyValueStore`] and maps [`Settings`] onto its keys.
#[derive(Debug)]
pub struct SettingsStore<S> {
    store: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Reads every setting, falling back to defaults for absent, unreadable,
    /// or unparsable values.
    #[must_use]
    pub fn load(&self) -> Settings {
        let defaults = CostModel::default();

        let sort_option = self
            .read(KEY_SORT_OPTION)
            .and_then(|v| v.parse::<SortOption>().ok())
            .unwrap_or_default();
        let store_filter = self
            .read(KEY_STORE_FILTER)
            .map(|v| StoreFilter::from(v.as_str()))
            .unwrap_or_default();

        let manual_amount = self
            .read_number(KEY_SHIPPING_COST)
            .unwrap_or(match defaults.shipping {
                Shipping::Manual(amount) => amount,
                Shipping::Derived => 0.0,
            });
        let shipping = match self.read(KEY_SHIPPING_MODE).as_deref() {
            Some(MODE_DERIVED) => Shipping::Derived,
            _ => Shipping::Manual(manual_amount),
        };

        let apply_tax = self
            .read(KEY_APPLY_TAX)
            .map_or(defaults.apply_tax, |v| v == "true");
        let tax_threshold_twd = self
            .read_number(KEY_TAX_THRESHOLD)
            .unwrap_or(defaults.tax_threshold_twd);
        let origin = self
            .read(KEY_ORIGIN_COUNTRY)
            .and_then(|v| Origin::from_code(&v))
            .unwrap_or(defaults.origin);
        let weight_lbs = self
            .read_number(KEY_WEIGHT_LBS)
            .unwrap_or(defaults.weight_lbs);

        Settings {
            cost_model: CostModel {
                shipping,
                apply_tax,
                tax_threshold_twd,
                origin,
                weight_lbs,
            },
            sort_option,
            store_filter,
        }
    }

    /// Writes every setting. Individual key failures are logged and skipped.
    pub fn save(&mut self, settings: &Settings) {
        self.save_sort_option(settings.sort_option);
        self.save_store_filter(&settings.store_filter);
        self.save_cost_model(&settings.cost_model);
    }

    pub fn save_sort_option(&mut self, sort_option: SortOption) {
        self.write(KEY_SORT_OPTION, sort_option.as_str());
    }

    pub fn save_store_filter(&mut self, store_filter: &StoreFilter) {
        self.write(KEY_STORE_FILTER, store_filter.as_str());
    }

    pub fn save_cost_model(&mut self, model: &CostModel) {
        // The effective amount is stored even when derived so readers that
        // only know `shippingCost` still see the current number.
        let mode = match model.shipping {
            Shipping::Manual(_) => MODE_MANUAL,
            Shipping::Derived => MODE_DERIVED,
        };
        self.write(KEY_SHIPPING_COST, &model.shipping_cost_twd().to_string());
        self.write(KEY_SHIPPING_MODE, mode);
        self.write(KEY_APPLY_TAX, if model.apply_tax { "true" } else { "false" });
        self.write(KEY_TAX_THRESHOLD, &model.tax_threshold_twd.to_string());
        self.write(KEY_ORIGIN_COUNTRY, model.origin.code());
        self.write(KEY_WEIGHT_LBS, &model.weight_lbs.to_string());
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "settings read failed; using default");
                None
            }
        }
    }

    fn read_number(&self, key: &str) -> Option<f64> {
        let raw = self.read(key)?;
        let parsed = raw.trim().parse::<f64>().ok().filter(|n| n.is_finite());
        if parsed.is_none() {
            tracing::debug!(key, value = %raw, "ignoring non-numeric setting");
        }
        parsed
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(key, error = %e, "settings write failed; change not persisted");
        }
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
