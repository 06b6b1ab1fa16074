use super::*;

/// Backend where every operation fails, to exercise the swallow-and-log path.
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Io {
            path: PathBuf::from("/broken"),
            source: std::io::Error::other("disk on fire"),
        })
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Io {
            path: PathBuf::from("/broken"),
            source: std::io::Error::other("disk on fire"),
        })
    }
}

fn store_with(pairs: &[(&str, &str)]) -> SettingsStore<MemoryStore> {
    let mut mem = MemoryStore::new();
    for (k, v) in pairs {
        mem.set(k, v).unwrap();
    }
    SettingsStore::new(mem)
}

fn temp_settings_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("hypeprice-test-{}", uuid::Uuid::new_v4()))
        .join("settings.json")
}

#[test]
fn empty_store_loads_defaults() {
    let settings = store_with(&[]).load();
    assert_eq!(settings.sort_option, SortOption::Recommended);
    assert_eq!(settings.store_filter, StoreFilter::All);
    assert_eq!(settings.cost_model.shipping, Shipping::Manual(800.0));
    assert!(settings.cost_model.apply_tax);
    assert!(settings.cost_model.tax_threshold_twd.abs() < f64::EPSILON);
    assert_eq!(settings.cost_model.origin, Origin::Us);
    assert!((settings.cost_model.weight_lbs - 1.0).abs() < f64::EPSILON);
}

#[test]
fn apply_tax_false_round_trips() {
    let mut store = store_with(&[]);
    let mut settings = store.load();
    settings.cost_model.apply_tax = false;
    store.save(&settings);

    assert!(!store.load().cost_model.apply_tax);

    settings.cost_model.apply_tax = true;
    store.save(&settings);
    assert!(store.load().cost_model.apply_tax);
}

#[test]
fn apply_tax_only_exact_true_string_is_true() {
    assert!(!store_with(&[("applyTax", "TRUE")]).load().cost_model.apply_tax);
    assert!(!store_with(&[("applyTax", "yes")]).load().cost_model.apply_tax);
    assert!(store_with(&[("applyTax", "true")]).load().cost_model.apply_tax);
}

#[test]
fn values_are_coerced_from_strings() {
    let settings = store_with(&[
        ("sortOption", "high"),
        ("storeFilter", "SSENSE"),
        ("shippingCost", "650"),
        ("taxThreshold", "2000"),
        ("originCountry", "JP"),
        ("weightLbs", "2.5"),
    ])
    .load();

    assert_eq!(settings.sort_option, SortOption::High);
    assert_eq!(
        settings.store_filter,
        StoreFilter::Store("SSENSE".to_string())
    );
    assert_eq!(settings.cost_model.shipping, Shipping::Manual(650.0));
    assert!((settings.cost_model.tax_threshold_twd - 2000.0).abs() < f64::EPSILON);
    assert_eq!(settings.cost_model.origin, Origin::Jp);
    assert!((settings.cost_model.weight_lbs - 2.5).abs() < f64::EPSILON);
}

#[test]
fn unparsable_values_fall_back_to_defaults() {
    let settings = store_with(&[
        ("sortOption", "cheapest"),
        ("shippingCost", "lots"),
        ("originCountry", "ZZ"),
        ("weightLbs", "NaN"),
    ])
    .load();

    assert_eq!(settings.sort_option, SortOption::Recommended);
    assert_eq!(settings.cost_model.shipping, Shipping::Manual(800.0));
    assert_eq!(settings.cost_model.origin, Origin::Us);
    assert!((settings.cost_model.weight_lbs - 1.0).abs() < f64::EPSILON);
}

#[test]
fn derived_shipping_mode_round_trips() {
    let mut store = store_with(&[]);
    let mut settings = store.load();
    settings.cost_model.set_origin(Origin::Hk);
    settings.cost_model.set_weight_lbs(3.0);
    store.save(&settings);

    let inner = store.into_inner();
    assert_eq!(inner.get("shippingMode").unwrap().as_deref(), Some("derived"));
    assert_eq!(inner.get("shippingCost").unwrap().as_deref(), Some("180"));

    let reloaded = SettingsStore::new(inner).load();
    assert_eq!(reloaded.cost_model.shipping, Shipping::Derived);
    assert!((reloaded.cost_model.shipping_cost_twd() - 180.0).abs() < f64::EPSILON);
}

#[test]
fn full_settings_round_trip() {
    let mut store = store_with(&[]);
    let settings = Settings {
        cost_model: CostModel {
            shipping: Shipping::Manual(420.0),
            apply_tax: false,
            tax_threshold_twd: 1500.0,
            origin: Origin::Eu,
            weight_lbs: 0.75,
        },
        sort_option: SortOption::Low,
        store_filter: StoreFilter::Store("Farfetch".to_string()),
    };
    store.save(&settings);
    assert_eq!(store.load(), settings);
}

#[test]
fn broken_backend_loads_defaults_and_save_does_not_panic() {
    let mut store = SettingsStore::new(BrokenStore);
    let settings = store.load();
    assert_eq!(settings, Settings::default());
    store.save(&settings);
}

#[test]
fn file_store_persists_across_instances() {
    let path = temp_settings_path();

    let mut first = SettingsStore::new(FileStore::new(&path));
    let mut settings = first.load();
    settings.sort_option = SortOption::High;
    settings.cost_model.apply_tax = false;
    first.save(&settings);

    let second = SettingsStore::new(FileStore::new(&path));
    let reloaded = second.load();
    assert_eq!(reloaded.sort_option, SortOption::High);
    assert!(!reloaded.cost_model.apply_tax);

    if let Some(dir) = path.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}

#[test]
fn file_store_missing_file_reads_as_empty() {
    let store = FileStore::new(temp_settings_path());
    assert_eq!(store.get("sortOption").unwrap(), None);
}

#[test]
fn file_store_malformed_file_is_an_error_but_settings_still_load() {
    let path = temp_settings_path();
    let dir = path.parent().unwrap().to_path_buf();
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    let store = FileStore::new(&path);
    assert!(matches!(
        store.get("sortOption"),
        Err(StoreError::Malformed { .. })
    ));
    assert_eq!(SettingsStore::new(store).load(), Settings::default());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn save_replaces_malformed_file() {
    let path = temp_settings_path();
    let dir = path.parent().unwrap().to_path_buf();
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(&path, "{ truncated").unwrap();

    let mut store = SettingsStore::new(FileStore::new(&path));
    let mut settings = store.load();
    assert_eq!(settings, Settings::default());
    settings.sort_option = SortOption::High;
    store.save(&settings);

    let reloaded = SettingsStore::new(FileStore::new(&path)).load();
    assert_eq!(reloaded.sort_option, SortOption::High);
    assert_eq!(reloaded.cost_model, CostModel::default());

    let _ = std::fs::remove_dir_all(dir);
}
