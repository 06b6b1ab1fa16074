//! `settings` sub-commands and the single-field edits shared with the shell.
//!
//! Every edit is persisted as soon as it is applied.

use clap::Subcommand;
use hypeprice_core::{KeyValueStore, Origin, Settings, SettingsStore, SortOption, StoreFilter};

/// Sub-commands available under `settings`.
#[derive(Debug, Subcommand)]
pub enum SettingsCommands {
    /// Print the current settings
    Show,
    /// Change one or more settings
    Set {
        /// Manual shipping amount in TWD
        #[arg(long, value_parser = parse_finite)]
        shipping: Option<f64>,

        /// Parcel weight in pounds; switches shipping to derived
        #[arg(long, value_parser = parse_finite)]
        weight: Option<f64>,

        /// Shipping origin: US, GB, JP, HK, AU, EU; switches shipping to derived
        #[arg(long)]
        origin: Option<Origin>,

        /// Whether import tax is added
        #[arg(long)]
        apply_tax: Option<bool>,

        /// Base price at or above which tax applies
        #[arg(long, value_parser = parse_finite)]
        threshold: Option<f64>,

        /// Result ordering: recommended, low, or high
        #[arg(long)]
        sort: Option<SortOption>,

        /// Retailer filter; "All Stores" clears it
        #[arg(long)]
        store: Option<String>,
    },
    /// Restore every setting to its default
    Reset,
}

/// Parses a number, rejecting `NaN` and infinities.
///
/// # Errors
///
/// Returns a message naming the rejected input.
pub(crate) fn parse_finite(raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| format!("expected a number, got \"{raw}\""))
}

/// One user change to the persisted settings.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SettingsEdit {
    Shipping(f64),
    Weight(f64),
    Origin(Origin),
    ApplyTax(bool),
    Threshold(f64),
    Sort(SortOption),
    Store(StoreFilter),
}

/// Applies `edit` to `settings` and persists the affected part.
pub(crate) fn apply_edit<S: KeyValueStore>(
    store: &mut SettingsStore<S>,
    settings: &mut Settings,
    edit: SettingsEdit,
) {
    tracing::debug!(?edit, "applying settings edit");
    match edit {
        SettingsEdit::Sort(sort) => {
            settings.sort_option = sort;
            store.save_sort_option(sort);
            return;
        }
        SettingsEdit::Store(filter) => {
            store.save_store_filter(&filter);
            settings.store_filter = filter;
            return;
        }
        SettingsEdit::Shipping(amount) => settings.cost_model.set_manual_shipping(amount),
        SettingsEdit::Weight(lbs) => settings.cost_model.set_weight_lbs(lbs),
        SettingsEdit::Origin(origin) => settings.cost_model.set_origin(origin),
        SettingsEdit::ApplyTax(on) => settings.cost_model.apply_tax = on,
        SettingsEdit::Threshold(amount) => settings.cost_model.tax_threshold_twd = amount,
    }
    store.save_cost_model(&settings.cost_model);
}

/// Builds the edit list for `settings set`.
///
/// Weight and origin come before the manual amount so that an explicit
/// `--shipping` given alongside them wins.
pub(crate) fn edits_from_flags(
    shipping: Option<f64>,
    weight: Option<f64>,
    origin: Option<Origin>,
    apply_tax: Option<bool>,
    threshold: Option<f64>,
    sort: Option<SortOption>,
    store: Option<String>,
) -> Vec<SettingsEdit> {
    [
        weight.map(SettingsEdit::Weight),
        origin.map(SettingsEdit::Origin),
        shipping.map(SettingsEdit::Shipping),
        apply_tax.map(SettingsEdit::ApplyTax),
        threshold.map(SettingsEdit::Threshold),
        sort.map(SettingsEdit::Sort),
        store.map(|s| SettingsEdit::Store(StoreFilter::from(s.as_str()))),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub(crate) fn run_settings_command<S: KeyValueStore>(
    store: &mut SettingsStore<S>,
    command: SettingsCommands,
) {
    match command {
        SettingsCommands::Show => {
            print!("{}", crate::render::render_settings(&store.load()));
        }
        SettingsCommands::Set {
            shipping,
            weight,
            origin,
            apply_tax,
            threshold,
            sort,
            store: store_name,
        } => {
            let edits =
                edits_from_flags(shipping, weight, origin, apply_tax, threshold, sort, store_name);
            if edits.is_empty() {
                println!("nothing to change; see `hypeprice settings set --help`");
                return;
            }
            let mut settings = store.load();
            for edit in edits {
                apply_edit(store, &mut settings, edit);
            }
            print!("{}", crate::render::render_settings(&settings));
        }
        SettingsCommands::Reset => {
            let defaults = Settings::default();
            store.save(&defaults);
            print!("{}", crate::render::render_settings(&defaults));
        }
    }
}

#[cfg(test)]
mod tests {
    use hypeprice_core::{MemoryStore, Shipping};

    use super::*;

    #[test]
    fn edits_persist_immediately() {
        let mut store = SettingsStore::new(MemoryStore::new());
        let mut settings = store.load();

        apply_edit(&mut store, &mut settings, SettingsEdit::ApplyTax(false));
        assert!(!store.load().cost_model.apply_tax);

        apply_edit(&mut store, &mut settings, SettingsEdit::Sort(SortOption::High));
        assert_eq!(store.load().sort_option, SortOption::High);

        apply_edit(
            &mut store,
            &mut settings,
            SettingsEdit::Store(StoreFilter::from("SSENSE")),
        );
        assert_eq!(store.load().store_filter.as_str(), "SSENSE");
    }

    #[test]
    fn explicit_shipping_wins_over_weight_in_same_command() {
        let edits = edits_from_flags(Some(999.0), Some(4.0), None, None, None, None, None);
        assert_eq!(
            edits,
            vec![SettingsEdit::Weight(4.0), SettingsEdit::Shipping(999.0)]
        );

        let mut store = SettingsStore::new(MemoryStore::new());
        let mut settings = store.load();
        for edit in edits {
            apply_edit(&mut store, &mut settings, edit);
        }
        assert_eq!(store.load().cost_model.shipping, Shipping::Manual(999.0));
        assert!((store.load().cost_model.weight_lbs - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn origin_edit_switches_to_derived_shipping() {
        let mut store = SettingsStore::new(MemoryStore::new());
        let mut settings = store.load();
        apply_edit(&mut store, &mut settings, SettingsEdit::Origin(Origin::Jp));

        let reloaded = store.load();
        assert_eq!(reloaded.cost_model.shipping, Shipping::Derived);
        assert!((reloaded.cost_model.shipping_cost_twd() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn no_flags_means_no_edits() {
        assert!(edits_from_flags(None, None, None, None, None, None, None).is_empty());
    }

    #[test]
    fn parse_finite_accepts_numbers_and_rejects_nan_and_infinity() {
        assert_eq!(parse_finite(" 2.5 "), Ok(2.5));
        assert!(parse_finite("NaN").is_err());
        assert!(parse_finite("inf").is_err());
        assert!(parse_finite("heavy").is_err());
    }
}
