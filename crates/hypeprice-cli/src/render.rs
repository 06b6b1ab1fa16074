//! Text rendering of price cards, settings, and quotes.
//!
//! Each function returns a `String` so output can be asserted in tests;
//! callers decide where it goes.

use std::fmt::Write as _;

use hypeprice_core::{landed_cost, CostModel, Offer, Settings, Shipping, ViewState, TAX_RATE};
use serde::Serialize;

/// One display-list entry for `--json` output.
#[derive(Debug, Serialize)]
pub(crate) struct CardJson<'a> {
    #[serde(flatten)]
    pub offer: &'a Offer,
    pub display_image: &'a str,
    pub shipping_twd: f64,
    pub tax_twd: i64,
    pub final_cost_twd: i64,
}

#[must_use]
pub(crate) fn card_json<'a>(offer: &'a Offer, model: &CostModel) -> CardJson<'a> {
    let cost = landed_cost(offer, model);
    CardJson {
        offer,
        display_image: offer.display_image(),
        shipping_twd: cost.shipping,
        tax_twd: cost.tax,
        final_cost_twd: cost.total,
    }
}

#[must_use]
pub(crate) fn render_card(offer: &Offer, model: &CostModel) -> String {
    let cost = landed_cost(offer, model);
    let mut out = String::new();

    let mut title = format!("+ {}", display_retailer(offer));
    if offer.is_lowest {
        title.push_str("  [Lowest]");
    }
    if let Some(discount) = offer.discount_text.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(title, "  [{discount}]");
    }
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "| Original: {}", offer.original_price_label());
    let _ = writeln!(out, "| {}", offer.size_label());
    let _ = writeln!(out, "| Image: {}", offer.display_image());
    if let Some(url) = offer.url.as_deref().filter(|u| !u.is_empty()) {
        let _ = writeln!(out, "| Link: {url}");
    }
    let _ = writeln!(
        out,
        "| Base NT$ {:.0} + Shipping NT$ {:.0} + Tax NT$ {}",
        cost.base, cost.shipping, cost.tax
    );
    let _ = writeln!(out, "| Final: NT$ {}", cost.total);
    out
}

/// Store options, current selections, error, and one card per offer.
#[must_use]
pub(crate) fn render_view(view: &ViewState, model: &CostModel) -> String {
    let mut out = String::new();
    let list = view.display_list();

    let _ = writeln!(out, "Stores: {}", view.store_options().join(" | "));
    let _ = writeln!(
        out,
        "Sort: {}  Store: {}  ({} of {} offers)",
        view.sort_option,
        view.store_filter,
        list.len(),
        view.results.len()
    );

    if let Some(error) = &view.error {
        let _ = writeln!(out, "{error}");
    }
    if list.is_empty() && view.error.is_none() && !view.loading {
        let _ = writeln!(out, "No results yet. Try searching.");
    }

    for offer in &list {
        out.push('\n');
        out.push_str(&render_card(offer, model));
    }
    out
}

#[must_use]
pub(crate) fn render_settings(settings: &Settings) -> String {
    let model = &settings.cost_model;
    let shipping_source = match model.shipping {
        Shipping::Manual(_) => "manual".to_string(),
        Shipping::Derived => format!("derived from {} lb from {}", model.weight_lbs, model.origin),
    };

    let mut out = String::new();
    let _ = writeln!(out, "sort:          {}", settings.sort_option);
    let _ = writeln!(out, "store:         {}", settings.store_filter);
    let _ = writeln!(
        out,
        "shipping:      NT$ {:.0} ({shipping_source})",
        model.shipping_cost_twd()
    );
    let _ = writeln!(out, "origin:        {}", model.origin);
    let _ = writeln!(out, "weight (lb):   {}", model.weight_lbs);
    let _ = writeln!(
        out,
        "import tax:    {} ({:.0}% at or above NT$ {:.0})",
        if model.apply_tax { "on" } else { "off" },
        TAX_RATE * 100.0,
        model.tax_threshold_twd
    );
    out
}

#[must_use]
pub(crate) fn render_quote(price_twd: f64, model: &CostModel) -> String {
    let offer = Offer::new("quote", price_twd);
    let cost = landed_cost(&offer, model);
    let mut out = String::new();
    let _ = writeln!(out, "base:     NT$ {:.0}", cost.base);
    let _ = writeln!(out, "shipping: NT$ {:.0}", cost.shipping);
    let _ = writeln!(out, "tax:      NT$ {}", cost.tax);
    let _ = writeln!(out, "final:    NT$ {}", cost.total);
    out
}

fn display_retailer(offer: &Offer) -> &str {
    let name = offer.retailer.trim();
    if name.is_empty() {
        "Retailer"
    } else {
        name
    }
}
