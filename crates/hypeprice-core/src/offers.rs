//! Offer types returned by the search backend.
//!
//! ## Observed shape from the `/api/search` endpoint
//!
//! ### Field naming
//! The backend emits snake_case keys (`price_twd`, `image_url`, `is_lowest`).
//! Older frontends consumed camelCase (`priceTwd`, `imageUrl`), so both
//! spellings are accepted on input. Output is always snake_case.
//!
//! ### Prices
//! `price_twd` is already converted to the target currency upstream; nothing
//! here converts currencies. Numbers occasionally arrive as strings
//! (`"3250.0"`) or as `null`. Both numeric fields are parsed leniently: a
//! numeric string is accepted, anything else becomes `None` and later counts
//! as zero.
//!
//! ### Images
//! `image_url` is preferred, `image` is the legacy key. When neither is usable
//! the card falls back to [`PLACEHOLDER_IMAGE_URL`].
//!
//! ### Sizes and weight
//! `sizes` is shown when non-empty; `weight` is only shown otherwise. Size
//! entries are mostly strings, occasionally bare numbers or `null`.
//!
//! ### Nulls
//! Any field may be `null`. It decodes the same as a missing field, so one
//! sparse offer never fails the whole response.

use serde::{Deserialize, Deserializer, Serialize};

/// Image shown when an offer has no image or the image fails to load.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/400x400?text=Product+Image";

/// Number of sizes rendered on a card before the list is cut off.
const MAX_LISTED_SIZES: usize = 4;

/// One retailer's priced listing for the searched product.
///
/// Offers are immutable inputs to the presentation pipeline; they have no
/// identity beyond their position in the result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub retailer: String,

    #[serde(default, alias = "originalPrice", deserialize_with = "lenient_number")]
    pub original_price: Option<f64>,

    /// ISO 4217 code of `original_price`, e.g. `"GBP"`.
    #[serde(default)]
    pub currency: Option<String>,

    /// Pre-formatted original price, e.g. `"£329.00"`. Shown verbatim when set.
    #[serde(default, alias = "originalPriceString")]
    pub original_price_string: Option<String>,

    /// Base price in the target currency (TWD).
    #[serde(default, alias = "priceTwd", deserialize_with = "lenient_number")]
    pub price_twd: Option<f64>,

    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default, deserialize_with = "lenient_sizes")]
    pub sizes: Option<Vec<String>>,

    #[serde(default)]
    pub weight: Option<String>,

    /// Cheapest offer in the result set, as flagged by the backend.
    #[serde(default, alias = "isLowest", deserialize_with = "null_as_default")]
    pub is_lowest: bool,

    #[serde(default, alias = "discountText")]
    pub discount_text: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

impl Offer {
    /// Minimal offer with only a retailer and a base price.
    #[must_use]
    pub fn new(retailer: impl Into<String>, price_twd: f64) -> Self {
        Self {
            retailer: retailer.into(),
            original_price: None,
            currency: None,
            original_price_string: None,
            price_twd: Some(price_twd),
            image_url: None,
            image: None,
            sizes: None,
            weight: None,
            is_lowest: false,
            discount_text: None,
            url: None,
        }
    }

    /// Base price used for sorting and cost computation; missing counts as zero.
    #[must_use]
    pub fn base_price_twd(&self) -> f64 {
        self.price_twd.unwrap_or(0.0)
    }

    /// Image to display, falling back to [`PLACEHOLDER_IMAGE_URL`].
    #[must_use]
    pub fn display_image(&self) -> &str {
        [self.image_url.as_deref(), self.image.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE_URL)
    }

    /// `"Sizes: S, M, L"` when sizes are known, otherwise `"Weight: …"`.
    #[must_use]
    pub fn size_label(&self) -> String {
        match self.sizes.as_deref() {
            Some(sizes) if !sizes.is_empty() => {
                let shown: Vec<&str> = sizes
                    .iter()
                    .take(MAX_LISTED_SIZES)
                    .map(String::as_str)
                    .collect();
                format!("Sizes: {}", shown.join(", "))
            }
            _ => {
                let weight = self
                    .weight
                    .as_deref()
                    .filter(|w| !w.trim().is_empty())
                    .unwrap_or("N/A");
                format!("Weight: {weight}")
            }
        }
    }

    /// Original price as shown on a card, e.g. `"329 GBP"`.
    #[must_use]
    pub fn original_price_label(&self) -> String {
        if let Some(s) = self.original_price_string.as_deref() {
            if !s.trim().is_empty() {
                return s.to_string();
            }
        }
        let currency = self.currency.as_deref().unwrap_or("");
        match self.original_price {
            Some(p) => format!("{p} {currency}").trim_end().to_string(),
            None => "N/A".to_string(),
        }
    }
}

/// Top-level response body from `POST /api/search`.
///
/// `results` may be absent or `null`; both mean "no offers".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub results: Option<Vec<Offer>>,
}

impl SearchResponse {
    #[must_use]
    pub fn into_results(self) -> Vec<Offer> {
        self.results.unwrap_or_default()
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let number = value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    });
    Ok(number.filter(|n| n.is_finite()))
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keeps string and numeric size labels; drops `null` and other entries.
fn lenient_sizes<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::Array(items)) = value else {
        return Ok(None);
    };
    let sizes = items
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect();
    Ok(Some(sizes))
}
