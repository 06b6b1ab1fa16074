pub mod app_config;
pub mod config;
pub mod cost;
pub mod error;
pub mod offers;
pub mod pipeline;
pub mod settings;
pub mod view;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use cost::{
    compute_final_cost, derive_shipping, landed_cost, CostModel, LandedCost, Origin, Shipping,
    TAX_RATE,
};
pub use error::{ConfigError, StoreError};
pub use offers::{Offer, SearchResponse, PLACEHOLDER_IMAGE_URL};
pub use pipeline::{derive_display_list, derive_store_options, SortOption, StoreFilter};
pub use settings::{FileStore, KeyValueStore, MemoryStore, Settings, SettingsStore};
pub use view::{SearchTicket, ViewState};
