//! `search` command: one query, one rendered result list.

use std::time::Duration;

use hypeprice_client::{run_search, SearchClient};
use hypeprice_core::{AppConfig, KeyValueStore, SettingsStore, SortOption, StoreFilter, ViewState};

use crate::render;
use crate::settings::{apply_edit, SettingsEdit};

#[derive(Debug)]
pub(crate) struct SearchOptions {
    pub query: String,
    pub sort: Option<SortOption>,
    pub store: Option<String>,
    pub json: bool,
}

/// Builds the search client from configuration.
///
/// # Errors
///
/// Returns an error if the configured API URL is unusable.
pub(crate) fn build_search_client(config: &AppConfig) -> anyhow::Result<SearchClient> {
    let client = SearchClient::new(&config.api_url, &config.user_agent)
        .map_err(|e| anyhow::anyhow!("failed to build search client: {e}"))?
        .with_cache_ttl(Duration::from_secs(config.cache_ttl_secs));
    Ok(client)
}

/// Runs one search and prints the filtered, sorted result list.
///
/// Search failures are shown as their user-facing message and do not fail
/// the command.
///
/// # Errors
///
/// Returns an error if the search client cannot be built or JSON output
/// cannot be serialized.
pub(crate) async fn run_search_command<S: KeyValueStore>(
    config: &AppConfig,
    store: &mut SettingsStore<S>,
    options: SearchOptions,
) -> anyhow::Result<()> {
    let mut settings = store.load();
    if let Some(sort) = options.sort {
        apply_edit(store, &mut settings, SettingsEdit::Sort(sort));
    }
    if let Some(name) = options.store.as_deref() {
        apply_edit(
            store,
            &mut settings,
            SettingsEdit::Store(StoreFilter::from(name)),
        );
    }

    let client = build_search_client(config)?;
    let mut view = ViewState::from_settings(&settings);
    run_search(&client, &mut view, &options.query).await;

    if options.json {
        if let Some(error) = &view.error {
            eprintln!("{error}");
        }
        let list = view.display_list();
        let cards: Vec<render::CardJson<'_>> = list
            .iter()
            .map(|offer| render::card_json(offer, &settings.cost_model))
            .collect();
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        print!("{}", render::render_view(&view, &settings.cost_model));
    }
    Ok(())
}
