//! Ephemeral view state for one search session.
//!
//! Every submitted search gets a generation number. Only the outcome of the
//! most recent submission may update the displayed results; anything that
//! completes later for an older generation is dropped.

use crate::offers::Offer;
use crate::pipeline::{derive_display_list, derive_store_options, SortOption, StoreFilter};
use crate::settings::Settings;

/// Handle returned by [`ViewState::begin_search`] and handed back on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    pub query: String,
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub query: String,
    pub results: Vec<Offer>,
    pub sort_option: SortOption,
    pub store_filter: StoreFilter,
    pub loading: bool,
    pub error: Option<String>,
    generation: u64,
}

impl ViewState {
    /// Starts from the persisted sort and store selections.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            sort_option: settings.sort_option,
            store_filter: settings.store_filter.clone(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Records a new submission and returns its ticket.
    pub fn begin_search(&mut self, query: impl Into<String>) -> SearchTicket {
        self.generation += 1;
        self.query = query.into();
        self.loading = true;
        self.error = None;
        SearchTicket {
            generation: self.generation,
            query: self.query.clone(),
        }
    }

    /// Applies a finished search. Returns `false` when the ticket is stale and
    /// the outcome was discarded.
    ///
    /// A failure clears the result list and stores the user-facing message.
    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<Vec<Offer>, String>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                query = %ticket.query,
                "discarding stale search result"
            );
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(results) => {
                self.results = results;
                self.error = None;
            }
            Err(message) => {
                self.results.clear();
                self.error = Some(message);
            }
        }
        true
    }

    #[must_use]
    pub fn display_list(&self) -> Vec<Offer> {
        derive_display_list(&self.results, &self.store_filter, self.sort_option)
    }

    #[must_use]
    pub fn store_options(&self) -> Vec<String> {
        derive_store_options(&self.results)
    }
}
