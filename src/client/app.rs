//! Drives the client state through API requests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{
    client::{
        api::TransactionApi,
        filter::Filter,
        state::{ClientState, RequestTicket, SubmitRefused},
    },
    transaction::TransactionType,
};

/// The dashboard's client: the API plus the state built from its responses.
///
/// The state lock is only held while a transition is applied, never while
/// waiting on the API.
#[derive(Debug)]
pub struct Dashboard<A> {
    api: A,
    state: Mutex<ClientState>,
}

impl<A: TransactionApi> Dashboard<A> {
    /// Create a dashboard that has not fetched anything yet.
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: Mutex::new(ClientState::default()),
        }
    }

    /// The API this dashboard talks to.
    pub fn api(&self) -> &A {
        &self.api
    }

    fn lock_state(&self) -> MutexGuard<'_, ClientState> {
        // A panic mid-transition leaves every slice valid, so keep going.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with read access to the current state.
    pub fn read<R>(&self, f: impl FnOnce(&ClientState) -> R) -> R {
        let state = self.lock_state();
        f(&*state)
    }

    /// Fetch the transaction list and apply the result.
    ///
    /// Does nothing if a fetch is already in flight.
    pub async fn refresh(&self) {
        let ticket = {
            let mut state = self.lock_state();
            state.begin_fetch()
        };

        let Some(ticket) = ticket else {
            tracing::debug!("A fetch is already in flight, skipping refresh");
            return;
        };

        self.fetch(ticket).await;
    }

    async fn fetch(&self, ticket: RequestTicket) {
        let result = self.api.list_transactions().await;

        self.lock_state().finish_fetch(ticket, result);
    }

    /// Fetch the transaction list unless a fetch has already succeeded.
    ///
    /// The dashboard page awaits this before rendering, so the loading state
    /// is only rendered for a visit that overlaps another visit's first fetch.
    pub async fn load(&self) {
        if !self.read(ClientState::has_fetched) {
            self.refresh().await;
        }
    }

    /// Submit the form and, if the transaction was created, fetch the list again.
    ///
    /// A fetch still in flight when the transaction is created is cancelled
    /// and replaced by a new one.
    ///
    /// # Errors
    /// Returns a [SubmitRefused] if nothing was sent to the API, either
    /// because the form is invalid or because a submit is already in flight.
    pub async fn submit(&self) -> Result<(), SubmitRefused> {
        let (ticket, new_transaction) = {
            let mut state = self.lock_state();
            state.begin_submit()?
        };

        let result = self.api.add_transaction(new_transaction).await;

        let fetch_ticket = {
            let mut state = self.lock_state();

            if !state.finish_submit(ticket, result) {
                return Ok(());
            }

            // A fetch already in flight may have read the list before the
            // insert, so its result must not be applied.
            state.cancel_fetch();
            state.begin_fetch()
        };

        if let Some(fetch_ticket) = fetch_ticket {
            self.fetch(fetch_ticket).await;
        }

        Ok(())
    }

    /// Replace the form fields, then submit the form.
    ///
    /// # Errors
    /// See [Dashboard::submit].
    pub async fn submit_form(
        &self,
        description: &str,
        amount: &str,
        kind: TransactionType,
    ) -> Result<(), SubmitRefused> {
        self.lock_state().update_form(description, amount, kind);

        self.submit().await
    }

    /// Change which transactions are listed.
    pub fn set_filter(&self, filter: Filter) {
        self.lock_state().set_filter(filter);
    }

    /// Show or hide the add transaction form.
    pub fn toggle_form(&self) {
        self.lock_state().toggle_form();
    }
}
