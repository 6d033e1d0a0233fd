//! The dashboard's client state and the rules for changing it.
//!
//! The state is split into orthogonal slices: the fetched transactions, the
//! filter, the add transaction form, one request slot per kind of request,
//! and the error banner. Every change goes through a method on
//! [ClientState], so the slices can only move through the transitions below.
//!
//! Each request slot is `Idle → Loading(ticket) → Idle`. Starting a request
//! while the slot is loading is refused, and a completion is only applied if
//! it carries the slot's current ticket.

use crate::{
    client::{
        api::ApiError,
        filter::{Filter, TransactionListView},
        stats::Stats,
    },
    transaction::{NewTransaction, Transaction, TransactionType},
};

/// Shown when the transaction list could not be fetched.
pub const FETCH_ERROR_MESSAGE: &str =
    "Failed to connect to backend. Make sure the server is running.";
/// Shown when a new transaction could not be stored.
pub const SUBMIT_ERROR_MESSAGE: &str = "Failed to add transaction. Check your backend connection.";

/// Identifies one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// The lifecycle of one kind of request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestStatus {
    /// No request is in flight.
    #[default]
    Idle,
    /// The request with this ticket is in flight.
    Loading(RequestTicket),
}

impl RequestStatus {
    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestStatus::Loading(_))
    }
}

/// Why the add transaction form could not be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// The description or amount was left empty.
    #[error("Please fill in all fields")]
    MissingFields,

    /// The amount is not a finite, non-negative number.
    #[error("Amount must be a non-negative number")]
    InvalidAmount,
}

/// Why a submit was not sent to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRefused {
    /// A submit is already in flight.
    #[error("a transaction is already being added")]
    InFlight,

    /// The form did not pass validation.
    #[error(transparent)]
    Invalid(#[from] FormError),
}

/// The pending fields of the add transaction form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionForm {
    /// The description as typed.
    pub description: String,
    /// The amount as typed.
    pub amount: String,
    /// The selected transaction type.
    pub kind: TransactionType,
    /// Whether the form is shown.
    pub visible: bool,
}

impl TransactionForm {
    /// Check the fields and build the create request.
    ///
    /// # Errors
    /// Returns [FormError::MissingFields] if the trimmed description or the
    /// amount is empty, or [FormError::InvalidAmount] if the amount does not
    /// parse as a finite, non-negative number.
    pub fn validate(&self) -> Result<NewTransaction, FormError> {
        let description = self.description.trim();
        let amount = self.amount.trim();

        if description.is_empty() || amount.is_empty() {
            return Err(FormError::MissingFields);
        }

        let amount = amount
            .parse::<f64>()
            .map_err(|_| FormError::InvalidAmount)?;

        if !amount.is_finite() || amount < 0.0 {
            return Err(FormError::InvalidAmount);
        }

        Ok(NewTransaction {
            description: description.to_owned(),
            amount,
            kind: self.kind,
        })
    }

    fn reset(&mut self) {
        *self = TransactionForm::default();
    }
}

/// Everything the dashboard knows.
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    transactions: Vec<Transaction>,
    has_fetched: bool,
    filter: Filter,
    form: TransactionForm,
    fetch: RequestStatus,
    submit: RequestStatus,
    error: Option<String>,
    next_ticket: u64,
}

impl ClientState {
    /// The transactions from the last successful fetch.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Whether a fetch has ever succeeded.
    pub fn has_fetched(&self) -> bool {
        self.has_fetched
    }

    /// The current filter.
    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// The add transaction form.
    pub fn form(&self) -> &TransactionForm {
        &self.form
    }

    /// The message for the error banner, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a fetch is in flight.
    pub fn is_fetching(&self) -> bool {
        self.fetch.is_loading()
    }

    /// Whether a submit is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submit.is_loading()
    }

    /// Totals over every fetched transaction.
    pub fn stats(&self) -> Stats {
        Stats::from_transactions(&self.transactions)
    }

    /// The filtered, truncated transactions to list.
    pub fn list_view(&self) -> TransactionListView<'_> {
        TransactionListView::new(&self.transactions, self.filter)
    }

    /// Change which transactions are listed.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Show the form if it is hidden, hide it if it is shown.
    pub fn toggle_form(&mut self) {
        self.form.visible = !self.form.visible;
    }

    /// Replace the form fields with what the user typed.
    pub fn update_form(&mut self, description: &str, amount: &str, kind: TransactionType) {
        self.form.description = description.to_owned();
        self.form.amount = amount.to_owned();
        self.form.kind = kind;
    }

    fn issue_ticket(&mut self) -> RequestTicket {
        self.next_ticket += 1;
        RequestTicket(self.next_ticket)
    }

    /// Start fetching transactions.
    ///
    /// Returns `None` if a fetch is already in flight.
    pub fn begin_fetch(&mut self) -> Option<RequestTicket> {
        if self.fetch.is_loading() {
            return None;
        }

        let ticket = self.issue_ticket();
        self.fetch = RequestStatus::Loading(ticket);

        Some(ticket)
    }

    /// Drop the in-flight fetch, if any. Its result will be ignored.
    pub fn cancel_fetch(&mut self) {
        self.fetch = RequestStatus::Idle;
    }

    /// Apply the result of the fetch started with `ticket`.
    ///
    /// On success the transactions are replaced and the error cleared. On
    /// failure the error is set and the transactions are left as they were.
    /// Returns `false`, changing nothing, if `ticket` is not the in-flight
    /// fetch.
    pub fn finish_fetch(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<Transaction>, ApiError>,
    ) -> bool {
        if self.fetch != RequestStatus::Loading(ticket) {
            tracing::debug!("Ignoring result of stale fetch {ticket:?}");
            return false;
        }

        self.fetch = RequestStatus::Idle;

        match result {
            Ok(transactions) => {
                self.transactions = transactions;
                self.has_fetched = true;
                self.error = None;
            }
            Err(error) => {
                tracing::error!("Error fetching transactions: {error}");
                self.error = Some(FETCH_ERROR_MESSAGE.to_owned());
            }
        }

        true
    }

    /// Start submitting the form.
    ///
    /// # Errors
    /// Returns [SubmitRefused::InFlight] if a submit is already in flight, or
    /// [SubmitRefused::Invalid] if the form does not validate, in which case
    /// the validation message is shown in the error banner.
    pub fn begin_submit(&mut self) -> Result<(RequestTicket, NewTransaction), SubmitRefused> {
        if self.submit.is_loading() {
            return Err(SubmitRefused::InFlight);
        }

        let new_transaction = self.form.validate().inspect_err(|error| {
            self.error = Some(error.to_string());
        })?;

        let ticket = self.issue_ticket();
        self.submit = RequestStatus::Loading(ticket);

        Ok((ticket, new_transaction))
    }

    /// Apply the result of the submit started with `ticket`.
    ///
    /// On success the form is cleared and hidden, and the error cleared. On
    /// failure the error is set and the form is left as it was so the user
    /// can retry. Returns `true` if the transaction was created, meaning the
    /// transactions should be fetched again.
    pub fn finish_submit(
        &mut self,
        ticket: RequestTicket,
        result: Result<Transaction, ApiError>,
    ) -> bool {
        if self.submit != RequestStatus::Loading(ticket) {
            tracing::debug!("Ignoring result of stale submit {ticket:?}");
            return false;
        }

        self.submit = RequestStatus::Idle;

        match result {
            Ok(transaction) => {
                tracing::info!("Added transaction {}", transaction.id);
                self.form.reset();
                self.error = None;
                true
            }
            Err(error) => {
                tracing::error!("Error adding transaction: {error}");
                self.error = Some(SUBMIT_ERROR_MESSAGE.to_owned());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use crate::{
        client::{
            api::ApiError,
            filter::Filter,
            state::{
                ClientState, FETCH_ERROR_MESSAGE, FormError, SUBMIT_ERROR_MESSAGE, SubmitRefused,
                TransactionForm,
            },
        },
        transaction::{NewTransaction, Transaction, TransactionType},
    };

    fn transaction(id: i64, kind: TransactionType) -> Transaction {
        Transaction {
            id,
            description: format!("transaction {id}"),
            amount: 10.0,
            kind,
            date: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn fetched_state(transactions: Vec<Transaction>) -> ClientState {
        let mut state = ClientState::default();
        let ticket = state.begin_fetch().unwrap();
        assert!(state.finish_fetch(ticket, Ok(transactions)));
        state
    }

    #[test]
    fn initial_state_is_idle_and_empty() {
        let state = ClientState::default();

        assert!(state.transactions().is_empty());
        assert!(!state.has_fetched());
        assert_eq!(state.filter(), Filter::All);
        assert_eq!(state.form().kind, TransactionType::Expense);
        assert!(!state.form().visible);
        assert!(!state.is_fetching());
        assert!(!state.is_submitting());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn successful_fetch_replaces_transactions_and_clears_error() {
        let mut state = ClientState::default();
        state.update_form("", "", TransactionType::Expense);
        let _ = state.begin_submit();
        assert!(state.error().is_some());

        let ticket = state.begin_fetch().unwrap();
        assert!(state.is_fetching());
        let applied = state.finish_fetch(ticket, Ok(vec![transaction(1, TransactionType::Income)]));

        assert!(applied);
        assert!(!state.is_fetching());
        assert!(state.has_fetched());
        assert_eq!(state.transactions().len(), 1);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn failed_fetch_keeps_previous_transactions() {
        let previous = vec![
            transaction(1, TransactionType::Income),
            transaction(2, TransactionType::Expense),
        ];
        let mut state = fetched_state(previous.clone());

        let ticket = state.begin_fetch().unwrap();
        state.finish_fetch(ticket, Err(ApiError::Status(500)));

        assert_eq!(state.transactions(), previous.as_slice());
        assert_eq!(state.error(), Some(FETCH_ERROR_MESSAGE));
        assert!(!state.is_fetching());
    }

    #[test]
    fn second_fetch_is_refused_while_loading() {
        let mut state = ClientState::default();

        let first = state.begin_fetch();
        let second = state.begin_fetch();

        assert!(first.is_some());
        assert_eq!(second, None);
    }

    #[test]
    fn cancelled_fetch_result_is_ignored() {
        let mut state = fetched_state(vec![transaction(1, TransactionType::Income)]);
        let stale = state.begin_fetch().unwrap();

        state.cancel_fetch();
        let applied = state.finish_fetch(stale, Ok(vec![]));

        assert!(!applied);
        assert_eq!(state.transactions().len(), 1);
    }

    #[test]
    fn result_of_superseded_fetch_is_ignored() {
        let mut state = ClientState::default();
        let stale = state.begin_fetch().unwrap();
        state.cancel_fetch();
        let current = state.begin_fetch().unwrap();

        assert!(!state.finish_fetch(stale, Ok(vec![transaction(1, TransactionType::Income)])));
        assert!(state.is_fetching());
        assert!(state.finish_fetch(current, Ok(vec![transaction(2, TransactionType::Expense)])));
        assert_eq!(state.transactions()[0].id, 2);
    }

    #[test]
    fn form_requires_description_and_amount() {
        let form = TransactionForm {
            description: "  ".to_owned(),
            amount: "4.5".to_owned(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(FormError::MissingFields));

        let form = TransactionForm {
            description: "Coffee".to_owned(),
            amount: "".to_owned(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(FormError::MissingFields));
    }

    #[test]
    fn form_rejects_unparseable_and_negative_amounts() {
        for amount in ["abc", "-1", "NaN", "inf"] {
            let form = TransactionForm {
                description: "Coffee".to_owned(),
                amount: amount.to_owned(),
                ..Default::default()
            };

            assert_eq!(
                form.validate(),
                Err(FormError::InvalidAmount),
                "want {amount:?} to be rejected"
            );
        }
    }

    #[test]
    fn form_builds_trimmed_request() {
        let form = TransactionForm {
            description: " Coffee ".to_owned(),
            amount: "4.5".to_owned(),
            kind: TransactionType::Expense,
            visible: true,
        };

        assert_eq!(
            form.validate(),
            Ok(NewTransaction {
                description: "Coffee".to_owned(),
                amount: 4.5,
                kind: TransactionType::Expense,
            })
        );
    }

    #[test]
    fn invalid_form_is_refused_and_shows_message() {
        let mut state = ClientState::default();
        state.update_form("", "4.5", TransactionType::Income);

        let result = state.begin_submit();

        assert_eq!(result, Err(SubmitRefused::Invalid(FormError::MissingFields)));
        assert!(!state.is_submitting());
        assert_eq!(state.error(), Some("Please fill in all fields"));
    }

    #[test]
    fn second_submit_is_refused_while_loading() {
        let mut state = ClientState::default();
        state.update_form("Coffee", "4.5", TransactionType::Expense);

        state.begin_submit().unwrap();
        let second = state.begin_submit();

        assert_eq!(second, Err(SubmitRefused::InFlight));
    }

    #[test]
    fn successful_submit_resets_form() {
        let mut state = ClientState::default();
        state.toggle_form();
        state.update_form("Salary", "1000", TransactionType::Income);
        let (ticket, _) = state.begin_submit().unwrap();

        let created = state.finish_submit(ticket, Ok(transaction(1, TransactionType::Income)));

        assert!(created);
        assert!(!state.is_submitting());
        assert_eq!(state.form(), &TransactionForm::default());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn failed_submit_keeps_form_fields() {
        let mut state = ClientState::default();
        state.toggle_form();
        state.update_form("Salary", "1000", TransactionType::Income);
        let (ticket, _) = state.begin_submit().unwrap();

        let created = state.finish_submit(ticket, Err(ApiError::Connection("refused".to_owned())));

        assert!(!created);
        assert_eq!(state.error(), Some(SUBMIT_ERROR_MESSAGE));
        assert_eq!(state.form().description, "Salary");
        assert_eq!(state.form().amount, "1000");
        assert_eq!(state.form().kind, TransactionType::Income);
        assert!(state.form().visible);
    }

    #[test]
    fn filter_does_not_change_transactions() {
        let mut state = fetched_state(vec![
            transaction(1, TransactionType::Income),
            transaction(2, TransactionType::Expense),
        ]);

        state.set_filter(Filter::Expense);

        assert_eq!(state.transactions().len(), 2);
        assert_eq!(state.list_view().total, 1);
        assert_eq!(state.stats().expense_count, 1);
        assert_eq!(state.stats().income_count, 1);
    }

    #[test]
    fn toggle_form_flips_visibility() {
        let mut state = ClientState::default();

        state.toggle_form();
        assert!(state.form().visible);
        state.toggle_form();
        assert!(!state.form().visible);
    }
}
