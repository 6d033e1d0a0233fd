//! The dashboard's routes: the page itself plus the form posts that drive it.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use serde::Deserialize;
use time::UtcOffset;

use crate::{
    client::{api::TransactionApi, app::Dashboard, filter::Filter, view::dashboard_view},
    endpoints,
    html::error_view,
    transaction::TransactionType,
};

/// The state shared by the dashboard's route handlers.
#[derive(Debug)]
pub struct DashboardState<A> {
    /// The dashboard client that owns the API and the client state.
    pub dashboard: Arc<Dashboard<A>>,
    /// The offset dates are displayed in.
    pub local_offset: UtcOffset,
}

impl<A> DashboardState<A> {
    /// Create the state for a dashboard that displays dates at `local_offset`.
    pub fn new(dashboard: Dashboard<A>, local_offset: UtcOffset) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
            local_offset,
        }
    }
}

// Derived Clone would require `A: Clone`.
impl<A> Clone for DashboardState<A> {
    fn clone(&self) -> Self {
        Self {
            dashboard: Arc::clone(&self.dashboard),
            local_offset: self.local_offset,
        }
    }
}

/// Return a router with all the dashboard's routes.
pub fn build_dashboard_router<A: TransactionApi>(state: DashboardState<A>) -> Router {
    Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page::<A>))
        .route(endpoints::DASHBOARD_REFRESH, post(refresh::<A>))
        .route(endpoints::DASHBOARD_SUBMIT, post(submit_transaction::<A>))
        .route(endpoints::DASHBOARD_FILTER, post(set_filter::<A>))
        .route(endpoints::DASHBOARD_TOGGLE_FORM, post(toggle_form::<A>))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Render the dashboard, fetching the transactions on the first visit.
async fn get_dashboard_page<A: TransactionApi>(State(state): State<DashboardState<A>>) -> Response {
    state.dashboard.load().await;

    let page = state
        .dashboard
        .read(|client_state| dashboard_view(client_state, state.local_offset));

    Html(page.into_string()).into_response()
}

async fn refresh<A: TransactionApi>(State(state): State<DashboardState<A>>) -> Redirect {
    state.dashboard.refresh().await;

    Redirect::to(endpoints::DASHBOARD_VIEW)
}

/// The fields of the add transaction form, as typed.
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    /// Text describing the transaction.
    #[serde(default)]
    pub description: String,
    /// The amount as typed, validated before anything is sent.
    #[serde(default)]
    pub amount: String,
    /// Whether the transaction is income or an expense.
    #[serde(default, rename = "type")]
    pub kind: TransactionType,
}

async fn submit_transaction<A: TransactionApi>(
    State(state): State<DashboardState<A>>,
    Form(form): Form<SubmitForm>,
) -> Redirect {
    if let Err(refused) = state
        .dashboard
        .submit_form(&form.description, &form.amount, form.kind)
        .await
    {
        tracing::debug!("Transaction was not submitted: {refused}");
    }

    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[derive(Debug, Deserialize)]
struct FilterForm {
    filter: Filter,
}

async fn set_filter<A: TransactionApi>(
    State(state): State<DashboardState<A>>,
    Form(form): Form<FilterForm>,
) -> Redirect {
    state.dashboard.set_filter(form.filter);

    Redirect::to(endpoints::DASHBOARD_VIEW)
}

async fn toggle_form<A: TransactionApi>(State(state): State<DashboardState<A>>) -> Redirect {
    state.dashboard.toggle_form();

    Redirect::to(endpoints::DASHBOARD_VIEW)
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(
            error_view(
                "Not Found",
                "404",
                "Page not found.",
                "Check the address or go back to the dashboard.",
            )
            .into_string(),
        ),
    )
        .into_response()
}
