//! The dashboard: a client of the finance tracker API that shows totals, a
//! filtered list of recent transactions and a form for adding new ones.

mod api;
mod app;
mod filter;
mod routes;
mod state;
mod stats;
mod view;

pub use api::{ApiError, DEFAULT_API_TIMEOUT, HttpTransactionApi, TransactionApi};
pub use app::Dashboard;
pub use filter::{Filter, RECENT_TRANSACTIONS_LIMIT, TransactionListView, filter_transactions};
pub use routes::{DashboardState, SubmitForm, build_dashboard_router};
pub use state::{
    ClientState, FETCH_ERROR_MESSAGE, FormError, RequestStatus, RequestTicket,
    SUBMIT_ERROR_MESSAGE, SubmitRefused, TransactionForm,
};
pub use stats::Stats;
pub use view::dashboard_view;
