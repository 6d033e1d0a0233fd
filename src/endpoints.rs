//! The URIs served by the API and the dashboard.

/// The API health check.
pub const HEALTH: &str = "/";
/// The API route for creating a transaction.
pub const ADD_TRANSACTION: &str = "/add";
/// The API route for listing every transaction.
pub const TRANSACTIONS: &str = "/transactions";

/// The dashboard page.
pub const DASHBOARD_VIEW: &str = "/";
/// The dashboard route that re-fetches transactions from the API.
pub const DASHBOARD_REFRESH: &str = "/refresh";
/// The dashboard route that submits the add transaction form.
pub const DASHBOARD_SUBMIT: &str = "/submit";
/// The dashboard route that changes which transactions are listed.
pub const DASHBOARD_FILTER: &str = "/filter";
/// The dashboard route that shows or hides the add transaction form.
pub const DASHBOARD_TOGGLE_FORM: &str = "/form";
