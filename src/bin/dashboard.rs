use std::{net::SocketAddr, process::ExitCode, time::Duration};

use axum_server::Handle;
use clap::Parser;

use finance_tracker::{
    add_logging_layers,
    client::{
        DEFAULT_API_TIMEOUT, Dashboard, DashboardState, HttpTransactionApi, build_dashboard_router,
    },
    get_local_offset, graceful_shutdown, setup_logging,
};

/// The web dashboard for the finance tracker, served as HTML.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The URL of the finance tracker API.
    #[arg(long, env = "API_URL", default_value = "http://localhost:5000")]
    api_url: String,

    /// The port to serve the dashboard from.
    #[arg(short, long, env = "DASHBOARD_PORT", default_value_t = 3000)]
    port: u16,

    /// The canonical time zone name dates are displayed in, e.g. "Asia/Kolkata".
    #[arg(long, env = "TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,

    /// How many seconds to wait for the API before giving up on a request.
    #[arg(long, env = "API_TIMEOUT_SECS", default_value_t = DEFAULT_API_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    let Some(local_offset) = get_local_offset(&args.timezone) else {
        tracing::error!("Invalid timezone {}", args.timezone);
        return ExitCode::FAILURE;
    };

    let api = match HttpTransactionApi::new(&args.api_url, Duration::from_secs(args.timeout_secs))
    {
        Ok(api) => api,
        Err(error) => {
            tracing::error!("Could not create the API client: {error}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Using the API at {}", api.base_url());

    let state = DashboardState::new(Dashboard::new(api), local_offset);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_logging_layers(build_dashboard_router(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("Dashboard listening on http://{addr}");

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Dashboard stopped with an error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
