use clap::Parser;

/// `warehouse-viewer` — live view of the warehouse fulfillment floor.
///
/// Connects to the allocation service, polls routes and statistics, and
/// renders every agent animating along its current picking tour.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Base URL of the allocation service.
    #[arg(
        long,
        env = "ALLOCATION_SERVICE_URL",
        default_value = "http://127.0.0.1:5001"
    )]
    pub service_url: String,

    /// Seconds between statistics polls.
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value_t = 4)]
    pub poll_interval_secs: u64,
}
