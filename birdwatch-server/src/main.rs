use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tokio_graceful_shutdown::{SubsystemBuilder, Toplevel};

use birdwatch_server::config::Args;
use birdwatch_server::fetch::HttpSnapshotFetcher;
use birdwatch_server::monitor::ViolationMonitor;
use birdwatch_server::pilots::HttpPilotResolver;
use birdwatch_server::publish::ViolationPublisher;
use birdwatch_server::web::Web;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();

    let publisher = Arc::new(ViolationPublisher::new());
    let fetcher = HttpSnapshotFetcher::new(&args.drones_url).into_diagnostic()?;
    let resolver = HttpPilotResolver::new(&args.pilots_url).into_diagnostic()?;

    let monitor = ViolationMonitor::new(
        args.nest(),
        args.radius,
        args.window(),
        args.interval(),
        Box::new(fetcher),
        Box::new(resolver),
        publisher.clone(),
    );
    let web = Web::new(args.port, publisher);

    Toplevel::new(move |s| async move {
        s.start(SubsystemBuilder::new("monitor", move |h| monitor.run(h)));
        s.start(SubsystemBuilder::new("web", move |h| web.run(h)));
    })
    .catch_signals()
    .handle_shutdown_requests(Duration::from_secs(5))
    .await
    .map_err(Into::into)
}
