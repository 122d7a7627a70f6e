use clap::Parser;

use mmbatch::client::commands::watch::command_watch;
use mmbatch::common::cli::WatchOpts;
use mmbatch::common::setup::setup_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> mmbatch::Result<()> {
    let opts = WatchOpts::parse();
    setup_logging(opts.common.debug);

    if let Err(error) = command_watch(opts).await {
        log::error!("{error:?}");
        std::process::exit(1);
    }

    Ok(())
}
