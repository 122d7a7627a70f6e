use clap::Parser;

use mmbatch::client::commands::submit::{
    SubmitCommandError, command_submit, format_submission_error,
};
use mmbatch::common::cli::SubmitOpts;
use mmbatch::common::setup::setup_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> mmbatch::Result<()> {
    let opts = SubmitOpts::parse();
    setup_logging(opts.common.debug);

    match command_submit(opts).await {
        Ok(()) => {}
        Err(SubmitCommandError::Submission(error)) => {
            eprintln!("{}", format_submission_error(&error));
            std::process::exit(1);
        }
        Err(SubmitCommandError::Other(error)) => {
            log::error!("{error:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}
