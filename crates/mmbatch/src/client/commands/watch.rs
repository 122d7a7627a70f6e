use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::client::backend::create_submitter;
use crate::client::request::{Credentials, RequestBuilder};
use crate::common::cli::WatchOpts;
use crate::common::error::MmError;
use crate::common::utils::fs::ensure_directory;
use crate::watch::{FolderWatcher, JobDispatcher, NotifySource, WatchOptions};

pub async fn command_watch(opts: WatchOpts) -> anyhow::Result<()> {
    let WatchOpts {
        common: _,
        credentials,
        job,
        backend,
        input_dir,
        output_dir,
        temp_suffix,
        rescan_interval,
        scan_existing,
    } = opts;

    let (input_dir, output_dir) = prepare_directories(&input_dir, &output_dir)?;
    log::info!("Input directory: {}", input_dir.display());
    log::info!("Output directory: {}", output_dir.display());

    let credentials: Credentials = credentials.into();
    let config = job.into_config()?;
    let submitter = create_submitter(
        backend.backend,
        backend.endpoint.clone(),
        credentials.clone(),
        backend.lite_options(),
    )?;
    let dispatcher = JobDispatcher::new(
        RequestBuilder::new(credentials, config),
        submitter,
        output_dir,
    );

    let source = NotifySource::new().context("Cannot start directory watcher")?;
    let options = WatchOptions {
        input_dir: input_dir.clone(),
        temp_suffix,
        rescan_interval: rescan_interval.map(|interval| interval.unpack()),
        scan_existing,
    };
    let mut watcher = FolderWatcher::new(source, dispatcher, options)
        .with_context(|| format!("Cannot watch {}", input_dir.display()))?;

    log::info!("Waiting for new files (press Ctrl-C to stop)");
    watcher
        .run(async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                log::error!("Cannot listen for Ctrl-C: {error}");
                std::future::pending::<()>().await;
            }
        })
        .await;
    Ok(())
}

/// Creates both directories if needed and returns their canonical paths.
pub fn prepare_directories(input: &Path, output: &Path) -> crate::Result<(PathBuf, PathBuf)> {
    let input = ensure_directory(input)?;
    let output = ensure_directory(output)?;
    if input == output {
        return Err(MmError::ConfigError(format!(
            "Input and output directory must differ ({})",
            input.display()
        )));
    }
    Ok((input, output))
}
