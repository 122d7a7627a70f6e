use std::io::Write;
use std::path::Path;

use anyhow::Context;

use crate::client::backend::{Submitter, create_submitter};
use crate::client::request::{Credentials, RequestBuilder};
use crate::common::cli::SubmitOpts;
use crate::common::utils::fs::absolute_path;

/// Failure of `mm-submit`. Only a failed submission is reported with the diagnostic banner.
#[derive(Debug)]
pub enum SubmitCommandError {
    /// The job was not accepted or did not produce a result.
    Submission(anyhow::Error),
    /// Configuration, client setup or printing of the result failed.
    Other(anyhow::Error),
}

impl From<anyhow::Error> for SubmitCommandError {
    fn from(error: anyhow::Error) -> Self {
        SubmitCommandError::Other(error)
    }
}

impl From<std::io::Error> for SubmitCommandError {
    fn from(error: std::io::Error) -> Self {
        SubmitCommandError::Other(error.into())
    }
}

pub async fn command_submit(opts: SubmitOpts) -> Result<(), SubmitCommandError> {
    let SubmitOpts {
        common: _,
        credentials,
        job,
        backend,
        file,
    } = opts;

    let credentials: Credentials = credentials.into();
    let config = job.into_config()?;
    let submitter = create_submitter(
        backend.backend,
        backend.endpoint.clone(),
        credentials.clone(),
        backend.lite_options(),
    )?;
    let builder = RequestBuilder::new(credentials, config);

    let file = absolute_path(file)?;
    let result = submit_file(&builder, submitter.as_ref(), &file)
        .await
        .map_err(SubmitCommandError::Submission)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(result.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Submits `file` and waits until its result is available.
pub async fn submit_file(
    builder: &RequestBuilder,
    submitter: &dyn Submitter,
    file: &Path,
) -> anyhow::Result<String> {
    let request = builder.build(file);
    log::debug!("Submitting job request:\n{request}");
    submitter
        .submit(request)
        .await
        .with_context(|| format!("Submission of {} has failed", file.display()))
}

/// Renders the message printed to stderr when the submission does not produce a result.
pub fn format_submission_error(error: &anyhow::Error) -> String {
    format!(
        "\nAn ERROR has occurred while processing your request, please review any\n\
         lines beginning with \"Error:\" above and the trace below for indications of\n\
         what may have gone wrong.\n\nTrace:\n{error:?}"
    )
}
