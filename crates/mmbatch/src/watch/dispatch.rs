use crate::client::backend::Submitter;
use crate::client::request::RequestBuilder;
use crate::common::utils::fs::{modification_time, write_file_atomic};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Content of the output file of a job whose submission has failed.
pub const JOB_ERROR_MESSAGE: &str =
    "ERROR MESSAGE: An error has occurred while processing your request; please review stderr log.\n";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JobOutcome {
    /// The result text was written into the output file.
    Finished,
    /// The submission failed, the output file contains [`JOB_ERROR_MESSAGE`].
    Failed,
    /// The output file could not be written.
    NotWritten,
}

/// Submits one input file and persists whatever comes back into the output directory.
pub struct JobDispatcher {
    builder: RequestBuilder,
    submitter: Box<dyn Submitter>,
    output_dir: PathBuf,
}

impl JobDispatcher {
    pub fn new(
        builder: RequestBuilder,
        submitter: Box<dyn Submitter>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            builder,
            submitter,
            output_dir,
        }
    }

    pub fn output_path(&self, name: &OsStr) -> PathBuf {
        self.output_dir.join(name)
    }

    /// Returns true if an output newer than `input` already exists. Only meaningful for
    /// directory scans; a creation event is always dispatched.
    pub fn is_processed(&self, input: &Path, name: &OsStr) -> bool {
        match (modification_time(input), modification_time(&self.output_path(name))) {
            (Some(input_time), Some(output_time)) => output_time >= input_time,
            _ => false,
        }
    }

    pub async fn process_job(&self, input: &Path, name: &OsStr) -> JobOutcome {
        let output = self.output_path(name);
        let request = self.builder.build(input);

        let (content, outcome) = match self.submitter.submit(request).await {
            Ok(result) => (result.into_bytes(), JobOutcome::Finished),
            Err(error) => {
                log::error!("Job for {} has failed: {error:?}", input.display());
                (JOB_ERROR_MESSAGE.as_bytes().to_vec(), JobOutcome::Failed)
            }
        };

        match write_file_atomic(&output, &content) {
            Ok(()) => outcome,
            Err(error) => {
                log::error!("Cannot write output file {}: {error}", output.display());
                JobOutcome::NotWritten
            }
        }
    }
}
