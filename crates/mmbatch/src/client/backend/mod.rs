mod common;
pub mod batch;
pub mod lite;

use crate::client::backend::batch::BatchSubmitter;
use crate::client::backend::lite::{LiteOptions, LiteSubmitter};
use crate::client::request::{Credentials, JobRequest};
use std::future::Future;
use std::pin::Pin;

pub type SubmitResult<T> = anyhow::Result<T>;

/// Remote collaborator that runs a job and hands back its result.
///
/// The returned future resolves once the results are available. The error variant carries a
/// human-readable cause chain; no distinction is made between transient and permanent failures.
pub trait Submitter {
    fn submit(&self, request: JobRequest) -> Pin<Box<dyn Future<Output = SubmitResult<String>>>>;
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// Generic batch scheduler (multipart upload of the job request).
    Batch,
    /// MetaMapLite REST annotation service.
    Lite,
}

impl BackendKind {
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            BackendKind::Batch => batch::DEFAULT_BATCH_ENDPOINT,
            BackendKind::Lite => lite::DEFAULT_LITE_ENDPOINT,
        }
    }
}

pub fn create_submitter(
    kind: BackendKind,
    endpoint: Option<String>,
    credentials: Credentials,
    lite_options: LiteOptions,
) -> anyhow::Result<Box<dyn Submitter>> {
    let endpoint = endpoint.unwrap_or_else(|| kind.default_endpoint().to_string());
    let client = common::create_http_client()?;
    log::debug!("Using {kind:?} backend at {endpoint}");

    Ok(match kind {
        BackendKind::Batch => Box::new(BatchSubmitter::new(client, endpoint, credentials)),
        BackendKind::Lite => Box::new(LiteSubmitter::new(client, endpoint, lite_options)),
    })
}
