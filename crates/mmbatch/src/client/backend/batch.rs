use crate::client::backend::common::{check_response, read_upload};
use crate::client::backend::{SubmitResult, Submitter};
use crate::client::request::{Credentials, FIELD_UPLOAD_FILE, FieldValue, JobRequest};
use anyhow::Context;
use reqwest::multipart::{Form, Part};
use std::future::Future;
use std::pin::Pin;

pub const DEFAULT_BATCH_ENDPOINT: &str =
    "https://ii.nlm.nih.gov/cgi-bin/II/UTS_Required/API_batchValidationII.pl";

/// Submits job requests to the generic batch endpoint of the scheduler.
///
/// The request is sent as a single multipart form and the call completes once the scheduler
/// responds with the results of the job.
pub struct BatchSubmitter {
    client: reqwest::Client,
    endpoint: String,
    credentials: Credentials,
}

impl BatchSubmitter {
    pub fn new(client: reqwest::Client, endpoint: String, credentials: Credentials) -> Self {
        Self {
            client,
            endpoint,
            credentials,
        }
    }
}

impl Submitter for BatchSubmitter {
    fn submit(&self, request: JobRequest) -> Pin<Box<dyn Future<Output = SubmitResult<String>>>> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let credentials = self.credentials.clone();

        Box::pin(async move {
            let form = build_form(&request).await?;
            log::debug!("Submitting batch job to {endpoint}");
            let response = client
                .post(&endpoint)
                .basic_auth(&credentials.username, Some(&credentials.password))
                .multipart(form)
                .send()
                .await
                .with_context(|| format!("Cannot submit job to {endpoint}"))?;
            check_response(response)
                .await
                .context("Scheduler rejected the job")
        })
    }
}

async fn build_form(request: &JobRequest) -> SubmitResult<Form> {
    let mut form = Form::new();
    for (name, value) in request.fields() {
        form = match value {
            FieldValue::Text(text) => form.text(name.to_string(), text.clone()),
            FieldValue::Bool(flag) => form.text(name.to_string(), flag.to_string()),
            FieldValue::File(_) => form,
        };
    }

    let (path, content) = read_upload(request).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input.txt".to_string());
    Ok(form.part(
        FIELD_UPLOAD_FILE,
        Part::bytes(content).file_name(file_name),
    ))
}
