use crate::MM_VERSION;
use crate::client::backend::SubmitResult;
use crate::client::request::JobRequest;
use anyhow::Context;
use std::path::PathBuf;

pub fn create_http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(format!("mmbatch/{MM_VERSION}"))
        .build()
        .context("Cannot create HTTP client")
}

/// Reads the contents of the file referenced by the request's upload field.
pub async fn read_upload(request: &JobRequest) -> SubmitResult<(PathBuf, Vec<u8>)> {
    let path = request
        .input_file()
        .ok_or_else(|| anyhow::anyhow!("Job request does not contain an input file"))?
        .to_path_buf();
    let content = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Cannot read input file {}", path.display()))?;
    Ok((path, content))
}

/// Turns a response into its body, or into an error if the server did not accept the job.
pub async fn check_response(response: reqwest::Response) -> SubmitResult<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .context("Cannot read response of the scheduler")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!(
            "Status: {}\nBody: {}",
            status,
            body.trim()
        ));
    }
    Ok(body)
}
