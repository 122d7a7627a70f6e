use crate::client::backend::common::{check_response, read_upload};
use crate::client::backend::{SubmitResult, Submitter};
use crate::client::request::JobRequest;
use anyhow::Context;
use std::future::Future;
use std::pin::Pin;

pub const DEFAULT_LITE_ENDPOINT: &str = "https://ii.nlm.nih.gov/metamaplite/rest/annotate";

/// Annotation parameters of the MetaMapLite REST service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiteOptions {
    /// Format of the input document (`freetext`, `medline`, `sldiwi`, ...)
    pub docformat: String,
    /// Format of the result (`mmi`, `brat`, `json`, ...)
    pub resultformat: String,
    /// UMLS sources the annotation is restricted to
    pub sources: Vec<String>,
    /// UMLS semantic types the annotation is restricted to
    pub semantic_types: Vec<String>,
    /// Value of the `Accept` header
    pub accept: String,
}

impl Default for LiteOptions {
    fn default() -> Self {
        Self {
            docformat: "sldiwi".to_string(),
            resultformat: "mmi".to_string(),
            sources: vec!["all".to_string()],
            semantic_types: vec!["all".to_string()],
            accept: "text/plain".to_string(),
        }
    }
}

/// Sends the uploaded file to MetaMapLite as an urlencoded form. Scheduler-only fields of the
/// job request (command, notes, flags) have no counterpart there and are not sent.
pub struct LiteSubmitter {
    client: reqwest::Client,
    endpoint: String,
    options: LiteOptions,
}

impl LiteSubmitter {
    pub fn new(client: reqwest::Client, endpoint: String, options: LiteOptions) -> Self {
        Self {
            client,
            endpoint,
            options,
        }
    }
}

impl Submitter for LiteSubmitter {
    fn submit(&self, request: JobRequest) -> Pin<Box<dyn Future<Output = SubmitResult<String>>>> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let options = self.options.clone();

        Box::pin(async move {
            let (path, content) = read_upload(&request).await?;
            let text = String::from_utf8(content)
                .with_context(|| format!("Input file {} is not valid UTF-8", path.display()))?;
            let params = build_params(&options, text);

            log::debug!("Submitting {} to {endpoint}", path.display());
            let response = client
                .post(&endpoint)
                .header(reqwest::header::ACCEPT, options.accept.as_str())
                .form(&params)
                .send()
                .await
                .with_context(|| format!("Cannot submit job to {endpoint}"))?;
            check_response(response)
                .await
                .context("Annotation service rejected the job")
        })
    }
}

fn build_params(options: &LiteOptions, text: String) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("inputtext", text),
        ("docformat", options.docformat.clone()),
        ("resultformat", options.resultformat.clone()),
    ];
    params.extend(
        options
            .sources
            .iter()
            .map(|source| ("sourceString", source.clone())),
    );
    params.extend(
        options
            .semantic_types
            .iter()
            .map(|semtype| ("semanticTypeString", semtype.clone())),
    );
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::request::{JobConfig, RequestBuilder};
    use crate::tests::utils::{credentials, http_client, serve_once};
    use tempfile::TempDir;

    #[test]
    fn default_params() {
        let params = build_params(&LiteOptions::default(), "Apnea\n".to_string());
        assert_eq!(
            params,
            vec![
                ("inputtext", "Apnea\n".to_string()),
                ("docformat", "sldiwi".to_string()),
                ("resultformat", "mmi".to_string()),
                ("sourceString", "all".to_string()),
                ("semanticTypeString", "all".to_string()),
            ]
        );
    }

    #[test]
    fn repeated_restrictions() {
        let options = LiteOptions {
            sources: vec!["MSH".to_string(), "SNOMEDCT_US".to_string()],
            semantic_types: vec!["sosy".to_string(), "dsyn".to_string()],
            ..Default::default()
        };
        let params = build_params(&options, String::new());
        let sources: Vec<_> = params
            .iter()
            .filter(|(name, _)| *name == "sourceString")
            .map(|(_, value)| value.as_str())
            .collect();
        assert_eq!(sources, vec!["MSH", "SNOMEDCT_US"]);
        assert_eq!(
            params
                .iter()
                .filter(|(name, _)| *name == "semanticTypeString")
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn submit_posts_form() {
        let dir = TempDir::with_prefix("mm").unwrap();
        let path = dir.path().join("query.txt");
        std::fs::write(&path, "Apnea").unwrap();
        let request = RequestBuilder::new(credentials(), JobConfig::default()).build(&path);

        let (url, server) = serve_once(200, "C0003578|Apnea").await;
        let submitter = LiteSubmitter::new(http_client(), url, LiteOptions::default());
        let result = submitter.submit(request).await.unwrap();
        assert_eq!(result, "C0003578|Apnea");

        let raw = server.await.unwrap();
        assert!(raw.contains("application/x-www-form-urlencoded"));
        assert!(raw.to_lowercase().contains("accept: text/plain"));
        assert!(raw.contains("inputtext=Apnea&docformat=sldiwi&resultformat=mmi"));
        assert!(raw.contains("sourceString=all&semanticTypeString=all"));
        assert!(!raw.contains("Batch_Command"));
    }

    #[tokio::test]
    async fn submit_rejects_binary_input() {
        let dir = TempDir::with_prefix("mm").unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        let request = RequestBuilder::new(credentials(), JobConfig::default()).build(&path);

        let submitter = LiteSubmitter::new(
            http_client(),
            "http://127.0.0.1:9".to_string(),
            LiteOptions::default(),
        );
        let error = submitter.submit(request).await.unwrap_err();
        assert!(format!("{error:#}").contains("not valid UTF-8"));
    }
}
