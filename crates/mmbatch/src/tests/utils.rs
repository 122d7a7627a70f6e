use crate::client::backend::{SubmitResult, Submitter};
use crate::client::request::{Credentials, JobConfig, JobRequest, RequestBuilder};
use crate::common::Map;
use crate::watch::event::{EventSource, FsEvent};
use std::cell::RefCell;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::rc::Rc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

pub fn credentials() -> Credentials {
    Credentials {
        username: "user".to_string(),
        password: "secret".to_string(),
        email: "user@example.org".to_string(),
    }
}

pub fn request_builder() -> RequestBuilder {
    RequestBuilder::new(credentials(), JobConfig::default())
}

/// Submitter with scripted responses, keyed by the file name of the uploaded input.
/// Inputs without a scripted response succeed with `result of <name>`.
#[derive(Clone, Default)]
pub struct ScriptedSubmitter {
    responses: Rc<RefCell<Map<String, Result<String, String>>>>,
    submitted: Rc<RefCell<Vec<JobRequest>>>,
}

impl ScriptedSubmitter {
    pub fn succeed(self, name: &str, result: &str) -> Self {
        self.responses
            .borrow_mut()
            .insert(name.to_string(), Ok(result.to_string()));
        self
    }

    pub fn fail(self, name: &str, cause: &str) -> Self {
        self.responses
            .borrow_mut()
            .insert(name.to_string(), Err(cause.to_string()));
        self
    }

    pub fn submitted_inputs(&self) -> Vec<PathBuf> {
        self.submitted
            .borrow()
            .iter()
            .filter_map(|request| request.input_file().map(|p| p.to_path_buf()))
            .collect()
    }
}

impl Submitter for ScriptedSubmitter {
    fn submit(&self, request: JobRequest) -> Pin<Box<dyn Future<Output = SubmitResult<String>>>> {
        let name = request
            .input_file()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.submitted.borrow_mut().push(request);
        let response = self
            .responses
            .borrow()
            .get(&name)
            .cloned()
            .unwrap_or_else(|| Ok(format!("result of {name}")));
        Box::pin(async move { response.map_err(|cause| anyhow::anyhow!(cause)) })
    }
}

/// In-memory event source fed through a channel.
pub struct ChannelSource {
    receiver: UnboundedReceiver<Vec<FsEvent>>,
    watched: Vec<PathBuf>,
}

impl ChannelSource {
    pub fn watched(&self) -> Vec<PathBuf> {
        self.watched.clone()
    }
}

pub fn channel_source() -> (UnboundedSender<Vec<FsEvent>>, ChannelSource) {
    let (sender, receiver) = unbounded_channel();
    (
        sender,
        ChannelSource {
            receiver,
            watched: Vec::new(),
        },
    )
}

impl EventSource for ChannelSource {
    fn watch(&mut self, directory: &Path) -> crate::Result<()> {
        self.watched.push(directory.to_path_buf());
        Ok(())
    }

    fn unwatch(&mut self, directory: &Path) {
        self.watched.retain(|dir| dir != directory);
    }

    fn next_batch(&mut self) -> Pin<Box<dyn Future<Output = Option<Vec<FsEvent>>> + '_>> {
        Box::pin(async move { self.receiver.recv().await })
    }
}

/// Input and output directories inside a temporary directory.
pub struct WatchDirs {
    root: TempDir,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl WatchDirs {
    pub fn new() -> Self {
        let root = TempDir::with_prefix("mm").unwrap();
        let base = std::fs::canonicalize(root.path()).unwrap();
        let input = base.join("input");
        let output = base.join("output");
        std::fs::create_dir(&input).unwrap();
        std::fs::create_dir(&output).unwrap();
        Self {
            root,
            input,
            output,
        }
    }

    pub fn root(&self) -> PathBuf {
        std::fs::canonicalize(self.root.path()).unwrap()
    }

    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.output)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn read_output(&self, name: &str) -> String {
        std::fs::read_to_string(self.output.join(name)).unwrap()
    }
}

/// HTTP client that ignores proxy settings of the environment.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Accepts a single HTTP request on a local port and answers it with `status` and `body`.
/// The join handle resolves to the raw request.
pub async fn serve_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    let body = body.to_string();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_http_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {status} Status\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        request
    });
    (url, handle)
}

async fn read_http_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut data = Vec::new();
    let mut buffer = [0u8; 4096];
    loop {
        if let Some(header_end) = find(&data, b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
            let body = &data[header_end + 4..];
            let complete = if let Some(length) = content_length(&headers) {
                body.len() >= length
            } else if headers.contains("transfer-encoding: chunked") {
                find(body, b"0\r\n\r\n").is_some()
            } else {
                true
            };
            if complete {
                break;
            }
        }
        let count = stream.read(&mut buffer).await.unwrap();
        if count == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..count]);
    }
    String::from_utf8_lossy(&data).into_owned()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn content_length(headers: &str) -> Option<usize> {
    headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse().ok())
}
