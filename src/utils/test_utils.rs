use crate::api::{ApiError, ModelInfo};
use crate::core::message::Turn;
use crate::core::provider::{ChatProvider, GenerateRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub const MOCK_DEFAULT_REPLY: &str = "네, 듣고 있어요.";

pub fn model_info(name: &str, methods: &[&str]) -> ModelInfo {
    ModelInfo {
        name: name.to_string(),
        display_name: None,
        description: None,
        version: None,
        supported_generation_methods: methods.iter().map(|m| m.to_string()).collect(),
    }
}

pub fn generative_models(names: &[&str]) -> Vec<ModelInfo> {
    names
        .iter()
        .map(|name| model_info(name, &["generateContent"]))
        .collect()
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub system_prompt: String,
    pub history: Vec<Turn>,
    pub text: String,
}

/// Scripted [`ChatProvider`]. Replies are consumed in order; once the script
/// runs out every call answers with [`MOCK_DEFAULT_REPLY`].
pub struct MockProvider {
    models: Option<Vec<ModelInfo>>,
    replies: Mutex<VecDeque<Result<String, u16>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    list_calls: AtomicUsize,
}

impl MockProvider {
    pub fn with_models(names: &[&str]) -> Self {
        Self {
            models: Some(generative_models(names)),
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// A provider whose model listing always fails.
    pub fn unreachable() -> Self {
        Self {
            models: None,
            ..Self::with_models(&[])
        }
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
        self
    }

    /// Queue a failing call answered with this HTTP status.
    pub fn fail(self, status: u16) -> Self {
        self.replies.lock().unwrap().push_back(Err(status));
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.models.clone().ok_or_else(|| ApiError::Status {
            status: 503,
            body: "listing unavailable".to_string(),
        })
    }

    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ApiError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            model: request.model.to_string(),
            system_prompt: request.system_prompt.to_string(),
            history: request.history.to_vec(),
            text: request.text.to_string(),
        });
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(status)) => Err(ApiError::Status {
                status,
                body: "scripted failure".to_string(),
            }),
            None => Ok(MOCK_DEFAULT_REPLY.to_string()),
        }
    }
}

#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

async fn read_http_request(stream: &mut TcpStream) -> Result<CapturedRequest, String> {
    let mut buffer = Vec::new();
    let mut header_end = None;
    while header_end.is_none() {
        let mut chunk = [0_u8; 1024];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
        header_end = buffer
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .map(|index| index + 4);
    }

    let header_end = header_end.expect("header end should exist");
    let header_text =
        std::str::from_utf8(&buffer[..header_end]).map_err(|err| err.to_string())?;
    let mut lines = header_text.split("\r\n").filter(|line| !line.is_empty());
    let request_line = lines
        .next()
        .ok_or_else(|| "Missing HTTP request line".to_string())?
        .to_string();

    let mut headers = Vec::new();
    let mut content_length = 0_usize;
    for line in lines {
        let mut parts = line.splitn(2, ':');
        let Some(name) = parts.next() else {
            continue;
        };
        let value = parts.next().unwrap_or_default().trim().to_string();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse::<usize>().map_err(|err| err.to_string())?;
        }
        headers.push((name.to_string(), value));
    }

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let mut chunk = vec![0_u8; content_length - body.len()];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP body".to_string());
        }
        body.extend_from_slice(&chunk[..read]);
    }
    body.truncate(content_length);

    Ok(CapturedRequest {
        request_line,
        headers,
        body,
    })
}

/// Bind a one-shot HTTP stub on localhost. Returns its base URL and a handle
/// resolving to the request it received.
pub async fn serve_http_once(
    status: u16,
    body: &str,
) -> (String, JoinHandle<Result<CapturedRequest, String>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let body = body.to_string();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.map_err(|err| err.to_string())?;
        let request = read_http_request(&mut stream).await?;
        let response = format!(
            "HTTP/1.1 {status} STUB\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream
            .write_all(response.as_bytes())
            .await
            .map_err(|err| err.to_string())?;
        stream.shutdown().await.map_err(|err| err.to_string())?;
        Ok(request)
    });

    (format!("http://{addr}"), handle)
}
