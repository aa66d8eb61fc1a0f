#![allow(dead_code)]

use std::{
    collections::VecDeque,
    io,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    task::{Context, Poll},
};

use async_trait::async_trait;
use bytes::Bytes;
use eventstore_client::{
    ByteChunkStream, ClientError, ErrorDetail, ErrorDetailCapture, ErrorDetailSink,
    EventStoreClient, Transport, TransportRequest, TransportResponse,
};
use futures_core::Stream;
use futures_util::{stream, StreamExt};

pub const BASE_URL: &str = "http://eventstore.test:3000";
pub const TOKEN: &str = "secret-token";

/// One scripted reply of the fake transport.
pub enum Reply {
    Chunks {
        status: u16,
        chunks: Vec<Result<Vec<u8>, io::ErrorKind>>,
        /// Keep the body open after the scripted chunks instead of ending it.
        hold_open: bool,
    },
    NoBody {
        status: u16,
    },
    Fail(String),
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self::Chunks {
            status,
            chunks: vec![Ok(body.as_bytes().to_vec())],
            hold_open: false,
        }
    }

    pub fn chunked(chunks: &[&str]) -> Self {
        Self::Chunks {
            status: 200,
            chunks: chunks.iter().map(|c| Ok(c.as_bytes().to_vec())).collect(),
            hold_open: false,
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
    body_dropped: Arc<AtomicBool>,
}

impl FakeTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn only_request(&self) -> TransportRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }

    pub fn request_body(&self) -> serde_json::Value {
        let body = self.only_request().body.expect("request body");
        serde_json::from_str(&body).expect("request body is JSON")
    }

    pub fn body_dropped(&self) -> bool {
        self.body_dropped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, ClientError> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted reply left");

        match reply {
            Reply::Chunks {
                status,
                chunks,
                hold_open,
            } => {
                let chunks = chunks.into_iter().map(|chunk| {
                    chunk
                        .map(Bytes::from)
                        .map_err(|kind| io::Error::new(kind, "scripted failure"))
                });
                let body: ByteChunkStream = if hold_open {
                    Box::pin(stream::iter(chunks).chain(stream::pending()))
                } else {
                    Box::pin(stream::iter(chunks))
                };
                let body: ByteChunkStream = Box::pin(DropFlagged {
                    inner: body,
                    dropped: Arc::clone(&self.body_dropped),
                });
                Ok(TransportResponse::new(status, Some(body)))
            }
            Reply::NoBody { status } => Ok(TransportResponse::new(status, None)),
            Reply::Fail(message) => Err(ClientError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                message,
            ))),
        }
    }
}

struct DropFlagged<S> {
    inner: S,
    dropped: Arc<AtomicBool>,
}

impl<S: Stream + Unpin> Stream for DropFlagged<S> {
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl<S> Drop for DropFlagged<S> {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

pub fn client(transport: FakeTransport) -> EventStoreClient<FakeTransport> {
    EventStoreClient::builder()
        .base_url(BASE_URL)
        .api_token(TOKEN)
        .build_with_transport(transport)
        .expect("client builds")
}

/// What a client's error sinks received, and how many sinks were built.
#[derive(Clone, Default)]
pub struct SinkLog {
    details: Arc<Mutex<Vec<ErrorDetail>>>,
    sinks_built: Arc<AtomicUsize>,
}

impl SinkLog {
    pub fn details(&self) -> Vec<ErrorDetail> {
        self.details.lock().unwrap().clone()
    }

    pub fn sinks_built(&self) -> usize {
        self.sinks_built.load(Ordering::SeqCst)
    }
}

pub fn client_with_sink(
    transport: FakeTransport,
    capture: ErrorDetailCapture,
) -> (EventStoreClient<FakeTransport>, SinkLog) {
    let log = SinkLog::default();
    let factory_log = log.clone();
    let client = EventStoreClient::builder()
        .base_url(BASE_URL)
        .api_token(TOKEN)
        .error_sink(capture, move || -> Box<dyn ErrorDetailSink> {
            factory_log.sinks_built.fetch_add(1, Ordering::SeqCst);
            let details = Arc::clone(&factory_log.details);
            Box::new(move |detail: ErrorDetail| details.lock().unwrap().push(detail))
        })
        .build_with_transport(transport)
        .expect("client builds");
    (client, log)
}

pub fn event_line(id: &str, subject: &str, event_type: &str) -> String {
    format!(
        r#"{{"id":"{id}","source":"https://shop.example","subject":"{subject}","type":"{event_type}","time":"2024-05-01T10:00:00Z","data":{{"seq":{id}}}}}"#
    )
}
