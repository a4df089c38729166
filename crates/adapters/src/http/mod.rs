use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use gifstudio_application::{ApplicationError, ProcessEvent, ProcessingGateway};
use gifstudio_domain::{ProcessReply, ProcessRequest};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// How a prepared submission actually reaches the processor. Split out so
/// the worker loop is testable without a live server.
trait SubmissionTransport: Send + Sync {
    fn execute(&self, request: &ProcessRequest) -> Result<ProcessReply, ApplicationError>;
}

struct ReqwestTransport {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    fn new(endpoint: String) -> Result<Self, ApplicationError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|error| ApplicationError::Transport(error.to_string()))?;
        Ok(Self { endpoint, client })
    }
}

impl SubmissionTransport for ReqwestTransport {
    fn execute(&self, request: &ProcessRequest) -> Result<ProcessReply, ApplicationError> {
        let bytes = std::fs::read(&request.source_path)
            .map_err(|error| ApplicationError::Io(error.to_string()))?;
        let config_json = serde_json::to_string(&request.config)
            .map_err(|error| ApplicationError::InvalidInput(error.to_string()))?;

        let part = reqwest::blocking::multipart::Part::bytes(bytes)
            .file_name(request.source_name.clone())
            .mime_str(mime_for_name(&request.source_name))
            .map_err(|error| ApplicationError::InvalidInput(error.to_string()))?;
        let form = reqwest::blocking::multipart::Form::new()
            .part("file", part)
            .text("config", config_json);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(|error| ApplicationError::Transport(error.to_string()))?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let body = response
            .bytes()
            .map_err(|error| ApplicationError::Transport(error.to_string()))?
            .to_vec();

        Ok(ProcessReply {
            sequence: request.sequence,
            content_type,
            body,
        })
    }
}

fn mime_for_name(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".gif") {
        "image/gif"
    } else if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        FALLBACK_CONTENT_TYPE
    }
}

/// Submissions run on a dedicated worker thread owning the HTTP client; the
/// UI thread enqueues requests and polls completions between frames.
pub struct BackgroundProcessingGateway {
    submit_tx: mpsc::Sender<ProcessRequest>,
    event_rx: Mutex<mpsc::Receiver<ProcessEvent>>,
}

impl BackgroundProcessingGateway {
    pub fn new(endpoint: String) -> Result<Self, ApplicationError> {
        let transport = ReqwestTransport::new(endpoint)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    fn with_transport(transport: Arc<dyn SubmissionTransport>) -> Self {
        let (submit_tx, submit_rx) = mpsc::channel::<ProcessRequest>();
        let (event_tx, event_rx) = mpsc::channel::<ProcessEvent>();
        spawn_worker(submit_rx, event_tx, transport);
        Self {
            submit_tx,
            event_rx: Mutex::new(event_rx),
        }
    }
}

fn spawn_worker(
    submit_rx: mpsc::Receiver<ProcessRequest>,
    event_tx: mpsc::Sender<ProcessEvent>,
    transport: Arc<dyn SubmissionTransport>,
) {
    thread::spawn(move || {
        while let Ok(request) = submit_rx.recv() {
            let sequence = request.sequence;
            log::debug!("executing submission seq={sequence}");
            let event = match transport.execute(&request) {
                Ok(reply) => ProcessEvent::Completed(reply),
                Err(error) => ProcessEvent::Failed {
                    sequence,
                    message: error.to_string(),
                },
            };
            if event_tx.send(event).is_err() {
                return;
            }
        }
    });
}

impl ProcessingGateway for BackgroundProcessingGateway {
    fn submit(&self, request: ProcessRequest) -> Result<(), ApplicationError> {
        self.submit_tx.send(request).map_err(|error| {
            ApplicationError::Transport(format!("failed to enqueue submission: {error}"))
        })
    }

    fn try_receive(&self) -> Result<Option<ProcessEvent>, ApplicationError> {
        let receiver = self
            .event_rx
            .lock()
            .map_err(|_| ApplicationError::Transport("submission event lock poisoned".to_string()))?;
        match receiver.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(ApplicationError::Transport(
                "submission worker disconnected".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use gifstudio_domain::{OutputFormat, Pipeline, PluginKind, ProcessConfig};

    use super::*;

    struct FakeTransport {
        seen: StdMutex<Vec<ProcessRequest>>,
        reply: Result<(String, Vec<u8>), String>,
    }

    impl SubmissionTransport for FakeTransport {
        fn execute(&self, request: &ProcessRequest) -> Result<ProcessReply, ApplicationError> {
            self.seen.lock().expect("seen lock").push(request.clone());
            match &self.reply {
                Ok((content_type, body)) => Ok(ProcessReply {
                    sequence: request.sequence,
                    content_type: content_type.clone(),
                    body: body.clone(),
                }),
                Err(message) => Err(ApplicationError::Transport(message.clone())),
            }
        }
    }

    fn request(sequence: u64) -> ProcessRequest {
        let mut pipeline = Pipeline::new();
        pipeline.add_step(PluginKind::Flip);
        ProcessRequest {
            sequence,
            source_path: "/tmp/party.gif".into(),
            source_name: "party.gif".to_string(),
            config: ProcessConfig {
                pipeline: pipeline.steps().to_vec(),
                create_preview: true,
                output_format: OutputFormat::Gif,
                output_filename: "frames".to_string(),
            },
        }
    }

    fn wait_for_event(gateway: &BackgroundProcessingGateway) -> ProcessEvent {
        for _ in 0..100 {
            if let Some(event) = gateway.try_receive().expect("receive") {
                return event;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("worker produced no event in time");
    }

    #[test]
    fn worker_forwards_completed_replies() {
        let transport = Arc::new(FakeTransport {
            seen: StdMutex::new(Vec::new()),
            reply: Ok(("image/gif".to_string(), vec![1, 2, 3])),
        });
        let gateway = BackgroundProcessingGateway::with_transport(transport.clone());

        gateway.submit(request(7)).expect("submit");
        let event = wait_for_event(&gateway);

        match event {
            ProcessEvent::Completed(reply) => {
                assert_eq!(reply.sequence, 7);
                assert_eq!(reply.content_type, "image/gif");
                assert_eq!(reply.body, vec![1, 2, 3]);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(transport.seen.lock().expect("seen").len(), 1);
    }

    #[test]
    fn worker_turns_transport_errors_into_failed_events() {
        let transport = Arc::new(FakeTransport {
            seen: StdMutex::new(Vec::new()),
            reply: Err("connection refused".to_string()),
        });
        let gateway = BackgroundProcessingGateway::with_transport(transport);

        gateway.submit(request(3)).expect("submit");
        let event = wait_for_event(&gateway);

        match event {
            ProcessEvent::Failed { sequence, message } => {
                assert_eq!(sequence, 3);
                assert!(message.contains("connection refused"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn mime_guess_covers_the_supported_extensions() {
        assert_eq!(mime_for_name("party.GIF"), "image/gif");
        assert_eq!(mime_for_name("shot.png"), "image/png");
        assert_eq!(mime_for_name("photo.jpeg"), "image/jpeg");
        assert_eq!(mime_for_name("unknown.bin"), FALLBACK_CONTENT_TYPE);
    }
}
