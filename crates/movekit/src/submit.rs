//! Submission orchestration.
//!
//! One submission walks a fixed phase sequence:
//! `Idle -> Submitting -> Logged -> (HandoffInitiated) -> Confirmed`.
//! The remote log is awaited before confirmation, but its failure never
//! blocks anything past a warning. The WhatsApp open happens on a spawned
//! task after a configurable delay so the confirmation screen is visible
//! first; contact-style forms skip the handoff leg entirely.

use crate::config::{EndpointConfig, MoveKitConfig};
use movekit_handoff::{HandoffOpener, ManualHandoff, WhatsappHandoff};
use movekit_protocol::{SheetPayload, SubmissionRecord};
use movekit_sink::SheetSink;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const MANUAL_HANDOFF_LABEL: &str = "Continue to WhatsApp";

/// Where a submission currently is. `Confirmed` is terminal: the form is
/// not reusable within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
    Logged { ok: bool },
    HandoffInitiated,
    Confirmed,
}

/// What the confirmation screen shows.
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub heading: String,
    pub body: String,
    /// Present unless the form is contact-style or the link could not be
    /// built; the screen's manual fallback.
    pub manual: Option<ManualHandoff>,
    /// Whether an automatic open was scheduled.
    pub auto_handoff: bool,
}

/// Result of one submission.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub logged_ok: bool,
    pub confirmation: Confirmation,
}

/// Drives a single form's submission. Owns the sink, the handoff builder,
/// and the optional opener; holds the phase.
pub struct SubmissionController {
    sink: SheetSink,
    endpoints: EndpointConfig,
    handoff: WhatsappHandoff,
    opener: Option<Arc<dyn HandoffOpener>>,
    handoff_delay: Duration,
    auto_open: bool,
    phase: SubmissionPhase,
}

impl SubmissionController {
    pub fn new(config: &MoveKitConfig, opener: Option<Arc<dyn HandoffOpener>>) -> Self {
        Self {
            sink: SheetSink::new(),
            endpoints: config.endpoints.clone(),
            handoff: WhatsappHandoff::new(
                config.business.whatsapp_phone.clone(),
                config.business.name.clone(),
            ),
            opener,
            handoff_delay: Duration::from_millis(config.handoff_delay_ms),
            auto_open: true,
            phase: SubmissionPhase::Idle,
        }
    }

    /// Disable the delayed automatic open while keeping the opener around
    /// for the confirmation screen's manual control.
    pub fn with_auto_open(mut self, auto_open: bool) -> Self {
        self.auto_open = auto_open;
        self
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    /// Run the whole flow for `record`. Returns `None` when a submission
    /// already happened — the duplicate-submit guard.
    pub async fn submit(&mut self, record: SubmissionRecord) -> Option<SubmissionOutcome> {
        if self.phase != SubmissionPhase::Idle {
            return None;
        }
        self.phase = SubmissionPhase::Submitting;
        log_quote_summary(&record);

        let payload = SheetPayload::from_record(&record);
        let endpoint = self.endpoints.url_for(record.source).to_string();
        let logged_ok = match self.sink.send(&payload, &endpoint).await {
            Ok(response) => {
                info!(response = response.as_str(), "submission logged remotely");
                true
            }
            Err(err) => {
                // Non-fatal: the flow continues and the user never sees this.
                warn!(error = %err, "remote logging failed");
                false
            }
        };
        self.phase = SubmissionPhase::Logged { ok: logged_ok };

        let mut manual = None;
        let mut auto_handoff = false;
        if !record.source.is_contact() {
            match self.handoff.manual_control(&record, MANUAL_HANDOFF_LABEL) {
                Ok(control) => {
                    auto_handoff = self.schedule_auto_open(control.url.clone());
                    manual = Some(control);
                }
                Err(err) => {
                    // Degrade: no automatic open, no manual control, but the
                    // submission itself is still acknowledged.
                    warn!(error = %err, "could not build WhatsApp handoff link");
                }
            }
        }

        self.phase = SubmissionPhase::Confirmed;
        Some(SubmissionOutcome {
            logged_ok,
            confirmation: confirmation_for(&record, manual, auto_handoff),
        })
    }

    /// Spawn the delayed automatic open. Returns whether one was scheduled.
    fn schedule_auto_open(&mut self, url: String) -> bool {
        if !self.auto_open {
            return false;
        }
        let Some(opener) = self.opener.clone() else {
            return false;
        };
        let delay = self.handoff_delay;
        self.phase = SubmissionPhase::HandoffInitiated;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = opener.open(&url) {
                warn!(error = %err, "automatic WhatsApp open failed");
            }
        });
        true
    }
}

fn confirmation_for(
    record: &SubmissionRecord,
    manual: Option<ManualHandoff>,
    auto_handoff: bool,
) -> Confirmation {
    let kind = match record.source {
        movekit_protocol::FormSource::Contact => "enquiry",
        movekit_protocol::FormSource::Lead => "quote request",
    };
    let mut body = format!(
        "Your {kind} has been received. We typically respond within 24 hours."
    );
    if auto_handoff {
        body.push_str(" You'll be taken to WhatsApp in a moment, or use the link below.");
    } else if manual.is_some() {
        body.push_str(" Use the link below to continue the conversation on WhatsApp.");
    }
    Confirmation {
        heading: "Thank you — we'll get back to you shortly.".to_string(),
        body,
        manual,
        auto_handoff,
    }
}

/// Structured dump of a submission, mirroring what the business reads when
/// tailing the log: customer and move details plus an item-by-item
/// breakdown.
pub fn log_quote_summary(record: &SubmissionRecord) {
    info!(
        source = record.source.as_str(),
        page = record.page.as_str(),
        timestamp = %record.timestamp.to_rfc3339(),
        "quote request submitted"
    );
    info!(
        name = display_or(&record.name),
        phone = display_or(&record.phone),
        pickup = display_or(&record.pickup),
        dropoff = display_or(&record.dropoff),
        "customer details"
    );

    if record.selected_items.is_empty() {
        info!("no items selected");
        return;
    }
    for (index, item) in record.selected_items.split(", ").enumerate() {
        info!(position = index + 1, item, "selected item");
    }
    info!(
        formatted = record.items_or_raw(),
        "items summary"
    );
}

fn display_or(value: &str) -> &str {
    if value.is_empty() {
        "Not provided"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movekit_protocol::FormSource;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Opener that records the URLs it was asked to open.
    #[derive(Default)]
    struct RecordingOpener {
        opened: Mutex<Vec<String>>,
    }

    impl RecordingOpener {
        fn urls(&self) -> Vec<String> {
            self.opened.lock().unwrap().clone()
        }
    }

    impl HandoffOpener for RecordingOpener {
        fn open(&self, url: &str) -> movekit_handoff::Result<()> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    /// Single-connection HTTP stub; answers `status_line` and closes.
    async fn stub_endpoint(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).await.unwrap_or(0);
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request_complete(&request) {
                    break;
                }
            }
            let response = format!("{status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        });
        format!("http://{}", addr)
    }

    /// Like `stub_endpoint`, but also hands back what the client sent.
    async fn recording_endpoint() -> (String, Arc<Mutex<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(String::new()));
        let sink = seen.clone();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).await.unwrap_or(0);
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request_complete(&request) {
                    break;
                }
            }
            *sink.lock().unwrap() = String::from_utf8_lossy(&request).to_string();
            let _ = stream
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                .await;
            let _ = stream.shutdown().await;
        });
        (format!("http://{}", addr), seen)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(split) = text.find("\r\n\r\n") else {
            return false;
        };
        let declared = text[..split]
            .lines()
            .find_map(|line| {
                let (key, value) = line.split_once(':')?;
                if key.trim().eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        text.len() - (split + 4) >= declared
    }

    fn test_config(endpoint: &str, delay_ms: u64) -> MoveKitConfig {
        let mut config = MoveKitConfig::default();
        config.endpoints.lead_url = endpoint.to_string();
        config.endpoints.contact_url = endpoint.to_string();
        config.handoff_delay_ms = delay_ms;
        config
    }

    fn lead_record() -> SubmissionRecord {
        let mut record = SubmissionRecord::empty(FormSource::Lead);
        record.name = "Sam".to_string();
        record.items_formatted = "Bed x2".to_string();
        record
    }

    #[tokio::test]
    async fn test_successful_lead_submission_confirms_and_schedules_handoff() {
        let endpoint = stub_endpoint("HTTP/1.1 200 OK").await;
        let opener = Arc::new(RecordingOpener::default());
        let mut controller =
            SubmissionController::new(&test_config(&endpoint, 10), Some(opener.clone()));

        let outcome = controller.submit(lead_record()).await.unwrap();
        assert!(outcome.logged_ok);
        assert!(outcome.confirmation.auto_handoff);
        assert_eq!(controller.phase(), SubmissionPhase::Confirmed);

        let manual = outcome.confirmation.manual.unwrap();
        assert_eq!(manual.label, "Continue to WhatsApp");
        assert!(manual.url.starts_with("https://wa.me/"));

        // The open happens after the delay, not before.
        assert!(opener.urls().is_empty());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(opener.urls(), vec![manual.url]);
    }

    #[tokio::test]
    async fn test_logging_failure_is_nonfatal_and_still_hands_off() {
        let endpoint = stub_endpoint("HTTP/1.1 500 Internal Server Error").await;
        let opener = Arc::new(RecordingOpener::default());
        let mut controller =
            SubmissionController::new(&test_config(&endpoint, 10), Some(opener.clone()));

        let outcome = controller.submit(lead_record()).await.unwrap();
        assert!(!outcome.logged_ok);
        assert_eq!(controller.phase(), SubmissionPhase::Confirmed);
        assert!(outcome.confirmation.manual.is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(opener.urls().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_still_confirms() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let mut controller = SubmissionController::new(&test_config(&endpoint, 10), None);
        let outcome = controller.submit(lead_record()).await.unwrap();
        assert!(!outcome.logged_ok);
        assert_eq!(controller.phase(), SubmissionPhase::Confirmed);
    }

    #[tokio::test]
    async fn test_contact_form_never_hands_off() {
        let endpoint = stub_endpoint("HTTP/1.1 200 OK").await;
        let opener = Arc::new(RecordingOpener::default());
        let mut controller =
            SubmissionController::new(&test_config(&endpoint, 10), Some(opener.clone()));

        let record = SubmissionRecord::empty(FormSource::Contact);
        let outcome = controller.submit(record).await.unwrap();
        assert!(outcome.logged_ok);
        assert!(!outcome.confirmation.auto_handoff);
        assert!(outcome.confirmation.manual.is_none());
        assert_eq!(controller.phase(), SubmissionPhase::Confirmed);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(opener.urls().is_empty());
    }

    #[tokio::test]
    async fn test_without_opener_only_manual_control_is_offered() {
        let endpoint = stub_endpoint("HTTP/1.1 200 OK").await;
        let mut controller = SubmissionController::new(&test_config(&endpoint, 10), None);

        let outcome = controller.submit(lead_record()).await.unwrap();
        assert!(!outcome.confirmation.auto_handoff);
        assert!(outcome.confirmation.manual.is_some());
    }

    #[tokio::test]
    async fn test_disabled_auto_open_keeps_manual_control_usable() {
        let endpoint = stub_endpoint("HTTP/1.1 200 OK").await;
        let opener = Arc::new(RecordingOpener::default());
        let mut controller =
            SubmissionController::new(&test_config(&endpoint, 10), Some(opener.clone()))
                .with_auto_open(false);

        let outcome = controller.submit(lead_record()).await.unwrap();
        assert!(!outcome.confirmation.auto_handoff);
        let manual = outcome.confirmation.manual.unwrap();

        // No open happens on its own, but the retained opener still works
        // when the user asks for the handoff explicitly.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(opener.urls().is_empty());
        opener.open(&manual.url).unwrap();
        assert_eq!(opener.urls(), vec![manual.url]);
    }

    #[tokio::test]
    async fn test_submissions_route_to_source_specific_endpoints() {
        let (lead_url, lead_seen) = recording_endpoint().await;
        let (contact_url, contact_seen) = recording_endpoint().await;
        let mut config = MoveKitConfig::default();
        config.endpoints.lead_url = lead_url;
        config.endpoints.contact_url = contact_url;
        config.handoff_delay_ms = 10;

        let mut record = SubmissionRecord::empty(FormSource::Contact);
        record.name = "Alex".to_string();
        let outcome = SubmissionController::new(&config, None)
            .submit(record)
            .await
            .unwrap();
        assert!(outcome.logged_ok);
        assert!(contact_seen.lock().unwrap().contains("\"name\":\"Alex\""));
        assert!(lead_seen.lock().unwrap().is_empty());

        let outcome = SubmissionController::new(&config, None)
            .submit(lead_record())
            .await
            .unwrap();
        assert!(outcome.logged_ok);
        assert!(lead_seen.lock().unwrap().contains("\"name\":\"Sam\""));
    }

    #[tokio::test]
    async fn test_duplicate_submit_is_ignored() {
        let endpoint = stub_endpoint("HTTP/1.1 200 OK").await;
        let mut controller = SubmissionController::new(&test_config(&endpoint, 10), None);

        assert!(controller.submit(lead_record()).await.is_some());
        assert!(controller.submit(lead_record()).await.is_none());
        assert_eq!(controller.phase(), SubmissionPhase::Confirmed);
    }

    #[tokio::test]
    async fn test_unbuildable_handoff_degrades_to_plain_confirmation() {
        let endpoint = stub_endpoint("HTTP/1.1 200 OK").await;
        let mut config = test_config(&endpoint, 10);
        config.business.whatsapp_phone = "no digits here".to_string();
        let opener = Arc::new(RecordingOpener::default());
        let mut controller = SubmissionController::new(&config, Some(opener.clone()));

        let outcome = controller.submit(lead_record()).await.unwrap();
        assert!(outcome.logged_ok);
        assert!(outcome.confirmation.manual.is_none());
        assert!(!outcome.confirmation.auto_handoff);
        assert_eq!(controller.phase(), SubmissionPhase::Confirmed);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(opener.urls().is_empty());
    }
}
