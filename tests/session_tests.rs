use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::time::{sleep, Duration};

use agentviz::constants::nodes::*;
use agentviz::{
    LocalEchoProcessor, RecordingSurface, RequestProcessor, Session, SubmissionReply,
    SubmissionRequest, SubmissionResponse, Visualization, VisualizationEngine, VizError,
};

#[derive(Default)]
struct RecordingProcessor {
    requests: Mutex<Vec<String>>,
    keys: Mutex<Vec<String>>,
    contract_calls: Mutex<usize>,
    fail: bool,
}

#[async_trait]
impl RequestProcessor for RecordingProcessor {
    async fn process(&self, request: SubmissionRequest) -> agentviz::Result<SubmissionResponse> {
        self.requests.lock().push(request.message.clone());
        if self.fail {
            return Err(VizError::Request("backend unavailable".into()));
        }
        Ok(SubmissionResponse::formatted(format!(
            "processed: {}",
            request.message
        )))
    }

    async fn save_keys(&self, keys: &[String]) -> agentviz::Result<()> {
        self.keys.lock().extend_from_slice(keys);
        Ok(())
    }

    async fn call_contract(&self) -> agentviz::Result<Value> {
        *self.contract_calls.lock() += 1;
        // 模拟等待钱包签名
        sleep(Duration::from_secs(2)).await;
        Ok(json!({"success": true}))
    }
}

fn session_with(processor: Arc<RecordingProcessor>) -> (Session, Arc<RecordingSurface>) {
    let engine = Arc::new(VisualizationEngine::builtin().unwrap());
    let surface = Arc::new(RecordingSurface::new());
    engine.attach_surface(surface.clone());
    (Session::new(engine, processor), surface)
}

fn pair(source: &str, target: &str) -> (String, String) {
    (source.to_string(), target.to_string())
}

#[tokio::test(start_paused = true)]
async fn empty_submission_is_rejected() {
    let processor = Arc::new(RecordingProcessor::default());
    let (session, surface) = session_with(processor.clone());

    assert!(matches!(session.submit("   ").await, Err(VizError::EmptyRequest)));
    assert!(!session.is_active());
    assert!(processor.requests.lock().is_empty());
    assert!(surface.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn inbound_messages_wait_for_first_submission() {
    let processor = Arc::new(RecordingProcessor::default());
    let (session, _surface) = session_with(processor);
    let raw = r#"{"source":"AlarmAgent","target":"CentralAgent","type":"message","timestamp":1.0}"#;

    assert_eq!(session.handle_inbound(raw), None);
    assert!(session.engine().log().is_empty());

    session.submit("hello").await.unwrap();
    assert!(matches!(
        session.handle_inbound(raw),
        Some(Visualization::Animated { .. })
    ));
    assert_eq!(session.engine().log().len(), 1);
    assert_eq!(session.handle_inbound("{broken"), None);
    assert_eq!(session.engine().log().len(), 1);

    session.teardown();
}

#[tokio::test(start_paused = true)]
async fn submission_animates_request_and_fanout() {
    let processor = Arc::new(RecordingProcessor::default());
    let (session, surface) = session_with(processor.clone());

    let reply = session.submit("watch ETH 500").await.unwrap();

    assert_eq!(reply, SubmissionReply::Formatted("processed: watch ETH 500".into()));
    assert!(session.is_active());
    assert_eq!(processor.requests.lock().clone(), vec!["watch ETH 500"]);

    sleep(Duration::from_millis(1600)).await;
    assert_eq!(
        processor.keys.lock().clone(),
        vec!["wat", "ETH", "500"]
    );
    assert_eq!(
        surface.hops(),
        vec![
            pair(USER, CENTRAL),
            pair(CENTRAL, ALARM),
            pair(CENTRAL, AUTO_TRADE),
            pair(CENTRAL, DATA_CLEAN),
        ]
    );

    session.teardown();
}

#[tokio::test(start_paused = true)]
async fn processor_failure_becomes_error_reply() {
    let processor = Arc::new(RecordingProcessor {
        fail: true,
        ..RecordingProcessor::default()
    });
    let (session, surface) = session_with(processor);

    match session.submit("status?").await.unwrap() {
        SubmissionReply::Error(message) => assert!(message.contains("backend unavailable")),
        other => panic!("unexpected reply {other:?}"),
    }

    // 传输失败时只有用户请求那一跳，不做广播
    sleep(Duration::from_millis(1600)).await;
    assert_eq!(surface.hops(), vec![pair(USER, CENTRAL)]);

    session.teardown();
}

#[tokio::test(start_paused = true)]
async fn in_band_error_still_fans_out() {
    struct RejectingProcessor;

    #[async_trait]
    impl RequestProcessor for RejectingProcessor {
        async fn process(&self, _request: SubmissionRequest) -> agentviz::Result<SubmissionResponse> {
            Ok(SubmissionResponse::failed("quota exceeded"))
        }
    }

    let engine = Arc::new(VisualizationEngine::builtin().unwrap());
    let surface = Arc::new(RecordingSurface::new());
    engine.attach_surface(surface.clone());
    let session = Session::new(engine, Arc::new(RejectingProcessor));

    let reply = session.submit("status?").await.unwrap();
    assert_eq!(reply, SubmissionReply::Error("quota exceeded".into()));

    sleep(Duration::from_millis(1600)).await;
    assert_eq!(surface.hops().len(), 4);

    session.teardown();
}

#[tokio::test(start_paused = true)]
async fn contract_call_runs_once_while_in_flight() {
    let processor = Arc::new(RecordingProcessor::default());
    let (session, _surface) = session_with(processor.clone());

    session.submit("swap ETH 500").await.unwrap();
    session.submit("swap BTC 200").await.unwrap();

    sleep(Duration::from_millis(100)).await;
    assert_eq!(processor.keys.lock().len(), 6);
    assert_eq!(*processor.contract_calls.lock(), 1);
    assert!(session.contract_guard().is_running());

    sleep(Duration::from_secs(3)).await;
    assert!(!session.contract_guard().is_running());
    assert_eq!(*processor.contract_calls.lock(), 1);

    session.submit("swap SOL 100").await.unwrap();
    sleep(Duration::from_millis(100)).await;
    assert_eq!(*processor.contract_calls.lock(), 2);

    session.teardown();
    sleep(Duration::from_millis(1)).await;
    assert!(!session.contract_guard().is_running());
}

#[tokio::test(start_paused = true)]
async fn submission_without_keys_skips_contract_call() {
    let processor = Arc::new(RecordingProcessor::default());
    let (session, _surface) = session_with(processor.clone());

    session.submit("a1 b2").await.unwrap();
    sleep(Duration::from_secs(3)).await;

    assert!(processor.keys.lock().is_empty());
    assert_eq!(*processor.contract_calls.lock(), 0);

    session.teardown();
}

#[tokio::test(start_paused = true)]
async fn teardown_stops_driver_and_cancels_flows() {
    let engine = Arc::new(VisualizationEngine::builtin().unwrap());
    let surface = Arc::new(RecordingSurface::new());
    engine.attach_surface(surface.clone());
    let session = Session::new(Arc::clone(&engine), Arc::new(LocalEchoProcessor));

    let reply = session.submit("ping").await.unwrap();
    assert_eq!(reply, SubmissionReply::Formatted("[Echo] ping".into()));
    assert_eq!(engine.scheduler().active_count(), 1);

    session.teardown();
    assert_eq!(engine.scheduler().active_count(), 0);

    let before = surface.events().len();
    sleep(Duration::from_secs(60)).await;
    assert_eq!(surface.events().len(), before);
    assert_eq!(session.driver().completed_cycles(), 0);
}

#[tokio::test(start_paused = true)]
async fn resize_applies_to_engine_layout() {
    let (session, _surface) = session_with(Arc::new(RecordingProcessor::default()));

    session.resize(500.0, 400.0);
    let layout = session.engine().scheduler().layout();
    assert_eq!(layout.scale_x, 0.5);
    assert_eq!(layout.scale_y, 0.5);

    assert_eq!(session.reset_view(), 0);
}
