//! Request engine scenarios driven through a scripted mock transport.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use stationlink::httpx::{
    ContentType, ExchangeHandler, ExchangeSummary, Method, RequestDescriptor, RequestEngine,
    RequestError, Transport, TransportConfig, TransportControl, TransportError, TransportEvent,
    REQUEST_TIMEOUT,
};

/// One scripted transport notification.
#[derive(Clone)]
enum Step {
    Connected,
    HeaderSent,
    Header(&'static str, &'static str),
    Data(&'static [u8]),
    Finished,
    Disconnected,
    Redirect,
}

/// What the mock observed: the configuration it was handed and every control
/// call the handler made.
#[derive(Default)]
struct Record {
    url: Option<String>,
    timeout: Option<Duration>,
    auto_redirect: Option<bool>,
    tls_selected: Option<bool>,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    control_calls: Vec<String>,
    performs: usize,
}

#[derive(Clone, Default)]
struct RecordHandle(Arc<Mutex<Record>>);

impl RecordHandle {
    fn with<R>(&self, f: impl FnOnce(&Record) -> R) -> R {
        f(&self.0.lock().unwrap())
    }

    fn push_control(&self, call: String) {
        self.0.lock().unwrap().control_calls.push(call);
    }
}

struct MockControl(RecordHandle);

impl TransportControl for MockControl {
    fn set_header(&mut self, name: &str, value: &str) {
        self.0.push_control(format!("set {}: {}", name, value));
    }

    fn follow_redirect(&mut self) {
        self.0.push_control("follow".to_string());
    }
}

struct MockTransport {
    script: Vec<Step>,
    outcome: Result<ExchangeSummary, TransportError>,
    record: RecordHandle,
}

impl MockTransport {
    fn new(script: Vec<Step>, outcome: Result<ExchangeSummary, TransportError>) -> Self {
        Self {
            script,
            outcome,
            record: RecordHandle::default(),
        }
    }

    fn record(&self) -> RecordHandle {
        self.record.clone()
    }
}

impl Transport for MockTransport {
    fn perform(
        &mut self,
        config: &TransportConfig<'_>,
        handler: &mut dyn ExchangeHandler,
    ) -> Result<ExchangeSummary, TransportError> {
        {
            let mut record = self.record.0.lock().unwrap();
            record.performs += 1;
            record.url = Some(config.url.to_string());
            record.timeout = Some(config.timeout);
            record.auto_redirect = Some(config.auto_redirect);
            record.tls_selected = Some(config.trust_anchor.is_some());
            record.headers = config
                .headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect();
            record.body = config.body.map(<[u8]>::to_vec);
        }

        let mut control = MockControl(self.record.clone());
        for step in self.script.clone() {
            let aborted = match step {
                Step::Connected => handler.on_event(TransportEvent::Connected, &mut control),
                Step::HeaderSent => handler.on_event(TransportEvent::HeaderSent, &mut control),
                Step::Header(name, value) => {
                    handler.on_event(TransportEvent::Header { name, value }, &mut control)
                }
                Step::Data(bytes) => handler.on_event(TransportEvent::Data(bytes), &mut control),
                Step::Finished => handler.on_event(TransportEvent::Finished, &mut control),
                Step::Disconnected => handler.on_event(TransportEvent::Disconnected, &mut control),
                Step::Redirect => handler.on_event(TransportEvent::Redirect, &mut control),
            }
            .is_err();
            if aborted {
                return Err(TransportError::Aborted);
            }
        }
        self.outcome.clone()
    }
}

fn ok_summary(status_code: u16, content_length: Option<u64>) -> Result<ExchangeSummary, TransportError> {
    Ok(ExchangeSummary {
        status_code,
        content_length,
    })
}

#[test]
fn fragments_accumulate_in_order() {
    let transport = MockTransport::new(
        vec![
            Step::Connected,
            Step::HeaderSent,
            Step::Header("Content-Type", "text/plain"),
            Step::Data(b"He"),
            Step::Data(b"llo"),
            Step::Finished,
        ],
        ok_summary(200, Some(5)),
    );
    let mut engine = RequestEngine::new(transport);

    let response = engine
        .execute(&RequestDescriptor::new("http://example.com/greet", Method::Get))
        .unwrap();

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.content_length(), Some(5));
    assert_eq!(response.len(), 5);
    assert_eq!(response.text(), "Hello");
}

#[test]
fn mid_transfer_disconnect_discards_partial_data() {
    // The transport recovers and completes; whatever arrived before the drop
    // must not leak into the result.
    let transport = MockTransport::new(
        vec![Step::Data(b"partial bo"), Step::Disconnected, Step::Finished],
        ok_summary(200, None),
    );
    let mut engine = RequestEngine::new(transport);

    let response = engine
        .execute(&RequestDescriptor::new("http://example.com", Method::Get))
        .unwrap();

    assert!(response.is_empty());
}

#[test]
fn data_after_a_disconnect_reaccumulates_cleanly() {
    let transport = MockTransport::new(
        vec![
            Step::Data(b"stale"),
            Step::Disconnected,
            Step::Data(b"fresh"),
            Step::Finished,
        ],
        ok_summary(200, None),
    );
    let mut engine = RequestEngine::new(transport);

    let response = engine
        .execute(&RequestDescriptor::new("http://example.com", Method::Get))
        .unwrap();

    assert_eq!(response.text(), "fresh");
}

#[test]
fn transport_failure_is_typed_and_yields_no_body() {
    let transport = MockTransport::new(
        vec![Step::Data(b"some bytes")],
        Err(TransportError::Timeout),
    );
    let mut engine = RequestEngine::new(transport);

    let result = engine.execute(&RequestDescriptor::new("http://example.com", Method::Get));

    assert!(matches!(
        result,
        Err(RequestError::Transport(TransportError::Timeout))
    ));
}

#[test]
fn body_over_the_size_cap_aborts_with_buffer_exhausted() {
    // The fragment that crosses the cap aborts the exchange; the fragments
    // after it must never reach the handler.
    let transport = MockTransport::new(
        vec![
            Step::Data(b"He"),
            Step::Data(b"llo, world"),
            Step::Data(b"never delivered"),
            Step::Finished,
        ],
        ok_summary(200, Some(12)),
    );
    let mut engine = RequestEngine::new(transport).with_body_limit(4);

    let result = engine.execute(&RequestDescriptor::new("http://example.com", Method::Get));

    assert!(matches!(result, Err(RequestError::BufferExhausted)));
}

#[test]
fn responses_within_the_size_cap_pass_through() {
    let transport = MockTransport::new(
        vec![Step::Data(b"He"), Step::Data(b"llo"), Step::Finished],
        ok_summary(200, Some(5)),
    );
    let mut engine = RequestEngine::new(transport).with_body_limit(5);

    let response = engine
        .execute(&RequestDescriptor::new("http://example.com", Method::Get))
        .unwrap();

    assert_eq!(response.text(), "Hello");
}

#[test]
fn redirect_is_confirmed_once_with_mandated_headers() {
    let transport = MockTransport::new(
        vec![Step::Redirect, Step::Data(b"moved"), Step::Finished],
        ok_summary(200, None),
    );
    let record = transport.record();
    let mut engine = RequestEngine::new(transport);

    let response = engine
        .execute(&RequestDescriptor::new("http://example.com/old", Method::Get))
        .unwrap();

    assert_eq!(response.text(), "moved");
    record.with(|r| {
        assert_eq!(
            r.control_calls,
            vec![
                "set From: user@example.com",
                "set Accept: text/html",
                "follow",
            ]
        );
    });
}

#[test]
fn a_second_redirect_fails_instead_of_looping() {
    let transport = MockTransport::new(
        vec![Step::Redirect, Step::Redirect, Step::Finished],
        ok_summary(200, None),
    );
    let record = transport.record();
    let mut engine = RequestEngine::new(transport);

    let result = engine.execute(&RequestDescriptor::new("http://example.com", Method::Get));

    assert!(matches!(
        result,
        Err(RequestError::Transport(TransportError::Protocol(_)))
    ));
    // Exactly one confirmed hop.
    record.with(|r| {
        assert_eq!(r.control_calls.iter().filter(|c| *c == "follow").count(), 1);
    });
}

#[test]
fn body_attaches_content_type_header() {
    let transport = MockTransport::new(vec![Step::Finished], ok_summary(200, Some(0)));
    let record = transport.record();
    let mut engine = RequestEngine::new(transport);

    let request = RequestDescriptor::new("https://api.example.com/send", Method::Post)
        .with_body(&br#"{"text":"hi"}"#[..], ContentType::Json);
    engine.execute(&request).unwrap();

    record.with(|r| {
        assert_eq!(
            r.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
        assert_eq!(r.body.as_deref(), Some(&br#"{"text":"hi"}"#[..]));
    });
}

#[test]
fn zero_length_body_sets_no_headers() {
    let transport = MockTransport::new(vec![Step::Finished], ok_summary(200, Some(0)));
    let record = transport.record();
    let mut engine = RequestEngine::new(transport);

    let request = RequestDescriptor::new("http://example.com", Method::Post)
        .with_body(Vec::new(), ContentType::Json);
    engine.execute(&request).unwrap();

    record.with(|r| {
        assert!(r.headers.is_empty());
        assert!(r.body.is_none());
    });
}

#[test]
fn transport_config_matches_the_descriptor() {
    let transport = MockTransport::new(vec![Step::Finished], ok_summary(204, None));
    let record = transport.record();
    let mut engine = RequestEngine::new(transport);

    let request = RequestDescriptor::new("https://example.com/secure", Method::Get)
        .with_trust_anchor(&b"-----BEGIN CERTIFICATE-----"[..]);
    engine.execute(&request).unwrap();

    record.with(|r| {
        assert_eq!(r.url.as_deref(), Some("https://example.com/secure"));
        assert_eq!(r.timeout, Some(REQUEST_TIMEOUT));
        assert_eq!(r.auto_redirect, Some(false));
        assert_eq!(r.tls_selected, Some(true));
    });
}

#[test]
fn plain_transport_without_trust_anchor() {
    let transport = MockTransport::new(vec![Step::Finished], ok_summary(200, None));
    let record = transport.record();
    let mut engine = RequestEngine::new(transport);

    engine
        .execute(&RequestDescriptor::new("http://example.com", Method::Get))
        .unwrap();

    record.with(|r| assert_eq!(r.tls_selected, Some(false)));
}

#[test]
fn invalid_url_never_reaches_the_transport() {
    let transport = MockTransport::new(vec![Step::Finished], ok_summary(200, None));
    let record = transport.record();
    let mut engine = RequestEngine::new(transport);

    let result = engine.execute(&RequestDescriptor::new("not a url", Method::Get));

    assert!(matches!(result, Err(RequestError::InvalidDescriptor(_))));
    record.with(|r| assert_eq!(r.performs, 0));
}

#[test]
fn engine_state_does_not_leak_between_requests() {
    // The first exchange redirects; the second must get its own single-hop
    // allowance and a fresh buffer.
    let transport = MockTransport::new(
        vec![Step::Redirect, Step::Data(b"one"), Step::Finished],
        ok_summary(200, None),
    );
    let mut engine = RequestEngine::new(transport);
    let request = RequestDescriptor::new("http://example.com", Method::Get);

    let first = engine.execute(&request).unwrap();
    assert_eq!(first.text(), "one");

    let second = engine.execute(&request).unwrap();
    assert_eq!(second.text(), "one");
}
