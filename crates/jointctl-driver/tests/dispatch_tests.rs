//! 调度器集成测试
//!
//! 使用记录型传输验证 dry-run 与真实下发共用同一构建结果。

use jointctl_driver::{Connector, DispatchError, Dispatcher, Outcome, dispatch};
use jointctl_gcode::{Axis, CommandScript, Joint, MoveRequest, build};
use jointctl_transport::{
    Delivery, HttpConfig, SerialConfig, Transport, TransportConfig, TransportError, TransportKind,
};
use std::cell::Cell;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

/// 把收到的脚本记录下来的传输
struct RecordingTransport {
    sent: Arc<Mutex<Vec<Vec<String>>>>,
    reject: bool,
}

impl Transport for RecordingTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Serial
    }

    fn send(&mut self, script: &CommandScript) -> Result<Delivery, TransportError> {
        self.sent.lock().unwrap().push(script.lines().to_vec());
        if self.reject {
            return Err(TransportError::RemoteRejected {
                status: 400,
                body: "bad macro".to_string(),
            });
        }
        Ok(Delivery {
            lines_sent: script.len(),
            responses: vec!["ok".to_string()],
        })
    }
}

/// 统计 connect 调用次数的连接器
struct CountingConnector {
    connects: Rc<Cell<usize>>,
    sent: Arc<Mutex<Vec<Vec<String>>>>,
    reject: bool,
}

impl CountingConnector {
    fn new(reject: bool) -> Self {
        Self {
            connects: Rc::new(Cell::new(0)),
            sent: Arc::new(Mutex::new(Vec::new())),
            reject,
        }
    }
}

impl Connector for CountingConnector {
    fn kind(&self) -> TransportKind {
        TransportKind::Serial
    }

    fn connect(&self, _interrupt: &Arc<AtomicBool>) -> Result<Box<dyn Transport>, TransportError> {
        self.connects.set(self.connects.get() + 1);
        Ok(Box::new(RecordingTransport {
            sent: Arc::clone(&self.sent),
            reject: self.reject,
        }))
    }
}

fn joint_request() -> MoveRequest {
    MoveRequest::builder()
        .axis(Axis::X, 1.0)
        .joint(Joint::J1, 5.0)
        .joint(Joint::J3, -2.5)
        .feed(400.0)
        .relative(true)
        .pre_command("FAKE_HOME")
        .build()
        .unwrap()
}

#[test]
fn test_dry_run_never_connects() {
    let connector = CountingConnector::new(false);
    let connects = Rc::clone(&connector.connects);
    let dispatcher = Dispatcher::new(connector);

    let outcome = dispatcher.dispatch(&joint_request(), true).unwrap();

    assert_eq!(connects.get(), 0);
    assert_eq!(
        outcome,
        Outcome::DryRun {
            script: build(&joint_request())
        }
    );
    assert_eq!(
        outcome.script().lines(),
        ["FAKE_HOME", "G91", "G1 X5 Z-2.5 F400", "G90"]
    );
}

#[test]
fn test_live_send_matches_dry_run_script() {
    let connector = CountingConnector::new(false);
    let connects = Rc::clone(&connector.connects);
    let sent = Arc::clone(&connector.sent);
    let dispatcher = Dispatcher::new(connector);

    let dry = dispatcher.dispatch(&joint_request(), true).unwrap();
    let live = dispatcher.dispatch(&joint_request(), false).unwrap();

    assert_eq!(connects.get(), 1);
    assert_eq!(dry.script(), live.script());
    assert_eq!(sent.lock().unwrap().as_slice(), [dry.script().lines().to_vec()]);

    match live {
        Outcome::Sent { kind, delivery, .. } => {
            assert_eq!(kind, TransportKind::Serial);
            assert_eq!(delivery.lines_sent, 4);
            assert_eq!(delivery.responses, vec!["ok"]);
        },
        other => panic!("Expected Sent, got {other:?}"),
    }
}

#[test]
fn test_transport_failure_is_send_error() {
    let dispatcher = Dispatcher::new(CountingConnector::new(true));

    let err = dispatcher.dispatch(&joint_request(), false).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Send {
            kind: TransportKind::Serial,
            source: TransportError::RemoteRejected { status: 400, .. }
        }
    ));
}

#[test]
fn test_dry_run_with_unreachable_http_config() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = TransportConfig::Http(HttpConfig {
        host: "127.0.0.1".to_string(),
        port,
        api_key: Some("secret".to_string()),
        timeout: Duration::from_millis(200),
    });

    let outcome = dispatch(&joint_request(), &config, true).unwrap();
    assert!(outcome.is_dry_run());

    let err = dispatch(&joint_request(), &config, false).unwrap_err();
    assert_eq!(err.kind(), TransportKind::Http);
    assert!(matches!(err.transport_error(), TransportError::Unreachable { .. }));
}

#[test]
fn test_missing_serial_port_is_unavailable() {
    let config = TransportConfig::Serial(SerialConfig {
        port: "/dev/jointctl-no-such-port".to_string(),
        ..SerialConfig::default()
    });

    assert!(dispatch(&joint_request(), &config, true).is_ok());

    let err = dispatch(&joint_request(), &config, false).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Send {
            kind: TransportKind::Serial,
            source: TransportError::Unavailable { .. }
        }
    ));
    assert_eq!(err.to_string(), "serial send failed");
    assert_eq!(
        err.transport_error().to_string(),
        "serial port /dev/jointctl-no-such-port unavailable"
    );
}
