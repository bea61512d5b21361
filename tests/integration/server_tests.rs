//! Control server integration tests over real loopback sockets.
//!
//! The listener is non-blocking and single-threaded, so a test can
//! connect, write the request, then drive one `poll()` — the server
//! accepts, answers, and closes, all synchronously.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::mock_hw::{MockHardware, VecSink};

use aquafeeder::app::service::AppService;
use aquafeeder::config::SystemConfig;
use aquafeeder::drivers::servo::NEUTRAL_DUTY;
use aquafeeder::error::SensorError;
use aquafeeder::server::ControlServer;

fn make_server() -> (ControlServer, AppService, MockHardware, VecSink) {
    let mut app = AppService::new(SystemConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = VecSink::new();
    app.start(&mut hw, &mut sink);
    // Port 0: the OS picks a free port; deadline 2 s as in production.
    let server = ControlServer::bind(0, 2).expect("bind");
    (server, app, hw, sink)
}

/// Connect, send `request`, drive one poll, and return the full response.
fn roundtrip(
    server: &mut ControlServer,
    app: &mut AppService,
    hw: &mut MockHardware,
    sink: &mut VecSink,
    request: &str,
) -> String {
    let addr = server.local_addr().expect("addr");
    let mut client = TcpStream::connect(addr).expect("connect");
    client
        .set_read_timeout(Some(Duration::from_secs(2)))
        .expect("timeout");
    client.write_all(request.as_bytes()).expect("write");

    let handled = server.poll(app, hw, sink).expect("poll");
    assert!(handled, "poll must accept the pending connection");

    let mut response = String::new();
    client.read_to_string(&mut response).expect("read");
    response
}

#[test]
fn poll_without_pending_connection_is_a_noop() {
    let (mut server, mut app, mut hw, mut sink) = make_server();
    assert!(!server.poll(&mut app, &mut hw, &mut sink).expect("poll"));
}

#[test]
fn status_reports_high_water_as_json() {
    let (mut server, mut app, _, mut sink) = make_server();
    let mut hw = MockHardware::with_distance(Ok(3.0));

    let resp = roundtrip(
        &mut server,
        &mut app,
        &mut hw,
        &mut sink,
        "GET /status HTTP/1.1\r\n\r\n",
    );
    assert!(resp.starts_with("HTTP/1.1 200 OK"));
    assert!(resp.contains("Content-Type: application/json"));
    assert!(resp.contains("Access-Control-Allow-Origin: *"));
    assert!(resp.contains(r#""water_status":"HIGH""#));
    assert!(resp.contains(r#""distance":"3.0""#));
}

#[test]
fn status_serialises_failed_ranging_as_zero() {
    let (mut server, mut app, _, mut sink) = make_server();
    let mut hw = MockHardware::with_distance(Err(SensorError::EchoStartTimeout));

    let resp = roundtrip(
        &mut server,
        &mut app,
        &mut hw,
        &mut sink,
        "GET /status HTTP/1.1\r\n\r\n",
    );
    assert!(resp.contains(r#""water_status":"ERROR""#));
    assert!(resp.contains(r#""distance":"0.0""#));
}

#[test]
fn feed_route_starts_feeding() {
    let (mut server, mut app, mut hw, mut sink) = make_server();

    let resp = roundtrip(
        &mut server,
        &mut app,
        &mut hw,
        &mut sink,
        "GET /feed HTTP/1.1\r\n\r\n",
    );
    assert!(resp.contains(r#""status":"feeding""#));
    assert!(resp.contains(r#""message":"Feed started""#));
    assert!(app.is_feeding());
    assert_eq!(app.servo_step(), 0);
}

#[test]
fn feed_then_stop_parks_the_servo() {
    let (mut server, mut app, mut hw, mut sink) = make_server();

    let _ = roundtrip(
        &mut server,
        &mut app,
        &mut hw,
        &mut sink,
        "GET /feed HTTP/1.1\r\n\r\n",
    );
    let resp = roundtrip(
        &mut server,
        &mut app,
        &mut hw,
        &mut sink,
        "GET /stop HTTP/1.1\r\n\r\n",
    );

    assert!(resp.contains(r#""status":"stopped""#));
    assert!(resp.contains(r#""message":"Feed stopped""#));
    assert!(!app.is_feeding());
    assert_eq!(hw.last_duty(), Some(NEUTRAL_DUTY));
    assert_eq!(app.servo_step(), 2);
}

#[test]
fn stop_twice_over_the_wire_is_idempotent() {
    let (mut server, mut app, mut hw, mut sink) = make_server();

    for _ in 0..2 {
        let resp = roundtrip(
            &mut server,
            &mut app,
            &mut hw,
            &mut sink,
            "GET /stop HTTP/1.1\r\n\r\n",
        );
        assert!(resp.contains(r#""status":"stopped""#));
        assert!(!app.is_feeding());
        assert_eq!(hw.last_duty(), Some(NEUTRAL_DUTY));
        assert_eq!(app.servo_step(), 2);
    }
}

#[test]
fn unknown_route_gets_the_html_status_page() {
    let (mut server, mut app, mut hw, mut sink) = make_server();

    let resp = roundtrip(
        &mut server,
        &mut app,
        &mut hw,
        &mut sink,
        "GET /whatever HTTP/1.1\r\n\r\n",
    );
    assert!(resp.starts_with("HTTP/1.1 200 OK"));
    assert!(resp.contains("Content-Type: text/html"));
    assert!(resp.contains("Aquarium Feeder API"));
    assert!(resp.contains("/feed"));
    assert!(resp.contains("Feeding: Stopped"));
}

#[test]
fn empty_request_is_answered_with_500_json() {
    let (mut server, mut app, mut hw, mut sink) = make_server();

    let addr = server.local_addr().expect("addr");
    let client = TcpStream::connect(addr).expect("connect");
    // Close the write half immediately: the server reads EOF.
    client
        .shutdown(std::net::Shutdown::Write)
        .expect("shutdown");
    let mut client = client;
    client
        .set_read_timeout(Some(Duration::from_secs(2)))
        .expect("timeout");

    let handled = server.poll(&mut app, &mut hw, &mut sink).expect("poll");
    assert!(handled);

    let mut resp = String::new();
    client.read_to_string(&mut resp).expect("read");
    assert!(resp.starts_with("HTTP/1.1 500 Internal Server Error"));
    assert!(resp.contains(r#""error":"Internal server error""#));
}
