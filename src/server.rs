//! HTTP control server.
//!
//! A deliberately small text-line HTTP subset for phone-app control:
//! one connection at a time, one request per connection, no keep-alive.
//! The listener is non-blocking so the control loop polls it once per
//! iteration; an accepted connection carries a 2-second read/write
//! deadline so a slow peer cannot stall the system beyond that bound.
//!
//! Routing is an explicit finite table (method + path → action) with an
//! HTML status page as the fallback, keeping request parsing decoupled
//! from handling.
//!
//! | Route        | Action        | Response                        |
//! |--------------|---------------|---------------------------------|
//! | GET /status  | read sensors  | 200 JSON status payload         |
//! | GET /feed    | start feeding | 200 JSON ack                    |
//! | GET /stop    | stop feeding  | 200 JSON ack                    |
//! | anything else| read sensors  | 200 HTML status + navigation    |
//!
//! A connection that never yields a parseable request line is answered
//! with a 500 JSON error body; a parseable request for an unknown route
//! gets the HTML page.  The connection is closed on every exit path.

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

use log::{info, warn};
use serde::Serialize;

use crate::app::commands::AppCommand;
use crate::app::ports::{ActuatorPort, EventSink, SensorPort};
use crate::app::service::AppService;
use crate::error::{Error, Result, ServerError};
use crate::fsm::StateId;
use crate::sensors::SensorSnapshot;

/// Requests are read into a fixed buffer; anything longer is truncated.
const MAX_REQUEST_BYTES: usize = 1024;

// ───────────────────────────────────────────────────────────────
// Route table
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteAction {
    Status,
    StartFeed,
    StopFeed,
}

struct Route {
    method: &'static str,
    path: &'static str,
    action: RouteAction,
}

const ROUTES: [Route; 3] = [
    Route {
        method: "GET",
        path: "/status",
        action: RouteAction::Status,
    },
    Route {
        method: "GET",
        path: "/feed",
        action: RouteAction::StartFeed,
    },
    Route {
        method: "GET",
        path: "/stop",
        action: RouteAction::StopFeed,
    },
];

fn parse_request_line(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    let path = parts.next()?;
    Some((method, path))
}

fn lookup_route(method: &str, path: &str) -> Option<RouteAction> {
    ROUTES
        .iter()
        .find(|r| r.method == method && r.path == path)
        .map(|r| r.action)
}

// ───────────────────────────────────────────────────────────────
// Response bodies
// ───────────────────────────────────────────────────────────────

/// JSON body of `GET /status`.  Every field is a string — the original
/// phone-app client parses them that way.
#[derive(Debug, Serialize)]
struct StatusPayload {
    temperature: String,
    water_status: &'static str,
    time: String,
    water_clarity: &'static str,
    distance: String,
}

impl StatusPayload {
    fn from_snapshot(snap: &SensorSnapshot) -> Self {
        Self {
            // Absent readings serialise as "0.0" for numeric fields.
            temperature: match snap.temperature_c {
                Ok(t) => format!("{t:.1}"),
                Err(_) => "0.0".to_owned(),
            },
            water_status: snap.water_status.as_str(),
            time: snap.time.as_str().to_owned(),
            water_clarity: snap.clarity.label(),
            distance: match snap.distance_cm {
                Ok(d) => format!("{d:.1}"),
                Err(_) => "0.0".to_owned(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct AckPayload {
    status: &'static str,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorPayload {
    error: &'static str,
    message: String,
}

fn http_response(status_line: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nAccess-Control-Allow-Origin: *\r\n\r\n{body}"
    )
}

fn json_ok(body: &str) -> String {
    http_response("200 OK", "application/json", body)
}

fn error_response(message: &str) -> String {
    let payload = ErrorPayload {
        error: "Internal server error",
        message: message.to_owned(),
    };
    let body = serde_json::to_string(&payload).unwrap_or_else(|_| {
        r#"{"error":"Internal server error","message":"unserialisable"}"#.to_owned()
    });
    http_response("500 Internal Server Error", "application/json", &body)
}

fn html_page(snap: &SensorSnapshot, mode: StateId) -> String {
    let temperature = match snap.temperature_c {
        Ok(t) => format!("{t:.1}"),
        Err(_) => "Error".to_owned(),
    };
    let distance = match snap.distance_cm {
        Ok(d) => format!("{d:.1}"),
        Err(_) => "Error".to_owned(),
    };
    let feeding = match mode {
        StateId::Feeding => "Active",
        StateId::Normal => "Stopped",
    };
    let body = format!(
        "<html><head><title>AquaFeeder API</title></head><body>\n\
         <h1>Aquarium Feeder API</h1>\n\
         <h2>Current Status:</h2>\n\
         <ul>\n\
         <li>Temperature: {temperature}C</li>\n\
         <li>Water Level: {distance}cm ({status})</li>\n\
         <li>Time: {time}</li>\n\
         <li>Feeding: {feeding}</li>\n\
         </ul>\n\
         <h2>Available Endpoints:</h2>\n\
         <ul>\n\
         <li><a href=\"/status\">/status</a> - current system status (JSON)</li>\n\
         <li><a href=\"/feed\">/feed</a> - start feeding</li>\n\
         <li><a href=\"/stop\">/stop</a> - stop feeding</li>\n\
         </ul>\n\
         </body></html>\n",
        status = snap.water_status.as_str(),
        time = snap.time.as_str(),
    );
    http_response("200 OK", "text/html", &body)
}

// ───────────────────────────────────────────────────────────────
// Server
// ───────────────────────────────────────────────────────────────

pub struct ControlServer {
    listener: TcpListener,
    deadline: Duration,
}

impl ControlServer {
    /// Bind the listener on all interfaces and switch it non-blocking.
    pub fn bind(port: u16, deadline_secs: u64) -> Result<Self> {
        let listener = TcpListener::bind(("0.0.0.0", port))
            .map_err(|_| Error::Server(ServerError::BindFailed))?;
        listener
            .set_nonblocking(true)
            .map_err(|_| Error::Server(ServerError::BindFailed))?;
        if let Ok(addr) = listener.local_addr() {
            info!("control server listening on {addr}");
        }
        Ok(Self {
            listener,
            deadline: Duration::from_secs(deadline_secs.max(1)),
        })
    }

    /// Bound address (the test harness binds port 0).
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr().ok()
    }

    /// Accept and answer at most one pending connection.
    ///
    /// No pending connection is the common case and returns `Ok(false)`.
    /// Per-connection failures are answered with a 500 body and the
    /// connection closed — they do not surface here.  Only a hard
    /// `accept` failure becomes an error.
    pub fn poll(
        &mut self,
        app: &mut AppService,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) -> Result<bool> {
        let (stream, peer) = match self.listener.accept() {
            Ok(conn) => conn,
            Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(false),
            Err(e) => {
                warn!("accept failed: {e}");
                return Err(Error::Server(ServerError::AcceptFailed));
            }
        };

        info!("connection from {peer}");
        self.handle(stream, app, hw, sink);
        Ok(true)
    }

    /// Serve one request synchronously.  Always closes the connection.
    fn handle(
        &self,
        mut stream: TcpStream,
        app: &mut AppService,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        // The accepted stream inherits non-blocking mode; give it the
        // per-request deadline instead.
        let configured = stream
            .set_nonblocking(false)
            .and_then(|()| stream.set_read_timeout(Some(self.deadline)))
            .and_then(|()| stream.set_write_timeout(Some(self.deadline)));

        let response = match configured {
            Ok(()) => match self.answer(&mut stream, app, hw, sink) {
                Ok(response) => response,
                Err(e) => error_response(&e.to_string()),
            },
            Err(e) => error_response(&e.to_string()),
        };

        if let Err(e) = stream.write_all(response.as_bytes()) {
            warn!("response write failed: {e}");
        }
        let _ = stream.shutdown(Shutdown::Both);
    }

    /// Read the request, route it, and build the response string.
    fn answer(
        &self,
        stream: &mut TcpStream,
        app: &mut AppService,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) -> std::io::Result<String> {
        let mut buf = [0u8; MAX_REQUEST_BYTES];
        let n = stream.read(&mut buf)?;
        if n == 0 {
            return Err(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                "empty request",
            ));
        }
        let text = core::str::from_utf8(&buf[..n]).map_err(|_| {
            std::io::Error::new(ErrorKind::InvalidData, "request is not UTF-8")
        })?;
        let line = text.lines().next().unwrap_or("");
        info!("request: {line}");

        let Some((method, path)) = parse_request_line(line) else {
            return Err(std::io::Error::new(
                ErrorKind::InvalidData,
                "malformed request line",
            ));
        };

        let response = match lookup_route(method, path) {
            Some(RouteAction::Status) => {
                let snap = hw.read_all();
                let payload = StatusPayload::from_snapshot(&snap);
                let body = serde_json::to_string(&payload).map_err(|e| {
                    std::io::Error::new(ErrorKind::InvalidData, e.to_string())
                })?;
                json_ok(&body)
            }
            Some(RouteAction::StartFeed) => {
                app.handle_command(AppCommand::StartFeeding, hw, sink);
                info!("feeding started via control server");
                let body = serde_json::to_string(&AckPayload {
                    status: "feeding",
                    message: "Feed started",
                })
                .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e.to_string()))?;
                json_ok(&body)
            }
            Some(RouteAction::StopFeed) => {
                app.handle_command(AppCommand::StopFeeding, hw, sink);
                info!("feeding stopped via control server");
                let body = serde_json::to_string(&AckPayload {
                    status: "stopped",
                    message: "Feed stopped",
                })
                .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e.to_string()))?;
                json_ok(&body)
            }
            None => {
                // Route miss: answer with the human-readable status page.
                let snap = hw.read_all();
                html_page(&snap, app.state())
            }
        };
        Ok(response)
    }
}
