//! Debug-log display adapter.
//!
//! Implements [`DisplayPort`] by dumping each flushed frame to the debug
//! log.  The OLED panel driver consumes exactly the same clear → text →
//! flush call sequence; this adapter stands in for it on boards without
//! the panel and on the host.

use log::debug;

use crate::app::ports::DisplayPort;

pub struct ConsoleDisplay {
    lines: Vec<(String, i32, i32)>,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }
}

impl DisplayPort for ConsoleDisplay {
    fn clear(&mut self) {
        self.lines.clear();
    }

    fn text(&mut self, s: &str, x: i32, y: i32) {
        self.lines.push((s.to_owned(), x, y));
    }

    fn flush(&mut self) {
        for (s, x, y) in &self.lines {
            debug!("panel[{x:>3},{y:>2}] {s}");
        }
    }
}
