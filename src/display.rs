//! Display presenter — renders a sensor snapshot onto the panel grid.
//!
//! The panel behind [`DisplayPort`] is a 128×64 monochrome OLED: seven
//! 8-pixel text rows.  This module only decides *what* each row says;
//! pixel rendering belongs to the adapter behind the port.

use core::fmt::Write as _;

use heapless::String;

use crate::app::ports::DisplayPort;
use crate::sensors::{SensorSnapshot, WaterStatus};

type Line = String<24>;

fn line(args: core::fmt::Arguments<'_>) -> Line {
    let mut s = Line::new();
    // Truncation to the panel width is acceptable.
    let _ = s.write_fmt(args);
    s
}

/// Normal-mode screen: clock header, readings, level word, press hint.
pub fn render_normal(snap: &SensorSnapshot, panel: &mut impl DisplayPort) {
    panel.clear();

    panel.text(&line(format_args!("Time: {}", snap.time)), 0, 0);
    panel.text(&line(format_args!("Date: {}", snap.date)), 0, 8);

    match snap.temperature_c {
        Ok(t) => panel.text(&line(format_args!("Temp: {t:.1}C")), 0, 18),
        Err(_) => panel.text("Temp: Error", 0, 18),
    }

    match snap.distance_cm {
        Ok(d) => panel.text(&line(format_args!("Water: {d:.1}cm")), 0, 28),
        Err(_) => panel.text("Water: Error", 0, 28),
    }

    let level_word = match snap.water_status {
        WaterStatus::High => "Level: FULL",
        WaterStatus::Low => "Level: ADD WATER!",
        WaterStatus::Ok => "Level: NORMAL",
        WaterStatus::Error => "Level: ERROR",
    };
    panel.text(level_word, 0, 38);

    match snap.turbidity {
        Ok(_) => panel.text(
            &line(format_args!("Water: {}", snap.clarity.label())),
            0,
            48,
        ),
        Err(_) => panel.text("Clarity: Error", 0, 48),
    }

    panel.text("Press for feeding", 0, 58);
    panel.flush();
}

/// Feeding-mode screen: banner, water check, stop hint.
pub fn render_feeding(snap: &SensorSnapshot, panel: &mut impl DisplayPort) {
    panel.clear();

    panel.text("FISH FEEDING", 20, 5);
    panel.text("ACTIVE!", 35, 18);

    match snap.distance_cm {
        Ok(d) => panel.text(&line(format_args!("Water: {d:.1}cm")), 0, 30),
        Err(_) => panel.text("Water: Error", 0, 30),
    }

    let level_word = match snap.water_status {
        WaterStatus::Low => "WARNING: LOW WATER!",
        WaterStatus::High => "Water Level: FULL",
        _ => "Water Level: OK",
    };
    panel.text(level_word, 0, 40);

    panel.text("Servo Cycling...", 10, 50);
    panel.text("Press to STOP", 15, 58);
    panel.flush();
}
