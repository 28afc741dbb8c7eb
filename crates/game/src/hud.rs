//! One-line telemetry readout (window title and log).

use rover::VehicleState;

/// Below this speed the vehicle reads as stopped or braking.
const MOVING_SPEED: f32 = 0.1;

/// Arrow for the current direction of travel.
pub fn direction_indicator(velocity: f32) -> char {
    if velocity > MOVING_SPEED {
        '↑'
    } else if velocity < -MOVING_SPEED {
        '↓'
    } else if velocity != 0.0 {
        // Creeping to a stop.
        '⊗'
    } else {
        '•'
    }
}

/// Compact status line: pilot, speed, direction, health, energy and contact.
pub fn status_line(vehicle: &VehicleState, username: &str, fps: f32) -> String {
    let mut line = format!(
        "Roverdrive | Pilot: {} | {} {:.1} m/s | HP {:.0} | EN {:.0}%",
        username,
        direction_indicator(vehicle.velocity()),
        vehicle.speed(),
        vehicle.health(),
        vehicle.energy_fraction() * 100.0,
    );
    if vehicle.is_boosting() {
        line.push_str(" | BOOST");
    }
    if vehicle.is_colliding() {
        line.push_str(" | CONTACT");
    }
    if !vehicle.has_energy() {
        line.push_str(" | NO POWER");
    }
    line.push_str(&format!(" | {:.0} fps", fps));
    line
}
