//! Portals: proximity-triggered handoff to another destination.
//!
//! Each portal fires at most one preload and at most one transition per scene.
//! The transition URL carries who is driving, how fast, and where they came from.

use engine_core::Vec3;
use serde::{Deserialize, Serialize};

/// Immutable portal placement. Built once at scene setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalDescriptor {
    pub position: Vec3,
    #[serde(default = "default_trigger_radius")]
    pub trigger_radius: f32,
    #[serde(default = "default_preload_radius")]
    pub preload_radius: f32,
    /// Destination base URL; transition parameters are appended as a query string.
    pub destination_url: String,
    #[serde(default = "default_label")]
    pub label: String,
    /// Colour handed to the destination so it can tint the arriving player.
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_trigger_radius() -> f32 {
    3.0
}
fn default_preload_radius() -> f32 {
    15.0
}
fn default_label() -> String {
    "VIBEVERSE PORTAL".to_string()
}
fn default_color() -> String {
    "#ff0000".to_string()
}

impl PortalDescriptor {
    pub fn new(position: Vec3, destination_url: impl Into<String>) -> Self {
        Self {
            position,
            trigger_radius: default_trigger_radius(),
            preload_radius: default_preload_radius(),
            destination_url: destination_url.into(),
            label: default_label(),
            color: default_color(),
        }
    }

    /// Full destination address for a traveller moving at `speed`.
    pub fn destination_for(&self, context: &TransitionContext, speed: f32) -> String {
        let speed = if speed.is_finite() { speed.abs() } else { 0.0 };
        let params = [
            ("portal", "true".to_string()),
            ("username", context.username.clone()),
            ("color", self.color.clone()),
            ("speed", format!("{:.2}", speed)),
            ("ref", context.origin.clone()),
        ];
        append_query(&self.destination_url, &params)
    }
}

/// Who is travelling and where they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionContext {
    pub username: String,
    /// Back-reference the destination can use to send the player home.
    pub origin: String,
}

/// Discrete portal side effects raised by a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PortalEvent {
    /// The vehicle is near: warm the destination up.
    Preload { label: String, url: String },
    /// The vehicle entered the portal: navigate away.
    Transition { label: String, url: String },
}

impl PortalEvent {
    pub fn url(&self) -> &str {
        match self {
            Self::Preload { url, .. } | Self::Transition { url, .. } => url,
        }
    }
}

/// A placed portal plus its fire-once guards.
#[derive(Debug, Clone)]
pub struct Portal {
    pub descriptor: PortalDescriptor,
    preload_started: bool,
    fired: bool,
}

impl Portal {
    pub fn new(descriptor: PortalDescriptor) -> Self {
        Self {
            descriptor,
            preload_started: false,
            fired: false,
        }
    }

    pub fn preload_started(&self) -> bool {
        self.preload_started
    }

    pub fn fired(&self) -> bool {
        self.fired
    }

    /// Check the vehicle's distance and raise whichever events are newly due.
    pub fn update(
        &mut self,
        vehicle_position: Vec3,
        speed: f32,
        context: &TransitionContext,
        events: &mut Vec<PortalEvent>,
    ) {
        let distance = vehicle_position.distance(self.descriptor.position);

        if distance < self.descriptor.preload_radius && !self.preload_started {
            self.preload_started = true;
            let url = self.descriptor.destination_for(context, speed);
            log::info!("Preloading portal destination: {}", url);
            events.push(PortalEvent::Preload {
                label: self.descriptor.label.clone(),
                url,
            });
        }

        if distance < self.descriptor.trigger_radius && !self.fired {
            self.fired = true;
            let url = self.descriptor.destination_for(context, speed);
            log::info!("Portal '{}' entered", self.descriptor.label);
            events.push(PortalEvent::Transition {
                label: self.descriptor.label.clone(),
                url,
            });
        }
    }

    /// Re-arm both guards (scene reload).
    pub fn reset(&mut self) {
        self.preload_started = false;
        self.fired = false;
    }
}

/// All portals in the scene.
#[derive(Debug, Clone, Default)]
pub struct PortalSet {
    portals: Vec<Portal>,
}

impl PortalSet {
    pub fn new(descriptors: impl IntoIterator<Item = PortalDescriptor>) -> Self {
        Self {
            portals: descriptors.into_iter().map(Portal::new).collect(),
        }
    }

    pub fn portals(&self) -> &[Portal] {
        &self.portals
    }

    pub fn update(
        &mut self,
        vehicle_position: Vec3,
        speed: f32,
        context: &TransitionContext,
    ) -> Vec<PortalEvent> {
        let mut events = Vec::new();
        for portal in &mut self.portals {
            portal.update(vehicle_position, speed, context, &mut events);
        }
        events
    }

    pub fn reset(&mut self) {
        self.portals.iter_mut().for_each(Portal::reset);
    }
}

/// Append `params` as a form-encoded query string.
fn append_query(base: &str, params: &[(&str, String)]) -> String {
    let mut url = base.to_string();
    if !params.is_empty() {
        match base.find('?') {
            None => url.push('?'),
            Some(_) if base.ends_with('?') || base.ends_with('&') => {}
            Some(_) => url.push('&'),
        }
    }
    let query: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
        .collect();
    url.push_str(&query.join("&"));
    url
}

/// `application/x-www-form-urlencoded` encoding of one key or value.
fn form_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
