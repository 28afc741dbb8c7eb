//! Acting on portal events: warming up destinations and handing off to them.

use rover::PortalEvent;
use std::net::ToSocketAddrs;

/// What the event loop should do after a portal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    /// Leave the game; the destination has been announced.
    Leave(String),
}

/// Handle one portal event. Preloads never block the frame.
pub fn handle_portal_event(event: &PortalEvent, stay_on_transition: bool) -> Navigation {
    match event {
        PortalEvent::Preload { label, url } => {
            log::debug!("Warming up '{}'", label);
            spawn_preload(url);
            Navigation::Stay
        }
        PortalEvent::Transition { label, url } => {
            log::info!("Entering '{}': {}", label, url);
            println!("{}", url);
            if stay_on_transition {
                Navigation::Stay
            } else {
                Navigation::Leave(url.clone())
            }
        }
    }
}

/// Resolve the destination host on a detached thread so the first request finds
/// a warm resolver cache. Failure only costs the warm-up.
fn spawn_preload(url: &str) {
    let Some(target) = host_and_port(url) else {
        log::debug!("No host in {}, skipping preload", url);
        return;
    };
    let spawned = std::thread::Builder::new()
        .name("portal-preload".to_string())
        .spawn(move || match target.to_socket_addrs() {
            Ok(addrs) => log::debug!(
                "Preloaded {}:{} ({} address(es))",
                target.0,
                target.1,
                addrs.count()
            ),
            Err(e) => log::debug!("Preload of {} failed: {}", target.0, e),
        });
    if let Err(e) = spawned {
        log::debug!("Could not start preload thread: {}", e);
    }
}

/// Host and port of an absolute `http`/`https` URL.
fn host_and_port(url: &str) -> Option<(String, u16)> {
    let (scheme, rest) = url.split_once("://")?;
    let default_port = match scheme.to_ascii_lowercase().as_str() {
        "http" => 80,
        "https" => 443,
        _ => return None,
    };
    let authority = rest.split(['/', '?', '#']).next()?;
    let authority = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    if authority.is_empty() {
        return None;
    }
    match authority.rsplit_once(':') {
        Some((host, port)) => Some((host.to_string(), port.parse().ok()?)),
        None => Some((authority.to_string(), default_port)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_and_port_from_urls() {
        assert_eq!(
            host_and_port("https://portal.example/?portal=true"),
            Some(("portal.example".to_string(), 443))
        );
        assert_eq!(
            host_and_port("http://localhost:5173/play"),
            Some(("localhost".to_string(), 5173))
        );
        assert_eq!(host_and_port("ftp://files.example/"), None);
        assert_eq!(host_and_port("not a url"), None);
    }

    #[test]
    fn transition_leaves_unless_configured_to_stay() {
        let event = PortalEvent::Transition {
            label: "VIBEVERSE PORTAL".to_string(),
            url: "https://portal.example/?portal=true".to_string(),
        };
        assert_eq!(
            handle_portal_event(&event, false),
            Navigation::Leave("https://portal.example/?portal=true".to_string())
        );
        assert_eq!(handle_portal_event(&event, true), Navigation::Stay);
    }
}
