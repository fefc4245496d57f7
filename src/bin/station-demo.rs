//! Host demo: simulated access point, station state machine, inbound server.
//!
//! Walks the full startup sequence on the host: initialize the station against
//! a simulated provider, configure the target network, connect, block until
//! connected, then serve a hello page until the demo tears down.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin station-demo
//! ```

use log::{error, info};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use stationlink::server::{InboundServer, Routes, DEFAULT_HTTP_PORT};
use stationlink::station::{AddressEvent, SimulatedProvider};
use stationlink::{ApConfig, AuthMode, LinkEvent, StationManager, StateMask};

const INDEX_HTML: &str = "<!DOCTYPE html>\n\
    <html>\n\
    <head><title>Hello World</title></head>\n\
    <body><h1>Hello World!</h1></body>\n\
    </html>\n";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("=== Station demo starting ===");

    let provider = SimulatedProvider::new();
    let station = match StationManager::init(provider, 5) {
        Ok(station) => Arc::new(station),
        Err(e) => {
            error!("Station initialization failed: {}", e);
            std::process::exit(1);
        }
    };

    let config = match ApConfig::new("DemoNetwork", AuthMode::Wpa2Psk, "demo-passphrase", 5) {
        Ok(config) => config,
        Err(e) => {
            error!("Bad access point configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = station.configure(&config) {
        error!("Configuration rejected: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = station.connect() {
        error!("Failed to start station: {}", e);
        std::process::exit(1);
    }

    // Stand in for the platform event loop: a background thread playing the
    // access point side of a successful association.
    let events = station.clone();
    let access_point = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        events.handle_link_event(LinkEvent::Started);
        thread::sleep(Duration::from_millis(50));
        events.handle_link_event(LinkEvent::Connected);
        thread::sleep(Duration::from_millis(50));
        events.handle_address_event(AddressEvent::Acquired(Ipv4Addr::new(192, 168, 4, 2)));
    });

    let outcome = station.wait_until(
        StateMask::CONNECTED | StateMask::DISCONNECTED,
        Duration::from_secs(5),
    );
    access_point.join().expect("event thread panicked");

    match outcome {
        Some(state) if StateMask::CONNECTED.matches(state) => {
            info!("Connected, IP: {:?}", station.ip());
        }
        other => {
            error!("Station never connected (observed: {:?})", other);
            std::process::exit(1);
        }
    }

    let mut routes = Routes::new();
    routes.insert("/".to_string(), INDEX_HTML.to_string());
    let mut server = match InboundServer::start(None, DEFAULT_HTTP_PORT, routes) {
        Ok(server) => {
            info!("Serving http://localhost:{}/", DEFAULT_HTTP_PORT);
            server
        }
        Err(e) => {
            error!("Failed to start inbound server: {}", e);
            std::process::exit(1);
        }
    };

    thread::sleep(Duration::from_secs(2));

    info!("Tearing down");
    if let Err(e) = station.disconnect() {
        error!("Disconnect failed: {}", e);
    }
    station.handle_link_event(LinkEvent::Disconnected);
    server.stop();
    if let Err(e) = station.shutdown() {
        error!("Shutdown incomplete: {}", e);
    }
    info!("=== Station demo finished ===");
}
