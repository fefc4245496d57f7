//! ESP-IDF bindings for the station manager.
//!
//! [`EspStationProvider`] drives the ESP32 WiFi driver through the
//! [`NetworkProvider`] contract, and [`attach_system_events`] forwards the
//! system event loop's WiFi/IP notifications into the manager's typed
//! handlers. Compiled only with the `esp32` feature.

use super::config::{ApConfig, AuthMode};
use super::event::{AddressEvent, LinkEvent};
use super::manager::StationManager;
use super::provider::{NetworkProvider, ProviderError};
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::{EspSubscription, EspSystemEventLoop, System};
use esp_idf_svc::ipevent::IpEvent;
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi, WifiEvent};
use esp_idf_sys::{esp, nvs_flash_erase, nvs_flash_init, EspError};
use log::info;
use std::sync::Arc;

/// Initialize the default NVS partition, reformatting once if the partition
/// layout is stale or full.
pub fn init_nvs() -> Result<(), ProviderError> {
    info!("Initializing NVS");
    if let Err(e) = esp!(unsafe { nvs_flash_init() }) {
        if e.code() == esp_idf_sys::ESP_ERR_NVS_NO_FREE_PAGES as i32
            || e.code() == esp_idf_sys::ESP_ERR_NVS_NEW_VERSION_FOUND as i32
        {
            info!("NVS requires reformatting");
            esp!(unsafe { nvs_flash_erase() }).map_err(provider_err)?;
            esp!(unsafe { nvs_flash_init() }).map_err(provider_err)?;
        } else {
            return Err(provider_err(e));
        }
    }
    info!("NVS initialized");
    Ok(())
}

/// WiFi station provider backed by the ESP-IDF driver.
pub struct EspStationProvider {
    wifi: EspWifi<'static>,
}

impl EspStationProvider {
    /// Take the modem peripheral and create the WiFi driver.
    pub fn new(modem: Modem, sysloop: EspSystemEventLoop) -> Result<Self, ProviderError> {
        let wifi = EspWifi::new(modem, sysloop, None).map_err(provider_err)?;
        Ok(Self { wifi })
    }
}

impl NetworkProvider for EspStationProvider {
    fn initialize(&mut self) -> Result<(), ProviderError> {
        // Driver and netif are created in the constructor; selecting a client
        // configuration puts the driver into station mode.
        self.wifi
            .set_configuration(&Configuration::Client(ClientConfiguration::default()))
            .map_err(provider_err)
    }

    fn configure(&mut self, config: &ApConfig) -> Result<(), ProviderError> {
        let client = ClientConfiguration {
            ssid: config
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| ProviderError::new("SSID rejected by driver"))?,
            password: config
                .passphrase
                .as_str()
                .try_into()
                .map_err(|_| ProviderError::new("passphrase rejected by driver"))?,
            auth_method: auth_method(config.auth_mode),
            ..Default::default()
        };
        self.wifi
            .set_configuration(&Configuration::Client(client))
            .map_err(provider_err)
    }

    fn start(&mut self) -> Result<(), ProviderError> {
        self.wifi.start().map_err(provider_err)
    }

    fn connect(&mut self) -> Result<(), ProviderError> {
        self.wifi.connect().map_err(provider_err)
    }

    fn disconnect(&mut self) -> Result<(), ProviderError> {
        self.wifi.disconnect().map_err(provider_err)
    }

    fn stop(&mut self) -> Result<(), ProviderError> {
        self.wifi.stop().map_err(provider_err)
    }

    fn shutdown(&mut self) -> Result<(), ProviderError> {
        // Best-effort: keep going past a failed stop, surface the first error.
        let mut first_err = None;
        if let Err(e) = self.wifi.stop() {
            first_err = Some(provider_err(e));
        }
        // Subscriptions and netif are released when their owners drop.
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Forward system event loop WiFi/IP events into the station manager.
///
/// The returned subscriptions must be kept alive for as long as events should
/// flow; dropping them unregisters the handlers.
pub fn attach_system_events<P>(
    sysloop: &EspSystemEventLoop,
    station: Arc<StationManager<P>>,
) -> Result<
    (
        EspSubscription<'static, System>,
        EspSubscription<'static, System>,
    ),
    EspError,
>
where
    P: NetworkProvider + 'static,
{
    let link_station = station.clone();
    let link_sub = sysloop.subscribe::<WifiEvent, _>(move |event| {
        if let Some(link) = map_wifi_event(&event) {
            link_station.handle_link_event(link);
        }
    })?;

    let ip_sub = sysloop.subscribe::<IpEvent, _>(move |event| {
        if let Some(address) = map_ip_event(&event) {
            station.handle_address_event(address);
        }
    })?;

    Ok((link_sub, ip_sub))
}

fn map_wifi_event(event: &WifiEvent) -> Option<LinkEvent> {
    match event {
        WifiEvent::Ready => Some(LinkEvent::Ready),
        WifiEvent::ScanDone(_) => Some(LinkEvent::ScanDone),
        WifiEvent::StaStarted => Some(LinkEvent::Started),
        WifiEvent::StaStopped => Some(LinkEvent::Stopped),
        WifiEvent::StaConnected(_) => Some(LinkEvent::Connected),
        WifiEvent::StaDisconnected(_) => Some(LinkEvent::Disconnected),
        WifiEvent::StaAuthmodeChanged(_) => Some(LinkEvent::AuthModeChanged),
        WifiEvent::HomeChannelChanged(_) => Some(LinkEvent::ChannelChanged),
        WifiEvent::StaBeaconTimeout => Some(LinkEvent::BeaconTimeout),
        _ => None,
    }
}

fn map_ip_event(event: &IpEvent) -> Option<AddressEvent> {
    match event {
        IpEvent::DhcpIpAssigned(assignment) => Some(AddressEvent::Acquired(assignment.ip())),
        IpEvent::DhcpIpDeassigned(_) => Some(AddressEvent::Lost),
        _ => None,
    }
}

fn auth_method(mode: AuthMode) -> AuthMethod {
    match mode {
        AuthMode::Open => AuthMethod::None,
        AuthMode::WpaPsk => AuthMethod::WPA,
        AuthMode::Wpa2Psk => AuthMethod::WPA2Personal,
        AuthMode::Wpa3Psk => AuthMethod::WPA3Personal,
    }
}

fn provider_err(e: EspError) -> ProviderError {
    ProviderError::new(format!("{:?}", e))
}
