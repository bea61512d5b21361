//! WiFi station startup adapter.
//!
//! Joins the configured access point at boot and starts SNTP so the
//! wall clock converges in the background.  Association details and the
//! sync protocol belong to ESP-IDF; this adapter only sequences them
//! and logs progress.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver + SNTP client.
//! - **all other targets**: no-op stub so host runs work offline.

#[cfg(target_os = "espidf")]
use anyhow::Context as _;
use log::info;

/// Keeps the WiFi driver and the SNTP client alive for the process
/// lifetime — dropping either would tear the connection down.
pub struct NetLink {
    #[cfg(target_os = "espidf")]
    _wifi: esp_idf_svc::wifi::EspWifi<'static>,
    #[cfg(target_os = "espidf")]
    _sntp: esp_idf_svc::sntp::EspSntp<'static>,
}

#[cfg(target_os = "espidf")]
pub fn join(ssid: &str, password: &str) -> anyhow::Result<NetLink> {
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{ClientConfiguration, Configuration, EspWifi};

    let peripherals = Peripherals::take().context("peripherals already taken")?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let mut wifi = EspWifi::new(peripherals.modem, sysloop, Some(nvs))?;

    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: ssid
            .try_into()
            .map_err(|()| anyhow::anyhow!("SSID longer than 32 bytes"))?,
        password: password
            .try_into()
            .map_err(|()| anyhow::anyhow!("password longer than 64 bytes"))?,
        ..Default::default()
    }))?;
    wifi.start()?;
    wifi.connect()?;

    // Bounded wait for the station interface to come up.
    let mut waited_secs = 0;
    while !wifi.is_up()? {
        info!("connecting to WiFi '{ssid}'...");
        std::thread::sleep(std::time::Duration::from_secs(1));
        waited_secs += 1;
        if waited_secs >= 10 {
            anyhow::bail!("WiFi join timed out after {waited_secs}s");
        }
    }
    let ip_info = wifi.sta_netif().get_ip_info()?;
    info!("WiFi connected, IP: {}", ip_info.ip);

    let sntp = esp_idf_svc::sntp::EspSntp::new_default()?;
    info!("SNTP client started; wall clock will sync in the background");

    Ok(NetLink {
        _wifi: wifi,
        _sntp: sntp,
    })
}

#[cfg(not(target_os = "espidf"))]
pub fn join(ssid: &str, _password: &str) -> anyhow::Result<NetLink> {
    info!("wifi(sim): skipping join to '{ssid}'");
    Ok(NetLink {})
}
