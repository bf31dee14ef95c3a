//! Alarm Keypad Firmware: Main Entry Point
//!
//! Hexagonal architecture with a single polling control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  MatrixKeypad   DisplayModel   StatusLeds   Backlight  Buzzer  │
//! │  (input)        (EventSink)    (EventSink)  (EventSink)        │
//! │  NvsAdapter     WifiAdapter    BridgeAdapter  LogEventSink     │
//! │  (Pin+Config)   (Connectivity) (EventSink)    (EventSink)      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  KeyBuffer · PinGate · dispatch · AlarmMachine         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  EspHttpServer: status page + bridge endpoints                 │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use log::{error, info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyIOPin, IOPin, Input, Output, PinDriver, Pull};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::spi::{SpiDeviceDriver, SpiDriver, SpiDriverConfig, config::Config as SpiConfig};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::http::Method;
use esp_idf_svc::http::server::{Configuration as HttpConfig, EspHttpServer};
use esp_idf_svc::io::{Read, Write};

use alarmkeypad::adapters::bridge::{BridgeAdapter, BridgeError, Inbound};
use alarmkeypad::adapters::device_id;
use alarmkeypad::adapters::log_sink::LogEventSink;
use alarmkeypad::adapters::nvs::NvsAdapter;
use alarmkeypad::adapters::time::MonotonicClock;
use alarmkeypad::adapters::wifi::{ConnectivityPort, EspWifiLink, RetryPolicy, WifiAdapter, WifiState};
use alarmkeypad::app::commands::AppCommand;
use alarmkeypad::app::events::AppEvent;
use alarmkeypad::app::ports::{ConfigPort, EventSink, PinPort, DEFAULT_PIN};
use alarmkeypad::app::service::AppService;
use alarmkeypad::config::KeypadConfig;
use alarmkeypad::diagnostics::{self, RuntimeMetrics};
use alarmkeypad::drivers::backlight::Backlight;
use alarmkeypad::drivers::buzzer::Buzzer;
use alarmkeypad::drivers::display::{DisplayModel, TextPanel};
use alarmkeypad::drivers::hw_init;
use alarmkeypad::drivers::keypad::MatrixKeypad;
use alarmkeypad::drivers::pcd8544::Pcd8544;
use alarmkeypad::drivers::status_leds::StatusLeds;
use alarmkeypad::error::Error;
use alarmkeypad::pins;

/// Largest bridge request body accepted.
const MAX_BRIDGE_BODY: usize = 256;

type SharedBridge = Arc<Mutex<BridgeAdapter>>;

fn lock(bridge: &SharedBridge) -> MutexGuard<'_, BridgeAdapter> {
    bridge.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Output fan-out ────────────────────────────────────────────

/// Every driven adapter the core talks to, in emission order.
struct Outputs {
    log: LogEventSink,
    buzzer: Buzzer,
    display: DisplayModel,
    leds: StatusLeds,
    backlight: Backlight,
    bridge: SharedBridge,
    restart_requested: bool,
    info_requested: bool,
}

impl EventSink for Outputs {
    fn emit(&mut self, event: &AppEvent) {
        self.log.emit(event);
        self.buzzer.emit(event);
        self.display.emit(event);
        self.leds.emit(event);
        self.backlight.emit(event);
        lock(&self.bridge).emit(event);
        match event {
            AppEvent::RestartRequested => self.restart_requested = true,
            AppEvent::InfoRequested => self.info_requested = true,
            _ => {}
        }
    }
}

// ── HTTP surface ──────────────────────────────────────────────

fn start_http(port: u16, bridge: &SharedBridge) -> Result<EspHttpServer<'static>> {
    let mut server = EspHttpServer::new(&HttpConfig {
        http_port: port,
        ..Default::default()
    })?;

    server.fn_handler("/", Method::Get, |req| -> Result<()> {
        let page = diagnostics::status_page(MonotonicClock::new().now_ms());
        req.into_ok_response()?.write_all(page.as_bytes())?;
        Ok(())
    })?;

    let inbox = bridge.clone();
    server.fn_handler("/bridge", Method::Post, move |mut req| -> Result<()> {
        let mut body = [0u8; MAX_BRIDGE_BODY];
        let mut len = 0;
        while len < body.len() {
            let n = req.read(&mut body[len..])?;
            if n == 0 {
                break;
            }
            len += n;
        }
        let outcome = core::str::from_utf8(&body[..len])
            .map_err(|_| BridgeError::Malformed)
            .and_then(|json| lock(&inbox).receive(json));
        let (status, text) = match outcome {
            Ok(()) => (202, "queued"),
            Err(BridgeError::Malformed) => (400, "malformed"),
            Err(BridgeError::InboxFull) => (503, "busy"),
        };
        req.into_status_response(status)?.write_all(text.as_bytes())?;
        Ok(())
    })?;

    let outbox = bridge.clone();
    server.fn_handler("/bridge", Method::Get, move |req| -> Result<()> {
        let lines = lock(&outbox).drain_outbox().join("\n");
        req.into_ok_response()?.write_all(lines.as_bytes())?;
        Ok(())
    })?;

    info!("HTTP server started on port {}", port);
    Ok(server)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Alarm keypad v{} ({} {})", env!("CARGO_PKG_VERSION"), diagnostics::BUILD_DATE, diagnostics::BUILD_TIME);

    let clock = MonotonicClock::new();
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;

    hw_init::init_peripherals().map_err(Error::from)?;

    // ── 2. Persistent config and PIN ──────────────────────────
    let mut nvs = NvsAdapter::new().map_err(Error::from)?;
    let config = match nvs.load() {
        Ok(cfg) => {
            info!("Config loaded from NVS");
            cfg
        }
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            KeypadConfig::default()
        }
    };
    let pin = nvs.load_pin().unwrap_or_else(|e| {
        warn!("PIN load failed ({}), using default", e);
        DEFAULT_PIN.to_owned()
    });

    // ── 3. Display ────────────────────────────────────────────
    let p = peripherals.pins;
    let spi = SpiDriver::new(
        peripherals.spi2,
        p.gpio18,
        p.gpio23,
        None::<AnyIOPin>,
        &SpiDriverConfig::new(),
    )?;
    let lcd_dev = SpiDeviceDriver::new(
        spi,
        Some(p.gpio17),
        &SpiConfig::new().baudrate(Hertz(pins::LCD_SPI_FREQ_HZ)),
    )?;
    let mut lcd = Pcd8544::new(lcd_dev, PinDriver::output(p.gpio2)?, PinDriver::output(p.gpio16)?);
    lcd.init(&mut FreeRtos, config.display_contrast)?;

    let bridge: SharedBridge = Arc::new(Mutex::new(BridgeAdapter::new()));
    let mut out = Outputs {
        log: LogEventSink::new(),
        buzzer: Buzzer::new(),
        display: DisplayModel::new(config.info_screen_ms),
        leds: StatusLeds::new(config.led_flash_interval_ms, config.led_brightness),
        backlight: Backlight::new(config.backlight_timeout_ms, config.backlight_brightness),
        bridge: bridge.clone(),
        restart_requested: false,
        info_requested: false,
    };
    out.backlight.begin(clock.now_ms());
    lcd.show(&out.display.frame())?;

    // ── 4. Keypad matrix ──────────────────────────────────────
    let rows: [PinDriver<'static, AnyIOPin, Output>; 4] = [
        PinDriver::output(p.gpio13.downgrade())?,
        PinDriver::output(p.gpio12.downgrade())?,
        PinDriver::output(p.gpio14.downgrade())?,
        PinDriver::output(p.gpio27.downgrade())?,
    ];
    let mut cols: [PinDriver<'static, AnyIOPin, Input>; 3] = [
        PinDriver::input(p.gpio26.downgrade())?,
        PinDriver::input(p.gpio25.downgrade())?,
        PinDriver::input(p.gpio33.downgrade())?,
    ];
    for col in &mut cols {
        col.set_pull(Pull::Up)?;
    }
    let mut keypad = MatrixKeypad::new(rows, cols)?;

    // ── 5. Wi-Fi (bounded) ────────────────────────────────────
    let mac = device_id::read_mac();
    let host = device_id::hostname(&config.device_name_prefix, &mac);
    let mut wifi = WifiAdapter::new(
        EspWifiLink::new(peripherals.modem, sysloop, None)?,
        RetryPolicy::from_config(&config),
    );
    let ssid = option_env!("WIFI_SSID").unwrap_or("");
    let password = option_env!("WIFI_PASSWORD").unwrap_or("");
    match wifi
        .set_credentials(ssid, password, &host)
        .and_then(|()| wifi.connect(clock.now_ms()))
    {
        Ok(()) => loop {
            match wifi.poll(clock.now_ms()) {
                WifiState::Connecting { attempt } => {
                    out.display.set_connecting(attempt);
                    if out.display.take_dirty() {
                        lcd.show(&out.display.frame())?;
                    }
                }
                WifiState::Connected => break,
                WifiState::Failed | WifiState::Disconnected => {
                    warn!("WiFi: continuing offline");
                    break;
                }
            }
            FreeRtos::delay_ms(config.loop_interval_ms);
        },
        Err(e) => warn!("WiFi: not started ({}), continuing offline", e),
    }
    out.display.set_ip(wifi.ip_address());

    let _server = match start_http(config.http_port, &bridge) {
        Ok(server) => Some(server),
        Err(e) => {
            error!("HTTP server failed to start: {:?}", e);
            None
        }
    };

    // ── 6. Application core ───────────────────────────────────
    let mut app = AppService::new(pin);
    app.start(&mut out);
    info!("System ready ({}). Entering control loop.", host);

    // ── 7. Control loop ───────────────────────────────────────
    loop {
        let now = clock.now_ms();
        out.display.tick(now);
        out.leds.tick(now);
        out.backlight.update(now);

        match keypad.poll(now) {
            Ok(Some(key)) => app.handle_command(AppCommand::Key(key), &mut nvs, &mut out),
            Ok(None) => {}
            Err(e) => warn!("Keypad scan failed: {}", e),
        }

        loop {
            let next = lock(&bridge).next_inbound();
            let Some(msg) = next else { break };
            match msg {
                Inbound::GetAlarmState => lock(&bridge).answer_state(app.query()),
                other => {
                    if let Some(cmd) = other.into_command() {
                        app.handle_command(cmd, &mut nvs, &mut out);
                    }
                }
            }
        }

        if core::mem::take(&mut out.info_requested) {
            let metrics = RuntimeMetrics::collect(
                now / 1_000,
                wifi.rssi(),
                app.commands_accepted(),
                app.commands_rejected(),
            );
            info!("INFO | {}", metrics);
        }

        if out.display.take_dirty() {
            if let Err(e) = lcd.show(&out.display.frame()) {
                warn!("Display refresh failed: {}", e);
            }
        }

        if out.restart_requested {
            hw_init::restart();
        }

        let state = wifi.poll(now);
        if state == WifiState::Connected {
            out.display.set_ip(wifi.ip_address());
        }

        FreeRtos::delay_ms(config.loop_interval_ms);
    }
}
