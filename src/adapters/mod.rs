//! Adapters: concrete implementations of the application's port traits.
//!
//! | Adapter     | Implements         | Connects to                    |
//! |-------------|--------------------|--------------------------------|
//! | `bridge`    | EventSink          | Home-automation bridge (JSON)  |
//! | `device_id` |                    | eFuse MAC, hostname            |
//! | `log_sink`  | EventSink          | Serial log output              |
//! | `nvs`       | PinPort            | NVS / in-memory store          |
//! |             | ConfigPort         |                                |
//! |             | StoragePort        |                                |
//! | `time`      |                    | ESP32 system timer             |
//! | `wifi`      | ConnectivityPort   | ESP-IDF Wi-Fi STA              |

pub mod bridge;
pub mod device_id;
pub mod log_sink;
pub mod nvs;
pub mod time;
pub mod wifi;
