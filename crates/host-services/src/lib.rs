//! Host services for the Miniboard runtime
//!
//! Concrete implementations of the capability traits declared in
//! `node_engine::host`, plus [`HostConfig`] to assemble them into a
//! [`HostServices`](node_engine::HostServices) bundle.

pub mod config;
pub mod constants;
pub mod device;
pub mod http;
pub mod kv;

pub use config::{HostConfig, ProxyConfig};
pub use device::{LogNotifier, MemoryClipboard, StaticGeolocation, SysfsBattery};
pub use http::{check_url, extract_json_path, HttpChatService, ReqwestProxy};
pub use kv::JsonFileStore;
