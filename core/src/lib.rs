//! Launch lifecycle of the prefab reader static file server.
//!
//! * [`phase`]: the `Idle → PortSelection → Bound → Serving → Shutdown` lifecycle.
//! * [`server`]: the static file HTTP server.
//! * [`launcher`]: ties port selection, binding and serving together behind [`launcher::LaunchUi`].

pub mod launcher;
pub mod phase;
pub mod server;
