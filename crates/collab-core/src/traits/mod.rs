//! Ports to the external collaborators

mod ports;

pub use ports::{ApiResult, PushTransport, RemoteApi};
