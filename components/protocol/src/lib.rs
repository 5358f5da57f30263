//! Protobuf messages and the tonic client/server of the cluster client service.

include!(concat!(env!("OUT_DIR"), "/celeadmin.rs"));

pub use client_service_client::ClientServiceClient;
pub use client_service_server::{ClientService, ClientServiceServer};

/// The TCP port a cluster serves client RPCs on when an address does not name one.
pub const DEFAULT_PORT: u16 = 61023;
