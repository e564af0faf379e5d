//! FortiManager device provider
//!
//! CRUD orchestration over the schema-driven marshalling engine in
//! `fmgdevice-core`.
//!
//! ## Module Structure
//!
//! - `config` - Provider settings and environment overrides
//! - `params` - Path parameter resolution
//! - `provider` - FmgDeviceProvider, the CRUD orchestrator
//! - `schemas` - Shipped resource schema tables
//! - `patches` - Built-in patch table for known wire-shape mismatches
//! - `memory` - In-memory DeviceApi implementation

pub mod config;
pub mod error;
pub mod memory;
pub mod params;
pub mod patches;
pub mod provider;
pub mod schemas;

// Re-export main types
pub use config::{ConfigError, ProviderConfig};
pub use error::{Operation, ProviderError, ProviderResult};
pub use memory::InMemoryDeviceApi;
pub use params::{Resolution, resolve_path_params};
pub use patches::builtin_patches;
pub use provider::{FmgDeviceProvider, singleton_id};
pub use schemas::{all_schemas, get_schema};
