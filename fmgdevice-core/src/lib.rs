//! fmgdevice Core
//!
//! Schema-driven marshalling between FortiManager device configuration objects
//! (hyphenated wire keys, untyped JSON) and typed local resource state
//! (underscored field names).
//!
//! ## Module Structure
//!
//! - `schema` - Field descriptors and resource schema tables
//! - `naming` - Wire key <-> local name transform and schema naming checks
//! - `resource` - Local values and per-resource state
//! - `object` - Wire-side configuration objects
//! - `flatten` / `expand` - The two directions of the conversion
//! - `patch` - Side table of corrections for known API type mismatches
//! - `differ` - Change detection between prior and desired local state
//! - `api` - The remote device API seam

pub mod api;
pub mod differ;
pub mod expand;
pub mod flatten;
pub mod marshal;
pub mod naming;
pub mod object;
pub mod patch;
pub mod resource;
pub mod schema;

pub use api::{ApiError, ApiRequest, ApiResult, CallOptions, DeviceApi, PathParams};
pub use expand::{expand, expand_object};
pub use flatten::{Flattener, flatten};
pub use marshal::{FieldPath, MarshalError};
pub use object::ConfigObject;
pub use patch::{PatchRule, PatchTable};
pub use resource::{NotAnInteger, ResourceData, StateJsonError, Value};
pub use schema::{FieldDescriptor, FieldKind, Identity, ResourceSchema, ScalarType};
