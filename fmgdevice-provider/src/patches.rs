//! Built-in patch table
//!
//! Collects the patch rules declared next to each schema table into the table
//! the flattener consults on type mismatches.

use fmgdevice_core::PatchTable;

use crate::schemas;

/// Patch table covering every shipped resource type
pub fn builtin_patches() -> PatchTable {
    let mut table = PatchTable::new();
    for config in schemas::configs() {
        for (path, rule) in config.patches {
            table.insert(config.schema.resource_type.clone(), path, rule);
        }
    }
    table
}
