//! system_standalonecluster schema definition
//!
//! Singleton per device. FortiManager path:
//! /pm/config/device/{device}/global/system/standalone-cluster

use fmgdevice_core::{FieldDescriptor, PatchRule, ResourceSchema};

use super::{FmgSchemaConfig, device_name};

fn session_sync_filter() -> FieldDescriptor {
    FieldDescriptor::block(
        "session_sync_filter",
        vec![
            FieldDescriptor::string("srcintf"),
            FieldDescriptor::string("dstintf"),
            FieldDescriptor::string("srcaddr"),
            FieldDescriptor::string("dstaddr"),
            FieldDescriptor::string("srcaddr6"),
            FieldDescriptor::string("dstaddr6"),
            FieldDescriptor::list(
                "custom_service",
                vec![
                    FieldDescriptor::int("fosid").with_wire_key("id"),
                    FieldDescriptor::string("src_port_range"),
                    FieldDescriptor::string("dst_port_range"),
                ],
            ),
        ],
    )
    .with_description("Add one or more filters if you only want to synchronize some sessions.")
}

pub fn config() -> FmgSchemaConfig {
    FmgSchemaConfig {
        schema: ResourceSchema::new("system_standalonecluster")
            .with_workspace()
            .with_description("Configure FortiGate Session Life Support Protocol (FGSP) cluster attributes.")
            .attribute(device_name())
            .attribute(FieldDescriptor::int("standalone_group_id"))
            .attribute(FieldDescriptor::int("group_member_id"))
            .attribute(FieldDescriptor::string("layer2_connection"))
            .attribute(FieldDescriptor::string_set("session_sync_dev"))
            .attribute(FieldDescriptor::string("encryption"))
            .attribute(FieldDescriptor::string_set("psksecret").sensitive())
            .attribute(FieldDescriptor::string("asymmetric_traffic_control"))
            .attribute(FieldDescriptor::string("helper_traffic_bounce"))
            .attribute(FieldDescriptor::string("utm_traffic_bounce"))
            .attribute(FieldDescriptor::list(
                "cluster_peer",
                vec![
                    FieldDescriptor::int("sync_id"),
                    FieldDescriptor::string("peervd"),
                    FieldDescriptor::string("peerip"),
                    FieldDescriptor::string_set("syncvd"),
                    FieldDescriptor::string_set("down_intfs_before_sess_sync"),
                    FieldDescriptor::int("hb_interval"),
                    FieldDescriptor::int("hb_lost_threshold"),
                    FieldDescriptor::string("ipsec_tunnel_sync"),
                    FieldDescriptor::string("secondary_add_ipsec_routes"),
                    session_sync_filter(),
                ],
            )),
        patches: vec![
            ("session_sync_dev", PatchRule::SplitWords),
            ("cluster_peer.peervd", PatchRule::FirstElement),
            ("cluster_peer.session_sync_filter.srcintf", PatchRule::FirstElement),
            ("cluster_peer.session_sync_filter.dstintf", PatchRule::FirstElement),
        ],
    }
}
