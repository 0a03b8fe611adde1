//! Static per-entity tables that drive interpretation, validation and
//! predicate generation. There is one [`EntityProfile`] per searchable entity
//! and all of them are built once and never change.

// other lookups use HashMap with a fast hasher since the keys are short strings
use core::hash::BuildHasherDefault;
use seahash::SeaHasher;
use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;

pub type OtherHasher = BuildHasherDefault<SeaHasher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Prefix,
    Pool,
    Vrf,
}

impl Entity {
    pub fn profile(&self) -> &'static EntityProfile {
        match self {
            Entity::Prefix => &PREFIX_PROFILE,
            Entity::Pool => &POOL_PROFILE,
            Entity::Vrf => &VRF_PROFILE,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Entity::Prefix => write!(f, "prefix"),
            Entity::Pool => write!(f, "pool"),
            Entity::Vrf => write!(f, "vrf"),
        }
    }
}

impl FromStr for Entity {
    type Err = SearchError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prefix" => Ok(Entity::Prefix),
            "pool" => Ok(Entity::Pool),
            "vrf" => Ok(Entity::Vrf),
            other => Err(SearchError::InvalidOption(format!("Unknown entity '{}'", other))),
        }
    }
}

/// Legal values of an attribute in `key<op>value` expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeValues {
    Any,
    OneOf(&'static [&'static str]),
}

impl AttributeValues {
    pub fn admits(&self, value: &str) -> bool {
        match self {
            AttributeValues::Any => true,
            AttributeValues::OneOf(values) => values.contains(&value),
        }
    }
}

pub type AttributeTable = HashMap<&'static str, AttributeValues, OtherHasher>;
pub type ColumnTable = HashMap<&'static str, &'static str, OtherHasher>;

#[derive(Debug)]
pub struct EntityProfile {
    pub entity: Entity,
    /// Attributes users may name in expressions.
    pub attributes: AttributeTable,
    /// Every key a filter leaf may carry, mapped to its SQL column.
    pub columns: ColumnTable,
    /// Columns searched by a bare word, in fold order.
    pub free_text: &'static [&'static str],
    pub free_text_label: &'static str,
    /// Columns searched by a routing identifier in legacy mode.
    pub legacy_routing_columns: &'static [&'static str],
    pub legacy_routing_label: &'static str,
    pub routing_column: &'static str,
    /// Tags set on a covering address block also apply to the blocks inside it.
    pub inherits_tags: bool,
}

impl EntityProfile {
    pub fn exposes_prefix(&self) -> bool {
        self.attributes.contains_key("prefix")
    }
    pub fn attribute(&self, key: &str) -> Option<&AttributeValues> {
        self.attributes.get(key)
    }
    pub fn column(&self, key: &str) -> Option<&'static str> {
        self.columns.get(key).copied()
    }
}

fn attributes(entries: &[(&'static str, AttributeValues)]) -> AttributeTable {
    entries.iter().copied().collect()
}

fn columns(entries: &[(&'static str, &'static str)]) -> ColumnTable {
    entries.iter().copied().collect()
}

use AttributeValues::{Any, OneOf};

// ------------- Prefix -------------
const ALARM_PRIORITIES: &[&str] = &["warning", "low", "medium", "high", "critical"];
const PREFIX_STATUSES: &[&str] = &["assigned", "reserved", "quarantine"];
const PREFIX_TYPES: &[&str] = &["assignment", "host", "reservation"];

lazy_static! {
    static ref PREFIX_PROFILE: EntityProfile = EntityProfile {
        entity: Entity::Prefix,
        attributes: attributes(&[
            ("added", Any),
            ("alarm_priority", OneOf(ALARM_PRIORITIES)),
            ("authoritative_source", Any),
            ("comment", Any),
            ("country", Any),
            ("customer_id", Any),
            ("description", Any),
            ("expires", Any),
            ("external_key", Any),
            ("family", Any),
            ("free_addresses", Any),
            ("indent", Any),
            ("last_modified", Any),
            ("monitor", Any),
            ("node", Any),
            ("order_id", Any),
            ("pool_id", Any),
            ("prefix", Any),
            ("prefix_length", Any),
            ("status", OneOf(PREFIX_STATUSES)),
            ("total_addresses", Any),
            ("type", OneOf(PREFIX_TYPES)),
            ("used_addresses", Any),
            ("vlan", Any),
            ("vrf_name", Any),
            ("vrf_rt", Any),
        ]),
        columns: columns(&[
            ("added", "inp.added"),
            ("alarm_priority", "inp.alarm_priority"),
            ("authoritative_source", "inp.authoritative_source"),
            ("avps", "inp.avps"),
            ("comment", "inp.comment"),
            ("country", "inp.country"),
            ("customer_id", "inp.customer_id"),
            ("description", "inp.description"),
            ("expires", "inp.expires"),
            ("external_key", "inp.external_key"),
            ("family", "family(inp.prefix)"),
            ("free_addresses", "inp.free_addresses"),
            ("id", "inp.id"),
            ("indent", "inp.indent"),
            ("inherited_tags", "inp.inherited_tags"),
            ("last_modified", "inp.last_modified"),
            ("monitor", "inp.monitor"),
            ("node", "inp.node"),
            ("order_id", "inp.order_id"),
            ("pool_id", "inp.pool_id"),
            ("prefix", "inp.prefix"),
            ("prefix_length", "masklen(inp.prefix)"),
            ("status", "inp.status"),
            ("tags", "inp.tags"),
            ("total_addresses", "inp.total_addresses"),
            ("type", "inp.type"),
            ("used_addresses", "inp.used_addresses"),
            ("vlan", "inp.vlan"),
            ("vrf_id", "inp.vrf_id"),
            ("vrf_name", "vrf.name"),
            ("vrf_rt", "vrf.rt"),
        ]),
        free_text: &["comment", "description", "node", "order_id", "customer_id"],
        free_text_label: "description or comment or node or order_id or customer_id",
        legacy_routing_columns: &["comment", "description", "node", "order_id", "customer_id", "vrf_rt"],
        legacy_routing_label: "description or comment or node or order_id or customer_id or vrf_rt",
        routing_column: "vrf_rt",
        inherits_tags: true,
    };
}

// ------------- Pool -------------
lazy_static! {
    static ref POOL_PROFILE: EntityProfile = EntityProfile {
        entity: Entity::Pool,
        attributes: attributes(&[
            ("default_type", Any),
            ("description", Any),
            ("free_addresses_v4", Any),
            ("free_addresses_v6", Any),
            ("free_prefixes_v4", Any),
            ("free_prefixes_v6", Any),
            ("ipv4_default_prefix_length", Any),
            ("ipv6_default_prefix_length", Any),
            ("member_prefixes_v4", Any),
            ("member_prefixes_v6", Any),
            ("name", Any),
            ("total_addresses_v4", Any),
            ("total_addresses_v6", Any),
            ("total_prefixes_v4", Any),
            ("total_prefixes_v6", Any),
            ("used_addresses_v4", Any),
            ("used_addresses_v6", Any),
            ("used_prefixes_v4", Any),
            ("used_prefixes_v6", Any),
            ("vrf_rt", Any),
        ]),
        columns: columns(&[
            ("avps", "po.avps"),
            ("default_type", "po.default_type"),
            ("description", "po.description"),
            ("free_addresses_v4", "free_addresses_v4"),
            ("free_addresses_v6", "free_addresses_v6"),
            ("free_prefixes_v4", "free_prefixes_v4"),
            ("free_prefixes_v6", "free_prefixes_v6"),
            ("id", "po.id"),
            ("ipv4_default_prefix_length", "po.ipv4_default_prefix_length"),
            ("ipv6_default_prefix_length", "po.ipv6_default_prefix_length"),
            ("member_prefixes_v4", "po.member_prefixes_v4"),
            ("member_prefixes_v6", "po.member_prefixes_v6"),
            ("name", "po.name"),
            ("tags", "po.tags"),
            ("total_addresses_v4", "total_addresses_v4"),
            ("total_addresses_v6", "total_addresses_v6"),
            ("total_prefixes_v4", "total_prefixes_v4"),
            ("total_prefixes_v6", "total_prefixes_v6"),
            ("used_addresses_v4", "used_addresses_v4"),
            ("used_addresses_v6", "used_addresses_v6"),
            ("used_prefixes_v4", "used_prefixes_v4"),
            ("used_prefixes_v6", "used_prefixes_v6"),
            ("vrf_rt", "vrf.rt"),
        ]),
        free_text: &["name", "description"],
        free_text_label: "name or description",
        legacy_routing_columns: &["name", "description"],
        legacy_routing_label: "name or description",
        routing_column: "vrf_rt",
        inherits_tags: false,
    };
}

// ------------- VRF -------------
lazy_static! {
    static ref VRF_PROFILE: EntityProfile = EntityProfile {
        entity: Entity::Vrf,
        attributes: attributes(&[
            ("description", Any),
            ("free_addresses_v4", Any),
            ("free_addresses_v6", Any),
            ("name", Any),
            ("num_prefixes_v4", Any),
            ("num_prefixes_v6", Any),
            ("rt", Any),
            ("total_addresses_v4", Any),
            ("total_addresses_v6", Any),
            ("used_addresses_v4", Any),
            ("used_addresses_v6", Any),
        ]),
        columns: columns(&[
            ("avps", "avps"),
            ("description", "description"),
            ("free_addresses_v4", "free_addresses_v4"),
            ("free_addresses_v6", "free_addresses_v6"),
            ("id", "id"),
            ("name", "name"),
            ("num_prefixes_v4", "num_prefixes_v4"),
            ("num_prefixes_v6", "num_prefixes_v6"),
            ("rt", "rt"),
            ("tags", "tags"),
            ("total_addresses_v4", "total_addresses_v4"),
            ("total_addresses_v6", "total_addresses_v6"),
            ("used_addresses_v4", "used_addresses_v4"),
            ("used_addresses_v6", "used_addresses_v6"),
        ]),
        free_text: &["name", "description", "rt"],
        free_text_label: "vrf or name or description",
        legacy_routing_columns: &["name", "description", "rt"],
        legacy_routing_label: "vrf or name or description",
        routing_column: "rt",
        inherits_tags: false,
    };
}
