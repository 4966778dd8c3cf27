// ── Component keys and inventory ──
//
// A device's components are addressed as `"<kind>:<index>"`. Only the
// six typed kinds participate in the inventory; service keys such as
// `sys` or `wifi:sta` are discovered but skipped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The typed component kinds a device inventory can contain.
///
/// `thermostat` and `kvs` exist as operation surfaces but do not appear
/// in inventory keys, so they are not part of this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ComponentKind {
    Switch,
    Cover,
    Light,
    Rgb,
    Rgbw,
    Input,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 6] = [
        ComponentKind::Switch,
        ComponentKind::Cover,
        ComponentKind::Light,
        ComponentKind::Rgb,
        ComponentKind::Rgbw,
        ComponentKind::Input,
    ];
}

/// A parsed `"<kind>:<index>"` component key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentKey {
    pub kind: ComponentKind,
    pub index: u32,
}

impl ComponentKey {
    pub fn new(kind: ComponentKind, index: u32) -> Self {
        Self { kind, index }
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.index)
    }
}

/// Strict parser: known lowercase prefix, a colon, then decimal digits.
///
/// Everything else is rejected — including bare prefixes, missing
/// colons, signs, and whitespace. Service keys (`sys`, `wifi:sta`, ...)
/// fail here by design and are filtered out of inventories.
impl FromStr for ComponentKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, digits) = s.split_once(':').ok_or(KeyParseError)?;
        let kind = ComponentKind::from_str(prefix).map_err(|_| KeyParseError)?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(KeyParseError);
        }
        let index: u32 = digits.parse().map_err(|_| KeyParseError)?;

        Ok(Self { kind, index })
    }
}

/// Marker error for unparseable component keys.
///
/// Deliberately carries no payload: rejected keys are skipped silently,
/// never reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyParseError;

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a component key")
    }
}

impl std::error::Error for KeyParseError {}

// ── Inventory entries ───────────────────────────────────────────────

/// One raw entry from `Shelly.GetComponents`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawComponent {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

/// One parsed inventory entry. Preserves the raw key and any status or
/// config fragments the device included.
#[derive(Debug, Clone)]
pub struct ComponentEntry {
    pub key: ComponentKey,
    pub status: Option<Value>,
    pub config: Option<Value>,
}

/// Parse a raw component list into the typed inventory.
///
/// Unknown prefixes are skipped silently; the device's ordering is
/// preserved for the entries that remain.
pub fn parse_inventory(raw: Vec<RawComponent>) -> Vec<ComponentEntry> {
    raw.into_iter()
        .filter_map(|c| {
            let key = c.key.parse::<ComponentKey>().ok()?;
            Some(ComponentEntry {
                key,
                status: c.status,
                config: c.config,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_every_kind_and_index() {
        for kind in ComponentKind::ALL {
            for index in 0..=1000u32 {
                let literal = format!("{kind}:{index}");
                let parsed: ComponentKey = literal.parse().expect("valid key");
                assert_eq!(parsed.kind, kind);
                assert_eq!(parsed.index, index);
                assert_eq!(parsed.to_string(), literal);
            }
        }
    }

    #[test]
    fn rejects_everything_else() {
        let bad = [
            "sys",
            "wifi:sta",
            "switch",
            "switch:",
            ":0",
            "switch:-1",
            "switch:+1",
            "switch:1a",
            "switch:0x1",
            "Switch:0",
            "SWITCH:0",
            "relay:0",
            "roller:0",
            "thermostat:0",
            "kvs:0",
            " switch:0",
            "switch:0 ",
            "switch::0",
            "",
        ];
        for key in bad {
            assert!(
                key.parse::<ComponentKey>().is_err(),
                "expected rejection for {key:?}"
            );
        }
    }

    #[test]
    fn inventory_skips_service_keys_in_order() {
        let raw = ["switch:0", "switch:1", "input:0", "cover:0", "light:0", "sys", "wifi:sta"]
            .into_iter()
            .map(|k| RawComponent {
                key: k.to_owned(),
                status: None,
                config: None,
            })
            .collect();

        let parsed = parse_inventory(raw);
        assert_eq!(parsed.len(), 5);
        let keys: Vec<String> = parsed.iter().map(|e| e.key.to_string()).collect();
        assert_eq!(keys, ["switch:0", "switch:1", "input:0", "cover:0", "light:0"]);
    }
}
