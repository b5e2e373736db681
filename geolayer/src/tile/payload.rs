//! Serialised tile payload, shared with the relay protocol and the relay's
//! server-side file cache.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::style::PathStyle;

/// One serialised path: style properties and the path command string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEntry {
    /// Style properties.
    pub s: PathStyle,
    /// SVG-style path commands.
    pub d: String,
}

/// Cache payload of a tile: draw order → serialised paths.
///
/// Keys are the stringified draw orders, exactly as they appear as JSON
/// object keys on the wire and in the relay's tile files. (String keys also
/// survive the tagged-message deserialisation path, which integer map keys
/// would not.)
pub type TilePayload = BTreeMap<String, Vec<PathEntry>>;
