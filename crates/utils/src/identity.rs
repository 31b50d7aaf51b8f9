//! Stable identity key for a provider userinfo document.

use serde_json::Value;

/// Profile fields consulted for the stats key, in priority order.
const IDENTITY_FIELDS: [&str; 4] = ["id", "sub", "user_id", "battletag"];

/// Resolves the key under which a user's stats are stored.
///
/// The first present string or number field wins; numbers are stringified
/// so a numeric `id` and its string form map to the same key. A profile
/// carrying none of the known fields falls back to its compact JSON
/// rendering, which is ugly but stable for identical documents.
pub fn derive_user_id(profile: &Value) -> String {
    for field in IDENTITY_FIELDS {
        match profile.get(field) {
            Some(Value::String(s)) if !s.is_empty() => return s.clone(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    profile.to_string()
}
