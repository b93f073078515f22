//! Mapping primitives: key filtering, shallow merging, crew assignment and the
//! string coercions used by the normalizer.

use crate::entity::Entity;
use serde_json::{Number, Value};

/// Project `data` down to `filter_keys`.
///
/// Keys missing from `data` are skipped. The result follows the order of
/// `filter_keys`, not the input order.
pub fn filter_data(data: &Entity, filter_keys: &[&str]) -> Entity {
    filter_keys
        .iter()
        .filter_map(|key| data.get(*key).map(|value| (key.to_string(), value.clone())))
        .collect()
}

/// Shallow merge: a copy of `default_data` updated with every pair of
/// `override_data`. Nested objects are replaced, never merged.
pub fn combine_data(default_data: &Entity, override_data: &Entity) -> Entity {
    let mut combined = default_data.clone();
    for (key, value) in override_data {
        combined.insert(key.clone(), value.clone());
    }
    combined
}

/// Put crew members on a starship or vehicle. Each crew key is a role
/// (`pilot`, `copilot`, `astromech_droid`, ...) and becomes a key of the craft.
pub fn assign_crew(starship: &Entity, crew: &Entity) -> Entity {
    combine_data(starship, crew)
}

/// Build a crew mapping from `(role, person)` pairs.
pub fn crew<'a, I>(members: I) -> Entity
where
    I: IntoIterator<Item = (&'a str, Entity)>,
{
    members
        .into_iter()
        .map(|(role, person)| (role.to_string(), Value::Object(person)))
        .collect()
}

/// True for the SWAPI placeholders `unknown` and `n/a`, ignoring case and
/// surrounding whitespace.
pub fn is_unknown(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    value == "unknown" || value == "n/a"
}

/// Only the first space-delimited token is considered. On failure that token
/// comes back as a string, so `"10 BBY"` gives `10` and `"abc def"` gives `"abc"`.
pub fn convert_string_to_int(value: &str) -> Value {
    let token = first_token(value);
    match token.trim().parse::<i64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::String(token.to_string()),
    }
}

/// Float counterpart of [`convert_string_to_int`], with the same first-token rule.
pub fn convert_string_to_float(value: &str) -> Value {
    let token = first_token(value);
    token
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(token.to_string()))
}

pub fn convert_string_to_list(value: &str, delimiter: &str) -> Value {
    Value::Array(
        value
            .split(delimiter)
            .map(|item| Value::String(item.trim().to_string()))
            .collect(),
    )
}

fn first_token(value: &str) -> &str {
    value.split(' ').next().unwrap_or_default()
}
