//! Resolution of the declarative patterns a job uses to select the remotes,
//! SRs, pools and VMs it targets.
//!
//! A pattern is a JSON object mapping a property to a matcher, e.g.
//! `{ "id": { "__or": ["a", "b"] } }`. Only id based patterns can be turned
//! into a concrete list of ids; everything else is a resolution failure.

use anyhow::{Result, anyhow, bail};
use serde_json::{Map, Value};
use tracing::debug;

const OR: &str = "__or";
const AND: &str = "__and";
const NOT: &str = "__not";
const ID: &str = "id";

/// Resolves an id pattern into the ids it matches.
pub fn destruct_pattern(pattern: &Value) -> Result<Vec<String>> {
    let object = pattern
        .as_object()
        .ok_or_else(|| anyhow!("pattern is not an object"))?;

    if object.contains_key(NOT) {
        bail!("negated patterns cannot be resolved into ids");
    }

    match object.get(ID) {
        Some(Value::String(id)) => Ok(vec![id.to_owned()]),
        Some(Value::Object(matcher)) => {
            let values = matcher
                .get(OR)
                .and_then(|v| v.as_array())
                .ok_or_else(|| anyhow!("id matcher is not an __or list"))?;
            values
                .iter()
                .map(|v| {
                    v.as_str()
                        .map(|s| s.to_owned())
                        .ok_or_else(|| anyhow!("id matcher contains a non string value"))
                })
                .collect()
        }
        Some(_) => bail!("unsupported id matcher"),
        None => bail!("pattern has no id matcher"),
    }
}

/// Same as [`destruct_pattern`] but any failure, including a missing
/// pattern, is an empty list.
pub fn resolve_ids(pattern: Option<&Value>) -> Vec<String> {
    let Some(pattern) = pattern else {
        return vec![];
    };
    destruct_pattern(pattern).unwrap_or_else(|e| {
        debug!("unable to resolve pattern {pattern}: {e}");
        vec![]
    })
}

fn is_plain(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '$' | '/' | '@'))
}

fn quoted(text: &str) -> String {
    if is_plain(text) {
        text.to_owned()
    } else {
        format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

fn matcher_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(quoted(s)),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(values) => {
            let values = values.iter().filter_map(matcher_string).collect::<Vec<_>>();
            Some(format!("({})", values.join(" ")))
        }
        Value::Object(object) => object_matcher_string(object),
        Value::Null => None,
    }
}

fn object_matcher_string(object: &Map<String, Value>) -> Option<String> {
    if let Some(inner) = object.get(NOT) {
        return matcher_string(inner).map(|s| format!("!{s}"));
    }
    if let Some(Value::Array(values)) = object.get(OR) {
        return matcher_string(&Value::Array(values.clone())).map(|s| format!("|{s}"));
    }
    if let Some(Value::Array(values)) = object.get(AND) {
        return matcher_string(&Value::Array(values.clone())).map(|s| format!("&{s}"));
    }
    None
}

fn property_string(key: &str, value: &Value) -> Option<String> {
    if let Value::Object(object) = value {
        if let Some(inner) = object.get(NOT) {
            return property_string(key, inner).map(|s| format!("!{s}"));
        }
    }
    matcher_string(value).map(|m| format!("{}:{m}", quoted(key)))
}

/// Builds the search string of the VM list that selects the same objects as
/// `pattern`, e.g. `id:|(a b) power_state:Running`.
pub fn construct_query_string(pattern: Option<&Value>) -> String {
    let Some(Value::Object(object)) = pattern else {
        return String::new();
    };

    if let Some(inner) = object.get(NOT) {
        let inner = construct_query_string(Some(inner));
        return if inner.is_empty() {
            inner
        } else {
            format!("!({inner})")
        };
    }

    let mut entries = object.iter().collect::<Vec<_>>();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
        .into_iter()
        .filter_map(|(key, value)| property_string(key, value))
        .collect::<Vec<_>>()
        .join(" ")
}
