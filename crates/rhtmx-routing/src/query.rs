// File: src/query.rs
// Purpose: Query-string encoding and decoding with bracket notation

use crate::value::Value;
use std::collections::BTreeMap;

/// Reserved characters that are legal inside a query component and are kept
/// readable after percent-encoding
const QUERY_DECODED: [(&str, &str); 8] = [
    ("%2F", "/"),
    ("%3F", "?"),
    ("%3A", ":"),
    ("%40", "@"),
    ("%21", "!"),
    ("%3B", ";"),
    ("%2C", ","),
    ("%2A", "*"),
];

/// Encode a parameter map as a query string
///
/// Nested maps and lists use bracket notation, `Null` values are skipped and
/// keys appear in map order.
///
/// # Examples
///
/// ```
/// use rhtmx_routing::{build_query, Value};
/// use std::collections::BTreeMap;
///
/// let mut filters = BTreeMap::new();
/// filters.insert("status".to_string(), Value::from("published"));
///
/// let mut params = BTreeMap::new();
/// params.insert("page".to_string(), Value::from(2));
/// params.insert("filters".to_string(), Value::Map(filters));
///
/// assert_eq!(build_query(&params), "filters%5Bstatus%5D=published&page=2");
/// ```
pub fn build_query(params: &BTreeMap<String, Value>) -> String {
    let mut pairs = Vec::new();
    for (key, value) in params {
        push_pairs(key.clone(), value, &mut pairs);
    }

    restore_reserved(&pairs.join("&"))
}

fn push_pairs(prefix: String, value: &Value, pairs: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::List(items) => {
            for (index, item) in items.iter().enumerate() {
                push_pairs(format!("{}[{}]", prefix, index), item, pairs);
            }
        }
        Value::Map(map) => {
            for (key, item) in map {
                push_pairs(format!("{}[{}]", prefix, key), item, pairs);
            }
        }
        scalar => {
            let rendered = scalar.to_query_string().unwrap_or_default();
            pairs.push(format!(
                "{}={}",
                urlencoding::encode(&prefix),
                urlencoding::encode(&rendered)
            ));
        }
    }
}

fn restore_reserved(encoded: &str) -> String {
    QUERY_DECODED
        .iter()
        .fold(encoded.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Decode a raw query string into a parameter map
///
/// A leading `?` is ignored, `+` decodes to a space and bracket keys rebuild
/// nested maps (`a[b]=c`) or lists (`a[]=c`). Every leaf is a string.
///
/// # Examples
///
/// ```
/// use rhtmx_routing::{parse_query, Value};
///
/// let params = parse_query("?crudAction=index&filters[status]=draft");
/// assert_eq!(params.get("crudAction"), Some(&Value::from("index")));
///
/// let filters = params.get("filters").and_then(Value::as_map).unwrap();
/// assert_eq!(filters.get("status"), Some(&Value::from("draft")));
/// ```
pub fn parse_query(raw: &str) -> BTreeMap<String, Value> {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    let mut params = BTreeMap::new();

    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key);
        let value = decode_component(value);

        let (base, segments) = split_key(&key);
        if base.is_empty() {
            continue;
        }
        insert_nested(&mut params, base, &segments, value);
    }

    params
}

fn decode_component(component: &str) -> String {
    let spaced = component.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(spaced)
}

/// Split `filters[status][op]` into `("filters", ["status", "op"])`
///
/// Keys with unbalanced brackets are kept whole.
fn split_key(key: &str) -> (&str, Vec<&str>) {
    let Some(open) = key.find('[') else {
        return (key, Vec::new());
    };
    if open == 0 {
        return (key, Vec::new());
    }

    let (base, mut rest) = key.split_at(open);
    let mut segments = Vec::new();
    while let Some(stripped) = rest.strip_prefix('[') {
        match stripped.find(']') {
            Some(close) => {
                segments.push(&stripped[..close]);
                rest = &stripped[close + 1..];
            }
            None => return (key, Vec::new()),
        }
    }

    if rest.is_empty() {
        (base, segments)
    } else {
        (key, Vec::new())
    }
}

fn insert_nested(map: &mut BTreeMap<String, Value>, key: &str, segments: &[&str], value: String) {
    match segments.split_first() {
        None => {
            map.insert(key.to_string(), Value::String(value));
        }
        Some((segment, rest)) => {
            let slot = map.entry(key.to_string()).or_insert(Value::Null);
            insert_into(slot, segment, rest, value);
        }
    }
}

fn insert_into(slot: &mut Value, segment: &str, rest: &[&str], value: String) {
    if segment.is_empty() {
        if !matches!(slot, Value::List(_) | Value::Map(_)) {
            *slot = Value::List(Vec::new());
        }
        match slot {
            Value::List(items) => {
                if rest.is_empty() {
                    items.push(Value::String(value));
                } else {
                    let mut nested = BTreeMap::new();
                    insert_nested(&mut nested, rest[0], &rest[1..], value);
                    items.push(Value::Map(nested));
                }
            }
            Value::Map(map) => {
                let index = map.len().to_string();
                insert_nested(map, &index, rest, value);
            }
            _ => {}
        }
        return;
    }

    if !matches!(slot, Value::Map(_)) {
        let converted = match std::mem::take(slot) {
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item))
                .collect(),
            _ => BTreeMap::new(),
        };
        *slot = Value::Map(converted);
    }

    if let Value::Map(map) = slot {
        insert_nested(map, segment, rest, value);
    }
}
