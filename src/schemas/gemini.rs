//! Conversion of a schemars document into Gemini's `responseSchema` subset.
//!
//! Gemini accepts an OpenAPI 3.0 flavoured object with upper-case type names,
//! `nullable` instead of `["T", "null"]` unions and no `$ref`/`$schema`/`title`
//! keys. The input is expected to be generated with inlined subschemas.

use serde_json::{Map, Value};

const KEPT_KEYS: &[&str] = &[
    "description",
    "nullable",
    "enum",
    "required",
    "minItems",
    "maxItems",
    "minimum",
    "maximum",
];

const KEPT_FORMATS: &[&str] = &["float", "double", "int32", "int64", "date-time", "enum"];

/// Rewrite a JSON schema value into the form Gemini accepts.
pub fn to_response_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(object) => Value::Object(convert_object(object)),
        other => other.clone(),
    }
}

fn convert_object(source: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = source.clone();

    // schemars wraps some inlined subschemas as a single-element allOf
    if let Some(Value::Array(all_of)) = merged.remove("allOf") {
        if let [Value::Object(inner)] = all_of.as_slice() {
            for (key, value) in inner {
                merged.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
    }

    let mut target = Map::new();

    match merged.get("type") {
        Some(Value::String(kind)) => {
            target.insert("type".to_string(), Value::String(kind.to_uppercase()));
        }
        Some(Value::Array(kinds)) => {
            let mut nullable = false;
            for kind in kinds.iter().filter_map(Value::as_str) {
                if kind == "null" {
                    nullable = true;
                } else if !target.contains_key("type") {
                    target.insert("type".to_string(), Value::String(kind.to_uppercase()));
                }
            }
            if nullable {
                target.insert("nullable".to_string(), Value::Bool(true));
            }
        }
        _ => {}
    }

    for key in KEPT_KEYS {
        if let Some(value) = merged.get(*key) {
            target
                .entry((*key).to_string())
                .or_insert_with(|| value.clone());
        }
    }

    if let Some(Value::String(format)) = merged.get("format") {
        if KEPT_FORMATS.contains(&format.as_str()) {
            target.insert("format".to_string(), Value::String(format.clone()));
        }
    }

    if let Some(items) = merged.get("items") {
        target.insert("items".to_string(), to_response_schema(items));
    }

    if let Some(Value::Object(properties)) = merged.get("properties") {
        let converted = properties
            .iter()
            .map(|(name, schema)| (name.clone(), to_response_schema(schema)))
            .collect();
        target.insert("properties".to_string(), Value::Object(converted));
    }

    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nullable_union_becomes_flag() {
        let converted = to_response_schema(&json!({
            "type": ["number", "null"],
            "format": "double"
        }));

        assert_eq!(converted["type"], "NUMBER");
        assert_eq!(converted["nullable"], true);
        assert_eq!(converted["format"], "double");
    }

    #[test]
    fn test_unsupported_keys_are_dropped() {
        let converted = to_response_schema(&json!({
            "$schema": "https://spec.openapis.org/oas/3.0/schema/2021-09-28",
            "title": "TravelPlan",
            "type": "object",
            "additionalProperties": false,
            "required": ["day"],
            "properties": {
                "day": { "type": "integer", "format": "uint32", "minimum": 0.0 }
            }
        }));

        assert!(converted.get("$schema").is_none());
        assert!(converted.get("title").is_none());
        assert!(converted.get("additionalProperties").is_none());
        assert_eq!(converted["type"], "OBJECT");
        assert_eq!(converted["required"], json!(["day"]));
        assert_eq!(converted["properties"]["day"]["type"], "INTEGER");
        assert!(converted["properties"]["day"].get("format").is_none());
        assert_eq!(converted["properties"]["day"]["minimum"], 0.0);
    }

    #[test]
    fn test_single_all_of_is_merged() {
        let converted = to_response_schema(&json!({
            "description": "Soundtrack entry",
            "allOf": [{
                "type": "object",
                "properties": { "title": { "type": "string" } }
            }]
        }));

        assert_eq!(converted["type"], "OBJECT");
        assert_eq!(converted["description"], "Soundtrack entry");
        assert_eq!(converted["properties"]["title"]["type"], "STRING");
    }

    #[test]
    fn test_array_items_are_converted() {
        let converted = to_response_schema(&json!({
            "type": "array",
            "minItems": 1,
            "items": { "type": "string" }
        }));

        assert_eq!(converted["type"], "ARRAY");
        assert_eq!(converted["minItems"], 1);
        assert_eq!(converted["items"]["type"], "STRING");
    }
}
