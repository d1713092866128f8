//! Classification response model.
//!
//! The prediction service returns camelCase JSON, but field names are matched
//! case-insensitively (`TagName`, `tagname` and `tagName` are all accepted).
//! Keys are folded to lowercase before deserializing; serialization always
//! emits camelCase so the passthrough stays stable for callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub iteration: String,
    #[serde(default)]
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(default, rename(serialize = "tagId", deserialize = "tagid"))]
    pub tag_id: String,
    #[serde(default, rename(serialize = "tagName", deserialize = "tagname"))]
    pub tag_name: String,
    #[serde(default)]
    pub probability: f64,
}

impl ClassificationResponse {
    /// Parses a provider body, ignoring the casing of object keys.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(body)?;
        serde_json::from_value(fold_keys(value))
    }
}

fn fold_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key.to_lowercase(), fold_keys(value)))
                .collect::<Map<_, _>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(fold_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_body() {
        let body = br#"{
            "id": "a1",
            "project": "p1",
            "iteration": "i1",
            "created": "2024-05-01T10:00:00Z",
            "predictions": [
                {"tagId": "t1", "tagName": "honey-badger", "probability": 0.93},
                {"tagId": "t2", "tagName": "cat", "probability": 0.02}
            ]
        }"#;

        let parsed = ClassificationResponse::from_slice(body).unwrap();
        assert_eq!(parsed.id, "a1");
        assert_eq!(parsed.predictions.len(), 2);
        assert_eq!(parsed.predictions[0].tag_name, "honey-badger");
        assert_eq!(parsed.predictions[0].probability, 0.93);
    }

    #[test]
    fn field_names_are_case_insensitive() {
        let body = br#"{"Id": "x", "PREDICTIONS": [{"TagName": "Cat", "Probability": 0.5, "TAGID": "t"}]}"#;

        let parsed = ClassificationResponse::from_slice(body).unwrap();
        assert_eq!(parsed.id, "x");
        assert_eq!(parsed.predictions[0].tag_name, "Cat");
        assert_eq!(parsed.predictions[0].tag_id, "t");
        assert_eq!(parsed.predictions[0].probability, 0.5);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed = ClassificationResponse::from_slice(b"{}").unwrap();
        assert!(parsed.predictions.is_empty());
        assert!(parsed.id.is_empty());
    }

    #[test]
    fn malformed_body_is_rejected() {
        assert!(ClassificationResponse::from_slice(b"<html>oops</html>").is_err());
        assert!(ClassificationResponse::from_slice(br#"{"predictions": 7}"#).is_err());
    }

    #[test]
    fn serializes_camel_case() {
        let response = ClassificationResponse {
            predictions: vec![Prediction {
                tag_id: "t1".into(),
                tag_name: "honey-badger".into(),
                probability: 0.8,
            }],
            ..Default::default()
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["predictions"][0]["tagName"], "honey-badger");
        assert_eq!(json["predictions"][0]["tagId"], "t1");
    }
}
