//! Lenient field decoders for caller-supplied JSON.
//!
//! Profiles and candidates come from loosely typed callers, so a wrong-typed
//! attribute decays to its absent value instead of rejecting the document.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Number, numeric string, or absent.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_f64(&value))
}

/// String (numbers are stringified), or absent.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_string(&value))
}

/// Array of scalars; a bare string becomes a one-element list, null an empty one.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(value_as_string).collect(),
        Value::String(s) => vec![s],
        _ => Vec::new(),
    })
}

/// `{skill: years}`; non-numeric years are dropped, keys trimmed.
pub fn experience_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(map) = value else {
        return Ok(BTreeMap::new());
    };

    Ok(map
        .iter()
        .filter_map(|(skill, years)| {
            let skill = skill.trim();
            if skill.is_empty() {
                return None;
            }
            value_as_f64(years).map(|y| (skill.to_string(), y))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "lenient_f64")]
        number: Option<f64>,
        #[serde(deserialize_with = "lenient_string")]
        text: Option<String>,
        #[serde(deserialize_with = "string_list")]
        list: Vec<String>,
        #[serde(deserialize_with = "experience_map")]
        experience: BTreeMap<String, f64>,
    }

    #[test]
    fn numbers_accept_numeric_strings() {
        let sample: Sample = serde_json::from_value(json!({"number": " 7.5 "})).unwrap();
        assert_eq!(sample.number, Some(7.5));

        let sample: Sample = serde_json::from_value(json!({"number": "n/a"})).unwrap();
        assert_eq!(sample.number, None);

        let sample: Sample = serde_json::from_value(json!({"number": null})).unwrap();
        assert_eq!(sample.number, None);
    }

    #[test]
    fn lists_tolerate_null_and_scalars() {
        let sample: Sample = serde_json::from_value(json!({"list": null})).unwrap();
        assert!(sample.list.is_empty());

        let sample: Sample = serde_json::from_value(json!({"list": "Drama"})).unwrap();
        assert_eq!(sample.list, vec!["Drama".to_string()]);

        let sample: Sample = serde_json::from_value(json!({"list": ["a", 1, null]})).unwrap();
        assert_eq!(sample.list, vec!["a".to_string(), "1".to_string()]);
    }

    #[test]
    fn experience_keeps_numeric_years() {
        let sample: Sample = serde_json::from_value(json!({
            "experience": {"Python": 3, " Docker ": "2", "AWS": "lots", "": 1}
        }))
        .unwrap();

        assert_eq!(sample.experience.len(), 2);
        assert_eq!(sample.experience["Python"], 3.0);
        assert_eq!(sample.experience["Docker"], 2.0);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let sample: Sample = serde_json::from_value(json!({"text": 42})).unwrap();
        assert_eq!(sample.text.as_deref(), Some("42"));
        assert!(sample.number.is_none());
        assert!(sample.experience.is_empty());
    }
}
