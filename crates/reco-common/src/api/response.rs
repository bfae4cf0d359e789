use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use super::Domain;

/// One scored candidate.
///
/// Serializes as `{<domain>_id, title?, score, explanation, details}` with
/// keys in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub domain: Domain,
    /// Candidate id echoed verbatim (string, number or null).
    pub id: Value,
    pub title: Option<String>,
    /// Aggregate rounded to 4 decimal places.
    pub score: f64,
    pub explanation: String,
    /// Factor scores keyed by factor name, in factor order.
    pub details: Vec<(&'static str, f64)>,
}

struct Details<'a>(&'a [(&'static str, f64)]);

impl Serialize for Details<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for RankedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let with_title = self.domain.carries_title();
        let mut map = serializer.serialize_map(Some(if with_title { 5 } else { 4 }))?;
        map.serialize_entry(self.domain.id_key(), &self.id)?;
        if with_title {
            map.serialize_entry("title", &self.title)?;
        }
        map.serialize_entry("score", &self.score)?;
        map.serialize_entry("explanation", &self.explanation)?;
        map.serialize_entry("details", &Details(&self.details))?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn movie_result_keys_in_order() {
        let result = RankedResult {
            domain: Domain::Movies,
            id: json!("m1"),
            title: Some("Inception".into()),
            score: 0.6525,
            explanation: "Фильм: Inception.".into(),
            details: vec![("genre_sim", 0.2), ("year_sim", 1.0)],
        };

        let encoded = serde_json::to_string(&result).unwrap();
        assert_eq!(
            encoded,
            r#"{"movie_id":"m1","title":"Inception","score":0.6525,"explanation":"Фильм: Inception.","details":{"genre_sim":0.2,"year_sim":1.0}}"#
        );
    }

    #[test]
    fn vacancy_result_has_no_title() {
        let result = RankedResult {
            domain: Domain::Vacancies,
            id: json!(7),
            title: None,
            score: 0.5,
            explanation: String::new(),
            details: vec![("skills_sim", 0.5)],
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["vacancy_id"], json!(7));
        assert!(value.get("title").is_none());
        assert_eq!(value["details"]["skills_sim"], json!(0.5));
    }

    #[test]
    fn missing_title_serializes_as_null_for_movies() {
        let result = RankedResult {
            domain: Domain::Movies,
            id: Value::Null,
            title: None,
            score: 0.0,
            explanation: String::new(),
            details: Vec::new(),
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["movie_id"], Value::Null);
        assert_eq!(value["title"], Value::Null);
    }
}
