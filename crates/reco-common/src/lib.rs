pub mod api;
pub mod de;
pub mod embedding;
pub mod logging;
pub mod matching;
pub mod normalize;

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

// Input models. Every field is optional; absent or wrong-typed attributes
// take their neutral meaning in the factor functions.

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MovieProfile {
    pub id: Option<Value>,
    #[serde(deserialize_with = "de::string_list")]
    pub preferred_genres: Vec<String>,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub preferred_rating: Option<f64>,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub preferred_year: Option<f64>,
    #[serde(deserialize_with = "de::string_list")]
    pub favorite_actors: Vec<String>,
    #[serde(deserialize_with = "de::string_list")]
    pub preferred_themes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Movie {
    pub id: Option<Value>,
    #[serde(deserialize_with = "de::lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "de::lenient_string")]
    pub plot: Option<String>,
    #[serde(deserialize_with = "de::string_list")]
    pub genres: Vec<String>,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub rating: Option<f64>,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub year: Option<f64>,
    #[serde(deserialize_with = "de::string_list")]
    pub cast: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct JobProfile {
    pub id: Option<Value>,
    #[serde(deserialize_with = "de::string_list")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "de::lenient_string")]
    pub position: Option<String>,
    /// Years per skill.
    #[serde(deserialize_with = "de::experience_map")]
    pub experience: BTreeMap<String, f64>,
    #[serde(deserialize_with = "de::lenient_string")]
    pub level: Option<String>,
    #[serde(deserialize_with = "de::lenient_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub salary_expectation: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Vacancy {
    pub id: Option<Value>,
    #[serde(deserialize_with = "de::lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "de::lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "de::string_list")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "de::lenient_string")]
    pub level: Option<String>,
    #[serde(deserialize_with = "de::lenient_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub salary: Option<f64>,
    /// Epoch seconds, numeric string or RFC 3339; decoded by the freshness factor.
    pub posted_ts: Option<Value>,
}
