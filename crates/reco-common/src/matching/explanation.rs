//! Russian-language justifications assembled from raw attributes and factor
//! scores. Clauses whose attribute is missing are left out.

use std::collections::BTreeSet;

use super::scoring::MovieFactors;
use crate::normalize::{normalize_genres, normalize_skills};
use crate::{JobProfile, Movie, MovieProfile, Vacancy};

const UNKNOWN_TITLE: &str = "Неизвестный фильм";
const RAW_GENRE_LIMIT: usize = 3;
const CAST_LIMIT: usize = 2;
const MISSING_SKILL_LIMIT: usize = 2;

/// Cast members matching a favorite actor, one per favorite, in favorite order.
pub fn matched_cast<'a>(favorites: &[String], cast: &'a [String]) -> Vec<&'a str> {
    favorites
        .iter()
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty())
        .filter_map(|favorite| {
            cast.iter()
                .find(|member| member.to_lowercase().contains(&favorite))
                .map(String::as_str)
        })
        .collect()
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn capitalize(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn remark(factors: &MovieFactors) -> Option<&'static str> {
    if factors.genre > 0.7 {
        Some("Отлично подходит по жанрам!")
    } else if factors.plot > 0.7 {
        Some("Интересный сюжет по вашим предпочтениям.")
    } else if factors.rating > 0.8 {
        Some("Высокий рейтинг, как вы предпочитаете.")
    } else {
        None
    }
}

pub fn explain_movie(profile: &MovieProfile, movie: &Movie, factors: &MovieFactors) -> String {
    let title = movie
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNKNOWN_TITLE);
    let mut parts = vec![format!("Фильм: {title}.")];

    let preferred: BTreeSet<String> = normalize_genres(&profile.preferred_genres)
        .into_iter()
        .collect();
    let common: Vec<String> = normalize_genres(&movie.genres)
        .into_iter()
        .filter(|g| preferred.contains(g))
        .collect();
    if !common.is_empty() {
        parts.push(format!("Жанры: {}.", common.join(", ")));
    } else {
        let raw: Vec<&str> = movie
            .genres
            .iter()
            .map(|g| g.trim())
            .filter(|g| !g.is_empty())
            .take(RAW_GENRE_LIMIT)
            .collect();
        if !raw.is_empty() {
            parts.push(format!("Жанры: {}.", raw.join(", ")));
        }
    }

    if let Some(rating) = movie.rating.filter(|r| *r > 0.0) {
        parts.push(format!("Рейтинг: {rating:.1}/10."));
    }
    if let Some(year) = movie.year.filter(|y| *y > 0.0) {
        parts.push(format!("Год: {}.", format_number(year)));
    }

    let cast = matched_cast(&profile.favorite_actors, &movie.cast);
    if !cast.is_empty() {
        let shown: Vec<&str> = cast.into_iter().take(CAST_LIMIT).collect();
        parts.push(format!("В ролях: {}.", shown.join(", ")));
    }

    if let Some(remark) = remark(factors) {
        parts.push(remark.to_string());
    }

    parts.join(" ")
}

pub fn explain_vacancy(profile: &JobProfile, vacancy: &Vacancy) -> String {
    let mut parts = Vec::new();

    let title = vacancy.title.as_deref().unwrap_or("").trim();
    let position = profile.position.as_deref().unwrap_or("").trim();
    if !title.is_empty() {
        if !position.is_empty() && title.to_lowercase().contains(&position.to_lowercase()) {
            parts.push(format!("Ваша позиция совпадает: {title}."));
        } else {
            parts.push(format!("Позиция: {title}."));
        }
    }

    let owned: BTreeSet<String> = normalize_skills(&profile.skills).into_iter().collect();
    let required: BTreeSet<String> = normalize_skills(&vacancy.skills).into_iter().collect();
    let overlap: Vec<&str> = required.intersection(&owned).map(String::as_str).collect();
    let missing: Vec<&str> = required
        .difference(&owned)
        .map(String::as_str)
        .take(MISSING_SKILL_LIMIT)
        .collect();

    let overlap_text = if overlap.is_empty() {
        "—".to_string()
    } else {
        overlap.join(", ")
    };
    parts.push(format!("Совпадение по навыкам: {overlap_text}."));
    if !missing.is_empty() {
        parts.push(format!("Рекомендуем подтянуть: {}.", missing.join(", ")));
    }

    let level = capitalize(vacancy.level.as_deref().unwrap_or(""));
    if !level.is_empty() {
        parts.push(format!("Уровень: {level}."));
    }

    let location = capitalize(vacancy.location.as_deref().unwrap_or(""));
    if !location.is_empty() {
        if location.eq_ignore_ascii_case("remote") {
            parts.push("Работа удалённая.".to_string());
        } else {
            parts.push(format!("Локация: {location}."));
        }
    }

    match (profile.salary_expectation, vacancy.salary) {
        (Some(expected), Some(offered)) if expected > 0.0 && offered > 0.0 => {
            if offered >= expected {
                parts.push("Зарплата выше ваших ожиданий.".to_string());
            } else {
                parts.push("Зарплата ниже ваших ожиданий.".to_string());
            }
        }
        _ => {}
    }

    parts.join(" ")
}
