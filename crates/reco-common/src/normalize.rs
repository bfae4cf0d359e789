use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static RE_NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Genre spelling → canonical English genre.
///
/// Keys are already in `normalize_text` form (punctuation replaced by spaces),
/// so "sci-fi" arrives here as "sci fi".
static GENRE_SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let table: &[(&str, &str)] = &[
        ("боевик", "action"),
        ("комедия", "comedy"),
        ("драма", "drama"),
        ("ужасы", "horror"),
        ("фантастика", "sci-fi"),
        ("фэнтези", "fantasy"),
        ("триллер", "thriller"),
        ("детектив", "mystery"),
        ("криминал", "crime"),
        ("мелодрама", "romance"),
        ("приключения", "adventure"),
        ("семейный", "family"),
        ("мультфильм", "animation"),
        ("документальный", "documentary"),
        ("биография", "biography"),
        ("история", "history"),
        ("военный", "war"),
        ("вестерн", "western"),
        ("музыка", "music"),
        ("спорт", "sport"),
        ("sci fi", "sci-fi"),
        ("sci-fi", "sci-fi"),
        ("sci_fi", "sci-fi"),
        ("scifi", "sci-fi"),
        ("rom-com", "romance"),
        ("rom com", "romance"),
        ("romcom", "romance"),
    ];
    table.iter().copied().collect()
});

/// Skill alias → canonical skill, applied after the substring rules.
static SKILL_SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let table: &[(&str, &str)] = &[
        ("js", "javascript"),
        ("nodejs", "node.js"),
        ("reactjs", "react"),
        ("ts", "typescript"),
        ("k8s", "kubernetes"),
        ("tf", "tensorflow"),
        ("python3", "python"),
        ("py", "python"),
        ("postgre", "postgresql"),
        ("postgres", "postgresql"),
        ("gcp", "google cloud"),
        ("ml", "machine learning"),
        ("dl", "deep learning"),
        // RU → EN
        ("питон", "python"),
        ("реакт", "react"),
        ("тайпскрипт", "typescript"),
        ("джавскрипт", "javascript"),
        ("кубер", "kubernetes"),
        ("кубернетес", "kubernetes"),
        ("докер", "docker"),
        ("контейнеры", "docker"),
        ("яндекс облако", "yandex cloud"),
        ("гугл облако", "google cloud"),
        ("амазон облако", "aws"),
        ("постгрес", "postgresql"),
        ("постгр", "postgresql"),
        ("бд", "database"),
        ("линукс", "linux"),
        ("джанго", "django"),
        ("фласк", "flask"),
        ("машинное обучение", "machine learning"),
        ("нейросети", "deep learning"),
        ("го", "go"),
        // Languages and stacks
        ("golang", "go"),
        ("go language", "go"),
        ("c#", "csharp"),
        ("c-sharp", "csharp"),
        ("vuejs", "vue"),
        ("vue.js", "vue"),
        ("angularjs", "angular"),
        ("dotnet", ".net"),
        (".net core", ".net"),
        ("pgsql", "postgresql"),
        ("mariadb", "mysql"),
        ("mongo", "mongodb"),
        ("mongo db", "mongodb"),
        ("ci/cd", "cicd"),
        ("ci-cd", "cicd"),
        ("gitlab ci", "cicd"),
        ("github actions", "cicd"),
        ("rabbit", "rabbitmq"),
    ];
    table.iter().copied().collect()
});

/// Substring rule for partial or compound localized skill names.
///
/// Matches when the token contains at least one of `any_of` and every entry of
/// `all_of`.
#[derive(Debug, Clone, Copy)]
pub struct SubstringRule {
    pub any_of: &'static [&'static str],
    pub all_of: &'static [&'static str],
    pub canonical: &'static str,
}

impl SubstringRule {
    const fn new(
        any_of: &'static [&'static str],
        all_of: &'static [&'static str],
        canonical: &'static str,
    ) -> Self {
        Self {
            any_of,
            all_of,
            canonical,
        }
    }

    pub fn matches(&self, token: &str) -> bool {
        self.any_of.iter().any(|needle| token.contains(needle))
            && self.all_of.iter().all(|needle| token.contains(needle))
    }
}

/// Ordered; the first matching rule wins.
pub static SKILL_RULES: &[SubstringRule] = &[
    SubstringRule::new(&["питон"], &[], "python"),
    SubstringRule::new(&["ява", "джава", "жава"], &[], "java"),
    SubstringRule::new(&["го "], &[], "go"),
    SubstringRule::new(&["си шарп"], &[], "csharp"),
    SubstringRule::new(&["реакт"], &[], "react"),
    SubstringRule::new(&["тайпскрип"], &[], "typescript"),
    SubstringRule::new(&["вью"], &[], "vue"),
    SubstringRule::new(&["ангуляр"], &[], "angular"),
    SubstringRule::new(&["кубер"], &[], "kubernetes"),
    SubstringRule::new(&["докер"], &[], "docker"),
    SubstringRule::new(&["постгр"], &[], "postgresql"),
    SubstringRule::new(&["яндекс"], &["обла"], "yandex cloud"),
    SubstringRule::new(&["гугл", "google"], &["обла"], "google cloud"),
    SubstringRule::new(&["амазон", "aws"], &["обла"], "aws"),
    SubstringRule::new(&["машинн"], &["обуч"], "machine learning"),
    SubstringRule::new(&["нейросет"], &[], "deep learning"),
    SubstringRule::new(&["тест", "qa"], &[], "qa"),
    SubstringRule::new(&["девопс"], &[], "devops"),
    SubstringRule::new(&["терраформ"], &[], "terraform"),
    SubstringRule::new(&["ансибл"], &[], "ansible"),
    SubstringRule::new(&["джанго"], &[], "django"),
    SubstringRule::new(&["фастапи"], &[], "fastapi"),
];

fn nfkc_lower_trim(input: &str) -> String {
    input.nfkc().collect::<String>().trim().to_lowercase()
}

/// Lowercase, replace every non-word character with a space, trim.
pub fn normalize_text(text: &str) -> String {
    let lowered = nfkc_lower(text);
    RE_NON_WORD.replace_all(&lowered, " ").trim().to_string()
}

fn nfkc_lower(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// Canonical form of a single genre name.
pub fn normalize_genre(genre: &str) -> String {
    let cleaned = normalize_text(genre);
    match GENRE_SYNONYMS.get(cleaned.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => cleaned,
    }
}

/// Genre list → deduplicated canonical genres, sorted so output stays stable.
pub fn normalize_genres(genres: &[String]) -> Vec<String> {
    genres
        .iter()
        .map(|g| normalize_genre(g))
        .filter(|g| !g.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Canonical form of a single skill name.
///
/// Punctuation is kept so `c#`, `node.js` and `ci/cd` reach
/// the synonym table intact.
pub fn normalize_skill(skill: &str) -> String {
    let lowered = nfkc_lower_trim(skill);
    let hinted = SKILL_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.canonical.to_string())
        .unwrap_or(lowered);

    match SKILL_SYNONYMS.get(hinted.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => hinted,
    }
}

/// Skill list → canonical skills in first-occurrence order, blanks dropped.
pub fn normalize_skills(skills: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| normalize_skill(s))
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Lowercased, trimmed, non-blank entries; no synonym mapping.
pub fn lower_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| nfkc_lower_trim(s))
        .filter(|s| !s.is_empty())
        .collect()
}
