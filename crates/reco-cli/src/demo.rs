use reco_common::api::{Domain, RecoError, RecoRequest};
use serde_json::{Value, json};

fn movie_payload() -> Value {
    json!({
        "user": {
            "id": "u1",
            "preferred_genres": ["action", "comedy", "drama"],
            "preferred_rating": 7.5,
            "preferred_year": 2010,
            "favorite_actors": ["Leonardo DiCaprio", "Tom Hanks"],
            "preferred_themes": ["adventure", "friendship", "heroism"]
        },
        "movies": [
            {
                "id": "m1",
                "title": "Inception",
                "plot": "A thief who steals corporate secrets through dream-sharing technology is given the inverse task of planting an idea into the mind of a C.E.O.",
                "genres": ["action", "sci-fi", "thriller"],
                "rating": 8.8,
                "year": 2010,
                "cast": ["Leonardo DiCaprio", "Marion Cotillard", "Tom Hardy"]
            },
            {
                "id": "m2",
                "title": "The Dark Knight",
                "plot": "When the menace known as the Joker wreaks havoc and chaos on the people of Gotham, Batman must accept one of the greatest psychological and physical tests of his ability to fight injustice.",
                "genres": ["action", "crime", "drama"],
                "rating": 9.0,
                "year": 2008,
                "cast": ["Christian Bale", "Heath Ledger", "Aaron Eckhart"]
            },
            {
                "id": "m3",
                "title": "Forrest Gump",
                "plot": "The presidencies of Kennedy and Johnson, the Vietnam War, the Watergate scandal and other historical events unfold from the perspective of an Alabama man with an IQ of 75.",
                "genres": ["drama", "romance"],
                "rating": 8.8,
                "year": 1994,
                "cast": ["Tom Hanks", "Robin Wright", "Gary Sinise"]
            }
        ]
    })
}

fn vacancy_payload() -> Value {
    json!({
        "user": {
            "id": "u1",
            "skills": ["Python", "Docker", "AWS"],
            "position": "Backend Developer",
            "experience": {"Python": 3, "Docker": 2, "AWS": 1},
            "level": "middle",
            "location": "Remote",
            "salary_expectation": 150000
        },
        "vacancies": [
            {
                "id": "v1",
                "title": "Backend Developer",
                "description": "Работа с Python, AWS, Kubernetes.",
                "skills": ["Python", "AWS", "Kubernetes"],
                "level": "middle",
                "location": "Remote",
                "salary": 160000
            }
        ]
    })
}

/// Built-in sample profile and candidates for `domain`.
pub fn request(domain: Domain) -> Result<RecoRequest, RecoError> {
    let payload = match domain {
        Domain::Movies => movie_payload(),
        Domain::Vacancies => vacancy_payload(),
    };
    RecoRequest::from_payload(domain, &payload.to_string())
}
