use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub movie_id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatedMovie {
    pub title: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub rating_id: u64,
    pub score: u8,
    #[serde(default)]
    pub movie_id: Option<u64>,
    #[serde(default)]
    pub movie: Option<RatedMovie>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewRating {
    pub movie_id: u64,
    pub score: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct AuthResponse {
    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

/// Login state kept in the encrypted identity cookie.
///
/// `cookie` holds the backend's own session cookie, replayed on later calls.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Session {
    pub email: String,
    #[serde(default)]
    pub cookie: Option<String>,
}

/// Longest identity payload that still fits a ~4 KB browser cookie once
/// encrypted and base64 encoded.
pub const MAX_IDENTITY_LEN: usize = 2800;

impl Session {
    pub fn from_identity(identity: &str) -> Option<Session> {
        serde_json::from_str(identity).ok()
    }

    pub fn to_identity(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn identity_fits_cookie(identity: &str) -> bool {
        identity.len() <= MAX_IDENTITY_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_list_entries_only_need_id_and_title() {
        let movies: Vec<Movie> =
            serde_json::from_str(r#"[{"movieId": 1, "title": "Test Movie"}]"#).unwrap();
        assert_eq!(movies[0].movie_id, 1);
        assert_eq!(movies[0].title, "Test Movie");
        assert_eq!(movies[0].poster_path, None);
    }

    #[test]
    fn rating_carries_nested_movie_title() {
        let rating: Rating = serde_json::from_str(
            r#"{"ratingId": 1, "score": 2, "movieId": 1, "movie": {"title": "Test Movie"}}"#,
        )
        .unwrap();
        assert_eq!(rating.score, 2);
        assert_eq!(rating.movie.unwrap().title, "Test Movie");
    }

    #[test]
    fn new_rating_uses_backend_field_names() {
        let body = serde_json::to_value(&NewRating {
            movie_id: 7,
            score: 4,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"movieId": 7, "score": 4}));
    }

    #[test]
    fn auth_response_without_flag_counts_as_success() {
        let res: AuthResponse = serde_json::from_str("{}").unwrap();
        assert!(res.success);
        let res: AuthResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!res.success);
    }

    #[test]
    fn garbage_identity_is_no_session() {
        assert_eq!(Session::from_identity("admin"), None);
        let session = Session {
            email: "test@test.com".to_owned(),
            cookie: Some("sid=abc".to_owned()),
        };
        let identity = session.to_identity().unwrap();
        assert_eq!(Session::from_identity(&identity), Some(session));
    }

    #[test]
    fn oversized_backend_cookie_does_not_fit() {
        let small = Session {
            email: "test@test.com".to_owned(),
            cookie: Some("sid=abc".to_owned()),
        };
        assert!(Session::identity_fits_cookie(&small.to_identity().unwrap()));

        let large = Session {
            cookie: Some(format!("sid={}", "x".repeat(MAX_IDENTITY_LEN))),
            ..small
        };
        assert!(!Session::identity_fits_cookie(&large.to_identity().unwrap()));
    }
}
