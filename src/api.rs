use crate::model::*;
use actix_web::client::{Client, ClientRequest};
use actix_web::http::StatusCode;
use log::debug;
use std::fmt::Display;
use std::time::Duration;

const JSON_LIMIT: usize = 1 << 20;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("backend request failed: {0}")]
    Request(String),
    #[error("backend responded with {0}")]
    Status(StatusCode),
    #[error("malformed backend response: {0}")]
    Decode(String),
}

impl ApiError {
    fn request<E: Display>(err: E) -> Self {
        ApiError::Request(err.to_string())
    }

    fn decode<E: Display>(err: E) -> Self {
        ApiError::Decode(err.to_string())
    }
}

fn check_status(status: StatusCode) -> Result<(), ApiError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::Status(status))
    }
}

/// Client for the movie backend's `/api` endpoints.
///
/// Every call sends exactly one request. A session's backend cookie is
/// replayed as the `Cookie` header.
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        ApiClient {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client: Client::build().timeout(timeout).finish(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_session(req: ClientRequest, session: Option<&Session>) -> ClientRequest {
        match session.and_then(|session| session.cookie.as_ref()) {
            Some(cookie) => req.header("cookie", cookie.as_str()),
            None => req,
        }
    }

    pub async fn movies(&self) -> Result<Vec<Movie>, ApiError> {
        let mut res = self
            .client
            .get(self.url("/api/movies"))
            .send()
            .await
            .map_err(ApiError::request)?;
        check_status(res.status())?;
        res.json().limit(JSON_LIMIT).await.map_err(ApiError::decode)
    }

    pub async fn movie(&self, movie_id: u64) -> Result<Movie, ApiError> {
        let mut res = self
            .client
            .get(self.url(&format!("/api/movies/{}", movie_id)))
            .send()
            .await
            .map_err(ApiError::request)?;
        check_status(res.status())?;
        res.json().limit(JSON_LIMIT).await.map_err(ApiError::decode)
    }

    pub async fn ratings(&self, session: Option<&Session>) -> Result<Vec<Rating>, ApiError> {
        let req = self.client.get(self.url("/api/ratings"));
        let mut res = Self::with_session(req, session)
            .send()
            .await
            .map_err(ApiError::request)?;
        check_status(res.status())?;
        res.json().limit(JSON_LIMIT).await.map_err(ApiError::decode)
    }

    /// Only the status decides success. The body may be empty or any JSON;
    /// its `ratingId` is returned when present.
    pub async fn create_rating(
        &self,
        session: Option<&Session>,
        rating: &NewRating,
    ) -> Result<Option<u64>, ApiError> {
        let req = self.client.post(self.url("/api/ratings"));
        let mut res = Self::with_session(req, session)
            .send_json(rating)
            .await
            .map_err(ApiError::request)?;
        check_status(res.status())?;
        let body = res.body().limit(JSON_LIMIT).await.map_err(ApiError::request)?;
        Ok(serde_json::from_slice::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| value.get("ratingId").and_then(|id| id.as_u64())))
    }

    /// Returns `None` when the backend rejects the credentials.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Option<Session>, ApiError> {
        let mut res = self
            .client
            .post(self.url("/api/auth"))
            .send_json(credentials)
            .await
            .map_err(ApiError::request)?;
        if res.status() == StatusCode::UNAUTHORIZED || res.status() == StatusCode::FORBIDDEN {
            debug!("backend rejected login for {}", credentials.email);
            return Ok(None);
        }
        check_status(res.status())?;

        let cookies = res
            .headers()
            .get_all("set-cookie")
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(';').next())
            .map(|pair| pair.trim().to_owned())
            .filter(|pair| !pair.is_empty())
            .collect::<Vec<_>>();

        let auth: AuthResponse = res.json().limit(JSON_LIMIT).await.map_err(ApiError::decode)?;
        if !auth.success {
            debug!("backend rejected login for {}", credentials.email);
            return Ok(None);
        }
        Ok(Some(Session {
            email: credentials.email.clone(),
            cookie: if cookies.is_empty() {
                None
            } else {
                Some(cookies.join("; "))
            },
        }))
    }
}
