use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};

use super::error::BackendError;
use crate::traits::{BackendReply, PreferenceBackend, PreferenceEntry, PreferenceList};

/// Body of delete and status requests.
#[derive(Debug, Serialize)]
struct MovieIdBody {
    movieid: u64,
}

#[derive(Debug, Deserialize)]
struct StatusReply {
    success: bool,
}

/// Client for the private favorites / watch-later backend.
///
/// Authentication is the backend's business: an opaque session cookie, if
/// configured, is forwarded untouched on every request.
pub struct BackendClient {
    base_url: String,
    session_cookie: Option<String>,
    http: Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, session_cookie: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_cookie,
            http: Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, format!("{}{path}", self.base_url));
        match &self.session_cookie {
            Some(cookie) => req.header(reqwest::header::COOKIE, cookie),
            None => req,
        }
    }

    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "Backend API error");
            Err(BackendError::Api {
                status,
                message: body,
            })
        }
    }

    async fn send_mutation(&self, req: RequestBuilder) -> Result<BackendReply, BackendError> {
        let resp = Self::check_response(req.send().await?).await?;
        resp.json::<BackendReply>()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }
}

impl PreferenceBackend for BackendClient {
    async fn is_marked(&self, list: PreferenceList, movie_id: u64) -> Result<bool, BackendError> {
        let resp = self
            .request(Method::POST, list.status_path())
            .json(&MovieIdBody { movieid: movie_id })
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let reply: StatusReply = resp
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        Ok(reply.success)
    }

    async fn add(
        &self,
        list: PreferenceList,
        entry: &PreferenceEntry,
    ) -> Result<BackendReply, BackendError> {
        tracing::debug!(movie_id = entry.movieid, %list, "Adding entry");
        let req = self.request(Method::POST, list.resource_path()).json(entry);
        self.send_mutation(req).await
    }

    async fn remove(
        &self,
        list: PreferenceList,
        movie_id: u64,
    ) -> Result<BackendReply, BackendError> {
        tracing::debug!(movie_id, %list, "Removing entry");
        let req = self
            .request(Method::DELETE, list.resource_path())
            .json(&MovieIdBody { movieid: movie_id });
        self.send_mutation(req).await
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn entry() -> PreferenceEntry {
        PreferenceEntry {
            movieid: 42,
            poster_path: Some("/p.jpg".into()),
            title: "Arrival".into(),
            release_date: "2016-11-10".into(),
            original_language: "en".into(),
            vote_average: 7.5,
        }
    }

    #[tokio::test]
    async fn test_status_query_true() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/isfavorite")
            .match_body(Matcher::Json(json!({"movieid": 42})))
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;

        let client = BackendClient::new(server.url(), None);
        assert!(client.is_marked(PreferenceList::Favorite, 42).await.unwrap());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_query_non_success_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/iswatchlater")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let client = BackendClient::new(server.url(), None);
        assert!(matches!(
            client.is_marked(PreferenceList::WatchLater, 42).await,
            Err(BackendError::Api { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn test_add_posts_full_snapshot() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/watchlater")
            .match_header("cookie", "session=abc")
            .match_body(Matcher::Json(json!({
                "movieid": 42,
                "poster_path": "/p.jpg",
                "title": "Arrival",
                "release_date": "2016-11-10",
                "original_language": "en",
                "vote_average": 7.5
            })))
            .with_status(200)
            .with_body(r#"{"success": true, "message": "Added to watch later"}"#)
            .create_async()
            .await;

        let client = BackendClient::new(server.url(), Some("session=abc".into()));
        let reply = client
            .add(PreferenceList::WatchLater, &entry())
            .await
            .unwrap();
        assert!(reply.success);
        assert_eq!(reply.message.as_deref(), Some("Added to watch later"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_remove_sends_delete_with_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/favorite")
            .match_body(Matcher::Json(json!({"movieid": 42})))
            .with_status(200)
            .with_body(r#"{"success": false}"#)
            .create_async()
            .await;

        let client = BackendClient::new(format!("{}/", server.url()), None);
        let reply = client.remove(PreferenceList::Favorite, 42).await.unwrap();
        assert!(!reply.success);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_garbage_reply_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/api/watchlater")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let client = BackendClient::new(server.url(), None);
        assert!(matches!(
            client.remove(PreferenceList::WatchLater, 1).await,
            Err(BackendError::Parse(_))
        ));
    }
}
