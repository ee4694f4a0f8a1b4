use crate::error::Error;
use crate::text;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Liveness document returned by `GET /`.
#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    pub status: String,
    pub version: String,
}

/// Liveness probe.
pub async fn liveness() -> impl IntoResponse {
    Json(LivenessResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Finds anagram groups in the posted input.
///
/// Expects `{"input": <string>}` and responds with a JSON array of arrays of
/// strings, one inner array per anagram group.
pub async fn text_anagrams(Json(body): Json<Value>) -> Result<Json<Vec<Vec<String>>>, Error> {
    let input = body.get("input").ok_or_else(|| {
        warn!("anagrams request without 'input' field");
        Error::Decode("'input' not found".to_string())
    })?;
    let input = input.as_str().ok_or_else(|| {
        warn!("anagrams request with non-string 'input'");
        Error::Decode("'input' must be a string".to_string())
    })?;

    let words = text::word_set(input);
    Ok(Json(text::anagrams(&words)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn anagrams_handler_groups_words() {
        let response = text_anagrams(Json(json!({
            "input": "below on the elbow is the bowel"
        })))
        .await
        .unwrap();
        assert_eq!(response.0, vec![vec!["below", "bowel", "elbow"]]);
    }

    #[tokio::test]
    async fn anagrams_handler_rejects_missing_input() {
        let result = text_anagrams(Json(json!({}))).await;
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[tokio::test]
    async fn anagrams_handler_rejects_non_string_input() {
        let result = text_anagrams(Json(json!({ "input": 42 }))).await;
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[tokio::test]
    async fn anagrams_handler_accepts_empty_input() {
        let response = text_anagrams(Json(json!({ "input": "" }))).await.unwrap();
        assert!(response.0.is_empty());
    }
}
