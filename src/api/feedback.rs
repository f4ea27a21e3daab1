//! Recipe Feedback

use serde::Serialize;

use super::{encode_component, ApiClient, Auth};
use crate::error::ApiError;
use crate::models::Feedback;

#[derive(Serialize)]
struct FeedbackArgs<'a> {
    text: &'a str,
}

impl ApiClient {
    pub async fn feedbacks(&self, recipe_id: &str) -> Result<Vec<Feedback>, ApiError> {
        let path = format!("/recipes/{}/feedbacks", encode_component(recipe_id));
        let request = self.http.get(self.url(&path));
        self.send(request, Auth::None).await
    }

    /// Blank text is rejected locally
    pub async fn add_feedback(&self, recipe_id: &str, text: &str) -> Result<(), ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::Validation("Feedback cannot be empty.".to_string()));
        }
        let path = format!("/recipes/{}/feedbacks", encode_component(recipe_id));
        let request = self.http.post(self.url(&path)).json(&FeedbackArgs { text });
        self.send_empty(request, Auth::Optional).await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::tests::client;
    use crate::error::ApiError;

    #[tokio::test]
    async fn test_blank_feedback_not_sent() {
        let api = client(Some("token"));
        let result = api.add_feedback("r1", "   ").await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
