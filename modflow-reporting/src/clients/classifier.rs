use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use modflow_shared::errors::{AppError, AppResult, ErrorCode};

use crate::collaborators::Classifier;

/// Abuse-type classification service reached over HTTP.
#[derive(Clone)]
pub struct HttpClassifier {
    client: Client,
    url: String,
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    #[serde(default)]
    label: Option<String>,
}

impl HttpClassifier {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify_abuse_type(&self, text: &str) -> AppResult<Option<String>> {
        let unavailable = |e: String| AppError::new(ErrorCode::ClassifierUnavailable, e);

        let response = self
            .client
            .post(&self.url)
            .json(&ClassifyRequest { text })
            .send()
            .await
            .map_err(|e| unavailable(format!("classifier request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(unavailable(format!("classifier returned {}", response.status())));
        }

        let body: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| unavailable(format!("classifier response unreadable: {e}")))?;

        tracing::debug!(label = ?body.label, "message classified");
        Ok(body.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn classifier_answering(template: ResponseTemplate) -> (MockServer, HttpClassifier) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/classify"))
            .and(body_json(json!({"text": "you are awful"})))
            .respond_with(template)
            .mount(&server)
            .await;
        let classifier = HttpClassifier::new(Client::new(), &format!("{}/classify", server.uri()));
        (server, classifier)
    }

    #[tokio::test]
    async fn returns_raw_label() {
        let (_server, classifier) =
            classifier_answering(ResponseTemplate::new(200).set_body_json(json!({"label": "hate speech"}))).await;

        let label = classifier.classify_abuse_type("you are awful").await.unwrap();

        assert_eq!(label.as_deref(), Some("hate speech"));
        assert_eq!(
            classifier.normalize_abuse_type(label.as_deref()),
            Some(crate::taxonomy::AbuseType::HateSpeech)
        );
    }

    #[tokio::test]
    async fn null_or_missing_label_is_none() {
        let (_server, classifier) =
            classifier_answering(ResponseTemplate::new(200).set_body_json(json!({"label": null}))).await;
        assert_eq!(classifier.classify_abuse_type("you are awful").await.unwrap(), None);

        let (_server, classifier) =
            classifier_answering(ResponseTemplate::new(200).set_body_json(json!({}))).await;
        assert_eq!(classifier.classify_abuse_type("you are awful").await.unwrap(), None);
    }

    #[tokio::test]
    async fn server_error_is_unavailable() {
        let (_server, classifier) = classifier_answering(ResponseTemplate::new(503)).await;

        let err = classifier.classify_abuse_type("you are awful").await.unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::ClassifierUnavailable));
    }
}
