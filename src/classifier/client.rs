use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{
    Client,
    header::{CONTENT_TYPE, HeaderValue},
};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{ClassificationResponse, Classifier, ClassifierError, Result};

const PREDICTION_KEY_HEADER: &str = "Prediction-Key";

/// Connection settings for the prediction endpoint
#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    pub endpoint: String,
    pub prediction_key: String,
    pub timeout: Duration,
}

/// Prediction service client over HTTP
pub struct HttpClassifier {
    client: Client,
    endpoint: String,
    prediction_key: HeaderValue,
    timeout: Duration,
}

impl HttpClassifier {
    pub fn new(settings: ClassifierSettings) -> Result<Self> {
        let mut prediction_key = HeaderValue::from_str(&settings.prediction_key)
            .map_err(|_| ClassifierError::InvalidConfig("prediction key is not a valid header value".into()))?;
        prediction_key.set_sensitive(true);

        let client = Client::builder()
            .user_agent(concat!("badgerwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClassifierError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint,
            prediction_key,
            timeout: settings.timeout,
        })
    }

    // Headers are attached to each request, never to the shared client, so
    // nothing carries over between calls on a pooled connection.
    async fn classify_once(&self, image: Bytes) -> Result<ClassificationResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(PREDICTION_KEY_HEADER, self.prediction_key.clone())
            .header(CONTENT_TYPE, mime::APPLICATION_OCTET_STREAM.as_ref())
            .body(image)
            .send()
            .await
            .map_err(|e| ClassifierError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClassifierError::Request(format!("failed to read body: {}", e)))?;

        if !status.is_success() {
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(ClassificationResponse::from_slice(&body)?)
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, image: Bytes) -> Result<ClassificationResponse> {
        info!(endpoint = %self.endpoint, size = image.len(), "Sending image to classifier");

        let result = match tokio::time::timeout(self.timeout, self.classify_once(image)).await {
            Ok(result) => result,
            Err(_) => Err(ClassifierError::Timeout(self.timeout)),
        };

        match &result {
            Ok(response) => {
                debug!(predictions = response.predictions.len(), "Received predictions");
            }
            Err(e) => warn!(endpoint = %self.endpoint, error = %e, "Classification failed"),
        }

        result
    }
}
