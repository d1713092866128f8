use std::sync::Arc;

use crate::classifier::{Classifier, ClassifierSettings, HttpClassifier};
use crate::config::Config;
use crate::detection::Detector;
use crate::observability::Metrics;
use crate::storage::StorageClient;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub detector: Detector,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, classifier: Arc<dyn Classifier>, storage: StorageClient) -> Self {
        let metrics = Arc::new(Metrics::new());
        Self {
            config: Arc::new(config),
            detector: Detector::new(classifier, storage, metrics.clone()),
            metrics,
        }
    }

    /// Wire the real classifier and storage backend from configuration
    pub fn from_config(config: Config) -> Result<Self, AnyError> {
        let prediction_key = config
            .classifier
            .prediction_key
            .clone()
            .ok_or("classifier prediction key is not configured")?;

        let classifier = HttpClassifier::new(ClassifierSettings {
            endpoint: config.classifier.endpoint.clone(),
            prediction_key,
            timeout: config.classifier.timeout(),
        })?;

        let storage = StorageClient::from_config(&config.storage)?;

        Ok(Self::new(config, Arc::new(classifier), storage))
    }
}
