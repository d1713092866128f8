use super::models::{Config, StorageProvider};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("classifier.endpoint is required")]
    MissingClassifierEndpoint,

    #[error("classifier.endpoint must be an http/https URL, got '{0}'")]
    InvalidClassifierEndpoint(String),

    #[error("Classifier prediction key missing (set CLASSIFIER_PREDICTION_KEY)")]
    MissingPredictionKey,

    #[error("Storage provider is dropbox but DROPBOX_ACCESS_TOKEN is not set")]
    MissingDropboxToken,

    #[error("Storage provider is local but storage.root is not set")]
    MissingLocalRoot,

    #[error("Timeout must be positive: {field} = {value}")]
    InvalidTimeout { field: String, value: u64 },

    #[error("server.max_upload_bytes must be positive")]
    InvalidUploadLimit,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_server(config)?;
    validate_classifier(config)?;
    validate_storage(config)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    if config.server.max_upload_bytes == 0 {
        return Err(ValidationError::InvalidUploadLimit);
    }
    Ok(())
}

fn validate_classifier(config: &Config) -> Result<(), ValidationError> {
    let classifier = &config.classifier;

    if classifier.endpoint.is_empty() {
        return Err(ValidationError::MissingClassifierEndpoint);
    }

    if !classifier.endpoint.starts_with("http://") && !classifier.endpoint.starts_with("https://") {
        return Err(ValidationError::InvalidClassifierEndpoint(
            classifier.endpoint.clone(),
        ));
    }

    if classifier.prediction_key.is_none() {
        return Err(ValidationError::MissingPredictionKey);
    }

    if classifier.timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout {
            field: "classifier.timeout_secs".to_string(),
            value: classifier.timeout_secs,
        });
    }

    Ok(())
}

fn validate_storage(config: &Config) -> Result<(), ValidationError> {
    let storage = &config.storage;

    match storage.provider {
        StorageProvider::Dropbox if storage.access_token.is_none() => {
            return Err(ValidationError::MissingDropboxToken);
        }
        StorageProvider::Local if storage.root.is_none() => {
            return Err(ValidationError::MissingLocalRoot);
        }
        _ => {}
    }

    if storage.timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout {
            field: "storage.timeout_secs".to_string(),
            value: storage.timeout_secs,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.classifier.endpoint = "https://vision.example.com/predict".to_string();
        config.classifier.prediction_key = Some("key".to_string());
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_endpoint() {
        let mut config = valid_config();
        config.classifier.endpoint.clear();

        assert!(matches!(
            validate(&config),
            Err(ValidationError::MissingClassifierEndpoint)
        ));
    }

    #[test]
    fn test_endpoint_scheme() {
        let mut config = valid_config();
        config.classifier.endpoint = "ftp://vision.example.com".to_string();

        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidClassifierEndpoint(_))
        ));
    }

    #[test]
    fn test_missing_prediction_key() {
        let mut config = valid_config();
        config.classifier.prediction_key = None;

        assert!(matches!(
            validate(&config),
            Err(ValidationError::MissingPredictionKey)
        ));
    }

    #[test]
    fn test_dropbox_requires_token() {
        let mut config = valid_config();
        config.storage.provider = StorageProvider::Dropbox;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::MissingDropboxToken)
        ));

        config.storage.access_token = Some("token".to_string());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_local_requires_root() {
        let mut config = valid_config();
        config.storage.provider = StorageProvider::Local;

        assert!(matches!(
            validate(&config),
            Err(ValidationError::MissingLocalRoot)
        ));
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let mut config = valid_config();
        config.classifier.timeout_secs = 0;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidTimeout { .. })
        ));

        let mut config = valid_config();
        config.storage.timeout_secs = 0;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidTimeout { .. })
        ));
    }

    #[test]
    fn test_zero_upload_limit_rejected() {
        let mut config = valid_config();
        config.server.max_upload_bytes = 0;

        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidUploadLimit)
        ));
    }
}
