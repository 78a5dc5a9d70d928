use std::sync::Arc;

use pima_core::Classifier;

/// Read-only state shared by every request.
pub struct ServerState {
    pub classifier: Arc<dyn Classifier>,
    pub model_name: String,
}

impl ServerState {
    pub fn new(classifier: Arc<dyn Classifier>, model_name: impl Into<String>) -> Self {
        Self {
            classifier,
            model_name: model_name.into(),
        }
    }
}
