//! Application State
//!
//! Shared state across all handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::RwLock;
use std::sync::Arc;

use triage_agent::{DialogEngine, PredictionAdapter, TableDiseaseModel};
use triage_config::{load_settings, KnowledgeBase, Settings};
use triage_text_processing::{IntentDetector, LexiconSymptomExtractor};

use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration wrapped in RwLock for hot-reload support
    pub config: Arc<RwLock<Settings>>,
    /// Dialog engine with its collaborators
    pub engine: Arc<DialogEngine>,
    /// Prometheus handle; `None` when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
    /// Environment name for config reload
    env: Option<String>,
}

impl AppState {
    pub fn new(config: Settings, engine: Arc<DialogEngine>) -> Self {
        Self::with_env(config, engine, None)
    }

    /// Create application state with environment name for reload support
    pub fn with_env(config: Settings, engine: Arc<DialogEngine>, env: Option<String>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            engine,
            metrics: None,
            env,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Reload configuration from files
    ///
    /// Only settings read per request pick up the change (the default
    /// threshold for new conversations). Knowledge files and reply templates
    /// are bound into the engine at startup.
    pub fn reload_config(&self) -> Result<(), ServerError> {
        let new_config = load_settings(self.env.as_deref())?;

        let mut config = self.config.write();
        *config = new_config;

        tracing::info!(
            confidence_threshold = config.dialog.confidence_threshold,
            "Configuration reloaded successfully"
        );
        Ok(())
    }

    /// Get a read guard to the current configuration
    pub fn get_config(&self) -> parking_lot::RwLockReadGuard<'_, Settings> {
        self.config.read()
    }

    /// Threshold assigned to conversations started now
    pub fn default_threshold(&self) -> f32 {
        self.config.read().dialog.confidence_threshold
    }
}

/// Load the knowledge files and wire the reference collaborators
pub fn build_engine(settings: &Settings) -> Result<DialogEngine, ServerError> {
    let kb = KnowledgeBase::load(&settings.knowledge)?;

    let classifier = IntentDetector::from_config(&kb.intents);
    let extractor = LexiconSymptomExtractor::from_lexicon(&kb.symptoms)
        .map_err(|e| ServerError::Config(e.to_string()))?;
    let predictor = PredictionAdapter::new(TableDiseaseModel::from_table(&kb.diseases));

    Ok(DialogEngine::new(
        Arc::new(classifier),
        Arc::new(extractor),
        Arc::new(predictor),
        settings.dialog.clone(),
        settings.replies.clone(),
    ))
}
