//! # Web API Application State
//!
//! Shared state for the web surface: the orchestrator itself plus the
//! configuration the handlers report on.

use std::sync::Arc;

use crate::config::SmartfieldsConfig;
use crate::orchestration::PipelineOrchestrator;

/// State shared by every handler.
pub struct AppState {
    pub orchestrator: Arc<PipelineOrchestrator>,
    pub config: SmartfieldsConfig,
}

impl AppState {
    pub fn new(orchestrator: Arc<PipelineOrchestrator>, config: SmartfieldsConfig) -> Arc<Self> {
        Arc::new(Self {
            orchestrator,
            config,
        })
    }
}
