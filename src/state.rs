//! Application State
//!
//! Owns the long-lived services: configuration, workspace memory, the
//! semantic graph, the AI client, the agent manager and the command registry.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use ghostline_core::SemanticGraph;
use ghostline_llm::AiClient;
use ghostline_tools::CommandRegistry;
use tokio::sync::RwLock;

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::services::agents::{AgentManager, AgentManagerConfig};
use crate::services::memory::WorkspaceMemory;
use crate::services::prompt_builder::PromptBuilder;
use crate::services::refactor::RefactorPipeline;
use crate::storage::ConfigService;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::memory_path;

pub struct AppState {
    /// Configuration service for app settings
    config: Arc<RwLock<ConfigService>>,
    /// Effective configuration after environment overrides
    effective: AppConfig,
    memory: Arc<WorkspaceMemory>,
    graph: Arc<dyn SemanticGraph>,
    ai_client: Arc<AiClient>,
    agents: Arc<AgentManager>,
    commands: Arc<Mutex<CommandRegistry>>,
}

impl AppState {
    /// Build state from `~/.ghostline/config.json`.
    pub fn load(graph: Arc<dyn SemanticGraph>) -> AppResult<Self> {
        Self::from_config_service(ConfigService::new()?, graph)
    }

    /// Build state from the config file at `config_path`.
    pub fn open(config_path: impl Into<PathBuf>, graph: Arc<dyn SemanticGraph>) -> AppResult<Self> {
        Self::from_config_service(ConfigService::open(config_path)?, graph)
    }

    fn from_config_service(
        service: ConfigService,
        graph: Arc<dyn SemanticGraph>,
    ) -> AppResult<Self> {
        let mut effective = service.get_config_clone();
        effective.apply_env_overrides();
        effective.validate().map_err(AppError::validation)?;

        let ai_client = AiClient::from_config(
            effective.provider_config().map_err(AppError::config)?,
        )?;

        let memory_file = match &effective.memory_file {
            Some(path) => path.clone(),
            None => memory_path()?,
        };
        let memory = Arc::new(WorkspaceMemory::open(memory_file));

        let agents = AgentManager::new(
            Arc::clone(&memory),
            Arc::clone(&graph),
            AgentManagerConfig {
                max_workers: effective.max_agent_workers,
            },
        );

        tracing::info!(
            backend = ai_client.provider_name(),
            workers = effective.max_agent_workers,
            "application state ready"
        );

        Ok(Self {
            config: Arc::new(RwLock::new(service)),
            effective,
            memory,
            graph,
            ai_client: Arc::new(ai_client),
            agents: Arc::new(agents),
            commands: Arc::new(Mutex::new(CommandRegistry::new())),
        })
    }

    /// Configuration in effect for this session.
    pub fn effective_config(&self) -> &AppConfig {
        &self.effective
    }

    /// Stored configuration, without environment overrides.
    pub async fn get_config(&self) -> AppConfig {
        self.config.read().await.get_config_clone()
    }

    /// Update and persist the stored configuration. Takes effect on the
    /// next `AppState` construction.
    pub async fn update_config(&self, update: SettingsUpdate) -> AppResult<AppConfig> {
        self.config.write().await.update_config(update)
    }

    pub fn is_config_healthy(&self) -> bool {
        self.config
            .try_read()
            .map(|config| config.is_healthy())
            .unwrap_or(false)
    }

    pub fn memory(&self) -> &Arc<WorkspaceMemory> {
        &self.memory
    }

    pub fn graph(&self) -> &Arc<dyn SemanticGraph> {
        &self.graph
    }

    pub fn ai_client(&self) -> &Arc<AiClient> {
        &self.ai_client
    }

    pub fn agents(&self) -> &Arc<AgentManager> {
        &self.agents
    }

    pub fn commands(&self) -> MutexGuard<'_, CommandRegistry> {
        self.commands.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Prompt builder over this session's memory and graph.
    pub fn prompt_builder(&self) -> PromptBuilder {
        PromptBuilder::new(Some(Arc::clone(&self.memory)), Some(Arc::clone(&self.graph)))
    }

    pub fn refactor_pipeline(&self) -> RefactorPipeline {
        RefactorPipeline::new(Arc::clone(&self.ai_client))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.ai_client.provider_name())
            .field("memory", &self.memory.path())
            .finish()
    }
}
