use crate::config::ServerConfig;
use crate::errors::ToolError;
use crate::managers::describe::Describe;
use crate::managers::download::DownloadTool;
use crate::managers::edit::Edit;
use crate::managers::generate::Generate;
use crate::managers::reframe::Reframe;
use crate::managers::remix::Remix;
use crate::managers::remote::{RemoteOperation, RemoteTool};
use crate::managers::replace_background::ReplaceBackground;
use crate::managers::upscale::Upscale;
use crate::mcp::catalog::tool_catalog;
use crate::services::api_client::{IdeogramClient, ImageSource};
use crate::services::file_manager::FileManager;
use crate::services::logger::Logger;
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use crate::services::validation::Validation;
use std::collections::HashMap;
use std::sync::Arc;

struct RemoteWiring<'a> {
    client: &'a Arc<IdeogramClient>,
    files: &'a Arc<FileManager>,
    validation: &'a Validation,
}

impl RemoteWiring<'_> {
    fn register<O: RemoteOperation>(&self, handlers: &mut HashMap<String, Arc<dyn ToolHandler>>) {
        let tool = RemoteTool::<O>::new(
            self.client.clone(),
            self.files.clone(),
            self.validation.clone(),
        );
        handlers.insert(O::TOOL.to_string(), Arc::new(tool));
    }
}

pub struct App {
    pub logger: Logger,
    pub client: Arc<IdeogramClient>,
    pub file_manager: Arc<FileManager>,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    fn validate_tool_wiring(
        handlers: &HashMap<String, Arc<dyn ToolHandler>>,
    ) -> Result<(), ToolError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| !handlers.contains_key(&tool.name))
            .map(|tool| tool.name.clone())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(ToolError::internal("Tool wiring is incomplete")
            .with_hint("Every tool in tool_catalog.json must have a handler")
            .with_details(serde_json::json!({ "missing_tools": missing })))
    }

    pub fn initialize(config: ServerConfig) -> Result<Self, ToolError> {
        let mut logger = Logger::new("ideogram");
        if let Some(level) = config.log_level {
            logger.set_level(level);
        }
        let validation = Validation::new();

        let client = Arc::new(
            IdeogramClient::new(config.request.clone(), &logger)
                .map_err(|err| ToolError::internal(err.to_string()))?,
        );
        let source: Arc<dyn ImageSource> = client.clone();
        let file_manager = Arc::new(FileManager::new(&logger, source, config.limits));

        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        let remote = RemoteWiring {
            client: &client,
            files: &file_manager,
            validation: &validation,
        };
        remote.register::<Generate>(&mut handlers);
        remote.register::<Edit>(&mut handlers);
        remote.register::<Describe>(&mut handlers);
        remote.register::<Remix>(&mut handlers);
        remote.register::<Reframe>(&mut handlers);
        remote.register::<ReplaceBackground>(&mut handlers);
        remote.register::<Upscale>(&mut handlers);
        handlers.insert(
            "download_images".to_string(),
            Arc::new(DownloadTool::new(file_manager.clone(), validation.clone())),
        );

        Self::validate_tool_wiring(&handlers)?;

        let tool_executor = Arc::new(ToolExecutor::new(&logger, handlers));

        Ok(Self {
            logger,
            client,
            file_manager,
            tool_executor,
        })
    }
}
