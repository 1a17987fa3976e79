pub mod app;
pub mod config;
pub mod constants;
pub mod errors;

pub mod managers {
    pub mod describe;
    pub mod download;
    pub mod edit;
    pub mod format;
    pub mod generate;
    pub mod reframe;
    pub mod remix;
    pub mod remote;
    pub mod replace_background;
    pub mod upscale;
}

pub mod mcp {
    pub mod catalog;
    pub mod prompts;
    pub mod protocol;
    pub mod server;
}

pub mod services {
    pub mod api_client;
    pub mod file_manager;
    pub mod logger;
    pub mod tool_executor;
    pub mod validation;
}

pub mod utils {
    pub mod redact;
    pub mod suggest;
    pub mod text;
}
