use crate::constants::ideogram::{
    DEFAULT_MAGIC_PROMPT, DEFAULT_MODEL, DEFAULT_NUM_IMAGES, MAGIC_PROMPT_OPTIONS, MODELS,
    NUM_IMAGES_MAX, NUM_IMAGES_MIN, SEED_MAX, SEED_MIN,
};
use crate::errors::ToolError;
use crate::services::api_client::{IdeogramClient, MultipartBody, OperationResult, RequestBody};
use crate::services::file_manager::{expand_home, mime_type_for, FileManager};
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// `{"image_request": {...}}` as the JSON body.
    Json,
    /// `image_request` as a JSON text field plus one part per upload.
    Multipart,
}

/// A local file that goes into the multipart body.
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    pub field: &'static str,
    pub label: &'static str,
    pub path: &'a str,
}

/// Per-endpoint behaviour plugged into [`RemoteTool`].
pub trait RemoteOperation: Send + Sync + 'static {
    type Params: Send + Sync;

    const TOOL: &'static str;
    const ENDPOINT: &'static str;
    /// Leads the failure line, as in "❌ Edit failed: ...".
    const ACTION: &'static str;
    const TRANSPORT: Transport;

    fn parse(validation: &Validation, args: &Value) -> Result<Self::Params, ToolError>;

    fn image_request(params: &Self::Params) -> Option<Value>;

    fn uploads(_params: &Self::Params) -> Vec<Upload<'_>> {
        Vec::new()
    }

    fn render(params: &Self::Params, response: &Value) -> String;
}

/// Validate, shape, call once, render. Every Ideogram endpoint goes through
/// this one handler.
pub struct RemoteTool<O> {
    client: Arc<IdeogramClient>,
    files: Arc<FileManager>,
    validation: Validation,
    _operation: PhantomData<fn() -> O>,
}

impl<O: RemoteOperation> RemoteTool<O> {
    pub fn new(client: Arc<IdeogramClient>, files: Arc<FileManager>, validation: Validation) -> Self {
        Self {
            client,
            files,
            validation,
            _operation: PhantomData,
        }
    }

    async fn shape(&self, params: &O::Params) -> Result<RequestBody, String> {
        let image_request = O::image_request(params);
        if O::TRANSPORT == Transport::Json {
            let mut body = Map::new();
            if let Some(request) = image_request {
                body.insert("image_request".to_string(), request);
            }
            return Ok(RequestBody::Json(Value::Object(body)));
        }

        let mut form = MultipartBody::new();
        if let Some(request) = image_request {
            form = form.text("image_request", request.to_string());
        }
        for upload in O::uploads(params) {
            let bytes = match self.files.read_image_file(upload.path).await {
                OperationResult::Success { value, .. } => value,
                OperationResult::Failure { reason, .. } => {
                    return Err(format!("❌ Failed to read {} file: {}", upload.label, reason))
                }
            };
            let mime = mime_type_for(&expand_home(upload.path));
            let file_name = format!(
                "{}.{}",
                upload.label,
                mime.rsplit('/').next().unwrap_or("jpeg")
            );
            form = form.file(upload.field, &file_name, mime, bytes);
        }
        Ok(RequestBody::Multipart(form))
    }
}

#[async_trait]
impl<O: RemoteOperation> ToolHandler for RemoteTool<O> {
    async fn handle(&self, args: Value) -> Result<String, ToolError> {
        let params = O::parse(&self.validation, &args)?;
        let body = match self.shape(&params).await {
            Ok(body) => body,
            Err(rendered) => return Ok(rendered),
        };
        Ok(match self.client.post(O::ENDPOINT, body).await {
            OperationResult::Success { value, .. } => O::render(&params, &value),
            OperationResult::Failure { reason, .. } => {
                format!("❌ {} failed: {}", O::ACTION, reason)
            }
        })
    }
}

/// Knobs shared by every image-producing endpoint, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    pub model: String,
    pub magic_prompt_option: String,
    pub seed: Option<i64>,
    pub num_images: i64,
}

impl GenerationOptions {
    pub fn parse(validation: &Validation, args: &Value) -> Result<Self, ToolError> {
        Ok(Self {
            model: validation
                .ensure_optional_choice(args.get("model"), "model", MODELS)?
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            magic_prompt_option: validation
                .ensure_optional_choice(
                    args.get("magic_prompt_option"),
                    "magic_prompt_option",
                    MAGIC_PROMPT_OPTIONS,
                )?
                .unwrap_or_else(|| DEFAULT_MAGIC_PROMPT.to_string()),
            seed: validation.ensure_optional_int(args.get("seed"), "seed", SEED_MIN, SEED_MAX)?,
            num_images: validation
                .ensure_optional_int(
                    args.get("num_images"),
                    "num_images",
                    NUM_IMAGES_MIN,
                    NUM_IMAGES_MAX,
                )?
                .unwrap_or(DEFAULT_NUM_IMAGES),
        })
    }

    /// Writes the options into an `image_request` object; an absent seed is
    /// left out.
    pub fn apply(&self, request: &mut Map<String, Value>) {
        request.insert("model".to_string(), Value::from(self.model.clone()));
        request.insert(
            "magic_prompt_option".to_string(),
            Value::from(self.magic_prompt_option.clone()),
        );
        if let Some(seed) = self.seed {
            request.insert("seed".to_string(), Value::from(seed));
        }
        request.insert("num_images".to_string(), Value::from(self.num_images));
    }
}
