use crate::constants::endpoints;
use crate::constants::ideogram::STYLE_TYPES;
use crate::errors::ToolError;
use crate::managers::format::{download_tip, images_in, model_line, render_images, seed_line};
use crate::managers::remote::{GenerationOptions, RemoteOperation, RemoteTool, Transport, Upload};
use crate::services::validation::Validation;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct RemixParams {
    pub image_file: String,
    pub prompt: String,
    pub style_type: Option<String>,
    pub options: GenerationOptions,
}

pub struct Remix;

pub type RemixTool = RemoteTool<Remix>;

impl RemoteOperation for Remix {
    type Params = RemixParams;

    const TOOL: &'static str = "remix";
    const ENDPOINT: &'static str = endpoints::REMIX;
    const ACTION: &'static str = "Remix";
    const TRANSPORT: Transport = Transport::Multipart;

    fn parse(validation: &Validation, args: &Value) -> Result<Self::Params, ToolError> {
        Ok(RemixParams {
            image_file: validation.ensure_string(args.get("image_file"), "image_file", true)?,
            prompt: validation.ensure_string(args.get("prompt"), "prompt", false)?,
            style_type: validation.ensure_optional_choice(
                args.get("style_type"),
                "style_type",
                STYLE_TYPES,
            )?,
            options: GenerationOptions::parse(validation, args)?,
        })
    }

    fn image_request(params: &Self::Params) -> Option<Value> {
        let mut request = Map::new();
        request.insert("prompt".to_string(), Value::from(params.prompt.clone()));
        if let Some(style) = &params.style_type {
            request.insert("style_type".to_string(), Value::from(style.clone()));
        }
        params.options.apply(&mut request);
        Some(Value::Object(request))
    }

    fn uploads(params: &Self::Params) -> Vec<Upload<'_>> {
        vec![Upload {
            field: "image_file",
            label: "image",
            path: &params.image_file,
        }]
    }

    fn render(params: &Self::Params, response: &Value) -> String {
        let images = images_in(response);
        if images.is_empty() {
            return "❌ No remixed images were generated. Please try with a different image or prompt."
                .to_string();
        }
        render_images(
            &format!(
                "✅ Successfully remixed image and generated {} result(s):",
                images.len()
            ),
            "Remixed Image",
            &images,
            |_| {
                let mut lines = vec![model_line(&params.options.model)];
                lines.extend(seed_line(params.options.seed));
                lines
            },
            &download_tip("these remixed images"),
        )
    }
}
