use crate::constants::endpoints;
use crate::constants::ideogram::{ASPECT_RATIOS, DEFAULT_ASPECT_RATIO, STYLE_TYPES};
use crate::errors::ToolError;
use crate::managers::format::{download_tip, images_in, model_line, render_images, seed_line};
use crate::managers::remote::{GenerationOptions, RemoteOperation, RemoteTool, Transport};
use crate::services::validation::Validation;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct GenerateParams {
    pub prompt: String,
    pub aspect_ratio: String,
    pub style_type: Option<String>,
    pub options: GenerationOptions,
}

pub struct Generate;

pub type GenerateTool = RemoteTool<Generate>;

impl RemoteOperation for Generate {
    type Params = GenerateParams;

    const TOOL: &'static str = "generate";
    const ENDPOINT: &'static str = endpoints::GENERATE;
    const ACTION: &'static str = "Generation";
    const TRANSPORT: Transport = Transport::Json;

    fn parse(validation: &Validation, args: &Value) -> Result<Self::Params, ToolError> {
        Ok(GenerateParams {
            prompt: validation.ensure_string(args.get("prompt"), "prompt", false)?,
            aspect_ratio: validation
                .ensure_optional_choice(args.get("aspect_ratio"), "aspect_ratio", ASPECT_RATIOS)?
                .unwrap_or_else(|| DEFAULT_ASPECT_RATIO.to_string()),
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
        request.insert(
            "aspect_ratio".to_string(),
            Value::from(params.aspect_ratio.clone()),
        );
        if let Some(style) = &params.style_type {
            request.insert("style_type".to_string(), Value::from(style.clone()));
        }
        params.options.apply(&mut request);
        Some(Value::Object(request))
    }

    fn render(params: &Self::Params, response: &Value) -> String {
        let images = images_in(response);
        if images.is_empty() {
            return "❌ No images were generated. Please try again with different parameters."
                .to_string();
        }
        render_images(
            &format!("✅ Successfully generated {} image(s):", images.len()),
            "Image",
            &images,
            |_| {
                let mut lines = vec![
                    format!("📏 **Resolution**: Based on {}", params.aspect_ratio),
                    model_line(&params.options.model),
                ];
                lines.extend(seed_line(params.options.seed));
                lines
            },
            &download_tip("these images"),
        )
    }
}
