use crate::constants::endpoints;
use crate::errors::ToolError;
use crate::managers::format::{download_tip, images_in, model_line, render_images, seed_line};
use crate::managers::remote::{GenerationOptions, RemoteOperation, RemoteTool, Transport, Upload};
use crate::services::validation::Validation;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct ReplaceBackgroundParams {
    pub image_file: String,
    /// Describes the new background.
    pub prompt: String,
    pub options: GenerationOptions,
}

pub struct ReplaceBackground;

pub type ReplaceBackgroundTool = RemoteTool<ReplaceBackground>;

impl RemoteOperation for ReplaceBackground {
    type Params = ReplaceBackgroundParams;

    const TOOL: &'static str = "replace_background";
    const ENDPOINT: &'static str = endpoints::REPLACE_BACKGROUND;
    const ACTION: &'static str = "Background replacement";
    const TRANSPORT: Transport = Transport::Multipart;

    fn parse(validation: &Validation, args: &Value) -> Result<Self::Params, ToolError> {
        Ok(ReplaceBackgroundParams {
            image_file: validation.ensure_string(args.get("image_file"), "image_file", true)?,
            prompt: validation.ensure_string(args.get("prompt"), "prompt", false)?,
            options: GenerationOptions::parse(validation, args)?,
        })
    }

    fn image_request(params: &Self::Params) -> Option<Value> {
        let mut request = Map::new();
        request.insert("prompt".to_string(), Value::from(params.prompt.clone()));
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
            return "❌ No images with replaced backgrounds were generated. Please try with a different image or prompt."
                .to_string();
        }
        render_images(
            &format!(
                "✅ Successfully replaced background and generated {} result(s):",
                images.len()
            ),
            "Background Replaced Image",
            &images,
            |_| {
                let mut lines = vec![
                    format!("🌄 **New Background**: {}", params.prompt),
                    model_line(&params.options.model),
                ];
                lines.extend(seed_line(params.options.seed));
                lines
            },
            &download_tip("these images with replaced backgrounds"),
        )
    }
}
