use crate::constants::endpoints;
use crate::constants::ideogram::ASPECT_RATIOS;
use crate::errors::ToolError;
use crate::managers::format::{download_tip, images_in, model_line, render_images, seed_line};
use crate::managers::remote::{GenerationOptions, RemoteOperation, RemoteTool, Transport, Upload};
use crate::services::validation::Validation;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct ReframeParams {
    pub image_file: String,
    pub aspect_ratio: String,
    pub options: GenerationOptions,
}

/// Extends an image to a new aspect ratio. No prompt.
pub struct Reframe;

pub type ReframeTool = RemoteTool<Reframe>;

impl RemoteOperation for Reframe {
    type Params = ReframeParams;

    const TOOL: &'static str = "reframe";
    const ENDPOINT: &'static str = endpoints::REFRAME;
    const ACTION: &'static str = "Reframe";
    const TRANSPORT: Transport = Transport::Multipart;

    fn parse(validation: &Validation, args: &Value) -> Result<Self::Params, ToolError> {
        Ok(ReframeParams {
            image_file: validation.ensure_string(args.get("image_file"), "image_file", true)?,
            aspect_ratio: validation.ensure_choice(
                args.get("aspect_ratio"),
                "aspect_ratio",
                ASPECT_RATIOS,
            )?,
            options: GenerationOptions::parse(validation, args)?,
        })
    }

    fn image_request(params: &Self::Params) -> Option<Value> {
        let mut request = Map::new();
        request.insert(
            "aspect_ratio".to_string(),
            Value::from(params.aspect_ratio.clone()),
        );
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
            return "❌ No reframed images were generated. Please try with a different image or aspect ratio."
                .to_string();
        }
        render_images(
            &format!(
                "✅ Successfully reframed image to {} and generated {} result(s):",
                params.aspect_ratio,
                images.len()
            ),
            "Reframed Image",
            &images,
            |_| {
                let mut lines = vec![
                    format!("📏 **Aspect Ratio**: {}", params.aspect_ratio),
                    model_line(&params.options.model),
                ];
                lines.extend(seed_line(params.options.seed));
                lines
            },
            &download_tip("these reframed images"),
        )
    }
}
