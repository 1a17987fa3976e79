use crate::constants::endpoints;
use crate::errors::ToolError;
use crate::managers::format::{download_tip, images_in, model_line, render_images, seed_line};
use crate::managers::remote::{GenerationOptions, RemoteOperation, RemoteTool, Transport, Upload};
use crate::services::validation::Validation;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct EditParams {
    pub image_file: String,
    pub mask: String,
    pub prompt: String,
    pub options: GenerationOptions,
}

/// Mask-based inpainting.
pub struct Edit;

pub type EditTool = RemoteTool<Edit>;

impl RemoteOperation for Edit {
    type Params = EditParams;

    const TOOL: &'static str = "edit";
    const ENDPOINT: &'static str = endpoints::EDIT;
    const ACTION: &'static str = "Edit";
    const TRANSPORT: Transport = Transport::Multipart;

    fn parse(validation: &Validation, args: &Value) -> Result<Self::Params, ToolError> {
        Ok(EditParams {
            image_file: validation.ensure_string(args.get("image_file"), "image_file", true)?,
            mask: validation.ensure_string(args.get("mask"), "mask", true)?,
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
        vec![
            Upload {
                field: "image_file",
                label: "image",
                path: &params.image_file,
            },
            Upload {
                field: "mask",
                label: "mask",
                path: &params.mask,
            },
        ]
    }

    fn render(params: &Self::Params, response: &Value) -> String {
        let images = images_in(response);
        if images.is_empty() {
            return "❌ No edited images were generated. Please check your mask and try again."
                .to_string();
        }
        render_images(
            &format!(
                "✅ Successfully edited image and generated {} result(s):",
                images.len()
            ),
            "Edited Image",
            &images,
            |_| {
                let mut lines = vec![model_line(&params.options.model)];
                lines.extend(seed_line(params.options.seed));
                lines
            },
            &download_tip("these edited images"),
        )
    }
}
