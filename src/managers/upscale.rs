use crate::constants::endpoints;
use crate::constants::ideogram::{
    DEFAULT_DETAIL_SCALE, DEFAULT_RESEMBLANCE, DEFAULT_SCALE_FACTOR, DETAIL_SCALE_RANGE,
    RESEMBLANCE_RANGE, SCALE_FACTOR_RANGE,
};
use crate::errors::ToolError;
use crate::managers::format::{download_tip, image_block, images_in};
use crate::managers::remote::{RemoteOperation, RemoteTool, Transport, Upload};
use crate::services::validation::Validation;
use crate::utils::text::format_number;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct UpscaleParams {
    pub image_file: String,
    pub detail_scale: f64,
    pub scale_factor: f64,
    pub resemblance: f64,
}

pub struct Upscale;

pub type UpscaleTool = RemoteTool<Upscale>;

impl RemoteOperation for Upscale {
    type Params = UpscaleParams;

    const TOOL: &'static str = "upscale";
    const ENDPOINT: &'static str = endpoints::UPSCALE;
    const ACTION: &'static str = "Upscale";
    const TRANSPORT: Transport = Transport::Multipart;

    fn parse(validation: &Validation, args: &Value) -> Result<Self::Params, ToolError> {
        Ok(UpscaleParams {
            image_file: validation.ensure_string(args.get("image_file"), "image_file", true)?,
            detail_scale: validation
                .ensure_optional_number(args.get("detail_scale"), "detail_scale", DETAIL_SCALE_RANGE)?
                .unwrap_or(DEFAULT_DETAIL_SCALE),
            scale_factor: validation
                .ensure_optional_number(args.get("scale_factor"), "scale_factor", SCALE_FACTOR_RANGE)?
                .unwrap_or(DEFAULT_SCALE_FACTOR),
            resemblance: validation
                .ensure_optional_number(args.get("resemblance"), "resemblance", RESEMBLANCE_RANGE)?
                .unwrap_or(DEFAULT_RESEMBLANCE),
        })
    }

    fn image_request(params: &Self::Params) -> Option<Value> {
        Some(serde_json::json!({
            "detail_scale": params.detail_scale,
            "scale_factor": params.scale_factor,
            "resemblance": params.resemblance,
        }))
    }

    fn uploads(params: &Self::Params) -> Vec<Upload<'_>> {
        vec![Upload {
            field: "image_file",
            label: "image",
            path: &params.image_file,
        }]
    }

    fn render(params: &Self::Params, response: &Value) -> String {
        let Some(image) = images_in(response).into_iter().next() else {
            return "❌ No upscaled image was generated. Please try with a different image."
                .to_string();
        };
        let details = [
            format!("📈 **Scale Factor**: {}x", format_number(params.scale_factor)),
            format!("🔍 **Detail Scale**: {}", format_number(params.detail_scale)),
            format!("🎯 **Resemblance**: {}%", format_number(params.resemblance)),
        ];
        format!(
            "✅ Successfully upscaled image:\n\n{}\n{}",
            image_block("Upscaled Image", &image, &details),
            download_tip("this upscaled image")
        )
    }
}
