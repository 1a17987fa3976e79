use crate::constants::endpoints;
use crate::errors::ToolError;
use crate::managers::format::first_description;
use crate::managers::remote::{RemoteOperation, RemoteTool, Transport, Upload};
use crate::services::validation::Validation;
use serde_json::Value;

pub struct Describe;

pub type DescribeTool = RemoteTool<Describe>;

impl RemoteOperation for Describe {
    /// Path of the image to describe.
    type Params = String;

    const TOOL: &'static str = "describe";
    const ENDPOINT: &'static str = endpoints::DESCRIBE;
    const ACTION: &'static str = "Description";
    const TRANSPORT: Transport = Transport::Multipart;

    fn parse(validation: &Validation, args: &Value) -> Result<Self::Params, ToolError> {
        validation.ensure_string(args.get("image_file"), "image_file", true)
    }

    fn image_request(_params: &Self::Params) -> Option<Value> {
        None
    }

    fn uploads(params: &Self::Params) -> Vec<Upload<'_>> {
        vec![Upload {
            field: "image_file",
            label: "image",
            path: params,
        }]
    }

    fn render(_params: &Self::Params, response: &Value) -> String {
        let Some(text) = first_description(response) else {
            return "❌ No description was generated. Please try with a different image."
                .to_string();
        };
        format!(
            "✅ **Image Description:**\n\n📝 **Description**: {}\n\n🔍 **Analysis**: The AI has analyzed the visual content, composition, colors, objects, and context within the image to provide this comprehensive description.\n",
            text
        )
    }
}
