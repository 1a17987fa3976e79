use crate::errors::{ErrorCode, McpError};
use serde_json::Value;

pub const GENERATE_IMAGE_PROMPT: &str = "generate_image";

pub fn list_prompts() -> Value {
    serde_json::json!({
        "prompts": [
            {
                "name": GENERATE_IMAGE_PROMPT,
                "description": "Generate an image using Ideogram AI",
                "arguments": [
                    {
                        "name": "description",
                        "description": "Description of the image to generate",
                        "required": true
                    }
                ]
            }
        ]
    })
}

/// Resolves `prompts/get` params into the rendered prompt messages.
pub fn get_prompt(params: &Value) -> Result<Value, McpError> {
    let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
    if name != GENERATE_IMAGE_PROMPT {
        return Err(McpError::new(
            ErrorCode::InvalidParams,
            format!("Unknown prompt: {}", name),
        ));
    }
    let description = params
        .get("arguments")
        .and_then(|args| args.get("description"))
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            McpError::new(
                ErrorCode::InvalidParams,
                "Prompt argument 'description' is required",
            )
        })?;

    Ok(serde_json::json!({
        "description": "Generate an image using Ideogram AI",
        "messages": [
            {
                "role": "user",
                "content": {
                    "type": "text",
                    "text": format!(
                        "Please generate an image based on this description: {}",
                        description
                    )
                }
            }
        ]
    }))
}
