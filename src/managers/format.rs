use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub is_image_safe: Option<bool>,
    #[serde(default)]
    pub seed: Option<i64>,
    #[serde(default)]
    pub resolution: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Description {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DescribeResponse {
    #[serde(default)]
    descriptions: Vec<Description>,
}

/// Images in a `{data: [...]}` response; anything else reads as empty.
pub fn images_in(response: &Value) -> Vec<GeneratedImage> {
    serde_json::from_value::<ImageResponse>(response.clone())
        .map(|parsed| parsed.data)
        .unwrap_or_default()
}

pub fn first_description(response: &Value) -> Option<String> {
    serde_json::from_value::<DescribeResponse>(response.clone())
        .ok()?
        .descriptions
        .into_iter()
        .next()
        .map(|d| d.text.unwrap_or_default())
}

/// Per-image block: header, URL, safety flag, then caller-supplied lines.
pub fn image_block(title: &str, image: &GeneratedImage, details: &[String]) -> String {
    let mut out = format!("**{}:**\n", title);
    out.push_str(&format!(
        "🖼️ **URL**: {}\n",
        image.url.as_deref().unwrap_or("(not provided)")
    ));
    if image.is_image_safe == Some(false) {
        out.push_str("⚠️ **Safety**: Content flagged as potentially unsafe\n");
    }
    for line in details {
        out.push_str(line);
        out.push('\n');
    }
    out
}

pub fn model_line(model: &str) -> String {
    format!("🎨 **Model**: {}", model)
}

pub fn seed_line(seed: Option<i64>) -> Option<String> {
    seed.map(|seed| format!("🌱 **Seed**: {}", seed))
}

pub fn download_tip(what: &str) -> String {
    format!(
        "💡 **Tip**: Use the download_images tool to save {} locally.",
        what
    )
}

/// Renders a multi-image result: summary line, one block per image, tip.
pub fn render_images(
    summary: &str,
    title: &str,
    images: &[GeneratedImage],
    details: impl Fn(&GeneratedImage) -> Vec<String>,
    tip: &str,
) -> String {
    let mut out = format!("{}\n\n", summary);
    for (idx, image) in images.iter().enumerate() {
        out.push_str(&image_block(
            &format!("{} {}", title, idx + 1),
            image,
            &details(image),
        ));
        out.push('\n');
    }
    out.push_str(tip);
    out
}
