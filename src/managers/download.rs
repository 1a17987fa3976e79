use crate::errors::ToolError;
use crate::services::file_manager::{expand_home, BatchDownloadReport, FileManager};
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use crate::utils::text::format_kilobytes;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub struct DownloadTool {
    files: Arc<FileManager>,
    validation: Validation,
}

impl DownloadTool {
    pub fn new(files: Arc<FileManager>, validation: Validation) -> Self {
        Self { files, validation }
    }
}

#[async_trait]
impl ToolHandler for DownloadTool {
    async fn handle(&self, args: Value) -> Result<String, ToolError> {
        let urls = self.validation.ensure_url_list(args.get("urls"), "urls")?;
        let output_dir = self
            .validation
            .ensure_string(args.get("output_dir"), "output_dir", true)?;

        let report = self
            .files
            .download_images(&urls, &expand_home(&output_dir))
            .await;
        Ok(render_report(&report, &output_dir))
    }
}

pub fn render_report(report: &BatchDownloadReport, output_dir: &str) -> String {
    if !report.overall_succeeded && report.items.is_empty() {
        return format!(
            "❌ Download failed: {}",
            report.failure_reason.as_deref().unwrap_or("Unknown error")
        );
    }

    let mut out = String::from("📥 **Download Results:**\n\n");
    out.push_str(&format!(
        "📊 **Summary**: {}/{} downloads successful\n\n",
        report.counts.succeeded, report.counts.total
    ));

    let succeeded: Vec<_> = report.items.iter().filter(|item| item.succeeded).collect();
    if !succeeded.is_empty() {
        out.push_str("✅ **Successfully downloaded:**\n");
        for (idx, item) in succeeded.iter().enumerate() {
            let path = item
                .destination_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            out.push_str(&format!("{}. {}\n", idx + 1, path));
            if let Some(size) = item.byte_size.filter(|size| *size > 0) {
                out.push_str(&format!("   📦 Size: {}\n", format_kilobytes(size)));
            }
        }
        out.push('\n');
    }

    let failed: Vec<_> = report.items.iter().filter(|item| !item.succeeded).collect();
    if !failed.is_empty() {
        out.push_str("❌ **Failed downloads:**\n");
        for (idx, item) in failed.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", idx + 1, item.source_url));
            out.push_str(&format!(
                "   ❌ Error: {}\n",
                item.failure_reason.as_deref().unwrap_or("Unknown error")
            ));
        }
        out.push('\n');
    }

    out.push_str(&format!("📁 **Output directory**: {}\n", output_dir));
    out.push_str("💡 **Tip**: Downloaded images are ready for use with edit or describe tools.");
    out
}
