mod common;

use common::{client_for, file_manager, quiet_logger, StubSource, ENV_LOCK, TEST_API_KEY};
use ideogram_mcp::config::FileLimits;
use ideogram_mcp::errors::ToolErrorKind;
use ideogram_mcp::managers::describe::DescribeTool;
use ideogram_mcp::managers::download::DownloadTool;
use ideogram_mcp::managers::edit::EditTool;
use ideogram_mcp::managers::generate::GenerateTool;
use ideogram_mcp::managers::reframe::ReframeTool;
use ideogram_mcp::managers::remix::RemixTool;
use ideogram_mcp::managers::replace_background::ReplaceBackgroundTool;
use ideogram_mcp::managers::upscale::UpscaleTool;
use ideogram_mcp::services::api_client::{IdeogramClient, ImageSource};
use ideogram_mcp::services::file_manager::FileManager;
use ideogram_mcp::services::tool_executor::ToolHandler;
use ideogram_mcp::services::validation::Validation;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Rig {
    server: MockServer,
    client: Arc<IdeogramClient>,
    files: Arc<FileManager>,
    scratch: tempfile::TempDir,
}

impl Rig {
    async fn start() -> Self {
        let server = MockServer::start().await;
        let client = client_for(&server.uri());
        let source: Arc<dyn ImageSource> = client.clone();
        let files = Arc::new(FileManager::new(&quiet_logger(), source, FileLimits::default()));
        Self {
            server,
            client,
            files,
            scratch: tempfile::tempdir().expect("tempdir"),
        }
    }

    fn image(&self, name: &str, body: &[u8]) -> String {
        let path = self.scratch.path().join(name);
        std::fs::write(&path, body).expect("write image");
        path.to_string_lossy().into_owned()
    }
}

fn images(urls: &[&str]) -> serde_json::Value {
    json!({ "data": urls.iter().map(|u| json!({"url": u, "is_image_safe": true})).collect::<Vec<_>>() })
}

#[tokio::test]
async fn generate_posts_json_with_defaults_and_renders_each_image() {
    let rig = Rig::start().await;
    Mock::given(method("POST"))
        .and(path("/ideogram-v3/generate"))
        .and(header("Api-Key", TEST_API_KEY))
        .and(body_json(json!({
            "image_request": {
                "prompt": "a lighthouse at dusk",
                "aspect_ratio": "ASPECT_1_1",
                "model": "V_2",
                "magic_prompt_option": "AUTO",
                "num_images": 1
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"url": "https://img/1.png", "is_image_safe": true},
                {"url": "https://img/2.png", "is_image_safe": false}
            ]
        })))
        .expect(1)
        .mount(&rig.server)
        .await;

    let tool = GenerateTool::new(rig.client.clone(), rig.files.clone(), Validation::new());
    let text = tool
        .handle(json!({"prompt": "a lighthouse at dusk"}))
        .await
        .expect("rendered");

    assert!(text.starts_with("✅ Successfully generated 2 image(s):\n\n**Image 1:**\n"));
    assert!(text.contains("🖼️ **URL**: https://img/1.png\n"));
    assert!(text.contains("**Image 2:**\n🖼️ **URL**: https://img/2.png\n⚠️ **Safety**: Content flagged as potentially unsafe\n"));
    assert!(text.contains("📏 **Resolution**: Based on ASPECT_1_1\n"));
    assert!(text.contains("🎨 **Model**: V_2\n"));
    assert!(!text.contains("🌱"));
    assert!(text.ends_with(
        "💡 **Tip**: Use the download_images tool to save these images locally."
    ));
}

#[tokio::test]
async fn generate_shows_seed_zero_and_explicit_options() {
    let rig = Rig::start().await;
    Mock::given(method("POST"))
        .and(path("/ideogram-v3/generate"))
        .and(body_json(json!({
            "image_request": {
                "prompt": "x",
                "aspect_ratio": "ASPECT_16_9",
                "model": "V_2_TURBO",
                "magic_prompt_option": "OFF",
                "seed": 0,
                "style_type": "ANIME",
                "num_images": 3
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(images(&["https://img/a.png"])))
        .expect(1)
        .mount(&rig.server)
        .await;

    let tool = GenerateTool::new(rig.client.clone(), rig.files.clone(), Validation::new());
    let text = tool
        .handle(json!({
            "prompt": "x",
            "aspect_ratio": "ASPECT_16_9",
            "model": "V_2_TURBO",
            "magic_prompt_option": "OFF",
            "seed": 0,
            "style_type": "ANIME",
            "num_images": 3
        }))
        .await
        .unwrap();

    assert!(text.contains("🌱 **Seed**: 0\n"));
    assert!(text.contains("Based on ASPECT_16_9"));
}

#[tokio::test]
async fn generate_failures_render_as_text() {
    let rig = Rig::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "Prompt rejected"})))
        .mount(&rig.server)
        .await;

    let tool = GenerateTool::new(rig.client.clone(), rig.files.clone(), Validation::new());
    let text = tool.handle(json!({"prompt": "x"})).await.unwrap();
    assert_eq!(text, "❌ Generation failed: API Error: Prompt rejected");
}

#[tokio::test]
async fn generate_with_no_images_says_so() {
    let rig = Rig::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&rig.server)
        .await;

    let tool = GenerateTool::new(rig.client.clone(), rig.files.clone(), Validation::new());
    let text = tool.handle(json!({"prompt": "x"})).await.unwrap();
    assert_eq!(
        text,
        "❌ No images were generated. Please try again with different parameters."
    );
}

#[tokio::test]
async fn invalid_arguments_are_tool_errors_not_text() {
    let rig = Rig::start().await;
    let tool = GenerateTool::new(rig.client.clone(), rig.files.clone(), Validation::new());

    let err = tool.handle(json!({"prompt": "  "})).await.unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::InvalidParams);

    let err = tool
        .handle(json!({"prompt": "x", "seed": 2147483648i64}))
        .await
        .unwrap_err();
    assert_eq!(err.message, "seed must be an integer between 0 and 2147483647");
}

#[tokio::test]
async fn edit_uploads_image_and_mask_as_multipart() {
    let rig = Rig::start().await;
    let image = rig.image("photo.png", b"IMAGEBYTES");
    let mask = rig.image("mask.png", b"MASKBYTES");
    Mock::given(method("POST"))
        .and(path("/edit"))
        .and(body_string_contains("name=\"image_file\"; filename=\"image.png\""))
        .and(body_string_contains("name=\"mask\"; filename=\"mask.png\""))
        .and(body_string_contains("IMAGEBYTES"))
        .and(body_string_contains("MASKBYTES"))
        .and(body_string_contains("\"prompt\":\"add a hat\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(images(&["https://img/e.png"])))
        .expect(1)
        .mount(&rig.server)
        .await;

    let tool = EditTool::new(rig.client.clone(), rig.files.clone(), Validation::new());
    let text = tool
        .handle(json!({"image_file": image, "mask": mask, "prompt": "add a hat", "seed": 42}))
        .await
        .unwrap();

    assert!(text.starts_with("✅ Successfully edited image and generated 1 result(s):"));
    assert!(text.contains("**Edited Image 1:**"));
    assert!(text.contains("🌱 **Seed**: 42\n"));
    assert!(text.ends_with("save these edited images locally."));
}

#[tokio::test]
async fn edit_with_unreadable_mask_never_calls_the_api() {
    let rig = Rig::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(images(&["https://img/e.png"])))
        .expect(0)
        .mount(&rig.server)
        .await;
    let image = rig.image("photo.jpg", b"IMAGEBYTES");
    let missing = rig.scratch.path().join("nope.png");

    let tool = EditTool::new(rig.client.clone(), rig.files.clone(), Validation::new());
    let text = tool
        .handle(json!({"image_file": image, "mask": missing.to_string_lossy(), "prompt": "x"}))
        .await
        .unwrap();

    assert_eq!(
        text,
        format!("❌ Failed to read mask file: File not found: {}", missing.display())
    );
}

#[tokio::test]
async fn describe_renders_the_first_description() {
    let rig = Rig::start().await;
    let image = rig.image("cat.webp", b"CATBYTES");
    Mock::given(method("POST"))
        .and(path("/describe"))
        .and(body_string_contains("filename=\"image.webp\""))
        .and(body_string_contains("Content-Type: image/webp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "descriptions": [{"text": "A cat on a sofa"}, {"text": "ignored"}]
        })))
        .expect(1)
        .mount(&rig.server)
        .await;

    let tool = DescribeTool::new(rig.client.clone(), rig.files.clone(), Validation::new());
    let text = tool.handle(json!({"image_file": image})).await.unwrap();

    assert!(text.starts_with("✅ **Image Description:**\n\n📝 **Description**: A cat on a sofa\n"));
    assert!(!text.contains("ignored"));
}

#[tokio::test]
async fn describe_rejects_unsupported_files_before_any_request() {
    let rig = Rig::start().await;
    let doc = rig.image("notes.txt", b"hello");

    let tool = DescribeTool::new(rig.client.clone(), rig.files.clone(), Validation::new());
    let text = tool.handle(json!({"image_file": doc})).await.unwrap();

    assert_eq!(
        text,
        "❌ Failed to read image file: Unsupported file type: .txt. Allowed: .jpg, .jpeg, .png, .webp, .gif"
    );
    assert!(rig.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn remix_reframe_and_replace_background_hit_their_endpoints() {
    let rig = Rig::start().await;
    let image = rig.image("in.jpg", b"JPEGBYTES");
    for endpoint in [
        "/ideogram-v3/remix",
        "/ideogram-v3/reframe",
        "/ideogram-v3/replace-background",
    ] {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .and(body_string_contains("name=\"image_request\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(images(&["https://img/r.png"])))
            .expect(1)
            .mount(&rig.server)
            .await;
    }

    let remix = RemixTool::new(rig.client.clone(), rig.files.clone(), Validation::new());
    let text = remix
        .handle(json!({"image_file": image, "prompt": "watercolor"}))
        .await
        .unwrap();
    assert!(text.contains("**Remixed Image 1:**"));

    let reframe = ReframeTool::new(rig.client.clone(), rig.files.clone(), Validation::new());
    let text = reframe
        .handle(json!({"image_file": image, "aspect_ratio": "ASPECT_9_16"}))
        .await
        .unwrap();
    assert!(text.starts_with("✅ Successfully reframed image to ASPECT_9_16 and generated 1 result(s):"));
    assert!(text.contains("📏 **Aspect Ratio**: ASPECT_9_16\n"));

    let replace =
        ReplaceBackgroundTool::new(rig.client.clone(), rig.files.clone(), Validation::new());
    let text = replace
        .handle(json!({"image_file": image, "prompt": "a beach"}))
        .await
        .unwrap();
    assert!(text.contains("🌄 **New Background**: a beach\n"));
}

#[tokio::test]
async fn reframe_requires_an_aspect_ratio() {
    let rig = Rig::start().await;
    let image = rig.image("in.jpg", b"JPEGBYTES");
    let tool = ReframeTool::new(rig.client.clone(), rig.files.clone(), Validation::new());
    let err = tool.handle(json!({"image_file": image})).await.unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::InvalidParams);
}

#[tokio::test]
async fn upscale_sends_effective_parameters() {
    let rig = Rig::start().await;
    let image = rig.image("small.png", b"SMALLBYTES");
    Mock::given(method("POST"))
        .and(path("/upscale"))
        .and(body_string_contains("\"resemblance\":0.0"))
        .and(body_string_contains("\"scale_factor\":4.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(images(&["https://img/up.png"])))
        .expect(1)
        .mount(&rig.server)
        .await;

    let tool = UpscaleTool::new(rig.client.clone(), rig.files.clone(), Validation::new());
    let text = tool
        .handle(json!({"image_file": image, "scale_factor": 4, "resemblance": 0}))
        .await
        .unwrap();

    assert!(text.contains("📈 **Scale Factor**: 4x\n"));
    assert!(text.contains("🔍 **Detail Scale**: 2\n"));
    assert!(text.contains("🎯 **Resemblance**: 0%\n"));
}

#[tokio::test]
async fn download_tool_reports_partial_success() {
    let rig = Rig::start().await;
    Mock::given(method("GET"))
        .and(path("/files/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 2048]))
        .mount(&rig.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/b.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&rig.server)
        .await;

    let out_dir = rig.scratch.path().join("out");
    let tool = DownloadTool::new(rig.files.clone(), Validation::new());
    let text = tool
        .handle(json!({
            "urls": [
                format!("{}/files/a.png", rig.server.uri()),
                format!("{}/files/b.png", rig.server.uri())
            ],
            "output_dir": out_dir.to_string_lossy()
        }))
        .await
        .unwrap();

    assert!(text.starts_with("📥 **Download Results:**\n\n📊 **Summary**: 1/2 downloads successful\n"));
    assert!(text.contains("✅ **Successfully downloaded:**\n1. "));
    assert!(text.contains("   📦 Size: 2.0 KB\n"));
    assert!(text.contains(&format!("❌ **Failed downloads:**\n1. {}/files/b.png\n", rig.server.uri())));
    assert!(text.contains("   ❌ Error: HTTP 404 Not Found\n"));
    assert!(text.contains(&format!("📁 **Output directory**: {}\n", out_dir.display())));
    assert!(text.ends_with("Downloaded images are ready for use with edit or describe tools."));
}

#[tokio::test]
async fn download_tool_expands_home_in_output_dir() {
    let _guard = ENV_LOCK.lock().await;
    let home = tempfile::tempdir().expect("tempdir");
    let previous = std::env::var_os("HOME");
    std::env::set_var("HOME", home.path());

    let source = Arc::new(StubSource::new().ok("https://x/a.png", b"12345"));
    let files = Arc::new(file_manager(source, FileLimits::default()));
    let tool = DownloadTool::new(files, Validation::new());
    let text = tool
        .handle(json!({"urls": ["https://x/a.png"], "output_dir": "~/pictures"}))
        .await
        .unwrap();

    match previous {
        Some(value) => std::env::set_var("HOME", value),
        None => std::env::remove_var("HOME"),
    }

    assert!(text.contains("1/1 downloads successful"));
    assert_eq!(std::fs::read_dir(home.path().join("pictures")).unwrap().count(), 1);
}

#[tokio::test]
async fn download_tool_short_circuits_on_directory_failure() {
    let blocker = tempfile::NamedTempFile::new().expect("tempfile");
    let source = Arc::new(StubSource::new().ok("https://x/a.png", b"12345"));
    let files = Arc::new(file_manager(source, FileLimits::default()));
    let tool = DownloadTool::new(files, Validation::new());

    let text = tool
        .handle(json!({
            "urls": ["https://x/a.png"],
            "output_dir": blocker.path().join("sub").to_string_lossy()
        }))
        .await
        .unwrap();

    assert!(text.starts_with("❌ Download failed: Failed to create output directory: "));
}

#[tokio::test]
async fn download_tool_rejects_empty_url_lists() {
    let files = Arc::new(file_manager(Arc::new(StubSource::new()), FileLimits::default()));
    let tool = DownloadTool::new(files, Validation::new());
    let err = tool
        .handle(json!({"urls": [], "output_dir": "/tmp/x"}))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::InvalidParams);
}

#[tokio::test]
async fn download_tool_runs_as_a_shared_handler_on_a_spawned_task() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let source = Arc::new(
        StubSource::new()
            .ok("https://x/a.png", b"12345")
            .ok("https://x/b.gif", b"GIF89a"),
    );
    let files = Arc::new(file_manager(source, FileLimits::default()));
    let handler: Arc<dyn ToolHandler> = Arc::new(DownloadTool::new(files, Validation::new()));
    let out_dir = scratch.path().join("out");
    let args = json!({
        "urls": ["https://x/a.png", "https://x/a.png", "https://x/b.gif"],
        "output_dir": out_dir.to_string_lossy()
    });

    let text = tokio::spawn(async move { handler.handle(args).await })
        .await
        .expect("join")
        .unwrap();

    assert!(text.contains("3/3 downloads successful"));
    assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 3);
}
