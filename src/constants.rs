pub mod network {
    pub const DEFAULT_API_BASE: &str = "https://api.ideogram.ai/v1";
    pub const API_KEY_HEADER: &str = "Api-Key";
    pub const TIMEOUT_API_REQUEST_MS: u64 = 60_000;
    pub const TIMEOUT_DOWNLOAD_MS: u64 = 30_000;
}

pub mod env {
    pub const API_KEY: &str = "IDEOGRAM_API_KEY";
    pub const API_BASE: &str = "IDEOGRAM_API_BASE";
    pub const MAX_FILE_BYTES: &str = "IDEOGRAM_MAX_FILE_BYTES";
    pub const DOWNLOAD_CONCURRENCY: &str = "IDEOGRAM_DOWNLOAD_CONCURRENCY";
    pub const LOG_LEVEL: &str = "IDEOGRAM_LOG_LEVEL";
    pub const LOG_LEVEL_FALLBACK: &str = "LOG_LEVEL";
}

pub mod limits {
    pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
    pub const DOWNLOAD_CONCURRENCY: usize = 8;
    pub const MAX_LOG_STRING: usize = 2_048;
}

pub mod files {
    pub const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp", ".gif"];
    pub const DEFAULT_EXTENSION: &str = ".jpg";
    pub const FILENAME_PREFIX: &str = "image";
    pub const CLEANUP_MAX_AGE_MS: u64 = 24 * 60 * 60 * 1000;
}

pub mod protocols {
    pub const ALLOWED_HTTP: &[&str] = &["http:", "https:"];
}

pub mod ideogram {
    pub const ASPECT_RATIOS: &[&str] = &[
        "ASPECT_1_1",
        "ASPECT_16_9",
        "ASPECT_9_16",
        "ASPECT_4_3",
        "ASPECT_3_4",
    ];
    pub const MODELS: &[&str] = &["V_1", "V_2", "V_2_TURBO"];
    pub const MAGIC_PROMPT_OPTIONS: &[&str] = &["AUTO", "ON", "OFF"];
    pub const STYLE_TYPES: &[&str] = &[
        "AUTO",
        "GENERAL",
        "REALISTIC",
        "DESIGN",
        "RENDER_3D",
        "ANIME",
    ];

    pub const DEFAULT_ASPECT_RATIO: &str = "ASPECT_1_1";
    pub const DEFAULT_MODEL: &str = "V_2";
    pub const DEFAULT_MAGIC_PROMPT: &str = "AUTO";
    pub const DEFAULT_NUM_IMAGES: i64 = 1;

    pub const SEED_MIN: i64 = 0;
    pub const SEED_MAX: i64 = 2_147_483_647;
    pub const NUM_IMAGES_MIN: i64 = 1;
    pub const NUM_IMAGES_MAX: i64 = 8;

    pub const DETAIL_SCALE_RANGE: (f64, f64) = (1.0, 5.0);
    pub const SCALE_FACTOR_RANGE: (f64, f64) = (1.0, 4.0);
    pub const RESEMBLANCE_RANGE: (f64, f64) = (0.0, 100.0);
    pub const DEFAULT_DETAIL_SCALE: f64 = 2.0;
    pub const DEFAULT_SCALE_FACTOR: f64 = 2.0;
    pub const DEFAULT_RESEMBLANCE: f64 = 80.0;
}

pub mod endpoints {
    pub const GENERATE: &str = "/ideogram-v3/generate";
    pub const EDIT: &str = "/edit";
    pub const DESCRIBE: &str = "/describe";
    pub const REMIX: &str = "/ideogram-v3/remix";
    pub const REFRAME: &str = "/ideogram-v3/reframe";
    pub const REPLACE_BACKGROUND: &str = "/ideogram-v3/replace-background";
    pub const UPSCALE: &str = "/upscale";
}
