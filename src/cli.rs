use brand_extractor::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use brand_extractor::debug::DebugConfig;
use brand_extractor::domain::design::ProductType;
use brand_extractor::interfaces::console::ImageSource;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "brand-extractor",
    version,
    about = "Extract and recreate the artwork printed on a product",
    long_about = "Photograph a t-shirt, mug or other item, let a hosted multimodal AI describe its design, \
                  then recreate it as a clean print or extract the original on a transparent background"
)]
pub struct Cli {
    /// API key for the remote design service
    #[arg(long, env = "API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the remote design service
    #[arg(long, env = "BRAND_EXTRACTOR_BASE_URL", global = true, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "BRAND_EXTRACTOR_TIMEOUT", global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write JSON logs to daily files in this directory instead of stderr
    #[arg(long, value_name = "DIR", env = "BRAND_EXTRACTOR_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the web server
    Serve {
        /// Port to bind the web server to
        #[arg(short, long, default_value = "8080")]
        port: u16,
        /// Host to bind the web server to
        #[arg(short = 'H', long, default_value = "0.0.0.0")]
        host: String,
    },
    /// Describe the design on the product
    Describe {
        /// Product type: t-shirt, mug or item
        #[arg(long, default_value = "t-shirt")]
        product: ProductType,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Describe the design, then recreate it as a new print-ready image
    Recreate {
        /// Product type: t-shirt, mug or item
        #[arg(long, default_value = "t-shirt")]
        product: ProductType,
        /// Directory to save the result in
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Describe the design, then extract the original on a transparent background
    Extract {
        /// Product type: t-shirt, mug or item
        #[arg(long, default_value = "t-shirt")]
        product: ProductType,
        /// Directory to save the result in
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        #[command(flatten)]
        source: SourceArgs,
    },
}

/// 画像の取得元（いずれか1つ）
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Image files to use
    #[arg(long = "file", value_name = "PATH", num_args = 1..)]
    pub files: Vec<PathBuf>,
    /// Take a single photo from a camera spool directory
    #[arg(long, value_name = "DIR")]
    pub camera: Option<PathBuf>,
    /// Run a 4-step 360° scan from a camera spool directory
    #[arg(long, value_name = "DIR")]
    pub scan: Option<PathBuf>,
}

impl From<SourceArgs> for ImageSource {
    fn from(args: SourceArgs) -> Self {
        match (args.camera, args.scan) {
            (Some(directory), _) => ImageSource::Camera(directory),
            (None, Some(directory)) => ImageSource::Scan(directory),
            (None, None) => ImageSource::Files(args.files),
        }
    }
}

impl Cli {
    /// `--log-dir` 指定時は本番用のファイルログ、`--verbose` 指定時はデバッグレベル
    pub fn debug_config(&self) -> DebugConfig {
        let mut config = match &self.log_dir {
            Some(directory) => {
                DebugConfig::production().with_log_directory(directory.to_string_lossy())
            }
            None => DebugConfig::default(),
        };
        if self.verbose {
            config.log_level = DebugConfig::development().log_level;
        }
        config
    }

    /// `API_KEY` が無ければ `GEMINI_API_KEY` を使う
    pub fn resolved_api_key(&self) -> String {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .unwrap_or_default()
    }
}
