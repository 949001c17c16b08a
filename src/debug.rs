//! デバッグとログ機能
//!
//! プロジェクト全体のデバッグとログ機能を提供

use std::fs;
use tracing::{Level, debug, error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// デバッグ設定
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// ログレベル
    pub log_level: Level,
    /// ファイルログを有効にするか
    pub enable_file_logging: bool,
    /// ログファイルのディレクトリ
    pub log_directory: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            enable_file_logging: false,
            log_directory: "logs".to_string(),
        }
    }
}

impl DebugConfig {
    /// 開発環境用の設定
    pub fn development() -> Self {
        Self {
            log_level: Level::DEBUG,
            ..Self::default()
        }
    }

    /// 本番環境用の設定
    pub fn production() -> Self {
        Self {
            log_level: Level::INFO,
            enable_file_logging: true,
            log_directory: "/var/log/brand-extractor".to_string(),
        }
    }

    /// ファイルログの出力先を変更
    pub fn with_log_directory(mut self, directory: impl Into<String>) -> Self {
        self.log_directory = directory.into();
        self
    }

    /// 環境変数のフィルターが無い場合に使うディレクティブ
    pub fn default_directive(&self) -> String {
        format!("brand_extractor={}", self.log_level)
    }
}

/// ログシステムを初期化
pub fn init_logging(config: &DebugConfig) -> Result<(), Box<dyn std::error::Error>> {
    // 環境変数からのフィルター設定
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.default_directive())?,
    };

    if config.enable_file_logging {
        fs::create_dir_all(&config.log_directory)?;
        let file_appender = RollingFileAppender::new(
            Rotation::DAILY,
            &config.log_directory,
            "brand-extractor.log",
        );

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(file_appender)
            .json()
            .try_init()
            .map_err(|e| -> Box<dyn std::error::Error> { e })?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .pretty()
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| -> Box<dyn std::error::Error> { e })?;
    }

    info!("ログシステムが初期化されました");
    debug!("デバッグ設定: {:?}", config);

    Ok(())
}

/// エラーの詳細情報をログに出力
pub fn log_error_details(error: &(dyn std::error::Error + 'static), context: &str) {
    error!(
        context = context,
        error = %error,
        "エラーが発生しました"
    );

    // エラーチェーンをログに出力
    let mut source = error.source();
    let mut level = 1;
    while let Some(err) = source {
        error!(
            context = context,
            level = level,
            source_error = %err,
            "エラーの原因"
        );
        source = err.source();
        level += 1;
    }
}

/// パフォーマンス測定用のマクロ
#[macro_export]
macro_rules! measure_time {
    ($name:expr, $block:block) => {{
        let start = std::time::Instant::now();
        let result = $block;
        let duration = start.elapsed();
        tracing::info!(
            operation = $name,
            duration_ms = duration.as_millis() as u64,
            "操作完了"
        );
        result
    }};
}
