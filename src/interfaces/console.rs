//! コンソールインターフェース
//!
//! ブラウザを使わずにコマンドラインから説明取得・再生成・抽出を実行する

use crate::application::use_cases::{
    CaptureSnapshotUseCase, ExportResultUseCase, ScanSession, WorkflowController,
};
use crate::domain::capture::CaptureError;
use crate::domain::design::{
    DesignService, PendingOperation, ProductType, SessionSnapshot, WorkflowError,
};
use crate::domain::shared::ImageBlob;
use crate::infrastructure::capture::{FileImageSource, InMemoryPreviewStore, SpoolDirectoryCamera};
use crate::infrastructure::download::DirectoryDownloadTarget;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

/// 画像の取得元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// 画像ファイルを直接指定
    Files(Vec<PathBuf>),
    /// スプールディレクトリから1枚撮影
    Camera(PathBuf),
    /// スプールディレクトリから4方向のスキャン
    Scan(PathBuf),
}

/// 実行する処理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleAction {
    Describe,
    Recreate,
    Extract,
}

/// コマンドラインの1回分の実行
pub struct ConsoleRun {
    pub source: ImageSource,
    pub product: ProductType,
    pub action: ConsoleAction,
    pub output: PathBuf,
}

/// 画像取得からダウンロードまでを順に実行し、保存先（説明のみなら `None`）を返す
pub async fn run<R>(
    service: Arc<dyn DesignService>,
    request: ConsoleRun,
    input: &mut R,
) -> anyhow::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let previews = Arc::new(InMemoryPreviewStore::new());
    let controller = Arc::new(WorkflowController::new(service, previews.clone()));

    let images = acquire_images(&request.source, previews, input).await?;
    println!("🖼️  {} image(s) selected", images.len());
    controller.select_images(images).await?;

    let snapshot = with_loading(
        &controller,
        PendingOperation::Describing,
        controller.request_description(request.product),
    )
    .await?;
    print_description(&snapshot);

    match request.action {
        ConsoleAction::Describe => {
            controller.reset().await;
            return Ok(None);
        }
        ConsoleAction::Recreate => {
            with_loading(
                &controller,
                PendingOperation::Recreating,
                controller.request_recreate(),
            )
            .await?;
        }
        ConsoleAction::Extract => {
            with_loading(
                &controller,
                PendingOperation::Extracting,
                controller.request_extract_original(request.product),
            )
            .await?;
        }
    }

    let export = ExportResultUseCase::new(
        controller.clone(),
        Arc::new(DirectoryDownloadTarget::new(&request.output)),
    );
    let location = export.execute().await?;
    println!("💾 Saved: {location}");

    controller.reset().await;
    Ok(Some(location))
}

/// ローディング表示を出してからリモート操作を待つ
async fn with_loading<F>(
    controller: &WorkflowController,
    operation: PendingOperation,
    request: F,
) -> Result<SessionSnapshot, WorkflowError>
where
    F: Future<Output = Result<SessionSnapshot, WorkflowError>>,
{
    if let Some(text) = operation.loading_text() {
        println!("⏳ {text}");
    }
    let result = request.await;
    if let Err(e) = &result {
        let snapshot = controller.snapshot().await;
        warn!(state = %snapshot.state, "操作に失敗しました: {}", e);
    }
    result
}

fn print_description(snapshot: &SessionSnapshot) {
    if let Some(description) = &snapshot.description {
        println!();
        println!("📝 Design description");
        println!("{description}");
        println!();
    }
}

async fn acquire_images<R>(
    source: &ImageSource,
    previews: Arc<InMemoryPreviewStore>,
    input: &mut R,
) -> anyhow::Result<Vec<ImageBlob>>
where
    R: AsyncBufRead + Unpin,
{
    match source {
        ImageSource::Files(paths) => Ok(FileImageSource::load_all(paths)?),
        ImageSource::Camera(directory) => {
            let camera = Arc::new(SpoolDirectoryCamera::new(directory));
            println!("📷 Capturing from {}", directory.display());
            let frame = CaptureSnapshotUseCase::new(camera).execute()?;
            Ok(vec![frame])
        }
        ImageSource::Scan(directory) => {
            let camera = SpoolDirectoryCamera::new(directory);
            let session = ScanSession::start(&camera, previews)?;
            Ok(run_scan(session, input).await?)
        }
    }
}

/// 対話式の360°スキャン
///
/// Enter で撮影、`c` で中止
pub async fn run_scan<R>(mut session: ScanSession, input: &mut R) -> anyhow::Result<Vec<ImageBlob>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();

    while let Some(step) = session.progress().step {
        let progress = session.progress();
        println!(
            "🔄 Step {} of {}: {}",
            progress.step_index + 1,
            progress.total_steps,
            step.title
        );
        println!("   {}", step.instruction);
        println!("   Press Enter to capture, or type 'c' to cancel");

        line.clear();
        let read = input.read_line(&mut line).await?;
        if read == 0 || line.trim().eq_ignore_ascii_case("c") {
            session.cancel();
            anyhow::bail!("360° scan cancelled");
        }

        match session.capture() {
            Ok(progress) => info!(step_index = progress.step_index, "撮影しました"),
            Err(CaptureError::NoFrame) => {
                println!("   ⚠️  No new photo in the spool directory yet");
            }
            Err(e) => {
                session.cancel();
                return Err(e.into());
            }
        }
    }

    let images = session.finish()?;
    println!("✅ 360° scan complete");
    Ok(images)
}
