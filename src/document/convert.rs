use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

const CONVERT_TIMEOUT: Duration = Duration::from_secs(30);
const OUTPUT_POLL_ATTEMPTS: u32 = 10;
const OUTPUT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Conversion failed: {0}")]
    Failed(String),

    #[error("Conversion timed out")]
    TimedOut,

    #[error("PDF file was not created")]
    MissingOutput,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Port for document-to-PDF conversion. The production implementation
/// shells out to LibreOffice; tests substitute their own.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Converts `input` to a PDF placed beside it, returning the new path.
    async fn convert_to_pdf(&self, input: &Path) -> Result<PathBuf, ConvertError>;
}

/// Headless LibreOffice conversion. Host-environment dependent: `soffice`
/// must be installed and on PATH.
pub struct SofficeConverter;

/// The converter writes `<stem>.pdf` next to the input file.
fn output_path_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!("{}.pdf", stem))
}

#[async_trait]
impl DocumentConverter for SofficeConverter {
    async fn convert_to_pdf(&self, input: &Path) -> Result<PathBuf, ConvertError> {
        let output_dir = input.parent().unwrap_or_else(|| Path::new("."));
        let output_pdf = output_path_for(input);

        // A lingering soffice instance makes headless conversion hang;
        // kill any stale one first, ignoring absence.
        let _ = Command::new("killall")
            .arg("soffice.bin")
            .stderr(Stdio::null())
            .status()
            .await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        debug!("Converting {} with headless LibreOffice", input.display());

        let result = tokio::time::timeout(
            CONVERT_TIMEOUT,
            Command::new("soffice")
                .arg("--headless")
                .arg("--convert-to")
                .arg("pdf")
                .arg("--outdir")
                .arg(output_dir)
                .arg(input)
                .output(),
        )
        .await;

        let output = match result {
            Ok(output) => output?,
            Err(_) => return Err(ConvertError::TimedOut),
        };

        if !output.status.success() {
            return Err(ConvertError::Failed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        // soffice can exit before the file is fully written; poll briefly
        // for a non-empty output before declaring success.
        for _ in 0..OUTPUT_POLL_ATTEMPTS {
            match tokio::fs::metadata(&output_pdf).await {
                Ok(meta) if meta.len() > 0 => {
                    info!("Converted {} -> {}", input.display(), output_pdf.display());
                    return Ok(output_pdf);
                }
                _ => tokio::time::sleep(OUTPUT_POLL_INTERVAL).await,
            }
        }

        Err(ConvertError::MissingOutput)
    }
}
