use crate::apply::RunReport;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a run. Per-file rename failures are reported as
/// [`crate::RenameOutcome::Failed`] instead.
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("フォルダが存在しません: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("フォルダではありません: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("フォルダを読めませんでした: {}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// `report` holds the outcomes of the files handled before the stop.
    #[error("ユーザーにより中断されました ({}件リネーム済み)", .report.stats.renamed)]
    Interrupted { report: Box<RunReport> },
}
