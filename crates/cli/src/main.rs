use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use log::{debug, LevelFilter};
use media_renamer_core::{
    apply_plan, app_paths, generate_plan, load_config, load_config_from, AppConfig,
    DryRunFileSystem, ExifCaptureReader, FileSystem, PlanOptions, RealFileSystem, RenameError,
    RenameOutcome, RunReport,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const EXIT_INTERRUPTED: u8 = 130;

#[derive(Debug, Parser)]
#[command(name = "media-renamer", version)]
#[command(about = "写真・動画を撮影日順に img_YYYYMMDD_N / vid_YYYYMMDD_N へ一括リネームします")]
struct Cli {
    /// 対象フォルダ (前後の引用符は取り除かれます)
    path: String,
    /// 実ファイルを変更せず結果だけ表示します
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// 設定ファイル (省略時はOS標準の設定ディレクトリ)
    #[arg(long)]
    config: Option<PathBuf>,
    /// ログを詳しくします (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", error_message(&err));
            ExitCode::from(exit_status(&err))
        }
    }
}

fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<RenameError>() {
        Some(RenameError::Interrupted { .. }) => EXIT_INTERRUPTED,
        _ => 1,
    }
}

fn error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<RenameError>() {
        Some(RenameError::Interrupted { report }) => format!(
            "\n処理はユーザーにより中断されました ({}件リネーム済み)",
            report.stats.renamed
        ),
        Some(RenameError::DirectoryNotFound(path)) => {
            format!("エラー: '{}' フォルダが見つかりません", path.display())
        }
        _ => format!("\n予期しないエラーが発生しました: {err:#}"),
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match cli.config.as_deref() {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    init_logger(&config, cli.verbose);
    if cli.config.is_none() {
        if let Ok(paths) = app_paths() {
            debug!("設定ファイル: {}", paths.config_path.display());
        }
    }

    let cancel = install_interrupt_handler()?;

    let root = PathBuf::from(trim_quotes(&cli.path));
    let options = PlanOptions {
        root: root.clone(),
        extensions: config.media_extensions(),
    };

    println!("対象フォルダ: {}", root.display());
    let plan = generate_plan(&options, &ExifCaptureReader)?;
    println!("{}件のファイルを処理します", plan.entries.len());

    let mut fs: Box<dyn FileSystem> = if cli.dry_run {
        Box::new(DryRunFileSystem::from_directory(&root)?)
    } else {
        Box::new(RealFileSystem)
    };
    let report = match apply_plan(&plan, fs.as_mut(), cli.dry_run, &cancel) {
        Ok(report) => report,
        Err(RenameError::Interrupted { report }) => {
            // Files renamed before the stop stay renamed; show them.
            print_report(&report, cli.output)?;
            return Err(RenameError::Interrupted { report }.into());
        }
        Err(err) => return Err(err.into()),
    };
    print_report(&report, cli.output)?;

    if cli.dry_run {
        eprintln!("dry-runモード: 実ファイルは変更していません。");
    }

    Ok(())
}

fn init_logger(config: &AppConfig, verbosity: u8) {
    let level = match verbosity {
        0 => config.log_level.parse().unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .init();
}

/// First Ctrl+C stops before the next file, the second exits at once.
fn install_interrupt_handler() -> Result<Arc<AtomicBool>> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();

    ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            eprintln!("\n強制終了します");
            std::process::exit(i32::from(EXIT_INTERRUPTED));
        }
        eprintln!("\n中断を受け付けました。現在のファイルの処理後に停止します");
    })
    .context("Ctrl+Cハンドラを登録できませんでした")?;

    Ok(cancel)
}

fn trim_quotes(raw: &str) -> &str {
    raw.trim_matches('"').trim_matches('\'')
}

fn print_report(report: &RunReport, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Table => {
            print_table(report);
        }
    }
    Ok(())
}

fn print_table(report: &RunReport) {
    for outcome in &report.outcomes {
        match outcome {
            RenameOutcome::Renamed { from, to } => {
                println!("[OK] {} -> {}", file_name(from), file_name(to));
            }
            RenameOutcome::Skipped { path } => {
                println!("[SKIP] {}", file_name(path));
            }
            RenameOutcome::Failed {
                path,
                target,
                reason,
            } => {
                println!(
                    "[FAIL] {} -> {}: {}",
                    file_name(path),
                    file_name(target),
                    reason
                );
            }
        }
    }

    let stats = &report.stats;
    println!("\n処理完了");
    println!("リネーム: {}", stats.renamed);
    println!("変更なし: {}", stats.unchanged);
    println!("失敗: {}", stats.failed);
    println!(
        "集計: scanned={} media={} unsupported_skip={} hidden_skip={}",
        stats.scan.scanned_files,
        stats.scan.media_files,
        stats.scan.skipped_unsupported,
        stats.scan.skipped_hidden
    );
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
