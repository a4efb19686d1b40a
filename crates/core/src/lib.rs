mod apply;
mod config;
mod error;
mod exif_reader;
mod media;
mod planner;
mod resolver;

pub use apply::{
    apply_plan, day_key, target_name, DayCounter, DryRunFileSystem, FileSystem, RealFileSystem,
    RenameOutcome, RenameStats, RunReport,
};
pub use config::{
    app_paths, load_config, load_config_from, AppConfig, AppPaths, DEFAULT_IMAGE_EXTENSIONS,
    DEFAULT_VIDEO_EXTENSIONS,
};
pub use error::RenameError;
pub use media::{MediaExtensions, MediaKind};
pub use planner::{generate_plan, MediaEntry, MediaPlan, PlanOptions, ScanStats};
pub use resolver::{resolve_date, CaptureTimeReader, DateSource, ExifCaptureReader, ResolvedDate};
