use crate::media::{normalize_extension, MediaExtensions};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] =
    &[".jpg", ".jpeg", ".png", ".heic", ".bmp", ".tiff", ".webp"];
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] =
    &[".mp4", ".mov", ".avi", ".mkv", ".flv", ".wmv", ".m4v"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub image_extensions: Vec<String>,
    pub video_extensions: Vec<String>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            image_extensions: to_owned_list(DEFAULT_IMAGE_EXTENSIONS),
            video_extensions: to_owned_list(DEFAULT_VIDEO_EXTENSIONS),
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    pub fn media_extensions(&self) -> MediaExtensions {
        MediaExtensions::new(
            self.image_extensions.as_slice(),
            self.video_extensions.as_slice(),
        )
    }

    fn normalized(mut self) -> Self {
        self.image_extensions = normalize_list(&self.image_extensions);
        self.video_extensions = normalize_list(&self.video_extensions);
        self.log_level = self.log_level.trim().to_ascii_lowercase();
        self
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_path: PathBuf,
}

pub fn app_paths() -> Result<AppPaths> {
    let proj = ProjectDirs::from("com", "kelly", "media-renamer")
        .context("OS標準設定ディレクトリを取得できませんでした")?;
    let config_dir = proj.config_dir().to_path_buf();
    Ok(AppPaths {
        config_path: config_dir.join("config.toml"),
        config_dir,
    })
}

/// Loads `config.toml` from the OS config directory, or defaults when absent.
pub fn load_config() -> Result<AppConfig> {
    let paths = app_paths()?;
    if !paths.config_path.exists() {
        return Ok(AppConfig::default());
    }
    load_config_from(&paths.config_path)
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("設定ファイルを読めませんでした: {}", path.display()))?;

    let config = toml::from_str::<AppConfig>(&raw).context("設定ファイルのパースに失敗しました")?;
    Ok(config.normalized())
}

fn to_owned_list(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn normalize_list(values: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        let Some(ext) = normalize_extension(value) else {
            continue;
        };
        if !out.contains(&ext) {
            out.push(ext);
        }
    }
    out
}
