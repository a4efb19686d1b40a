use crate::exif_reader::read_capture_time;
use crate::media::MediaKind;
use chrono::{DateTime, Local, NaiveDateTime};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateSource {
    Exif,
    FileModified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub taken: NaiveDateTime,
    pub source: DateSource,
}

/// Source of embedded capture times. Any failure is reported as `None`.
pub trait CaptureTimeReader {
    fn capture_time(&self, path: &Path) -> Option<NaiveDateTime>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExifCaptureReader;

impl CaptureTimeReader for ExifCaptureReader {
    fn capture_time(&self, path: &Path) -> Option<NaiveDateTime> {
        match read_capture_time(path) {
            Ok(taken) => taken,
            Err(err) => {
                debug!("EXIF日時なし: {err:#}");
                None
            }
        }
    }
}

/// Capture time of images, modification time for everything else.
pub fn resolve_date(path: &Path, kind: MediaKind, reader: &dyn CaptureTimeReader) -> ResolvedDate {
    if kind == MediaKind::Image {
        if let Some(taken) = reader.capture_time(path) {
            return ResolvedDate {
                taken,
                source: DateSource::Exif,
            };
        }
    }

    ResolvedDate {
        taken: file_modified_to_local(path).unwrap_or_else(|| Local::now().naive_local()),
        source: DateSource::FileModified,
    }
}

fn file_modified_to_local(path: &Path) -> Option<NaiveDateTime> {
    let time = fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Local>::from(time).naive_local())
}
