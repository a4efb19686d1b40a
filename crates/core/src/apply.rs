use crate::error::RenameError;
use crate::media::MediaKind;
use crate::planner::{MediaEntry, MediaPlan, ScanStats};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// The directory namespace the executor probes and renames in.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    fn rename(&mut self, from: &Path, to: &Path) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    /// Does not follow symlinks, so a dangling link still occupies its name.
    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn rename(&mut self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

/// In-memory copy of a directory listing; renames only move names around.
#[derive(Debug, Clone, Default)]
pub struct DryRunFileSystem {
    present: HashSet<PathBuf>,
}

impl DryRunFileSystem {
    pub fn from_directory(root: &Path) -> Result<Self, RenameError> {
        let read_err = |source| RenameError::ReadDir {
            path: root.to_path_buf(),
            source,
        };
        let mut present = HashSet::new();
        for entry in fs::read_dir(root).map_err(read_err)? {
            present.insert(entry.map_err(read_err)?.path());
        }
        Ok(Self { present })
    }
}

impl FileSystem for DryRunFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.present.contains(path)
    }

    fn rename(&mut self, from: &Path, to: &Path) -> io::Result<()> {
        if !self.present.remove(from) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("元ファイルがありません: {}", from.display()),
            ));
        }
        self.present.insert(to.to_path_buf());
        Ok(())
    }
}

/// Next free sequence number per `YYYYMMDD` key, shared by images and videos.
#[derive(Debug, Default)]
pub struct DayCounter {
    next: HashMap<String, u32>,
}

impl DayCounter {
    pub fn draw(&mut self, day_key: &str) -> u32 {
        let next = self.next.entry(day_key.to_string()).or_insert(1);
        let current = *next;
        *next += 1;
        current
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenameOutcome {
    Renamed {
        from: PathBuf,
        to: PathBuf,
    },
    Skipped {
        path: PathBuf,
    },
    Failed {
        path: PathBuf,
        target: PathBuf,
        reason: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RenameStats {
    #[serde(flatten)]
    pub scan: ScanStats,
    pub renamed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub root: PathBuf,
    pub dry_run: bool,
    pub outcomes: Vec<RenameOutcome>,
    pub stats: RenameStats,
}

pub fn day_key(entry: &MediaEntry) -> String {
    entry.taken.format("%Y%m%d").to_string()
}

pub fn target_name(kind: MediaKind, day_key: &str, sequence: u32, extension: &str) -> String {
    format!("{}_{}_{}{}", kind.prefix(), day_key, sequence, extension)
}

/// Renames every entry of `plan` in order, probing `fs` for collisions right
/// before each rename. `cancel` is checked between files.
pub fn apply_plan(
    plan: &MediaPlan,
    fs: &mut dyn FileSystem,
    dry_run: bool,
    cancel: &AtomicBool,
) -> Result<RunReport, RenameError> {
    let mut counter = DayCounter::default();
    let mut outcomes = Vec::with_capacity(plan.entries.len());
    let mut stats = RenameStats {
        scan: plan.stats.clone(),
        ..RenameStats::default()
    };

    for entry in &plan.entries {
        if cancel.load(Ordering::SeqCst) {
            return Err(RenameError::Interrupted {
                report: Box::new(RunReport {
                    root: plan.root.clone(),
                    dry_run,
                    outcomes,
                    stats,
                }),
            });
        }

        let outcome = match next_target(&plan.root, entry, &mut counter, &*fs) {
            None => {
                stats.unchanged += 1;
                RenameOutcome::Skipped {
                    path: entry.path.clone(),
                }
            }
            Some(target) => match fs.rename(&entry.path, &target) {
                Ok(()) => {
                    info!("{} -> {}", entry.path.display(), target.display());
                    stats.renamed += 1;
                    RenameOutcome::Renamed {
                        from: entry.path.clone(),
                        to: target,
                    }
                }
                Err(err) => {
                    warn!(
                        "リネームに失敗しました: {} -> {}: {err}",
                        entry.path.display(),
                        target.display()
                    );
                    stats.failed += 1;
                    RenameOutcome::Failed {
                        path: entry.path.clone(),
                        target,
                        reason: err.to_string(),
                    }
                }
            },
        };
        outcomes.push(outcome);
    }

    Ok(RunReport {
        root: plan.root.clone(),
        dry_run,
        outcomes,
        stats,
    })
}

/// `None` when the entry already carries its name.
fn next_target(
    root: &Path,
    entry: &MediaEntry,
    counter: &mut DayCounter,
    fs: &dyn FileSystem,
) -> Option<PathBuf> {
    let key = day_key(entry);
    let candidate_for =
        |sequence: u32| root.join(target_name(entry.kind, &key, sequence, &entry.extension));

    let mut candidate = candidate_for(counter.draw(&key));
    while candidate != entry.path && fs.exists(&candidate) {
        candidate = candidate_for(counter.draw(&key));
    }

    if candidate == entry.path {
        None
    } else {
        Some(candidate)
    }
}
