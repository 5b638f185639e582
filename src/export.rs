use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, ImageEncoder, RgbaImage};
use log::{info, warn};
use serde::Serialize;

use crate::error::{IconError, Result};
use crate::icon::IconComposer;
use crate::logger::log_error;
use crate::resize;

/// Output file name and edge length of every exported icon.
pub const ICON_SIZES: [(&str, u32); 5] = [
    ("icon_1024.png", 1024),
    ("icon_180.png", 180),
    ("icon_152.png", 152),
    ("icon_120.png", 120),
    ("icon_76.png", 76),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Stop at the first failing file; later entries are reported as skipped.
    #[default]
    FailFast,
    ContinueOnError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "lowercase")]
pub enum ExportStatus {
    Written,
    Failed(String),
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportEntry {
    pub file_name: String,
    pub size: u32,
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: ExportStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    /// Font used for badge text; `None` for resized batches.
    pub font: Option<String>,
    pub source: Option<PathBuf>,
    pub generated_at: DateTime<Local>,
    pub entries: Vec<ExportEntry>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.entries.iter().all(|e| e.status == ExportStatus::Written)
    }

    pub fn written(&self) -> usize {
        self.entries.iter().filter(|e| e.status == ExportStatus::Written).count()
    }

    pub fn first_error(&self) -> Option<&str> {
        self.entries.iter().find_map(|e| match &e.status {
            ExportStatus::Failed(msg) => Some(msg.as_str()),
            _ => None,
        })
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let body = serde_json::to_string_pretty(self)?;
        fs::write(path, body).map_err(|e| IconError::io(path, e))
    }
}

/// Writes `img` as RGBA PNG with maximum compression, replacing any existing file.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| IconError::io(path, e))?;
    let mut out = BufWriter::new(file);
    PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive)
        .write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgba8)
        .map_err(|source| IconError::Encode { path: path.to_path_buf(), source })?;
    out.flush().map_err(|e| IconError::io(path, e))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| IconError::io(dir, e))
}

/// Runs `render` for every table entry and writes the result into `dir`.
fn run_batch<F>(dir: &Path, policy: BatchPolicy, mut render: F) -> Result<Vec<ExportEntry>>
where
    F: FnMut(u32) -> Result<RgbaImage>,
{
    ensure_dir(dir)?;
    let mut entries = Vec::with_capacity(ICON_SIZES.len());
    let mut aborted = false;
    for (name, size) in ICON_SIZES {
        let path = dir.join(name);
        let status = if aborted {
            ExportStatus::Skipped
        } else {
            info!("generating {} ({}x{})", name, size, size);
            match render(size).and_then(|img| save_png(&img, &path)) {
                Ok(()) => {
                    info!("saved {}", path.display());
                    ExportStatus::Written
                }
                Err(e) => {
                    log_error(&format!("failed to export {}", name), &e);
                    aborted = policy == BatchPolicy::FailFast;
                    ExportStatus::Failed(e.to_string())
                }
            }
        };
        entries.push(ExportEntry { file_name: name.to_string(), size, path, status });
    }
    if aborted {
        warn!("batch aborted after the first failure");
    }
    Ok(entries)
}

/// Composes every icon size into `dir`.
pub fn export_generated(composer: &IconComposer, dir: &Path, policy: BatchPolicy) -> Result<BatchReport> {
    let entries = run_batch(dir, policy, |size| composer.compose(size))?;
    Ok(BatchReport {
        output_dir: dir.to_path_buf(),
        font: Some(composer.font().describe()),
        source: None,
        generated_at: Local::now(),
        entries,
    })
}

/// Resamples `source` to every icon size into `dir`. An unreadable source fails
/// the whole call before anything is written.
pub fn export_resized(source: &Path, dir: &Path, policy: BatchPolicy) -> Result<BatchReport> {
    let img = resize::load_source(source)?;
    let entries = run_batch(dir, policy, |size| resize::resize_to(&img, size))?;
    Ok(BatchReport {
        output_dir: dir.to_path_buf(),
        font: None,
        source: Some(source.to_path_buf()),
        generated_at: Local::now(),
        entries,
    })
}

/// Writes the optional JSON report and prints the outcome. True when every file was written.
pub fn conclude(report: &BatchReport, report_path: Option<&Path>) -> bool {
    if let Some(path) = report_path {
        match report.save_json(path) {
            Ok(()) => info!("report written to {}", path.display()),
            Err(e) => log_error("cannot write report", &e),
        }
    }
    if report.is_success() {
        info!("all {} icons written to {}", report.written(), report.output_dir.display());
        println!("Icons written to {}", report.output_dir.display());
        true
    } else {
        eprintln!(
            "error: {} of {} icons written, first failure: {}",
            report.written(),
            report.entries.len(),
            report.first_error().unwrap_or("unknown")
        );
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_in_descending_order() {
        let sizes: Vec<u32> = ICON_SIZES.iter().map(|&(_, s)| s).collect();
        assert_eq!(sizes, vec![1024, 180, 152, 120, 76]);
        for (name, size) in ICON_SIZES {
            assert_eq!(name, format!("icon_{}.png", size));
        }
    }

    #[test]
    fn fail_fast_skips_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let entries = run_batch(dir.path(), BatchPolicy::FailFast, |size| {
            if size == 180 {
                Err(IconError::InvalidInput("boom".into()))
            } else {
                Ok(RgbaImage::new(size, size))
            }
        })
        .unwrap();
        let statuses: Vec<_> = entries.iter().map(|e| e.status.clone()).collect();
        assert_eq!(statuses[0], ExportStatus::Written);
        assert!(matches!(statuses[1], ExportStatus::Failed(_)));
        assert!(statuses[2..].iter().all(|s| *s == ExportStatus::Skipped));
        assert!(!dir.path().join("icon_152.png").exists());
    }

    #[test]
    fn continue_on_error_finishes_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let entries = run_batch(dir.path(), BatchPolicy::ContinueOnError, |size| {
            if size == 180 {
                Err(IconError::InvalidInput("boom".into()))
            } else {
                Ok(RgbaImage::new(size, size))
            }
        })
        .unwrap();
        let written = entries.iter().filter(|e| e.status == ExportStatus::Written).count();
        assert_eq!(written, 4);
        assert!(dir.path().join("icon_76.png").exists());
    }

    #[test]
    fn saved_png_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        let mut img = RgbaImage::new(3, 3);
        img.put_pixel(1, 1, image::Rgba([9, 8, 7, 6]));
        save_png(&img, &path).unwrap();
        let back = image::open(&path).unwrap();
        assert_eq!(back.color(), ColorType::Rgba8);
        assert_eq!(back.to_rgba8().get_pixel(1, 1).0, [9, 8, 7, 6]);
    }

    #[test]
    fn report_serializes_status() {
        let report = BatchReport {
            output_dir: PathBuf::from("out"),
            font: Some("built-in".into()),
            source: None,
            generated_at: Local::now(),
            entries: vec![
                ExportEntry { file_name: "icon_76.png".into(), size: 76, path: "out/icon_76.png".into(), status: ExportStatus::Written },
                ExportEntry {
                    file_name: "icon_120.png".into(),
                    size: 120,
                    path: "out/icon_120.png".into(),
                    status: ExportStatus::Failed("disk full".into()),
                },
            ],
        };
        let v: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(v["entries"][0]["status"], "written");
        assert_eq!(v["entries"][1]["status"], "failed");
        assert_eq!(v["entries"][1]["error"], "disk full");
        assert!(!report.is_success());
        assert_eq!(report.written(), 1);
        assert_eq!(report.first_error(), Some("disk full"));
    }
}
