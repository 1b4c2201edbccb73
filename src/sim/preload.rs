//! Preload stage
//!
//! Requests every asset of the manifest before the first level. A failed asset
//! is reported on screen and skipped; it never blocks the game.

use std::path::PathBuf;

use glam::Vec2;

use super::assets::{AssetEntry, MANIFEST};
use crate::engine::{Engine, TextId, TextSpec};
use crate::viewport_center;

const LOADING: &str = "Загрузка...";
const LOAD_ERROR_PREFIX: &str = "Ошибка загрузки: ";
const ERROR_COLOR: &str = "#ff8080";

/// Why an asset could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadFailure {
    /// Nothing at the asset's path
    NotFound,
    /// Server answered with a non-success status
    Status(u16),
    /// Local read error
    Io(String),
    /// Request never completed
    Network(String),
}

/// A single asset failed to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLoadError {
    pub key: &'static str,
    pub failure: LoadFailure,
}

impl std::fmt::Display for AssetLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.failure {
            LoadFailure::NotFound => write!(f, "asset '{}' not found", self.key),
            LoadFailure::Status(code) => write!(f, "asset '{}' returned HTTP {}", self.key, code),
            LoadFailure::Io(msg) => write!(f, "asset '{}' could not be read: {}", self.key, msg),
            LoadFailure::Network(msg) => write!(f, "asset '{}' request failed: {}", self.key, msg),
        }
    }
}

impl std::error::Error for AssetLoadError {}

/// Somewhere assets can be loaded from synchronously
pub trait AssetSource {
    fn load(&mut self, entry: &AssetEntry) -> Result<(), AssetLoadError>;
}

/// Assets on the local filesystem, relative to a root directory
#[derive(Debug, Clone)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirAssetSource {
    fn load(&mut self, entry: &AssetEntry) -> Result<(), AssetLoadError> {
        let path = self.root.join(entry.path);
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Ok(()),
            Ok(_) => Err(AssetLoadError {
                key: entry.key,
                failure: LoadFailure::NotFound,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AssetLoadError {
                key: entry.key,
                failure: LoadFailure::NotFound,
            }),
            Err(e) => Err(AssetLoadError {
                key: entry.key,
                failure: LoadFailure::Io(e.to_string()),
            }),
        }
    }
}

/// Outcome of the load batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: Vec<&'static str>,
    pub failed: Vec<AssetLoadError>,
}

impl LoadReport {
    pub fn reported(&self) -> usize {
        self.loaded.len() + self.failed.len()
    }
}

/// The loading screen
pub struct PreloadStage {
    expected: usize,
    report: LoadReport,
    status_text: TextId,
}

impl PreloadStage {
    /// Show the loading indicator
    pub fn start(engine: &mut dyn Engine) -> Self {
        let status_text = engine.add_text(TextSpec::new(viewport_center(), LOADING, 28.0).centered());
        log::info!("Preloading {} assets", MANIFEST.len());
        Self {
            expected: MANIFEST.len(),
            report: LoadReport::default(),
            status_text,
        }
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn status_text(&self) -> TextId {
        self.status_text
    }

    /// Every asset has reported, successfully or not
    pub fn is_complete(&self) -> bool {
        self.report.reported() >= self.expected
    }

    /// Record the result of one asset request
    pub fn record(&mut self, engine: &mut dyn Engine, entry: &AssetEntry, result: Result<(), AssetLoadError>) {
        match result {
            Ok(()) => {
                engine.register_texture(entry.texture());
                self.report.loaded.push(entry.key);
                log::info!("[OK] loaded: {}", entry.key);
            }
            Err(err) => {
                log::error!("[ERR] load error: {}", err);
                // Stack diagnostics below the loading text
                let offset = 40.0 + 20.0 * self.report.failed.len() as f32;
                engine.add_text(
                    TextSpec::new(
                        viewport_center() + Vec2::new(0.0, offset),
                        format!("{}{}", LOAD_ERROR_PREFIX, err.key),
                        16.0,
                    )
                    .centered()
                    .with_color(ERROR_COLOR),
                );
                self.report.failed.push(err);
            }
        }

        if self.is_complete() {
            log::info!(
                "Preload finished: {} loaded, {} failed",
                self.report.loaded.len(),
                self.report.failed.len()
            );
        }
    }

    /// Load the whole manifest from a synchronous source
    pub fn load_all(&mut self, engine: &mut dyn Engine, source: &mut dyn AssetSource) {
        for entry in &MANIFEST {
            let result = source.load(entry);
            self.record(engine, entry, result);
        }
    }
}
