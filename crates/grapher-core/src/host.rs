// File: crates/grapher-core/src/host.rs
// Summary: Host environment seam (container lookup, text measurement, downloads) and a headless host.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{ChartError, Result};
use crate::text::{ApproxTextMeasure, TextMeasure, TextSize};
use crate::types::{FONT_SIZE, HEIGHT, WIDTH};

/// Size and computed style of a container element.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementInfo {
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub color: String,
    pub background_color: String,
}

impl Default for ElementInfo {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            font_size: FONT_SIZE,
            color: "#000000".to_string(),
            background_color: "#ffffff".to_string(),
        }
    }
}

/// What a chart needs from the page (or whatever stands in for it).
pub trait Host {
    /// Container lookup; `None` when no element has this id.
    fn element(&self, id: &str) -> Option<ElementInfo>;

    fn measure_text(&self, text: &str, font_size: f32) -> TextSize;

    /// Hand generated bytes to the user under `filename`.
    fn offer_download(&self, filename: &str, bytes: &[u8]) -> Result<()>;
}

/// In-memory host for tests and command-line rendering.
///
/// Downloads are recorded and, when an output directory is set, written to disk.
pub struct HeadlessHost {
    elements: RefCell<HashMap<String, ElementInfo>>,
    downloads: RefCell<Vec<(String, Vec<u8>)>>,
    download_dir: Option<PathBuf>,
    measure: Box<dyn TextMeasure>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self {
            elements: RefCell::default(),
            downloads: RefCell::default(),
            download_dir: None,
            measure: Box::new(ApproxTextMeasure::default()),
        }
    }
}

impl HeadlessHost {
    pub fn new() -> Self { Self::default() }

    pub fn with_element(self, id: impl Into<String>, info: ElementInfo) -> Self {
        self.elements.borrow_mut().insert(id.into(), info);
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    pub fn with_text_measure(mut self, measure: Box<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    /// Add or replace a container (e.g. to simulate a resize).
    pub fn set_element(&self, id: impl Into<String>, info: ElementInfo) {
        self.elements.borrow_mut().insert(id.into(), info);
    }

    /// Every download offered so far, oldest first.
    pub fn downloads(&self) -> Vec<(String, Vec<u8>)> { self.downloads.borrow().clone() }
}

impl Host for HeadlessHost {
    fn element(&self, id: &str) -> Option<ElementInfo> { self.elements.borrow().get(id).cloned() }

    fn measure_text(&self, text: &str, font_size: f32) -> TextSize { self.measure.measure(text, font_size) }

    fn offer_download(&self, filename: &str, bytes: &[u8]) -> Result<()> {
        if let Some(dir) = &self.download_dir {
            std::fs::create_dir_all(dir)?;
            std::fs::write(dir.join(filename), bytes)?;
        }
        self.downloads.borrow_mut().push((filename.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Look up a container or fail with [`ChartError::ElementNotFound`].
pub fn require_element(host: &dyn Host, id: &str) -> Result<ElementInfo> {
    host.element(id).ok_or_else(|| ChartError::ElementNotFound(id.to_string()))
}
