//! Print Delivery
//!
//! Rendering stays pure. Opening a browser or writing a file happens only
//! through a [`PrintTarget`], so the side effect can be swapped in tests.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("Failed to write label to {0}: {1}")]
    Write(String, #[source] std::io::Error),

    #[error("Failed to launch browser ({0}): {1}")]
    Launch(String, #[source] std::io::Error),

    #[error("Invalid layout: {0}")]
    InvalidLayout(&'static str),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperSize {
    #[default]
    A4,
    /// 100 x 150 mm thermal label stock.
    Label100x150,
}

impl PaperSize {
    /// Width and height in millimetres.
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            PaperSize::A4 => (210, 297),
            PaperSize::Label100x150 => (100, 150),
        }
    }

    /// Value for the CSS `@page size` descriptor.
    pub fn css_page_size(&self) -> String {
        let (w, h) = self.dimensions_mm();
        match self {
            PaperSize::A4 => "A4 portrait".to_string(),
            PaperSize::Label100x150 => format!("{w}mm {h}mm"),
        }
    }
}

/// Physical layout for the printed label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelLayout {
    pub paper: PaperSize,
    pub margin_mm: u32,
}

impl Default for LabelLayout {
    fn default() -> Self {
        Self {
            paper: PaperSize::A4,
            margin_mm: 10,
        }
    }
}

impl LabelLayout {
    pub fn for_paper(paper: PaperSize) -> Self {
        let margin_mm = match paper {
            PaperSize::A4 => 10,
            PaperSize::Label100x150 => 4,
        };
        Self { paper, margin_mm }
    }

    /// Create from user input with validation
    pub fn from_user(paper: PaperSize, margin_mm: u32) -> Result<Self, PrintError> {
        let (w, h) = paper.dimensions_mm();
        // Margins on both sides may use at most half of the shorter edge.
        if margin_mm.checked_mul(4).map_or(true, |m| m >= w.min(h)) {
            return Err(PrintError::InvalidLayout("margin leaves no printable area"));
        }
        Ok(Self { paper, margin_mm })
    }
}

/// Destination for a rendered label document.
pub trait PrintTarget {
    /// Hands `html` to the destination and returns where it went.
    fn deliver(&self, html: &str) -> Result<PathBuf, PrintError>;
}

/// Writes the document to a fixed path.
pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PrintTarget for FileTarget {
    fn deliver(&self, html: &str) -> Result<PathBuf, PrintError> {
        write_document(&self.path, html)?;
        Ok(self.path.clone())
    }
}

/// Writes the document to the temp dir and opens it with the desktop browser,
/// where the user triggers the native print dialog.
pub struct BrowserTarget {
    file_stem: String,
}

impl BrowserTarget {
    pub fn new(file_stem: impl Into<String>) -> Self {
        Self { file_stem: file_stem.into() }
    }
}

impl PrintTarget for BrowserTarget {
    fn deliver(&self, html: &str) -> Result<PathBuf, PrintError> {
        let path = std::env::temp_dir().join(format!("{}.html", self.file_stem));
        write_document(&path, html)?;

        let mut command = opener_command(&path);
        let program = format!("{:?}", command.get_program());
        // Left detached: the browser session outlives the CLI process.
        let child = command
            .spawn()
            .map_err(|e| PrintError::Launch(program, e))?;

        tracing::info!(path = %path.display(), pid = child.id(), "label opened for printing");
        Ok(path)
    }
}

fn write_document(path: &Path, html: &str) -> Result<(), PrintError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| PrintError::Write(parent.display().to_string(), e))?;
    }
    fs::write(path, html).map_err(|e| PrintError::Write(path.display().to_string(), e))
}

fn opener_command(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

/// `data:` URL embedding the whole document.
pub fn data_url(html: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(html.as_bytes());
    format!("data:text/html;charset=utf-8;base64,{encoded}")
}
