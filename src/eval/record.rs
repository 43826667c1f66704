//! Layout record data model and JSON loading
//!
//! Records arrive as the capture collaborator's JSON: one object per
//! domain/page capture with a component list annotated at capture time.
//! Loading is tolerant at component granularity — an entry with missing or
//! negative geometry is rejected individually and counted, never aborting the
//! record — while a record without a usable domain or screenshot reference is
//! rejected as a whole.

use crate::grid::assign::{CellAssignment, CellGeometry, ScreenResolution};
use crate::io::error::{EvalError, Result};
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// One captured interface component
///
/// Immutable once parsed; owned by the record that contains it.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Element tag name as captured
    pub tag: String,
    /// Visible text, possibly empty
    pub text: String,
    /// ARIA role, possibly empty
    pub role: String,
    /// Class token string, possibly empty
    pub class: String,
    /// Horizontal pixel position of the top-left corner
    pub x: u32,
    /// Vertical pixel position of the top-left corner
    pub y: u32,
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
    /// Grid cell stored by the capture pipeline, when annotated
    pub annotation: Option<CellAssignment>,
}

/// One domain/page capture: metadata plus its ordered component list
///
/// Read-only input to the engine. The declared reference resolution governs
/// all metric computation even when the screenshot decodes to slightly
/// different dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRecord {
    /// Domain identifier, sanitized for use in file names and tables
    pub domain: String,
    /// Site category label supplied by the capture pipeline
    pub category: String,
    /// Screenshot file name, resolved against a screenshot directory
    pub screenshot: String,
    /// Declared reference resolution for the capture
    pub screen: ScreenResolution,
    /// Ordered captured components
    pub components: Vec<Component>,
    /// Count of malformed component entries dropped during loading
    pub rejected_components: usize,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Domain", default)]
    domain: Option<String>,
    #[serde(rename = "URL", default)]
    url: Option<String>,
    #[serde(rename = "Category", default)]
    category: Option<String>,
    #[serde(rename = "Screenshot", default)]
    screenshot: Option<String>,
    #[serde(rename = "Resolution", default)]
    resolution: Option<String>,
    #[serde(rename = "UI Components", default)]
    components: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawComponent {
    #[serde(rename = "Tag", default)]
    tag: Option<String>,
    #[serde(rename = "Text", default)]
    text: Option<String>,
    #[serde(rename = "Role", default)]
    role: Option<String>,
    #[serde(rename = "Class", default)]
    class: Option<String>,
    #[serde(rename = "X", default)]
    x: Option<f64>,
    #[serde(rename = "Y", default)]
    y: Option<f64>,
    #[serde(rename = "Width", default)]
    width: Option<f64>,
    #[serde(rename = "Height", default)]
    height: Option<f64>,
    #[serde(rename = "Grid_Row", default)]
    grid_row: Option<i64>,
    #[serde(rename = "Grid_Col", default)]
    grid_col: Option<i64>,
}

impl LayoutRecord {
    /// Load a record from a JSON file
    ///
    /// `fallback_screen` supplies the reference resolution for records that
    /// declare none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the JSON cannot be
    /// parsed, or the record lacks a usable domain or screenshot reference
    pub fn from_json_path<P: AsRef<Path>>(
        path: P,
        fallback_screen: ScreenResolution,
    ) -> Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let contents = std::fs::read_to_string(&path_buf).map_err(|e| EvalError::FileSystem {
            path: path_buf.clone(),
            operation: "read record",
            source: e,
        })?;

        Self::from_json_str(&contents, fallback_screen).map_err(|e| match e {
            EvalError::RecordParse { reason } => EvalError::RecordLoad {
                path: path_buf,
                reason,
            },
            other => other,
        })
    }

    /// Parse a record from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the record lacks a
    /// usable domain or screenshot reference
    pub fn from_json_str(contents: &str, fallback_screen: ScreenResolution) -> Result<Self> {
        let raw: RawRecord =
            serde_json::from_str(contents).map_err(|e| EvalError::RecordParse {
                reason: e.to_string(),
            })?;

        let domain = derive_domain(&raw)?;
        let screenshot = raw.screenshot.unwrap_or_default();
        if screenshot.is_empty() {
            return Err(EvalError::RecordParse {
                reason: format!("record for '{domain}' has no screenshot reference"),
            });
        }

        let screen = match raw.resolution {
            Some(declared) => declared.parse()?,
            None => fallback_screen,
        };

        let mut components = Vec::with_capacity(raw.components.len());
        let mut rejected_components = 0_usize;
        for value in raw.components {
            match component_from_value(value) {
                Some(component) => components.push(component),
                None => rejected_components += 1,
            }
        }

        Ok(Self {
            domain,
            category: raw.category.unwrap_or_default(),
            screenshot,
            screen,
            components,
            rejected_components,
        })
    }

    /// Annotate every component with its cell at the given geometry
    ///
    /// Capture-side counterpart of assignment: downstream validation compares
    /// these stored cells against cells recomputed at each evaluated
    /// resolution.
    pub fn annotate(&mut self, geometry: &CellGeometry) {
        for component in &mut self.components {
            component.annotation = Some(geometry.assign(component));
        }
    }
}

/// Take the explicit domain identifier, or derive one from the capture URL
///
/// Derivation matches the capture pipeline: URL host with a leading `www.`
/// stripped and dots replaced by underscores.
fn derive_domain(raw: &RawRecord) -> Result<String> {
    if let Some(domain) = raw.domain.as_deref()
        && !domain.is_empty()
    {
        return Ok(domain.to_string());
    }

    let url_value = raw.url.as_deref().ok_or_else(|| EvalError::RecordParse {
        reason: "record declares neither Domain nor URL".to_string(),
    })?;

    let parsed = Url::parse(url_value).map_err(|e| EvalError::RecordParse {
        reason: format!("invalid capture URL '{url_value}': {e}"),
    })?;
    let host = parsed.host_str().ok_or_else(|| EvalError::RecordParse {
        reason: format!("capture URL '{url_value}' has no host"),
    })?;

    let trimmed = host.strip_prefix("www.").unwrap_or(host);
    Ok(trimmed.replace('.', "_"))
}

/// Convert one raw JSON component entry, rejecting malformed geometry
///
/// Returns `None` when any of x/y/width/height is missing, non-finite, or
/// negative. Text-like fields default to empty strings; a stored grid cell is
/// carried only when both coordinates are present and non-negative.
fn component_from_value(value: serde_json::Value) -> Option<Component> {
    let raw: RawComponent = serde_json::from_value(value).ok()?;

    let x = pixel_coordinate(raw.x)?;
    let y = pixel_coordinate(raw.y)?;
    let width = pixel_coordinate(raw.width)?;
    let height = pixel_coordinate(raw.height)?;

    let annotation = match (raw.grid_row, raw.grid_col) {
        (Some(row), Some(col)) if row >= 0 && col >= 0 => Some(CellAssignment {
            row: row as u32,
            col: col as u32,
        }),
        _ => None,
    };

    Some(Component {
        tag: raw.tag.unwrap_or_default(),
        text: raw.text.unwrap_or_default(),
        role: raw.role.unwrap_or_default(),
        class: raw.class.unwrap_or_default(),
        x,
        y,
        width,
        height,
        annotation,
    })
}

/// Floor a raw pixel value, rejecting missing, non-finite, or negative input
fn pixel_coordinate(value: Option<f64>) -> Option<u32> {
    let v = value?;
    (v.is_finite() && v >= 0.0).then_some(v.floor() as u32)
}
