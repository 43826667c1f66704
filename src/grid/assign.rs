//! Cell geometry and component-to-cell assignment
//!
//! The reference screen is partitioned by integer floor division. This is a
//! deliberate partition carried over from the capture pipeline, not a rounding
//! approximation: when the division leaves a remainder, the trailing pixels
//! floor past the nominal grid, the same way off-viewport positions do.

use crate::eval::record::Component;
use crate::io::error::{Result, invalid_parameter};
use std::fmt;
use std::str::FromStr;

/// A grid resolution in rows × columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridResolution {
    /// Number of grid rows
    pub rows: u32,
    /// Number of grid columns
    pub cols: u32,
}

impl GridResolution {
    /// Create a square resolution with the same cell count per axis
    pub const fn square(cells: u32) -> Self {
        Self {
            rows: cells,
            cols: cells,
        }
    }
}

impl fmt::Display for GridResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Reference screen resolution in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenResolution {
    /// Screen width in pixels
    pub width: u32,
    /// Screen height in pixels
    pub height: u32,
}

impl ScreenResolution {
    /// Create a screen resolution from pixel dimensions
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total screen area in pixels
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for ScreenResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ScreenResolution {
    type Err = crate::io::error::EvalError;

    /// Parse a `<width>x<height>` string such as `1920x1080`
    fn from_str(value: &str) -> Result<Self> {
        let (width_str, height_str) = value.split_once(['x', 'X']).ok_or_else(|| {
            invalid_parameter("resolution", &value, &"expected <width>x<height>")
        })?;

        let width: u32 = width_str
            .trim()
            .parse()
            .map_err(|e| invalid_parameter("resolution", &value, &e))?;
        let height: u32 = height_str
            .trim()
            .parse()
            .map_err(|e| invalid_parameter("resolution", &value, &e))?;

        if width == 0 || height == 0 {
            return Err(invalid_parameter(
                "resolution",
                &value,
                &"dimensions must be positive",
            ));
        }

        Ok(Self { width, height })
    }
}

/// A derived grid cell for a component position
///
/// Never stored by the engine itself; recomputed from raw pixel positions
/// whenever needed. Capture collaborators may persist their own assignments,
/// which the validator compares against recomputed cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAssignment {
    /// Zero-based grid row
    pub row: u32,
    /// Zero-based grid column
    pub col: u32,
}

/// Pixel geometry of one grid resolution over a reference screen
///
/// Cell sizes use integer floor division of the screen dimensions by the grid
/// counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGeometry {
    resolution: GridResolution,
    cell_width: u32,
    cell_height: u32,
}

impl CellGeometry {
    /// Compute cell geometry for a grid resolution over a screen
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension is zero, or if the grid is finer than
    /// the pixel raster (a cell would be zero pixels wide or tall)
    pub fn new(resolution: GridResolution, screen: ScreenResolution) -> Result<Self> {
        if resolution.rows == 0 || resolution.cols == 0 {
            return Err(invalid_parameter(
                "grid resolution",
                &resolution,
                &"rows and cols must be positive",
            ));
        }
        if screen.width == 0 || screen.height == 0 {
            return Err(invalid_parameter(
                "screen resolution",
                &screen,
                &"width and height must be positive",
            ));
        }

        let cell_width = screen.width / resolution.cols;
        let cell_height = screen.height / resolution.rows;

        if cell_width == 0 || cell_height == 0 {
            return Err(invalid_parameter(
                "grid resolution",
                &resolution,
                &format!("grid is finer than the {screen} pixel raster"),
            ));
        }

        Ok(Self {
            resolution,
            cell_width,
            cell_height,
        })
    }

    /// Grid resolution this geometry was computed for
    pub const fn resolution(&self) -> GridResolution {
        self.resolution
    }

    /// Cell width in pixels
    pub const fn cell_width(&self) -> u32 {
        self.cell_width
    }

    /// Cell height in pixels
    pub const fn cell_height(&self) -> u32 {
        self.cell_height
    }

    /// Assign a component to the grid cell containing its top-left position
    ///
    /// Positions beyond the nominal screen bounds are common for elements
    /// outside the visible viewport and are not clamped: the returned row/col
    /// may exceed `rows - 1` / `cols - 1`.
    pub const fn assign(&self, component: &Component) -> CellAssignment {
        self.assign_position(component.x, component.y)
    }

    /// Assign a raw pixel position to its grid cell
    pub const fn assign_position(&self, x: u32, y: u32) -> CellAssignment {
        CellAssignment {
            row: y / self.cell_height,
            col: x / self.cell_width,
        }
    }
}
