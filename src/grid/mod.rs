//! Grid cell geometry and assignment validation
//!
//! This module contains the spatial core of the engine:
//! - Partitioning a reference screen resolution into grid cells
//! - Assigning component pixel positions to cells
//! - Measuring agreement between stored and recomputed assignments

/// Cell geometry and component-to-cell assignment
pub mod assign;
/// Exact and neighbor-tolerant assignment agreement
pub mod consistency;

pub use assign::{CellAssignment, CellGeometry, GridResolution, ScreenResolution};
pub use consistency::ConsistencyReport;
