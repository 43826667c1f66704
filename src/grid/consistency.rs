//! Agreement between stored grid assignments and recomputed cells

use crate::eval::record::Component;
use crate::grid::assign::{CellAssignment, CellGeometry};

/// Agreement fractions for a set of assigned components
///
/// Exact agreement is a special case of the fuzzy tolerance window, so
/// `fuzzy_fraction >= exact_fraction` holds for every input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsistencyReport {
    /// Fraction of components whose stored cell equals the recomputed cell
    pub exact_fraction: f64,
    /// Fraction of components within one row and one column of the recomputed cell
    pub fuzzy_fraction: f64,
}

impl ConsistencyReport {
    /// Report for an empty component set
    ///
    /// Both fractions are defined as 0.0 rather than treated as an error.
    pub const fn empty() -> Self {
        Self {
            exact_fraction: 0.0,
            fuzzy_fraction: 0.0,
        }
    }
}

/// Validate stored assignments against cells recomputed from raw positions
///
/// Components are paired with stored assignments by position; surplus entries
/// on either side are ignored. An exact hit requires equal row and column; a
/// fuzzy hit tolerates a difference of at most one in each.
pub fn validate(
    components: &[Component],
    stored: &[CellAssignment],
    geometry: &CellGeometry,
) -> ConsistencyReport {
    let total = components.len().min(stored.len());
    if total == 0 {
        return ConsistencyReport::empty();
    }

    let mut exact_hits = 0_usize;
    let mut fuzzy_hits = 0_usize;

    for (component, assigned) in components.iter().zip(stored.iter()) {
        let real = geometry.assign(component);

        if assigned.row == real.row && assigned.col == real.col {
            exact_hits += 1;
        }
        if assigned.row.abs_diff(real.row) <= 1 && assigned.col.abs_diff(real.col) <= 1 {
            fuzzy_hits += 1;
        }
    }

    ConsistencyReport {
        exact_fraction: exact_hits as f64 / total as f64,
        fuzzy_fraction: fuzzy_hits as f64 / total as f64,
    }
}
