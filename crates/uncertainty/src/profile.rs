//! Density error as a function of height.

use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Relative and absolute density uncertainty over a height grid.
///
/// Rows follow [`heights`](Self::heights). Relative and absolute errors are
/// stored as separate matrices, each with one labelled column per scenario
/// (or per nominal density for absolute errors at fixed densities).
///
/// Rows at zero height are singular and hold non-finite values; use
/// [`excluding_origin`](Self::excluding_origin) before plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorProfile {
    heights: Array1<f64>,
    relative_labels: Vec<String>,
    relative: Array2<f64>,
    absolute_labels: Vec<String>,
    absolute: Array2<f64>,
}

impl ErrorProfile {
    pub(crate) fn new(
        heights: Array1<f64>,
        relative_labels: Vec<String>,
        relative: Array2<f64>,
        absolute_labels: Vec<String>,
        absolute: Array2<f64>,
    ) -> Self {
        debug_assert_eq!(relative.dim(), (heights.len(), relative_labels.len()));
        debug_assert_eq!(absolute.dim(), (heights.len(), absolute_labels.len()));
        Self {
            heights,
            relative_labels,
            relative,
            absolute_labels,
            absolute,
        }
    }

    /// Height grid in m.
    pub fn heights(&self) -> &Array1<f64> {
        &self.heights
    }

    /// Labels of the relative-error columns.
    pub fn relative_labels(&self) -> &[String] {
        &self.relative_labels
    }

    /// Relative errors (dimensionless), heights × columns.
    pub fn relative(&self) -> &Array2<f64> {
        &self.relative
    }

    /// Labels of the absolute-error columns.
    pub fn absolute_labels(&self) -> &[String] {
        &self.absolute_labels
    }

    /// Absolute errors in kg/m³, heights × columns.
    pub fn absolute(&self) -> &Array2<f64> {
        &self.absolute
    }

    /// Relative-error column `j`.
    pub fn relative_column(&self, j: usize) -> ArrayView1<'_, f64> {
        self.relative.column(j)
    }

    /// Number of height rows.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Whether the profile has no rows.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Copy without the zero-height rows.
    pub fn excluding_origin(&self) -> Self {
        let keep: Vec<usize> = self
            .heights
            .iter()
            .enumerate()
            .filter(|(_, h)| **h != 0.0)
            .map(|(i, _)| i)
            .collect();
        Self {
            heights: self.heights.select(Axis(0), &keep),
            relative_labels: self.relative_labels.clone(),
            relative: self.relative.select(Axis(0), &keep),
            absolute_labels: self.absolute_labels.clone(),
            absolute: self.absolute.select(Axis(0), &keep),
        }
    }
}
