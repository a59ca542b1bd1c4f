//! Decoded datasets and their provenance.
//!
//! Every decoder returns a [`Dataset`]: the locator it was read from, the
//! element kind, the dense grid itself and a bag of descriptive metadata.
//! Binary formats decode to single precision, text formats to double.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::grid::{Complex, DenseGrid, ElementKind, Octonion, Quaternion, Real, Scalar};

// =============================================================================
// Provenance
// =============================================================================

/// A provenance value: free text or a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Text(String),
    Number(f64),
}

impl MetaValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            MetaValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetaValue::Number(n) => Some(*n),
            MetaValue::Text(_) => None,
        }
    }
}

impl std::fmt::Display for MetaValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetaValue::Text(s) => f.write_str(s),
            MetaValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Descriptive key/value pairs attached to a decoded grid.
///
/// Purely informational: nothing in the decoders reads these back.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Provenance {
    entries: BTreeMap<String, MetaValue>,
}

impl Provenance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a text value. Empty strings are skipped.
    pub fn insert_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.entries.insert(key.into(), MetaValue::Text(value));
        }
    }

    pub fn insert_number(&mut self, key: impl Into<String>, value: f64) {
        self.entries.insert(key.into(), MetaValue::Number(value));
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Axis summary
// =============================================================================

/// Format-independent description of one output axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSummary {
    pub label: String,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observe_mhz: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sweep_width_hz: Option<f64>,
}

impl AxisSummary {
    /// An axis known only by its extent.
    pub fn bare(index: usize, size: usize) -> Self {
        Self {
            label: format!("dim {}", index + 1),
            size,
            observe_mhz: None,
            sweep_width_hz: None,
        }
    }
}

// =============================================================================
// Grid data
// =============================================================================

/// A dense grid of one of the supported element kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum GridData<T> {
    Real(DenseGrid<Real<T>>),
    Complex(DenseGrid<Complex<T>>),
    Quaternion(DenseGrid<Quaternion<T>>),
    Octonion(DenseGrid<Octonion<T>>),
}

impl<T: Scalar> GridData<T> {
    pub fn kind(&self) -> ElementKind {
        match self {
            GridData::Real(_) => ElementKind::Real,
            GridData::Complex(_) => ElementKind::Complex,
            GridData::Quaternion(_) => ElementKind::Quaternion,
            GridData::Octonion(_) => ElementKind::Octonion,
        }
    }

    pub fn extents(&self) -> &[usize] {
        match self {
            GridData::Real(g) => g.extents(),
            GridData::Complex(g) => g.extents(),
            GridData::Quaternion(g) => g.extents(),
            GridData::Octonion(g) => g.extents(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            GridData::Real(g) => g.len(),
            GridData::Complex(g) => g.len(),
            GridData::Quaternion(g) => g.len(),
            GridData::Octonion(g) => g.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Components of the element at `coord`, widened to f64.
    pub fn components_at(&self, coord: &[usize]) -> Option<Vec<f64>> {
        fn widen<E: crate::grid::Element>(grid: &DenseGrid<E>, coord: &[usize]) -> Option<Vec<f64>> {
            grid.get(coord)
                .ok()
                .map(|e| e.components().iter().map(|c| c.to_f64()).collect())
        }
        match self {
            GridData::Real(g) => widen(g, coord),
            GridData::Complex(g) => widen(g, coord),
            GridData::Quaternion(g) => widen(g, coord),
            GridData::Octonion(g) => widen(g, coord),
        }
    }
}

/// Grid data at the precision the decoder produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// Single precision, produced by the binary decoders
    Single(GridData<f32>),
    /// Double precision, produced by the text decoder
    Double(GridData<f64>),
}

impl Samples {
    pub fn kind(&self) -> ElementKind {
        match self {
            Samples::Single(g) => g.kind(),
            Samples::Double(g) => g.kind(),
        }
    }

    pub fn extents(&self) -> &[usize] {
        match self {
            Samples::Single(g) => g.extents(),
            Samples::Double(g) => g.extents(),
        }
    }

    pub fn components_at(&self, coord: &[usize]) -> Option<Vec<f64>> {
        match self {
            Samples::Single(g) => g.components_at(coord),
            Samples::Double(g) => g.components_at(coord),
        }
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// One decoded grid with its origin and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    source: String,
    samples: Samples,
    axes: Vec<AxisSummary>,
    provenance: Provenance,
}

impl Dataset {
    /// Bundle a decoded grid. Missing axis summaries are filled from the extents.
    pub fn new(
        source: impl Into<String>,
        samples: Samples,
        mut axes: Vec<AxisSummary>,
        provenance: Provenance,
    ) -> Self {
        let extents = samples.extents().to_vec();
        axes.truncate(extents.len());
        for (index, &size) in extents.iter().enumerate().skip(axes.len()) {
            axes.push(AxisSummary::bare(index, size));
        }
        Self {
            source: source.into(),
            samples,
            axes,
            provenance,
        }
    }

    /// Locator the dataset was decoded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> ElementKind {
        self.samples.kind()
    }

    pub fn extents(&self) -> &[usize] {
        self.samples.extents()
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    pub fn into_samples(self) -> Samples {
        self.samples
    }

    /// Axis summaries in grid axis order.
    pub fn axes(&self) -> &[AxisSummary] {
        &self.axes
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn summary(&self) -> DatasetSummary<'_> {
        DatasetSummary {
            source: &self.source,
            kind: self.kind(),
            extents: self.extents(),
            axes: &self.axes,
            provenance: &self.provenance,
        }
    }
}

/// Serializable view of a dataset without its samples.
#[derive(Debug, Serialize)]
pub struct DatasetSummary<'a> {
    pub source: &'a str,
    pub kind: ElementKind,
    pub extents: &'a [usize],
    pub axes: &'a [AxisSummary],
    pub provenance: &'a Provenance,
}

/// All datasets produced by one decode call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataBundle {
    datasets: Vec<Dataset>,
}

impl DataBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, dataset: Dataset) {
        self.datasets.push(dataset);
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dataset> {
        self.datasets.iter()
    }

    pub fn first(&self) -> Option<&Dataset> {
        self.datasets.first()
    }
}

impl From<Dataset> for DataBundle {
    fn from(dataset: Dataset) -> Self {
        Self {
            datasets: vec![dataset],
        }
    }
}

impl IntoIterator for DataBundle {
    type Item = Dataset;
    type IntoIter = std::vec::IntoIter<Dataset>;

    fn into_iter(self) -> Self::IntoIter {
        self.datasets.into_iter()
    }
}
