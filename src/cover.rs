use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::bounds::{BoundingBox, Limits};
use crate::cubes::CubeCount;
use crate::error::{CoverError, Result};
use crate::geometry::CoverGeometry;

/// Default number of cubes per dimension.
pub const DEFAULT_N_CUBES: usize = 10;
/// Default overlap fraction.
pub const DEFAULT_PERC_OVERLAP: f64 = 0.2;

/// An overlapping grid cover of lens space.
///
/// A cover holds static configuration only: the grid resolution, the overlap fraction and
/// optional per-dimension limits. Calling [`define_bins`](Self::define_bins) on a dataset
/// produces a [`CoverGeometry`], which enumerates the cubes and answers membership queries.
///
/// Without limits the grid spans the empirical range of the data. With [`Limits`], any
/// pinned side replaces the empirical bound of that dimension (a bounded cover).
#[derive(Clone, Debug, PartialEq)]
pub struct Cover {
    n_cubes: CubeCount,
    perc_overlap: f64,
    limits: Option<Limits>,
}

impl Default for Cover {
    fn default() -> Self {
        Self {
            n_cubes: CubeCount::Uniform(DEFAULT_N_CUBES),
            perc_overlap: DEFAULT_PERC_OVERLAP,
            limits: None,
        }
    }
}

impl Cover {
    /// Creates a cover spanning the empirical range of the data.
    ///
    /// # Arguments
    ///
    /// * `n_cubes` - Number of cubes along every dimension.
    /// * `perc_overlap` - Fraction of a cube's width by which it is extended upwards.
    pub fn new(n_cubes: usize, perc_overlap: f64) -> Self {
        Self {
            n_cubes: CubeCount::Uniform(n_cubes),
            perc_overlap,
            limits: None,
        }
    }

    /// Creates a cover with an explicit number of cubes for each dimension.
    pub fn per_dimension(n_cubes: Vec<usize>, perc_overlap: f64) -> Self {
        Self::new(DEFAULT_N_CUBES, perc_overlap).with_n_cubes(CubeCount::PerDimension(n_cubes))
    }

    /// Creates a cover whose bounds are pinned by `limits` where given.
    pub fn bounded(n_cubes: CubeCount, perc_overlap: f64, limits: Limits) -> Self {
        Self::new(DEFAULT_N_CUBES, perc_overlap)
            .with_n_cubes(n_cubes)
            .with_limits(limits)
    }

    pub fn with_n_cubes(mut self, n_cubes: CubeCount) -> Self {
        self.n_cubes = n_cubes;
        self
    }

    pub fn with_perc_overlap(mut self, perc_overlap: f64) -> Self {
        self.perc_overlap = perc_overlap;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Deprecated alias of [`with_n_cubes`](Self::with_n_cubes).
    #[deprecated(since = "0.1.0", note = "use `with_n_cubes` instead")]
    pub fn with_nr_cubes(self, nr_cubes: CubeCount) -> Self {
        tracing::warn!("`nr_cubes` has been replaced with `n_cubes` and will be removed in a future release");
        self.with_n_cubes(nr_cubes)
    }

    /// Deprecated alias of [`with_perc_overlap`](Self::with_perc_overlap).
    #[deprecated(since = "0.1.0", note = "use `with_perc_overlap` instead")]
    pub fn with_overlap_perc(self, overlap_perc: f64) -> Self {
        tracing::warn!("`overlap_perc` has been replaced with `perc_overlap` and will be removed in a future release");
        self.with_perc_overlap(overlap_perc)
    }

    pub fn n_cubes(&self) -> &CubeCount {
        &self.n_cubes
    }

    pub fn perc_overlap(&self) -> f64 {
        self.perc_overlap
    }

    pub fn limits(&self) -> Option<&Limits> {
        self.limits.as_ref()
    }

    /// The bounds the grid will span for `data`: the empirical range, with pinned limits applied.
    pub fn bounds(&self, data: ArrayView2<'_, f64>) -> Result<BoundingBox> {
        let empirical = BoundingBox::from_data(data)?;
        match &self.limits {
            Some(limits) => limits.resolve(&empirical),
            None => Ok(empirical),
        }
    }

    /// Lays the grid over `data` and returns its geometry.
    ///
    /// Column 0 of `data` holds row identifiers; the remaining columns are the lens
    /// coordinates. The returned geometry enumerates every cube through
    /// [`CoverGeometry::cubes`] and is reused by every membership query on this dataset.
    pub fn define_bins(&self, data: ArrayView2<'_, f64>) -> Result<CoverGeometry> {
        if !self.perc_overlap.is_finite() || self.perc_overlap < 0.0 {
            return Err(CoverError::InvalidOverlap(self.perc_overlap));
        }

        let bounds = self.bounds(data)?;
        let resolution = self.n_cubes.resolve(bounds.dimensions())?;
        let geometry = CoverGeometry::new(bounds, resolution, self.perc_overlap)?;

        tracing::debug!(
            rows = data.nrows(),
            dimensions = geometry.dimensions(),
            resolution = ?geometry.resolution(),
            cubes = geometry.n_cubes_total(),
            bounded = self.limits.is_some(),
            "defined cover bins"
        );

        Ok(geometry)
    }

    /// Rows of `data` inside `cube` of `geometry`, all columns preserved, input order kept.
    ///
    /// `geometry` must come from [`define_bins`](Self::define_bins); `data` may be the
    /// dataset the bins were defined on or any matrix with the same column layout.
    pub fn find_entries(
        &self,
        data: ArrayView2<'_, f64>,
        geometry: &CoverGeometry,
        cube: &[usize],
    ) -> Result<Array2<f64>> {
        geometry.find_entries(data, cube)
    }
}

/// Serializable cover configuration.
///
/// Missing fields take their defaults (`n_cubes = 10`, `perc_overlap = 0.2`, no limits).
/// The deprecated names `nr_cubes` and `overlap_perc` are still accepted; when present they
/// take precedence over the new names and a deprecation warning is logged.
///
/// ```
/// use hypercover::CoverConfig;
///
/// let config = CoverConfig::from_json(r#"{ "n_cubes": [4, 2], "limits": [[0.0, null], [null, 1.0]] }"#).unwrap();
/// let cover = config.build();
/// assert_eq!(cover.perc_overlap(), 0.2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    pub n_cubes: CubeCount,
    pub perc_overlap: f64,
    pub limits: Option<Limits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nr_cubes: Option<CubeCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap_perc: Option<f64>,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            n_cubes: CubeCount::Uniform(DEFAULT_N_CUBES),
            perc_overlap: DEFAULT_PERC_OVERLAP,
            limits: None,
            nr_cubes: None,
            overlap_perc: None,
        }
    }
}

impl CoverConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Builds the cover, resolving deprecated aliases.
    pub fn build(&self) -> Cover {
        if self.nr_cubes.is_some() || self.overlap_perc.is_some() {
            tracing::warn!(
                "arguments `overlap_perc` and `nr_cubes` have been replaced with `perc_overlap` and `n_cubes`; \
                 they will be removed in a future release"
            );
        }

        Cover {
            n_cubes: self.nr_cubes.clone().unwrap_or_else(|| self.n_cubes.clone()),
            perc_overlap: self.overlap_perc.unwrap_or(self.perc_overlap),
            limits: self.limits.clone(),
        }
    }
}

impl From<CoverConfig> for Cover {
    fn from(config: CoverConfig) -> Self {
        config.build()
    }
}

impl From<&Cover> for CoverConfig {
    fn from(cover: &Cover) -> Self {
        Self {
            n_cubes: cover.n_cubes.clone(),
            perc_overlap: cover.perc_overlap,
            limits: cover.limits.clone(),
            nr_cubes: None,
            overlap_perc: None,
        }
    }
}
