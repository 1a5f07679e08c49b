use ndarray::ArrayView2;
use wasm_bindgen::prelude::*;

use crate::bounds::Limits;
use crate::cover::{Cover, CoverConfig};
use crate::cubes::CubeCount;
use crate::error::CoverError;
use crate::geometry::CoverGeometry;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

impl From<CoverError> for JsValue {
    fn from(err: CoverError) -> Self {
        JsError::new(&err.to_string()).into()
    }
}

/// Views a flat row-major buffer as a point matrix with `columns` columns.
fn view_rows(data: &[f64], columns: usize) -> Result<ArrayView2<'_, f64>, JsValue> {
    if columns == 0 || data.len() % columns != 0 {
        return Err(JsError::new(&format!(
            "buffer of length {} cannot be split into rows of {} columns",
            data.len(),
            columns
        ))
        .into());
    }
    ArrayView2::from_shape((data.len() / columns, columns), data)
        .map_err(|e| JsError::new(&e.to_string()).into())
}

/// WASM wrapper for a [`Cover`].
///
/// Point matrices are passed as flat row-major arrays `[id, x, y, ..., id, x, y, ...]`
/// together with their column count.
#[wasm_bindgen]
pub struct MapperCover {
    inner: Cover,
}

#[wasm_bindgen]
impl MapperCover {
    #[wasm_bindgen(constructor)]
    pub fn new(n_cubes: usize, perc_overlap: f64) -> MapperCover {
        MapperCover { inner: Cover::new(n_cubes, perc_overlap) }
    }

    /// Parses a JSON configuration, see [`CoverConfig`].
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<MapperCover, JsValue> {
        Ok(MapperCover { inner: CoverConfig::from_json(json)?.build() })
    }

    /// Sets one cube count per dimension.
    #[wasm_bindgen(js_name = setCubesPerDimension)]
    pub fn set_cubes_per_dimension(&mut self, counts: &[u32]) {
        let counts: Vec<usize> = counts.iter().map(|&n| n as usize).collect();
        self.inner = self.inner.clone().with_n_cubes(CubeCount::PerDimension(counts));
    }

    /// Pins bounds per dimension. `Infinity` or `-Infinity` keeps the data range on that side.
    #[wasm_bindgen(js_name = setLimits)]
    pub fn set_limits(&mut self, lower: &[f64], upper: &[f64]) -> Result<(), JsValue> {
        if lower.len() != upper.len() {
            return Err(CoverError::LimitsDimensionMismatch {
                supplied: upper.len(),
                expected: lower.len(),
            }
            .into());
        }
        let pairs = lower.iter().zip(upper).map(|(&lo, &hi)| [lo, hi]).collect();
        self.inner = self.inner.clone().with_limits(Limits::new(pairs)?);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn perc_overlap(&self) -> f64 {
        self.inner.perc_overlap()
    }

    #[wasm_bindgen(js_name = defineBins)]
    pub fn define_bins(&self, data: &[f64], columns: usize) -> Result<MapperGeometry, JsValue> {
        let view = view_rows(data, columns)?;
        Ok(MapperGeometry { inner: self.inner.define_bins(view)? })
    }
}

/// WASM wrapper for a [`CoverGeometry`].
#[wasm_bindgen]
pub struct MapperGeometry {
    inner: CoverGeometry,
}

#[wasm_bindgen]
impl MapperGeometry {
    #[wasm_bindgen(getter)]
    pub fn count_cubes(&self) -> usize {
        self.inner.n_cubes_total()
    }

    #[wasm_bindgen(getter)]
    pub fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    #[wasm_bindgen(getter)]
    pub fn chunk_width(&self) -> Vec<f64> {
        self.inner.chunk_width().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn overlap_width(&self) -> Vec<f64> {
        self.inner.overlap_width().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn origin(&self) -> Vec<f64> {
        self.inner.origin().to_vec()
    }

    /// Cube coordinate at position `index` of the product order, or `undefined` past the end.
    #[wasm_bindgen(js_name = cubeAt)]
    pub fn cube_at(&self, index: usize) -> Option<Vec<u32>> {
        self.inner
            .cube_at(index)
            .map(|cube| cube.into_iter().map(|c| c as u32).collect())
    }

    /// Row indices of `data` that fall inside `cube`.
    #[wasm_bindgen(js_name = entryIndices)]
    pub fn entry_indices(&self, data: &[f64], columns: usize, cube: &[u32]) -> Result<Vec<u32>, JsValue> {
        let view = view_rows(data, columns)?;
        let cube: Vec<usize> = cube.iter().map(|&c| c as usize).collect();
        let rows = self.inner.entry_indices(view, &cube)?;
        Ok(rows.into_iter().map(|i| i as u32).collect())
    }

    /// Member rows of `cube` as a flat row-major array with the input's column count.
    #[wasm_bindgen(js_name = findEntries)]
    pub fn find_entries(&self, data: &[f64], columns: usize, cube: &[u32]) -> Result<Vec<f64>, JsValue> {
        let view = view_rows(data, columns)?;
        let cube: Vec<usize> = cube.iter().map(|&c| c as usize).collect();
        let entries = self.inner.find_entries(view, &cube)?;
        Ok(entries.into_iter().collect())
    }
}
