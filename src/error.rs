/// Errors raised while defining a cover or querying cube membership.
///
/// Every variant is a configuration or shape problem detected before any geometry is
/// computed, so a returned error never comes with a partial result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoverError {
    /// A per-dimension cube count was supplied with the wrong number of entries.
    #[error(
        "there are {supplied} dimensions specified but {expected} dimensions needing specification; \
         supply one cube count per coordinate dimension"
    )]
    DimensionMismatch { supplied: usize, expected: usize },

    /// A dimension was configured with zero cubes.
    #[error("cube count must be >= 1, got 0 for dimension {dimension}")]
    ZeroResolution { dimension: usize },

    /// The cube counts multiply to more cubes than can be indexed.
    #[error("cube counts {resolution:?} give more cubes than fit in usize")]
    TooManyCubes { resolution: Vec<usize> },

    /// The overlap fraction is negative or not finite.
    #[error("perc_overlap must be finite and >= 0, got {0}")]
    InvalidOverlap(f64),

    /// The point matrix has no coordinate columns after the identifier column.
    #[error("data needs an identifier column and at least one coordinate column, got {columns} columns")]
    MissingCoordinates { columns: usize },

    /// The point matrix has no rows, so no empirical bounds exist.
    #[error("cannot define bins over data with no rows")]
    EmptyData,

    /// A coordinate is NaN or infinite.
    #[error("coordinate at row {row}, column {column} is not finite")]
    NonFiniteCoordinate { row: usize, column: usize },

    /// The data queried does not have the column count the geometry was built for.
    #[error("data has {supplied} columns but the cover was defined over {expected}")]
    ColumnMismatch { supplied: usize, expected: usize },

    /// A cube coordinate of the wrong dimensionality was passed to a membership query.
    #[error("cube has {supplied} indices but the cover has {expected} dimensions")]
    CubeDimensionMismatch { supplied: usize, expected: usize },

    /// A cube index lies outside the grid.
    #[error("cube index {index} out of range for dimension {dimension} with {resolution} cubes")]
    CubeOutOfRange { dimension: usize, index: usize, resolution: usize },

    /// The limits table does not have one row per coordinate dimension.
    #[error("limits specify {supplied} dimensions but the data has {expected}")]
    LimitsDimensionMismatch { supplied: usize, expected: usize },

    /// A bounding box was built from corners of different lengths.
    #[error("bounding box corners differ in length: min has {min} entries, max has {max}")]
    BoundsDimensionMismatch { min: usize, max: usize },

    /// A limit is NaN, or the limits array is not shaped (D, 2).
    #[error("invalid limit for dimension {dimension}: {reason}")]
    InvalidLimit { dimension: usize, reason: String },

    /// After merging limits with the data range the lower bound exceeds the upper bound.
    #[error("resolved bounds for dimension {dimension} are inverted: lower {lower} > upper {upper}")]
    InvertedBounds { dimension: usize, lower: f64, upper: f64 },

    /// A serialized configuration could not be parsed.
    #[error("invalid cover configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for CoverError {
    fn from(err: serde_json::Error) -> Self {
        CoverError::InvalidConfig(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoverError>;
