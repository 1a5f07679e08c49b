use hypercover::{Cover, CoverError};
use ndarray::{array, Array2};
use rand::Rng;

fn ids(rows: &Array2<f64>) -> Vec<usize> {
    rows.column(0).iter().map(|&id| id as usize).collect()
}

fn random_points(rng: &mut impl Rng, n: usize, dims: usize) -> Array2<f64> {
    Array2::from_shape_fn((n, dims + 1), |(i, j)| {
        if j == 0 { i as f64 } else { rng.gen_range(-5.0..5.0) }
    })
}

#[test]
fn test_two_cubes_without_overlap() {
    let data = array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
    let cover = Cover::new(2, 0.0);
    let geometry = cover.define_bins(data.view()).unwrap();

    assert!((geometry.chunk_width()[0] - 1.5).abs() < 1e-12);
    let cubes: Vec<_> = geometry.cubes().collect();
    assert_eq!(cubes, vec![vec![0], vec![1]]);

    let first = cover.find_entries(data.view(), &geometry, &[0]).unwrap();
    let second = cover.find_entries(data.view(), &geometry, &[1]).unwrap();
    assert_eq!(ids(&first), vec![0, 1]);
    // The point at the maximum belongs to the last cube.
    assert_eq!(ids(&second), vec![2, 3]);
}

#[test]
fn test_two_cubes_with_half_overlap() {
    let data = array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
    let cover = Cover::new(2, 0.5);
    let geometry = cover.define_bins(data.view()).unwrap();

    assert!((geometry.overlap_width()[0] - 0.75).abs() < 1e-12);
    let first = geometry.extent(&[0]).unwrap();
    let second = geometry.extent(&[1]).unwrap();
    assert!((first.max()[0] - 2.25).abs() < 1e-12);
    assert!((second.min()[0] - 1.5).abs() < 1e-12);
    assert!((second.max()[0] - 3.75).abs() < 1e-12);

    // Row 2 (value 2.0) lies in the overlap band [1.5, 2.25) and is shared.
    assert_eq!(ids(&cover.find_entries(data.view(), &geometry, &[0]).unwrap()), vec![0, 1, 2]);
    assert_eq!(ids(&cover.find_entries(data.view(), &geometry, &[1]).unwrap()), vec![2, 3]);
}

#[test]
fn test_extent_of_last_cube_contains_grid_maximum() {
    let data = array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
    let cover = Cover::new(2, 0.0);
    let geometry = cover.define_bins(data.view()).unwrap();

    let last = geometry.extent(&[1]).unwrap();
    assert!(geometry.entry_indices(data.view(), &[1]).unwrap().contains(&3));
    assert!(last.contains(array![3.0].view()));
    assert!(!geometry.extent(&[0]).unwrap().contains(array![1.5].view()));
}

#[test]
fn test_overflowing_cube_count_rejected_by_define_bins() {
    let data = array![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
    let err = Cover::new(usize::MAX / 2, 0.0).define_bins(data.view()).unwrap_err();
    assert_eq!(err, CoverError::TooManyCubes { resolution: vec![usize::MAX / 2; 2] });
}

#[test]
fn test_all_columns_and_row_order_preserved() {
    let data = array![[7.0, 0.9, 0.1], [3.0, 0.2, 0.2], [5.0, 0.1, 0.3], [9.0, 1.0, 1.0]];
    let cover = Cover::new(2, 0.0);
    let geometry = cover.define_bins(data.view()).unwrap();

    let entries = cover.find_entries(data.view(), &geometry, &[0, 0]).unwrap();
    assert_eq!(entries, array![[3.0, 0.2, 0.2], [5.0, 0.1, 0.3]]);
}

#[test]
fn test_cube_count_is_product_of_resolutions() {
    let mut rng = rand::thread_rng();
    let data = random_points(&mut rng, 50, 3);

    let geometry = Cover::per_dimension(vec![2, 3, 4], 0.1).define_bins(data.view()).unwrap();
    assert_eq!(geometry.cubes().count(), 24);
    assert_eq!(geometry.n_cubes_total(), 24);

    let geometry = Cover::new(5, 0.1).define_bins(data.view()).unwrap();
    assert_eq!(geometry.cubes().len(), 125);
}

#[test]
fn test_cubes_are_restartable_and_ordered() {
    let data = array![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
    let geometry = Cover::per_dimension(vec![2, 2], 0.2).define_bins(data.view()).unwrap();

    let first: Vec<_> = geometry.cubes().collect();
    let second: Vec<_> = geometry.cubes().collect();
    assert_eq!(first, second);
    assert_eq!(first, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
}

#[test]
fn test_define_bins_is_idempotent() {
    let mut rng = rand::thread_rng();
    let data = random_points(&mut rng, 40, 2);
    let cover = Cover::new(4, 0.3);

    let a = cover.define_bins(data.view()).unwrap();
    let b = cover.define_bins(data.view()).unwrap();
    assert_eq!(a, b);
    assert!(a.cubes().eq(b.cubes()));
}

#[test]
fn test_no_overlap_partitions_points() {
    let mut rng = rand::thread_rng();
    let data = random_points(&mut rng, 200, 2);
    let cover = Cover::new(4, 0.0);
    let geometry = cover.define_bins(data.view()).unwrap();

    // Every point belongs to exactly one cube.
    let mut hits = vec![0usize; data.nrows()];
    for cube in geometry.cubes() {
        for row in geometry.entry_indices(data.view(), &cube).unwrap() {
            hits[row] += 1;
        }
    }
    for (row, &count) in hits.iter().enumerate() {
        assert_eq!(count, 1, "Row {} is in {} cubes", row, count);
    }
}

#[test]
fn test_boundary_point_goes_to_higher_cube() {
    // Chunk width is 1.0; the point at 1.0 sits exactly on the shared edge.
    let data = array![[0.0, 0.0], [1.0, 1.0], [2.0, 4.0]];
    let cover = Cover::new(4, 0.0);
    let geometry = cover.define_bins(data.view()).unwrap();

    assert!(!geometry.entry_indices(data.view(), &[0]).unwrap().contains(&1));
    assert_eq!(geometry.entry_indices(data.view(), &[1]).unwrap(), vec![1]);
}

#[test]
fn test_overlap_band_shared_by_corner_cubes() {
    // 2x2 grid over [0, 2]^2 with chunk 1.0 and overlap 0.5.
    let data = array![[0.0, 0.0, 0.0], [1.0, 2.0, 2.0], [2.0, 1.2, 1.2]];
    let cover = Cover::new(2, 0.5);
    let geometry = cover.define_bins(data.view()).unwrap();

    let containing: Vec<_> = geometry
        .cubes()
        .filter(|cube| geometry.entry_indices(data.view(), cube).unwrap().contains(&2))
        .collect();
    assert_eq!(containing.len(), 4, "Corner point should be in all four cubes: {:?}", containing);
}

#[test]
fn test_empty_cube_is_not_an_error() {
    let data = array![[0.0, 0.0], [1.0, 0.1], [2.0, 10.0]];
    let cover = Cover::new(10, 0.0);
    let geometry = cover.define_bins(data.view()).unwrap();

    let entries = cover.find_entries(data.view(), &geometry, &[5]).unwrap();
    assert_eq!(entries.nrows(), 0);
    assert_eq!(entries.ncols(), 2);
}

#[test]
fn test_find_entries_rejects_wrong_cube_shape() {
    let data = array![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
    let cover = Cover::new(3, 0.1);
    let geometry = cover.define_bins(data.view()).unwrap();

    assert_eq!(
        cover.find_entries(data.view(), &geometry, &[1]).unwrap_err(),
        CoverError::CubeDimensionMismatch { supplied: 1, expected: 2 }
    );
    assert_eq!(
        cover.find_entries(data.view(), &geometry, &[0, 3]).unwrap_err(),
        CoverError::CubeOutOfRange { dimension: 1, index: 3, resolution: 3 }
    );
}

#[test]
fn test_define_bins_configuration_errors() {
    let data = array![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];

    let err = Cover::per_dimension(vec![3], 0.1).define_bins(data.view()).unwrap_err();
    assert_eq!(err, CoverError::DimensionMismatch { supplied: 1, expected: 2 });

    let err = Cover::per_dimension(vec![3, 0], 0.1).define_bins(data.view()).unwrap_err();
    assert_eq!(err, CoverError::ZeroResolution { dimension: 1 });

    let empty = Array2::<f64>::zeros((0, 3));
    assert_eq!(Cover::default().define_bins(empty.view()).unwrap_err(), CoverError::EmptyData);
}

#[test]
fn test_geometry_applies_to_other_data() {
    let data = array![[0.0, 0.0], [1.0, 10.0]];
    let cover = Cover::new(2, 0.0);
    let geometry = cover.define_bins(data.view()).unwrap();

    // Points outside the defined range fall in no cube; NaN rows are skipped.
    let other = array![[5.0, 2.0], [6.0, -1.0], [7.0, f64::NAN], [8.0, 7.0]];
    assert_eq!(geometry.entry_indices(other.view(), &[0]).unwrap(), vec![0]);
    assert_eq!(geometry.entry_indices(other.view(), &[1]).unwrap(), vec![3]);
}

#[test]
fn test_parallel_entries_match_sequential() {
    let mut rng = rand::thread_rng();
    let data = random_points(&mut rng, 300, 2);
    let geometry = Cover::per_dimension(vec![6, 4], 0.25).define_bins(data.view()).unwrap();

    let parallel = geometry.par_entry_indices(data.view()).unwrap();
    assert_eq!(parallel.len(), 24);
    for (cube, rows) in &parallel {
        assert_eq!(rows, &geometry.entry_indices(data.view(), cube).unwrap());
    }
}
