use hypercover::{Cover, Limits};
use ndarray::Array2;
use rand::prelude::*;
use rand::rngs::StdRng;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Noisy circle as a 2D lens: column 0 is the row id.
    let mut rng = StdRng::seed_from_u64(7);
    let n = 1000;
    let data = Array2::from_shape_fn((n, 3), |(i, j)| {
        let t = i as f64 / n as f64 * std::f64::consts::TAU;
        match j {
            0 => i as f64,
            1 => t.cos() + rng.gen_range(-0.05..0.05),
            _ => t.sin() + rng.gen_range(-0.05..0.05),
        }
    });

    // Pin the x range, keep the data range on y.
    let limits = Limits::new(vec![[-1.5, 1.5], [f64::NEG_INFINITY, f64::INFINITY]]).unwrap();
    let cover = Cover::new(6, 0.25).with_limits(limits);
    let geometry = cover.define_bins(data.view()).unwrap();

    println!("origin: {:?}", geometry.origin());
    println!("chunk width: {:?}", geometry.chunk_width());
    println!("overlap width: {:?}", geometry.overlap_width());

    let entries = geometry.par_entry_indices(data.view()).unwrap();
    let occupied: Vec<_> = entries.iter().filter(|(_, rows)| !rows.is_empty()).collect();
    println!("{} of {} cubes occupied", occupied.len(), geometry.n_cubes_total());
    for (cube, rows) in occupied {
        println!("{:?}: {} points", cube, rows.len());
    }
}
