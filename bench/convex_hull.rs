use criterion::{criterion_group, criterion_main, Criterion};
use dcel_hull::{build_convex_hull, BuildOptions, Point3};
use rand::prelude::Distribution;

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("heavy_sea_urchin", |bencher| {
        bencher.iter(|| {
            criterion::black_box({
                let points = sea_urchin(100, 7);
                build_convex_hull(&points, &BuildOptions { seed: Some(7), max_points: None }).unwrap()
            });
        });
    });
}

// Creates a sea-urchin-like point cloud: points distributed arbitrarily
// within a sphere, one per (longitude, latitude) step.
fn sea_urchin(dev: usize, seed: u64) -> Vec<Point3> {
    use rand::SeedableRng;
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let dist = rand::distr::StandardUniform;

    let mut points = Vec::with_capacity(dev.pow(2));
    let unit_y = Point3::Y;
    for step_x in 0..dev {
        let angle_x = 2.0 * std::f64::consts::PI * (step_x as f64 / dev as f64);
        let p = rot_x(unit_y, angle_x);
        for step_z in 0..dev {
            let angle_z = 2.0 * std::f64::consts::PI * (step_z as f64 / dev as f64);
            let p = rot_z(p, angle_z);
            let rand_offset: f64 = dist.sample(&mut rng);
            points.push(p * rand_offset);
        }
    }
    points
}

fn rot_z(point: Point3, angle: f64) -> Point3 {
    let e1 = angle.cos() * point.x - angle.sin() * point.y;
    let e2 = angle.sin() * point.x + angle.cos() * point.y;
    let e3 = point.z;
    Point3::new(e1, e2, e3)
}

fn rot_x(point: Point3, angle: f64) -> Point3 {
    let e1 = point.x;
    let e2 = angle.cos() * point.y - angle.sin() * point.z;
    let e3 = angle.sin() * point.y + angle.cos() * point.z;
    Point3::new(e1, e2, e3)
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
