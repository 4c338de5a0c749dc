use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use microwear::{compute_stats, Annotation, Calibration, Category, ExportMode, Project, Sample, StatsConfig};

const SCRATCH_CATEGORIES: [Category; 3] = [Category::Fs, Category::Cs, Category::Hcs];

fn make_scene(n_pits: usize, n_scratches: usize, side: f64, seed: u64) -> Vec<Annotation> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut items = Vec::with_capacity(n_pits + n_scratches);
    for _ in 0..n_pits {
        let x = rng.gen_range(0.0..side);
        let y = rng.gen_range(0.0..side);
        if rng.gen_bool(0.5) {
            items.push(Annotation::point(Category::Sp, x, y));
        } else {
            items.push(Annotation::circle(Category::Lp, x, y, rng.gen_range(2.0..12.0)));
        }
    }
    for _ in 0..n_scratches {
        let a = [rng.gen_range(0.0..side), rng.gen_range(0.0..side)];
        let b = [rng.gen_range(0.0..side), rng.gen_range(0.0..side)];
        let cat = SCRATCH_CATEGORIES[rng.gen_range(0..SCRATCH_CATEGORIES.len())];
        items.push(Annotation::line(cat, a, b));
    }
    items
}

fn bench_compute_stats(c: &mut Criterion) {
    let calibration = Calibration::new(2.5).with_field_of_view(1280.0, 960.0);
    let small = make_scene(60, 40, 1000.0, 7);
    let large = make_scene(400, 300, 1000.0, 11);

    c.bench_function("compute_stats_60p_40s", |b| {
        b.iter(|| black_box(compute_stats(black_box(&small), Some(&calibration))))
    });
    c.bench_function("compute_stats_400p_300s", |b| {
        b.iter(|| black_box(compute_stats(black_box(&large), Some(&calibration))))
    });
    c.bench_function("compute_stats_400p_300s_uncalibrated", |b| {
        b.iter(|| black_box(compute_stats(black_box(&large), None)))
    });
}

fn bench_export(c: &mut Criterion) {
    let samples: Vec<Sample> = (0..24u64)
        .map(|i| {
            let mut s = Sample::new(format!("sample_{i}"), make_scene(80, 50, 1000.0, i));
            s.metadata.specimen_id = Some(format!("specimen_{}", i / 3));
            s.calibration = Some(Calibration::new(2.0));
            s
        })
        .collect();
    let project = Project::new("bench", samples);
    let config = StatsConfig::default();

    c.bench_function("export_average_24_samples", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(16 * 1024);
            microwear::write_table(black_box(&project), ExportMode::Average, &config, &mut buf)
                .expect("in-memory export should not fail");
            black_box(buf)
        })
    });
}

criterion_group!(hotpaths, bench_compute_stats, bench_export);
criterion_main!(hotpaths);
