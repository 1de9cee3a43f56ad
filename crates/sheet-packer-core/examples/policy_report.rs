use rand::{Rng, SeedableRng};
use sheet_packer_core::config::{PackerConfig, RotationPolicy};
use sheet_packer_core::model::SheetRequest;
use sheet_packer_core::packer::{Packer, SectionPacker};
use std::time::Instant;

fn run(n: usize, rotation: RotationPolicy, seed: u64) {
    let cfg = PackerConfig {
        container_width: 60.0,
        max_section_height: 96.0,
        rotation,
        ..Default::default()
    };

    let mut p = SectionPacker::new(&cfg);
    let mut used_area = 0.0;
    let mut placed = 0usize;
    let mut dropped = 0usize;
    let mut segment_sum = 0usize;

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let start = Instant::now();
    for i in 0..n {
        let w: f64 = rng.gen_range(4..=72) as f64;
        let h: f64 = rng.gen_range(4..=72) as f64;
        let req = SheetRequest::new(format!("s{}", i), w, h);
        match p.pack(i, &req) {
            Ok(f) => {
                used_area += f.width * f.height;
                placed += 1;
                segment_sum += p.skyline().segments().len();
            }
            Err(_) => dropped += 1,
        }
    }
    let elapsed = start.elapsed();
    let (boundaries, total_height) = p.finish();
    let occ = if total_height > 0.0 {
        used_area / (cfg.container_width * total_height)
    } else {
        0.0
    };
    let avg_segments = if placed > 0 {
        segment_sum as f64 / placed as f64
    } else {
        0.0
    };
    println!(
        "rotation={:?} placed={} dropped={} sections={} height={:.1} occ={:.2}% avg_segments={:.1} time={}ms",
        rotation,
        placed,
        dropped,
        boundaries.len(),
        total_height,
        occ * 100.0,
        avg_segments,
        elapsed.as_millis()
    );
}

fn main() {
    // Unsorted input, engine only.
    for (n, seed) in [(1000, 1337), (5000, 4242)] {
        println!("N={}", n);
        for rotation in [
            RotationPolicy::PerPlacementTrial,
            RotationPolicy::Fixed,
            RotationPolicy::LongSideVertical,
        ] {
            run(n, rotation, seed);
        }
        println!();
    }
}
