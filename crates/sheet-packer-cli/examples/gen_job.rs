use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Serialize)]
struct Sheet {
    id: String,
    width: f64,
    height: f64,
}

#[derive(Serialize)]
struct Config {
    container_width: f64,
    max_section_height: f64,
    rotation: String,
}

#[derive(Serialize)]
struct Job {
    sheets: Vec<Sheet>,
    config: Config,
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let out = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("jobs/random.yaml"));
    let count: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(40);
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut rng = rand::rngs::StdRng::seed_from_u64(2025);
    // Mostly cabinet-sized parts with an occasional long panel; quarter-inch steps.
    let sheets = (0..count)
        .map(|i| {
            let long = rng.gen_bool(0.1);
            let w = rng.gen_range(8..=96) as f64 / 4.0 + 6.0;
            let h = if long {
                rng.gen_range(240..=360) as f64 / 4.0
            } else {
                rng.gen_range(16..=192) as f64 / 4.0
            };
            Sheet {
                id: format!("part-{:03}", i + 1),
                width: w,
                height: h,
            }
        })
        .collect();

    let job = Job {
        sheets,
        config: Config {
            container_width: 60.0,
            max_section_height: 96.0,
            rotation: "trial".into(),
        },
    };
    fs::write(&out, serde_yaml::to_string(&job)?)?;
    println!("wrote {} sheets to {}", count, out.display());
    Ok(())
}
