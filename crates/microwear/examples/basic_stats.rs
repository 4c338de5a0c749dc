use microwear::{Sample, StatsConfig};
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <sample.json> [stats.json]", args[0]);
        std::process::exit(2);
    }

    let sample = Sample::from_json_file(Path::new(&args[1]))?;
    let config = match args.get(2) {
        Some(path) => StatsConfig::from_json_file(Path::new(path))?,
        None => StatsConfig::default(),
    };

    let counts = sample.counts();
    println!(
        "Sample '{}': {} features, {}.",
        sample.name,
        counts.total(),
        if sample.is_calibrated() { "calibrated" } else { "uncalibrated (pixel units)" }
    );

    let stats = sample.stats(&config);
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
