use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use clap::Parser;
use serde::Serialize;
use ytdat::data::export::format_datetime;

/// Write a synthetic YouTube statistics export for trying the dashboard.
#[derive(Debug, Parser)]
#[command(about)]
struct Args {
    /// Output CSV path.
    #[arg(short, long, default_value = "sample_youtube_data.csv")]
    output: PathBuf,

    /// Number of videos to generate.
    #[arg(short, long, default_value_t = 500)]
    rows: usize,

    /// Seed for the deterministic generator.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Fraction of Views/Date cells to replace with unparsable text.
    #[arg(long, default_value_t = 0.0)]
    dirty: f64,
}

#[derive(Debug, Serialize)]
struct SampleRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Content")]
    content: &'static str,
    #[serde(rename = "Video title")]
    title: String,
    #[serde(rename = "Video publish time")]
    publish_time: String,
    #[serde(rename = "Duration")]
    duration: u32,
    #[serde(rename = "Views")]
    views: String,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Content type, duration range in seconds, mean of ln(views).
const CONTENT: [(&str, (u32, u32), f64); 3] = [
    ("Shorts", (15, 60), 8.5),
    ("Videos", (180, 1500), 7.5),
    ("Live", (1800, 7200), 6.0),
];

const TOPICS: [&str; 6] = [
    "Rust tips",
    "Desk setup",
    "Q&A",
    "Build log",
    "Travel vlog",
    "Tutorial",
];

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).context("invalid start date")?;

    let mut rows: Vec<SampleRow> = (0..args.rows)
        .map(|i| {
            let (content, (min_dur, max_dur), ln_views) =
                CONTENT[rng.below(CONTENT.len() as u64) as usize];
            let day = start + Duration::days(rng.below(180) as i64);
            let published = (day - Duration::days(rng.below(30) as i64))
                .and_hms_opt(
                    rng.below(24) as u32,
                    rng.below(60) as u32,
                    rng.below(60) as u32,
                )
                .unwrap_or_default();
            let duration = min_dur + rng.below(u64::from(max_dur - min_dur + 1)) as u32;
            let views = rng.gauss(ln_views, 1.0).exp().round();

            let dirty = rng.next_f64() < args.dirty;
            SampleRow {
                date: if dirty && i % 2 == 0 {
                    "unknown".to_string()
                } else {
                    day.format("%Y-%m-%d").to_string()
                },
                content,
                title: format!("{} #{i}", TOPICS[i % TOPICS.len()]),
                publish_time: format_datetime(published),
                duration,
                views: if dirty && i % 2 == 1 {
                    "n/a".to_string()
                } else {
                    format!("{views:.0}")
                },
            }
        })
        .collect();
    rows.sort_by(|a, b| a.date.cmp(&b.date));

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    for row in &rows {
        writer.serialize(row).context("writing sample row")?;
    }
    writer.flush().context("flushing sample output")?;

    log::info!("Wrote {} rows to {}", rows.len(), args.output.display());
    println!("Wrote {} videos to {}", rows.len(), args.output.display());
    Ok(())
}
