use std::env;
use std::time::Duration;

use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, Criterion, Throughput};

use docstrum_core::layout::Word;
use docstrum_core::utils::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchTier {
    Quick,
    Full,
}

impl BenchTier {
    pub fn from_env() -> Self {
        match env::var("DOCSTRUM_BENCH_TIER").as_deref() {
            Ok("full") => Self::Full,
            _ => Self::Quick,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub tier: BenchTier,
    pub seed: u64,
    pub sample_size: usize,
    pub measurement: Duration,
}

pub fn bench_config() -> BenchConfig {
    let tier = BenchTier::from_env();
    let seed = env::var("DOCSTRUM_BENCH_SEED")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0xC0FFEE);
    let (sample_size, measurement) = match tier {
        BenchTier::Quick => (20, Duration::from_secs(3)),
        BenchTier::Full => (30, Duration::from_secs(8)),
    };

    BenchConfig {
        tier,
        seed,
        sample_size,
        measurement,
    }
}

pub fn configure_group<M: Measurement>(group: &mut BenchmarkGroup<'_, M>, cfg: &BenchConfig) {
    group.sample_size(cfg.sample_size);
    group.measurement_time(cfg.measurement);
}

pub fn bench_criterion() -> Criterion {
    Criterion::default().configure_from_args()
}

pub fn words_throughput(words: usize) -> Throughput {
    Throughput::Elements(words as u64)
}

#[derive(Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    pub fn gen_f64(&mut self, min: f64, max: f64) -> f64 {
        let n = self.next_u64() as f64 / u64::MAX as f64;
        min + (max - min) * n
    }
}

/// A multi-column page of roughly `count` words.
///
/// Paragraphs of jittered lines are stacked in three columns and the page
/// keeps growing downwards until enough words are placed.
pub fn synthetic_page(seed: u64, count: usize) -> Vec<Word> {
    let mut rng = XorShift64::new(seed);
    let mut words = Vec::with_capacity(count);
    let mut para = 0usize;

    while words.len() < count {
        let col = (para % 3) as f64;
        let top = 760.0 - (para / 3) as f64 * 90.0;
        let rows = 3 + para % 4;
        let font = 9.0 + (para % 3) as f64;
        for r in 0..rows {
            let bottom = top - font - r as f64 * (font + 3.0) + rng.gen_f64(-0.3, 0.3);
            let mut x = 36.0 + col * 185.0 + rng.gen_f64(0.0, 2.0);
            let right_edge = x + 165.0;
            while x < right_edge && words.len() < count {
                let w = rng.gen_f64(font * 0.8, font * 4.0);
                words.push(Word::horizontal(
                    format!("w{}", words.len()),
                    BoundingBox::new(x, bottom, x + w, bottom + font),
                ));
                x += w + rng.gen_f64(font * 0.25, font * 0.35);
            }
        }
        para += 1;
    }
    words
}
