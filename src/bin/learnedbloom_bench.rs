use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use env_logger::{Builder, Env};
use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use LearnedBloom::classifier::DecisionTreeClassifier;
use LearnedBloom::filter::{SandwichedLearnedBloomFilter, StandardBloomFilter};
use LearnedBloom::metrics;

/// Simple deterministic PRNG (SplitMix64).
/// Enough for benches; not cryptographic.
#[derive(Clone)]
struct Rng64 {
    state: u64,
}
impl Rng64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

/// How L3 gets populated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// Correct protocol: L3 insert iff the classifier predicts non-member.
    Classifier,
    /// Fixture: unconditional random draw (legacy benchmark behavior).
    /// Does NOT guarantee the no-false-negative property.
    RandomDraw,
}

/// Learned-Bloom micro-benchmark CLI
///
/// Examples:
///   learnedbloom_bench --n 5000 --json
///   learnedbloom_bench --n 100000 --n-miss 100000 --policy random-draw --draw-percent 10
#[derive(Parser, Debug)]
#[command(name = "learnedbloom_bench", version, about = "Learned Bloom filter micro-bench CLI")]
struct Opt {
    /// True-set size (keys inserted into the filters)
    #[arg(long, default_value_t = 5000)]
    n: usize,

    /// Held-out negative probes (for FPR measurement)
    #[arg(long, default_value_t = 5000)]
    n_miss: usize,

    /// Standalone standard filter: capacity in bits
    #[arg(long, default_value_t = 3000)]
    std_bits: usize,

    /// Standalone standard filter: hash functions
    #[arg(long, default_value_t = 3)]
    std_hashes: u32,

    /// Sandwich L1 capacity in bits
    #[arg(long, default_value_t = 1000)]
    l1_bits: usize,

    /// Sandwich L1 hash functions
    #[arg(long, default_value_t = 2)]
    l1_hashes: u32,

    /// Sandwich L3 capacity in bits
    #[arg(long, default_value_t = 500)]
    l3_bits: usize,

    /// Sandwich L3 hash functions
    #[arg(long, default_value_t = 2)]
    l3_hashes: u32,

    /// L3 population policy
    #[arg(long, value_enum, default_value_t = Policy::Classifier)]
    policy: Policy,

    /// Draw percentage for --policy random-draw
    #[arg(long, default_value_t = 10)]
    draw_percent: u32,

    /// Random seed (key salts + random-draw fixture)
    #[arg(long, default_value_t = 0xA1B2_C3D4_E5F6_7788)]
    seed: u64,

    /// JSON output
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Debug, Clone, Serialize)]
struct PhaseStats {
    name: String,
    ops: u64,
    elapsed_sec: f64,
    ns_per_op: f64,
    tput_ops: f64,
}

#[derive(Debug, Clone, Serialize)]
struct FilterStats {
    memory_bits: usize,
    bits_set: u64,
    fill_ratio: f64,
    false_positives: u64,
    fpr: f64,
    false_negatives: u64,
}

#[derive(Debug, Clone, Serialize)]
struct BenchReport {
    n: usize,
    n_miss: usize,
    policy: String,
    standard: FilterStats,
    learned: FilterStats,
    memory_saving_ratio: f64,
    phases: Vec<PhaseStats>,
    metrics: metrics::MetricsSnapshot,
}

fn main() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = run() {
        eprintln!("bench error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let opt = Opt::parse();

    if opt.draw_percent > 100 {
        return Err(anyhow!("--draw-percent must be in [0, 100]"));
    }

    // Reset metrics so the report covers only this run.
    metrics::reset();

    // Synthetic URL workload, shaped like the malicious/safe split the
    // filter is meant for. A salt keeps hostnames digit- and hyphen-heavy
    // on the hostile side.
    let mut rng = Rng64::new(opt.seed);
    let mut bad_urls = Vec::with_capacity(opt.n);
    for i in 0..opt.n {
        bad_urls.push(format!(
            "http://bad-hacker-site-{}-{:04}.com",
            i,
            rng.next_u64() % 10_000
        ));
    }
    let mut safe_urls = Vec::with_capacity(opt.n_miss);
    for i in 0..opt.n_miss {
        safe_urls.push(format!("http://safesite{}.org", i));
    }

    let model = DecisionTreeClassifier;
    let mut standard = StandardBloomFilter::new(opt.std_bits, opt.std_hashes)?;
    let mut learned = SandwichedLearnedBloomFilter::new(
        opt.l1_bits,
        opt.l1_hashes,
        opt.l3_bits,
        opt.l3_hashes,
        &model,
    )?;

    // Populate both filters.
    println!("==> Phase: populate ({} keys, policy={:?})", opt.n, opt.policy);
    match opt.policy {
        Policy::Classifier => {
            for url in &bad_urls {
                standard.insert(url);
            }
            learned.populate(&bad_urls);
        }
        Policy::RandomDraw => {
            warn!(
                "random-draw policy is a measurement fixture; it does not \
                 guarantee zero false negatives"
            );
            let mut draw = StdRng::seed_from_u64(opt.seed);
            for url in &bad_urls {
                standard.insert(url);
                learned.insert_l1(url);
                if draw.gen_range(0u32..100) < opt.draw_percent {
                    learned.insert_l3(url);
                }
            }
        }
    }

    let mut phases = Vec::new();

    // Query latency + FPR over the held-out negatives.
    println!("==> Phase: standard_miss ({} probes)", safe_urls.len());
    let (std_fps, p) = timed("standard_miss", safe_urls.len() as u64, || {
        let mut fps = 0u64;
        for url in &safe_urls {
            if standard.possibly_contains(url) {
                fps += 1;
            }
        }
        fps
    });
    phases.push(p);

    println!("==> Phase: learned_miss ({} probes)", safe_urls.len());
    let (lrn_fps, p) = timed("learned_miss", safe_urls.len() as u64, || {
        let mut fps = 0u64;
        for url in &safe_urls {
            if learned.query(url) {
                fps += 1;
            }
        }
        fps
    });
    phases.push(p);

    // False-negative audit over the true set. Must be zero for the
    // standard filter always, and for the sandwich under --policy
    // classifier; random-draw is expected to leak.
    println!("==> Phase: fn_audit ({} keys)", bad_urls.len());
    let mut std_fns = 0u64;
    let mut lrn_fns = 0u64;
    for url in &bad_urls {
        if !standard.possibly_contains(url) {
            std_fns += 1;
        }
        if !learned.query(url) {
            lrn_fns += 1;
        }
    }
    if std_fns > 0 {
        return Err(anyhow!("standard filter produced {} false negatives", std_fns));
    }
    if opt.policy == Policy::Classifier && lrn_fns > 0 {
        return Err(anyhow!(
            "sandwich filter produced {} false negatives under the classifier policy",
            lrn_fns
        ));
    }

    let n_miss = safe_urls.len() as u64;
    let report = BenchReport {
        n: opt.n,
        n_miss: opt.n_miss,
        policy: format!("{:?}", opt.policy),
        standard: FilterStats {
            memory_bits: standard.memory_bits(),
            bits_set: standard.bits_set(),
            fill_ratio: standard.fill_ratio(),
            false_positives: std_fps,
            fpr: ratio(std_fps, n_miss),
            false_negatives: std_fns,
        },
        learned: FilterStats {
            memory_bits: learned.memory_bits(),
            bits_set: learned.l1().bits_set() + learned.l3().bits_set(),
            fill_ratio: (learned.l1().bits_set() + learned.l3().bits_set()) as f64
                / learned.memory_bits() as f64,
            false_positives: lrn_fps,
            fpr: ratio(lrn_fps, n_miss),
            false_negatives: lrn_fns,
        },
        memory_saving_ratio: 1.0 - learned.memory_bits() as f64 / standard.memory_bits() as f64,
        phases,
        metrics: metrics::snapshot(),
    };

    if opt.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report_human(&report);
    }
    Ok(())
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn timed<F: FnOnce() -> u64>(name: &str, ops: u64, f: F) -> (u64, PhaseStats) {
    let start = Instant::now();
    let out = f();
    let elapsed = start.elapsed();
    (out, phase_stats(name, ops, elapsed))
}

fn phase_stats(name: &str, ops: u64, elapsed: Duration) -> PhaseStats {
    let secs = elapsed.as_secs_f64();
    PhaseStats {
        name: name.to_string(),
        ops,
        elapsed_sec: secs,
        ns_per_op: if ops > 0 { elapsed.as_nanos() as f64 / ops as f64 } else { 0.0 },
        tput_ops: if secs > 0.0 { ops as f64 / secs } else { 0.0 },
    }
}

fn print_report_human(r: &BenchReport) {
    println!("Learned Bloom bench report:");
    println!("  true set     = {} keys", r.n);
    println!("  negatives    = {} probes", r.n_miss);
    println!("  policy       = {}", r.policy);
    println!("Memory footprint:");
    println!("  standard     = {} bits", r.standard.memory_bits);
    println!(
        "  learned      = {} bits ({:.0}% smaller)",
        r.learned.memory_bits,
        r.memory_saving_ratio * 100.0
    );
    println!("False positives:");
    println!(
        "  standard     = {} / {} ({:.2}%)",
        r.standard.false_positives,
        r.n_miss,
        r.standard.fpr * 100.0
    );
    println!(
        "  learned      = {} / {} ({:.2}%)",
        r.learned.false_positives,
        r.n_miss,
        r.learned.fpr * 100.0
    );
    println!("False negatives:");
    println!("  standard     = {}", r.standard.false_negatives);
    println!("  learned      = {}", r.learned.false_negatives);
    println!("Phases:");
    for p in &r.phases {
        println!(
            "  {:>14}: ops={} elapsed={:.3}s {:.0} ns/op ({:.0} ops/s)",
            p.name, p.ops, p.elapsed_sec, p.ns_per_op, p.tput_ops
        );
    }
    let m = &r.metrics;
    println!("Metrics snapshot:");
    println!("  sandwich_queries        = {}", m.sandwich_queries);
    println!("  l1_rejects              = {}", m.l1_rejects);
    println!("  model_accepts           = {}", m.model_accepts);
    println!("  l3_probes/positive      = {}/{}", m.l3_probes, m.l3_positive);
    println!("  inserts_l1/l3           = {}/{}", m.inserts_l1, m.inserts_l3);
    println!("  short_circuit_ratio     = {:.3}", m.short_circuit_ratio());
}
