// Criterion benchmarks for vorschlag-de.
//
// Uses a synthetic vocabulary so no resource files are needed. Set
// VORSCHLAG_DATA_DIR to a directory holding de_DE.dic (and optionally
// de_DE.aff and frequency.txt) to also benchmark against a real dictionary.
//
// Run:
//   cargo bench -p vorschlag-de

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use vorschlag_de::{AffixDictionary, FrequencyTable, Suggester, SuggesterConfig};

const PREFIXES: &[&str] = &["a", "be", "hau", "sch", "ü", "ver", "zw", "stra"];

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

fn synthetic_words(n: usize) -> Vec<String> {
    const SYLLABLES: &[&str] = &[
        "a", "be", "ber", "ch", "de", "ein", "er", "ge", "hau", "kin", "lich", "mar", "ne",
        "sch", "stra", "ten", "ü", "ung", "ver", "zw",
    ];
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    (0..n)
        .map(|_| {
            let parts = 2 + (next() % 4) as usize;
            (0..parts)
                .map(|_| SYLLABLES[(next() % SYLLABLES.len() as u64) as usize])
                .collect()
        })
        .collect()
}

fn synthetic_suggester(accelerated: bool) -> Suggester {
    let words = synthetic_words(50_000);
    let dict = AffixDictionary::from_texts(&words.join("\n"), None);
    let freq = FrequencyTable::from_words(words.iter().step_by(7).map(String::as_str), 10_000);
    Suggester::with_data(
        Some(dict),
        freq,
        &SuggesterConfig {
            accelerated,
            ..SuggesterConfig::default()
        },
    )
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_suggest(c: &mut Criterion) {
    let mut group = c.benchmark_group("suggest_synthetic_50k");
    for (name, accelerated) in [("packed", true), ("fallback", false)] {
        let suggester = synthetic_suggester(accelerated);
        group.bench_with_input(BenchmarkId::from_parameter(name), &suggester, |b, s| {
            b.iter(|| {
                for prefix in PREFIXES {
                    std::hint::black_box(s.suggest(prefix));
                }
            });
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let words = synthetic_words(50_000);
    let text = words.join("\n");
    c.bench_function("build_packed_50k", |b| {
        b.iter(|| {
            let dict = AffixDictionary::from_texts(&text, None);
            std::hint::black_box(Suggester::with_data(
                Some(dict),
                FrequencyTable::default(),
                &SuggesterConfig::default(),
            ))
        });
    });
}

fn bench_real_dictionary(c: &mut Criterion) {
    let Some(dir) = std::env::var_os("VORSCHLAG_DATA_DIR") else {
        eprintln!("[bench_real_dictionary] VORSCHLAG_DATA_DIR not set, skipping");
        c.bench_function("suggest_real (skipped)", |b| b.iter(|| {}));
        return;
    };
    let config = SuggesterConfig::default().with_data_dir(std::path::Path::new(&dir));
    let mut group = c.benchmark_group("suggest_real");
    for (name, accelerated) in [("packed", true), ("fallback", false)] {
        let suggester = Suggester::new(&SuggesterConfig {
            accelerated,
            history: None,
            ..config.clone()
        });
        group.bench_with_input(BenchmarkId::from_parameter(name), &suggester, |b, s| {
            b.iter(|| {
                for prefix in PREFIXES {
                    std::hint::black_box(s.suggest(prefix));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_suggest, bench_build, bench_real_dictionary);
criterion_main!(benches);
