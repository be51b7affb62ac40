//! Benchmarks for full-snapshot indicator recomputation.

use chart_core::traits::{Indicator, MultiSeriesIndicator};
use chart_core::types::CandlePoint;
use chart_indicators::{IndicatorEngine, IndicatorSettings, Macd, Rsi, Sma};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn generate_candles(size: usize) -> Vec<CandlePoint> {
    (0..size)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            CandlePoint::new(i as i64 * 60_000, close - 0.2, close + 0.5, close - 0.5, close, 1000.0)
        })
        .collect()
}

fn benchmark_single_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicators");

    for size in [1000, 10000, 100000].iter() {
        let candles = generate_candles(*size);

        group.bench_with_input(BenchmarkId::new("sma20", size), &candles, |b, candles| {
            let sma = Sma::new(20);
            b.iter(|| sma.calculate(black_box(candles)))
        });

        group.bench_with_input(BenchmarkId::new("rsi14", size), &candles, |b, candles| {
            let rsi = Rsi::new(14);
            b.iter(|| rsi.calculate(black_box(candles)))
        });

        group.bench_with_input(BenchmarkId::new("macd", size), &candles, |b, candles| {
            let macd = Macd::new();
            b.iter(|| macd.calculate(black_box(candles)))
        });
    }

    group.finish();
}

fn benchmark_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    let engine = IndicatorEngine::new(IndicatorSettings::default()).expect("default settings");

    for size in [1000, 5000].iter() {
        let candles = generate_candles(*size);
        group.bench_with_input(BenchmarkId::new("default_set", size), &candles, |b, candles| {
            b.iter(|| engine.compute(black_box(candles)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_single_indicators, benchmark_engine);
criterion_main!(benches);
