// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the identifier rules in the docrename-document crate.
// Runs each rule set over a synthetic page of OCR noise with the identifier
// near the end, which is the slow path for line-oriented scans.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use docrename_document::extract::{nca, obr, saro};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Roughly one page of recognised text: `lines` filler lines, then `tail`.
fn noisy_page(lines: usize, tail: &str) -> String {
    let mut text = String::new();
    for i in 0..lines {
        text.push_str(&format!("Line {i}: Particulars amount 1,234.{:02} Responsibility Center\n", i % 100));
    }
    text.push_str(tail);
    text
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_rules(c: &mut Criterion) {
    let obr_page = noisy_page(80, "Serial No. MOOE-2024-000123\n");
    let nca_page = noisy_page(80, "NCA-BMB-A-24-1234567\n2067 Regular Fund\n");
    let saro_page = noisy_page(80, "SARO No.: A~01~05818\n");
    let miss_page = noisy_page(80, "");

    c.bench_function("obr::find_serial (80 lines)", |b| {
        b.iter(|| black_box(obr::find_serial(black_box(&obr_page))));
    });
    c.bench_function("nca::find_number (80 lines)", |b| {
        b.iter(|| black_box(nca::find_number(black_box(&nca_page))));
    });
    c.bench_function("saro::suggestions (80 lines)", |b| {
        b.iter(|| black_box(saro::suggestions(black_box(&["", saro_page.as_str()]))));
    });
    c.bench_function("obr::extract miss (80 lines)", |b| {
        b.iter(|| black_box(obr::extract(black_box(&miss_page))));
    });
}

criterion_group!(benches, bench_rules);
criterion_main!(benches);
