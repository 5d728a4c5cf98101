//! End-to-end alignments over hand-built cost tables.

use hangul_align::fuzzy::cost::CostModel;
use hangul_align::{align, Aligner, CostTables, Error, Thresholds};
use std::sync::{Arc, Barrier};
use std::thread;

const A: char = '\u{1161}';
const EU: char = '\u{1173}';
const K_CODA: char = '\u{11A8}';
const NIEUN: char = '\u{1102}';

/// Uniform tables with one measured vowel confusion.
fn tables() -> CostTables {
    let mut tables = CostTables::uniform();
    tables.vowel.insert(A, EU, 0.6);
    tables
}

fn aligner() -> Aligner {
    Aligner::new(Arc::new(tables()))
}

#[test]
fn identical_syllables() {
    let alignment = aligner().align("가", "가").unwrap();
    assert_eq!(alignment.matrix.get(0, 0), Some(0.0));
    assert_eq!(alignment.path, vec![(0, 0), (1, 1), (2, 2)]);
    assert_eq!(alignment.total_cost(), 0.0);
    assert_eq!(alignment.syllable_mapping.len(), 1);
    assert_eq!(alignment.syllable_mapping[&0], vec![0]);
}

#[test]
fn differing_vowel_costs_only_its_cell() {
    let alignment = aligner().align("사랑", "사릉").unwrap();
    assert_eq!(
        alignment.path,
        vec![(0, 0), (1, 1), (2, 2), (3, 3), (4, 4), (5, 5)]
    );
    assert_eq!(alignment.matrix.get(3, 3), Some(0.0));
    assert_eq!(alignment.matrix.get(4, 4), Some(0.6));
    assert_eq!(alignment.total_cost(), 0.6);
    assert_eq!(alignment.syllable_mapping[&0], vec![0]);
    assert_eq!(alignment.syllable_mapping[&1], vec![1]);
    assert_eq!(alignment.syllable_pairs(), vec![('사', vec!['사']), ('랑', vec!['릉'])]);
}

#[test]
fn stretched_vowel_is_one_window() {
    let alignment = aligner().align("가", "가아아").unwrap();
    // one step covers the whole 아아 run
    assert_eq!(alignment.path, vec![(0, 0), (1, 1), (2, 6)]);
    assert_eq!(alignment.total_cost(), 0.0);
    assert!(!alignment.crosses_infinite_cost());

    let raw_indices: Vec<usize> = alignment.jamo_alignment.iter().map(|p| p.raw.index).collect();
    assert_eq!(raw_indices, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(alignment.syllable_mapping[&0], vec![0, 1, 2]);
}

#[test]
fn empty_reference_fails_before_alignment() {
    match aligner().align("", "가") {
        Err(Error::EmptyInput { reference, raw }) => {
            assert_eq!(reference, "");
            assert_eq!(raw, "가");
        }
        other => panic!("expected EmptyInput, got {other:?}"),
    }
    assert!(matches!(
        aligner().align("hello", "가"),
        Err(Error::EmptyInput { .. })
    ));
}

#[test]
fn non_hangul_is_stripped() {
    let alignment = aligner().align("가!", "(가)").unwrap();
    assert_eq!(alignment.reference, "가");
    assert_eq!(alignment.raw, "가");
    assert_eq!(alignment.total_cost(), 0.0);
}

#[test]
fn malformed_rule_is_fatal_only_when_asked_for() {
    let mut broken = tables();
    broken.conversion.insert(K_CODA, NIEUN, "\u{11A8}");

    let model = CostModel::new(&broken, Thresholds::default());
    assert!(matches!(
        model.convert(K_CODA, NIEUN),
        Err(Error::Conversion { .. })
    ));

    // Inside the engine the same rule just closes off the moves that need it.
    let intact = align(&tables(), Thresholds::default(), "먹네", "멍네", true).unwrap();
    let degraded = align(&broken, Thresholds::default(), "먹네", "멍네", true).unwrap();
    assert_eq!(intact.total_cost(), 1.0);
    assert_eq!(degraded.total_cost(), 2.0);
}

#[test]
fn unusable_rule_entries_fall_back_to_plain_cost() {
    // ᄂᄂ is not a single onset, so the rule offers no candidates and the
    // identical ᄂ is matched directly.
    let mut tables = tables();
    tables.conversion.insert(K_CODA, NIEUN, "\u{11A8}/\u{1102}\u{1102}");

    let model = CostModel::new(&tables, Thresholds::default());
    assert!(model.convert(K_CODA, NIEUN).unwrap().leading.is_empty());

    let alignment = align(&tables, Thresholds::default(), "먹네", "먹네", true).unwrap();
    assert_eq!(alignment.total_cost(), 0.0);
    assert_eq!(
        alignment.path,
        vec![(0, 0), (1, 1), (2, 2), (3, 3), (4, 4), (5, 5)]
    );
}

#[test]
fn thresholds_change_what_counts_as_similar() {
    // 먹어 written 먺거: ㄲ is close enough to ㄱ to count as the kept coda
    // under the default consonant cut-off, so the ㄱ onset is free.
    let mut tables = tables();
    tables.trailing.insert(K_CODA, '\u{11A9}', 0.15);
    let tables = Arc::new(tables);

    let loose = Aligner::new(Arc::clone(&tables)).align("먹어", "먺거").unwrap();
    let strict = Aligner::new(tables)
        .with_thresholds(Thresholds { vowel: 0.3, consonant: 0.1 })
        .align("먹어", "먺거")
        .unwrap();
    assert_eq!(loose.total_cost(), 0.15);
    assert!((strict.total_cost() - 1.15).abs() < 1e-9);
}

#[test]
fn shared_tables_across_threads() {
    const THREADS: usize = 8;
    let aligner = aligner();
    let expected = aligner.align("사랑해요", "사릉해여").unwrap().summary();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let aligner = aligner.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                aligner.align("사랑해요", "사릉해여").unwrap().summary()
            })
        })
        .collect();

    for handle in handles {
        let summary = handle.join().unwrap();
        assert_eq!(summary.path, expected.path);
        assert_eq!(summary.syllable_mapping, expected.syllable_mapping);
        assert_eq!(summary.total_cost, expected.total_cost);
    }
}
