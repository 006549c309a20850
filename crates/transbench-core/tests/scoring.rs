use transbench_core::{
    chrf_plus, levenshtein, normalized_similarity, ChrfScorer, EditDistance, Metric,
};

const PAIRS: &[(&str, &str)] = &[
    ("The cat sat.", "The cat sat on the mat."),
    ("Ref1", "Ref3"),
    ("", "nonempty"),
    ("nonempty", ""),
    ("ကျမ်းစာ", "ကျမ်း"),
    ("a", "b"),
    ("abc abc abc", "abc"),
];

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Edit similarity ─────────────────────────────────────────────────────

#[test]
fn edit_identical_is_one() {
    for (h, _) in PAIRS {
        assert_eq!(normalized_similarity(h, h), 1.0, "{h:?}");
    }
    assert_eq!(normalized_similarity("", ""), 1.0);
}

#[test]
fn edit_against_empty_is_zero() {
    assert_eq!(normalized_similarity("abc", ""), 0.0);
    assert_eq!(normalized_similarity("", "abc"), 0.0);
}

#[test]
fn edit_is_symmetric_and_bounded() {
    for (a, b) in PAIRS {
        let ab = normalized_similarity(a, b);
        assert_eq!(ab, normalized_similarity(b, a), "{a:?} / {b:?}");
        assert!((0.0..=1.0).contains(&ab), "{a:?} / {b:?} -> {ab}");
        assert_eq!(levenshtein(a, b), levenshtein(b, a));
    }
}

#[test]
fn edit_counts_characters_not_bytes() {
    // Each Myanmar code point is 3 bytes in UTF-8.
    assert_eq!(levenshtein("ကျမ်းစာ", "ကျမ်း"), 2);
}

#[test]
fn edit_ref_pair_matches_hand_computation() {
    // One substitution over four characters.
    assert!(approx(normalized_similarity("Ref1", "Ref3"), 0.75));
}

// ── chrF+ ───────────────────────────────────────────────────────────────

#[test]
fn chrf_identical_is_one() {
    for (h, _) in PAIRS {
        if !h.is_empty() {
            assert!(approx(chrf_plus(h, h), 1.0), "{h:?}");
        }
    }
}

#[test]
fn chrf_empty_inputs_score_zero() {
    assert_eq!(chrf_plus("", ""), 0.0);
    assert_eq!(chrf_plus("", "abc"), 0.0);
    assert_eq!(chrf_plus("abc", ""), 0.0);
}

#[test]
fn chrf_disjoint_is_zero() {
    assert_eq!(chrf_plus("xyz", "abc"), 0.0);
}

#[test]
fn chrf_is_bounded() {
    for (h, r) in PAIRS {
        let score = chrf_plus(h, r);
        assert!((0.0..=1.0).contains(&score), "{h:?} / {r:?} -> {score}");
    }
}

#[test]
fn chrf_weights_recall_over_precision() {
    // A short prefix of the reference has perfect precision and low recall;
    // with beta = 2 the score is pulled toward recall.
    let scorer = ChrfScorer::default();
    let stats = scorer.stats("ab", "abc");
    assert!(approx(stats.precision, 1.0));
    assert!(approx(stats.recall, 7.0 / 18.0));
    assert!(stats.f_score < 0.5);
    assert!(scorer.score("ab", "abc") < scorer.score("abc", "ab"));
}

#[test]
fn chrf_order_one_is_unigram_f_score() {
    let scorer = ChrfScorer::new(1, 1.0);
    // Unigram multisets {a, b} vs {a, c}: one match each way.
    assert!(approx(scorer.score("ab", "ac"), 0.5));
}

// ── Metric trait ────────────────────────────────────────────────────────

#[test]
fn metrics_are_usable_as_trait_objects() {
    let chrf = ChrfScorer::default();
    let metrics: [&dyn Metric; 2] = [&chrf, &EditDistance];
    let names: Vec<&str> = metrics.iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["chrf", "edit_similarity"]);
    for metric in metrics {
        assert!(approx(metric.score("same text", "same text"), 1.0));
    }
}
