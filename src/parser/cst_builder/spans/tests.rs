//! Tests for span validation in CST building helpers.

use super::*;
use rstest::rstest;

#[test]
fn validate_spans_sorted_err_on_overlap() {
    let spans = vec![0..5, 4..8];
    assert!(validate_spans_sorted(&spans).is_err());
}

#[test]
fn validate_spans_sorted_err_on_unsorted() {
    let spans = vec![5..10, 0..2];
    assert!(validate_spans_sorted(&spans).is_err());
}

#[test]
fn validate_spans_sorted_ok_on_empty() {
    let spans: Vec<Span> = Vec::new();
    assert!(validate_spans_sorted(&spans).is_ok());
}

#[test]
fn validate_spans_sorted_ok_on_sorted() {
    let spans = vec![0..2, 3..5, 5..8];
    assert!(validate_spans_sorted(&spans).is_ok());
}

#[expect(
    clippy::expect_used,
    reason = "test assertions prefer expect for valid spans"
)]
#[test]
fn builder_succeeds_on_interleaved_lists() {
    let simple = vec![0..2, 10..12];
    let blocks = vec![3..9];
    let spans = StatementSpans::builder()
        .simple(simple.clone())
        .blocks(blocks.clone())
        .build()
        .expect("expected valid spans");
    assert_eq!(spans.simple(), simple.as_slice());
    assert_eq!(spans.blocks(), blocks.as_slice());
}

#[rstest]
#[case::unsorted(vec![1..2, 0..1])]
#[case::overlap(vec![0..3, 2..4])]
fn builder_errs_on_invalid_spans(#[case] spans: Vec<Span>) {
    let Err(err) = StatementSpans::builder().simple(spans).build() else {
        panic!("expected validation error");
    };
    assert!(err.to_string().contains("simple not sorted"));
}

#[expect(
    clippy::expect_used,
    reason = "test assertions prefer expect for invalid spans"
)]
#[test]
fn builder_reports_cross_list_overlap() {
    let err = StatementSpans::builder()
        .simple(vec![0..5])
        .blocks(vec![4..6])
        .build()
        .expect_err("expected validation error");
    let issue = err.issues().first().expect("expected at least one issue");
    assert_eq!(issue.list(), "simple/blocks");
    assert_eq!(issue.prev(), &(0..5));
    assert_eq!(issue.next(), &(4..6));
}
