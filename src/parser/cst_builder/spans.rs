//! Span storage and validation helpers used when building the CST.
//!
//! `StatementSpans` groups the byte ranges of each statement category after
//! scanning the token stream. During [`build_green_tree`](super::tree::build_green_tree)
//! these spans determine where nodes start and end so the resulting tree
//! mirrors the source layout. The builder enforces that every span list is
//! sorted and free from overlaps, and that the lists do not overlap each
//! other, catching mistakes early.

use crate::Span;

/// A single span ordering issue within a named span list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanListIssue {
    list: String,
    prev: Span,
    next: Span,
}

impl SpanListIssue {
    fn new(list: impl Into<String>, prev: Span, next: Span) -> Self {
        Self {
            list: list.into(),
            prev,
            next,
        }
    }

    /// The span list name that failed validation.
    #[must_use]
    pub fn list(&self) -> &str {
        &self.list
    }

    /// The earlier span in the invalid ordering.
    #[must_use]
    pub fn prev(&self) -> &Span {
        &self.prev
    }

    /// The later span in the invalid ordering.
    #[must_use]
    pub fn next(&self) -> &Span {
        &self.next
    }
}

impl std::fmt::Display for SpanListIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} not sorted: spans overlap or are unsorted: {:?} then {:?}",
            self.list, self.prev, self.next
        )
    }
}

/// Errors returned when span list validation fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SpanListValidationError {
    message: String,
    issues: Vec<SpanListIssue>,
}

impl SpanListValidationError {
    fn new(issues: Vec<SpanListIssue>) -> Self {
        let message = issues
            .iter()
            .map(SpanListIssue::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        Self { message, issues }
    }

    /// Access the underlying validation issues.
    #[must_use]
    pub fn issues(&self) -> &[SpanListIssue] {
        &self.issues
    }
}

/// Spans for each scanned statement category.
///
/// Instances are constructed via [`StatementSpans::builder`] to ensure span
/// lists are sorted and non-overlapping.
#[non_exhaustive]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StatementSpans {
    /// Top-level simple statement spans.
    simple: Vec<Span>,
    /// Indented or compound logical line spans.
    blocks: Vec<Span>,
}

/// Builder for [`StatementSpans`].
#[derive(Default)]
pub struct StatementSpansBuilder {
    simple: Vec<Span>,
    blocks: Vec<Span>,
}

impl StatementSpansBuilder {
    /// Set the top-level simple statement spans.
    #[must_use]
    pub fn simple(mut self, spans: Vec<Span>) -> Self {
        self.simple = spans;
        self
    }

    /// Set the block line spans.
    #[must_use]
    pub fn blocks(mut self, spans: Vec<Span>) -> Self {
        self.blocks = spans;
        self
    }

    /// Build the [`StatementSpans`], returning an error for invalid span lists.
    ///
    /// # Errors
    ///
    /// Returns [`SpanListValidationError`] when a list is unsorted or
    /// overlapping, or when the two lists overlap each other.
    pub fn build(self) -> Result<StatementSpans, SpanListValidationError> {
        let mut issues = validate_span_lists_sorted(&[
            ("simple", &self.simple),
            ("blocks", &self.blocks),
        ]);
        issues.extend(validate_lists_disjoint(&self.simple, &self.blocks));
        if issues.is_empty() {
            Ok(StatementSpans {
                simple: self.simple,
                blocks: self.blocks,
            })
        } else {
            Err(SpanListValidationError::new(issues))
        }
    }
}

impl StatementSpans {
    /// Start building a [`StatementSpans`] instance.
    #[must_use]
    pub fn builder() -> StatementSpansBuilder {
        StatementSpansBuilder::default()
    }

    /// Access top-level simple statement spans.
    #[must_use]
    pub fn simple(&self) -> &[Span] {
        &self.simple
    }

    /// Access block line spans.
    #[must_use]
    pub fn blocks(&self) -> &[Span] {
        &self.blocks
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SpanOrderError {
    prev: Span,
    next: Span,
}

fn validate_spans_sorted(spans: &[Span]) -> Result<(), SpanOrderError> {
    for pair in spans.windows(2) {
        let [first, second] = pair else { continue };
        if first.end > second.start {
            return Err(SpanOrderError {
                prev: first.clone(),
                next: second.clone(),
            });
        }
    }
    Ok(())
}

fn validate_span_lists_sorted(lists: &[(&str, &[Span])]) -> Vec<SpanListIssue> {
    lists
        .iter()
        .filter_map(|&(name, spans)| {
            validate_spans_sorted(spans)
                .err()
                .map(|SpanOrderError { prev, next }| SpanListIssue::new(name, prev, next))
        })
        .collect()
}

fn validate_lists_disjoint(simple: &[Span], blocks: &[Span]) -> Option<SpanListIssue> {
    simple.iter().find_map(|a| {
        blocks
            .iter()
            .find(|b| a.start < b.end && b.start < a.end)
            .map(|b| SpanListIssue::new("simple/blocks", a.clone(), b.clone()))
    })
}

#[cfg(test)]
mod tests;
