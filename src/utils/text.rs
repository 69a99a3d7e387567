//! Text helpers for report output

/// Collapses a (possibly multi-line) message into a single line
///
/// Newlines and tabs become spaces, runs of whitespace collapse to one
/// space, and leading/trailing whitespace is dropped.
pub fn single_line(message: &str) -> String {
    message.split_whitespace().collect::<Vec<_>>().join(" ")
}
