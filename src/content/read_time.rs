//! Estimated reading time

/// Reading speed used for estimates
pub const WORDS_PER_MINUTE: usize = 200;

/// Estimate reading time as `"<N> min read"`, rounding up to whole minutes.
///
/// Never reports less than one minute, even for an empty body.
pub fn read_time(body: &str) -> String {
    let words = body.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{} min read", minutes)
}
