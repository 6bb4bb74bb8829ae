//! Confidence aggregation

/// Arithmetic mean of `scores`, `0.0` when there are none
pub fn mean<I>(scores: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = scores
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), score| (sum + score, count + 1));

    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}
