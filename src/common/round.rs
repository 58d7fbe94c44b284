/// Round to `decimals` places, ties to even (how tabular tools round).
#[inline]
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Approximate equality for acreage and currency comparisons.
#[cfg(test)]
#[inline]
pub(crate) fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}
