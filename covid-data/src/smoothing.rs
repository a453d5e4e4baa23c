//! Centered rolling means for daily series.

use crate::models::DerivedPoint;

/// Centered moving average with a minimum period of 1.
///
/// Position `i` averages indices `i - window / 2 ..= i + (window - 1) / 2`,
/// clipped to the slice. Odd windows are symmetric; even windows lean one
/// point to the left. Boundary positions average fewer points instead of
/// producing gaps. A window of 0 or 1 returns the input unchanged.
pub fn centered_rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 || values.is_empty() {
        return values.to_vec();
    }
    let before = window / 2;
    let after = (window - 1) / 2;

    // prefix[k] = sum of values[..k]
    let mut prefix = Vec::with_capacity(values.len() + 1);
    prefix.push(0.0);
    for v in values {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + v);
    }

    (0..values.len())
        .map(|i| {
            let lo = i.saturating_sub(before);
            let hi = (i + after).min(values.len() - 1);
            (prefix[hi + 1] - prefix[lo]) / (hi + 1 - lo) as f64
        })
        .collect()
}

/// Fill the smoothed fields of `series` from its raw new cases and new
/// deaths, each averaged independently.
pub fn smooth(series: &[DerivedPoint], window: usize) -> Vec<DerivedPoint> {
    let cases: Vec<f64> = series.iter().map(|p| p.new_cases as f64).collect();
    let deaths: Vec<f64> = series.iter().map(|p| p.new_deaths as f64).collect();
    let cases = centered_rolling_mean(&cases, window);
    let deaths = centered_rolling_mean(&deaths, window);
    series
        .iter()
        .zip(cases.into_iter().zip(deaths))
        .map(|(point, (c, d))| DerivedPoint {
            new_cases_smoothed: c,
            new_deaths_smoothed: d,
            ..point.clone()
        })
        .collect()
}
