use crate::indicators::moving_average::sma_over_options;

/// Stochastic oscillator.
///
/// Raw %K is the position of the close inside the `k_period` high/low
/// range; %K is the `smooth_k`-SMA of that, %D the `d_period`-SMA of %K.
/// A window whose high/low range is zero yields an undefined row.
pub fn stochastic_series(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_period: usize,
    smooth_k: usize,
    d_period: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let len = closes.len();
    let mut raw = vec![None; len];
    if k_period == 0 || len < k_period {
        return (vec![None; len], vec![None; len]);
    }

    for i in (k_period - 1)..len {
        let window = i + 1 - k_period..=i;
        let highest = highs[window.clone()]
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        let lowest = lows[window].iter().cloned().fold(f64::INFINITY, f64::min);
        let range = highest - lowest;
        if range > 0.0 {
            raw[i] = Some((closes[i] - lowest) / range * 100.0);
        }
    }

    let k = sma_over_options(&raw, smooth_k);
    let d = sma_over_options(&k, d_period);
    (k, d)
}
