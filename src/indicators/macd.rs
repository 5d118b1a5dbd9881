use crate::indicators::moving_average::ewm_series;

/// MACD line, signal line and histogram.
///
/// Built from unseeded exponentially weighted averages (the recursion
/// starts at the first close), so all three columns are defined from
/// row 0 — matching the reference computation exactly.
pub fn macd_series(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let ema_fast = ewm_series(closes, fast);
    let ema_slow = ewm_series(closes, slow);

    let macd: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ewm_series(&macd, signal);
    let histogram: Vec<f64> = macd
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    (macd, signal_line, histogram)
}
