use crate::indicators::moving_average::sma_series;

/// Bollinger bands: `period`-SMA middle band, upper/lower at
/// ± `mult` sample standard deviations (ddof = 1, matching the
/// reference rolling std).
pub fn bollinger_series(
    closes: &[f64],
    period: usize,
    mult: f64,
) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<f64>>) {
    let len = closes.len();
    let middle = sma_series(closes, period);
    let mut upper = vec![None; len];
    let mut lower = vec![None; len];
    if period < 2 || len < period {
        return (middle, upper, lower);
    }

    for i in (period - 1)..len {
        let window = &closes[i + 1 - period..=i];
        let mean = middle[i].unwrap();
        let variance: f64 =
            window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (period as f64 - 1.0);
        let std_dev = variance.sqrt();
        upper[i] = Some(mean + mult * std_dev);
        lower[i] = Some(mean - mult * std_dev);
    }

    (middle, upper, lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bollinger_alignment() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 5) as f64).collect();
        let (mid, up, lo) = bollinger_series(&closes, 20, 2.0);

        assert_eq!(mid.len(), 30);
        assert!(mid[..19].iter().all(|v| v.is_none()));
        assert!(up[..19].iter().all(|v| v.is_none()));
        assert!(mid[19..].iter().all(|v| v.is_some()));
        assert!(lo[19..].iter().all(|v| v.is_some()));
    }

    #[test]
    fn test_bollinger_constant_series_collapses() {
        let closes = vec![42.0; 25];
        let (mid, up, lo) = bollinger_series(&closes, 20, 2.0);

        assert_eq!(mid[24], Some(42.0));
        assert_eq!(up[24], Some(42.0));
        assert_eq!(lo[24], Some(42.0));
    }

    #[test]
    fn test_bollinger_golden_values_linear() {
        // closes 1..=20: mean 10.5, sample variance 665/19 = 35,
        // std = sqrt(35), bands at 10.5 +/- 2*sqrt(35)
        let closes: Vec<f64> = (1..=20).map(f64::from).collect();
        let (mid, up, lo) = bollinger_series(&closes, 20, 2.0);

        let std = 35.0_f64.sqrt();
        assert!((mid[19].unwrap() - 10.5).abs() < 1e-9);
        assert!((up[19].unwrap() - (10.5 + 2.0 * std)).abs() < 1e-9);
        assert!((lo[19].unwrap() - (10.5 - 2.0 * std)).abs() < 1e-9);
    }
}
