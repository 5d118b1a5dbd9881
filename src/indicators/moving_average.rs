/// Simple Moving Average over the whole series.
///
/// Output is index-aligned with the input; rows before the window is
/// satisfied hold `None`.
pub fn sma_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let mut sum: f64 = values[..period].iter().sum();
    out[period - 1] = Some(sum / period as f64);
    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out[i] = Some(sum / period as f64);
    }
    out
}

/// Exponential Moving Average seeded with the SMA of the first `period`
/// values, then `ema += (value - ema) * 2/(period+1)`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut ema: f64 = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(ema);
    for i in period..values.len() {
        ema = (values[i] - ema) * multiplier + ema;
        out[i] = Some(ema);
    }
    out
}

/// Exponentially weighted average without a seed window: the recursion
/// starts from the first value, so every row is defined. This is the
/// `ewm(span=.., adjust=false)` flavor MACD is built from.
pub fn ewm_series(values: &[f64], span: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut ewm = values[0];
    out.push(ewm);
    for &v in &values[1..] {
        ewm = (v - ewm) * alpha + ewm;
        out.push(ewm);
    }
    out
}

/// SMA over a column that may itself have undefined leading rows.
/// A window is defined only when every row inside it is.
pub fn sma_over_options(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        if window.iter().all(|v| v.is_some()) {
            let sum: f64 = window.iter().map(|v| v.unwrap()).sum();
            out[i] = Some(sum / period as f64);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_series_alignment() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let sma = sma_series(&values, 3);

        assert_eq!(sma.len(), 5);
        assert_eq!(sma[0], None);
        assert_eq!(sma[1], None);
        assert_eq!(sma[2], Some(2.0));
        assert_eq!(sma[3], Some(3.0));
        assert_eq!(sma[4], Some(4.0));
    }

    #[test]
    fn test_sma_insufficient_data() {
        let sma = sma_series(&[1.0, 2.0], 5);
        assert!(sma.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_ema_seeded_with_sma() {
        // Linear 1..=12, period 10: seed is 5.5, then the EMA tracks
        // the line with a constant lag of exactly +1 per step.
        let values: Vec<f64> = (1..=12).map(f64::from).collect();
        let ema = ema_series(&values, 10);

        assert_eq!(ema[8], None);
        assert_eq!(ema[9], Some(5.5));
        let e10 = ema[10].unwrap();
        assert!((e10 - 6.5).abs() < 1e-12);
        let e11 = ema[11].unwrap();
        assert!((e11 - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_ewm_defined_from_first_row() {
        let values = vec![10.0, 20.0];
        let ewm = ewm_series(&values, 12);

        assert_eq!(ewm[0], 10.0);
        // 10 + (2/13) * 10
        assert!((ewm[1] - (10.0 + 10.0 * 2.0 / 13.0)).abs() < 1e-12);
    }

    #[test]
    fn test_sma_over_options_respects_gaps() {
        let values = vec![None, Some(2.0), Some(4.0), Some(6.0)];
        let sma = sma_over_options(&values, 2);

        assert_eq!(sma[0], None);
        assert_eq!(sma[1], None); // window covers the undefined row
        assert_eq!(sma[2], Some(3.0));
        assert_eq!(sma[3], Some(5.0));
    }
}
