/// Relative Strength Index with Wilder smoothing.
///
/// The first average gain/loss is the simple mean of the first `period`
/// price changes; after that `avg = (avg * (period-1) + change) / period`.
/// Defined from row `period` onward (a change needs two closes); a row
/// whose window saw no movement at all is undefined.
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return out;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss += change.abs();
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = rsi_value(avg_gain, avg_loss);

    let n = period as f64;
    for i in (period + 1)..closes.len() {
        let change = closes[i] - closes[i - 1];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, change.abs())
        };
        avg_gain = (avg_gain * (n - 1.0) + gain) / n;
        avg_loss = (avg_loss * (n - 1.0) + loss) / n;
        out[i] = rsi_value(avg_gain, avg_loss);
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        // Flat window: 0/0, the row is undefined
        return None;
    }
    if avg_loss == 0.0 {
        return Some(100.0);
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}
