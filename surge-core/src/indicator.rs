//! Pure indicator functions.
//!
//! All four indicators are total over finite input: any undercomputable
//! case (short series, zero variance, flat history) yields `None`, never
//! a panic or a NaN. `None` is a missing-data signal, distinct from a
//! legitimate zero reading.

use crate::series::clean_finite;
use itertools::Itertools;

/// Sampling interval of the snapshot close series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Hourly,
    ThirtyMin,
    FifteenMin,
    FiveMin,
    TwoMin,
    OneMin,
}

impl Interval {
    /// Parse a snapshot interval code. Unknown codes fall back to daily.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "1d" => Interval::Daily,
            "1wk" => Interval::Weekly,
            "1mo" => Interval::Monthly,
            "1h" | "60m" => Interval::Hourly,
            "30m" => Interval::ThirtyMin,
            "15m" => Interval::FifteenMin,
            "5m" => Interval::FiveMin,
            "2m" => Interval::TwoMin,
            "1m" => Interval::OneMin,
            _ => Interval::Daily,
        }
    }

    /// Wire code as it appears in the snapshot document.
    pub fn code(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Weekly => "1wk",
            Interval::Monthly => "1mo",
            Interval::Hourly => "1h",
            Interval::ThirtyMin => "30m",
            Interval::FifteenMin => "15m",
            Interval::FiveMin => "5m",
            Interval::TwoMin => "2m",
            Interval::OneMin => "1m",
        }
    }

    /// Sampling periods per trading year, used to annualize the Sharpe
    /// ratio. Intraday factors assume a 6.5 hour equity session.
    pub fn periods_per_year(self) -> f64 {
        match self {
            Interval::Daily => 252.0,
            Interval::Weekly => 52.0,
            Interval::Monthly => 12.0,
            Interval::Hourly => 252.0 * 6.5,
            Interval::ThirtyMin => 252.0 * 13.0,
            Interval::FifteenMin => 252.0 * 26.0,
            Interval::FiveMin => 252.0 * 78.0,
            Interval::TwoMin => 252.0 * 195.0,
            Interval::OneMin => 252.0 * 390.0,
        }
    }
}

/// Wilder-smoothed RSI at the last point of `closes`, in [0, 100].
///
/// Seeds average gain/loss over the first `period` changes with equal
/// weighting, then smooths forward with factor `(period - 1) / period`
/// through the remaining changes. A zero average loss saturates RSI at
/// 100 (and a zero average gain at 0).
///
/// Returns `None` when fewer than `period + 1` finite closes are
/// available, or when `period` is zero.
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 {
        return None;
    }
    let v = clean_finite(closes);
    if v.len() < period + 1 {
        return None;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for (prev, next) in v[..=period].iter().tuple_windows() {
        let change = next - prev;
        if change >= 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    let p = period as f64;
    avg_gain /= p;
    avg_loss /= p;

    let mut value = rsi_point(avg_gain, avg_loss);
    for (prev, next) in v[period..].iter().tuple_windows() {
        let change = next - prev;
        avg_gain = (avg_gain * (p - 1.0) + change.max(0.0)) / p;
        avg_loss = (avg_loss * (p - 1.0) + (-change).max(0.0)) / p;
        value = rsi_point(avg_gain, avg_loss);
    }
    Some(value)
}

// avg_loss == 0 means RS = +inf, which collapses to RSI = 100.
fn rsi_point(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

/// Ex-post annualized Sharpe ratio over the trailing `lookback` closes.
///
/// Simple period returns are taken from the last `lookback` finite
/// closes, excess over the per-period risk-free rate `rf_annual / P`,
/// with `P` looked up from the sampling interval. Standard deviation is
/// the sample form (divisor n-1).
///
/// Returns `None` when fewer than `max(lookback, 2)` finite closes are
/// available, fewer than two valid returns remain, or the deviation is
/// non-finite or zero (a constant-return series has no defined Sharpe).
pub fn sharpe_from_closes(
    closes: &[f64],
    lookback: usize,
    rf_annual: f64,
    interval: Interval,
) -> Option<f64> {
    let v = clean_finite(closes);
    if v.len() < lookback.max(2) {
        return None;
    }
    let tail = &v[v.len() - lookback.min(v.len())..];

    let returns: Vec<f64> = tail
        .iter()
        .tuple_windows()
        .map(|(prev, next)| next / prev - 1.0)
        .filter(|r| r.is_finite())
        .collect();
    if returns.len() < 2 {
        return None;
    }

    let periods = interval.periods_per_year();
    let rf_per = if rf_annual.is_finite() {
        rf_annual / periods
    } else {
        0.0
    };

    let n = returns.len() as f64;
    let mean = returns.iter().map(|r| r - rf_per).sum::<f64>() / n;
    let variance = returns
        .iter()
        .map(|r| {
            let d = (r - rf_per) - mean;
            d * d
        })
        .sum::<f64>()
        / (n - 1.0);
    let sd = variance.sqrt();
    if !sd.is_finite() || sd <= 0.0 {
        return None;
    }
    Some((mean / sd) * periods.sqrt())
}

/// Position of a current IV reading within its rolling history window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IvStanding {
    /// 100 * (current - min) / (max - min); `None` on a flat window.
    pub rank: Option<f64>,
    /// 100 * share of window readings at or below current (inclusive).
    pub percentile: Option<f64>,
}

/// IV rank and percentile of `current` against the trailing `window`
/// readings of `history` (oldest first).
///
/// An empty window or a non-finite current reading leaves both outputs
/// unavailable. A flat window (max == min) is a degenerate range, so the
/// rank is unavailable rather than zero; the percentile is still
/// well-defined and reads 100 when current ties the flat level.
pub fn iv_rank_pct(history: &[f64], current: f64, window: usize) -> IvStanding {
    let start = history.len().saturating_sub(window);
    let vals = clean_finite(&history[start..]);
    if vals.is_empty() || !current.is_finite() {
        return IvStanding::default();
    }

    let min = vals.iter().copied().fold(f64::INFINITY, f64::min);
    let max = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let rank = (max > min).then(|| 100.0 * (current - min) / (max - min));

    let at_or_below = vals.iter().filter(|&&v| v <= current).count();
    let percentile = Some(100.0 * at_or_below as f64 / vals.len() as f64);

    IvStanding { rank, percentile }
}

/// Inputs to the composite surge score. A missing reading contributes
/// nothing to its term.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurgeInputs {
    pub iv_rank: Option<f64>,
    pub ret_1d: Option<f64>,
    pub ret_5d: Option<f64>,
    pub vol_z: Option<f64>,
    pub news_24h: Option<f64>,
    pub rsi_14: Option<f64>,
}

/// Term weights of the surge score.
///
/// Heuristic constants carried over from the dashboard they were
/// observed in, not statistically fitted. Kept as data so a deployment
/// can retune them without touching the scoring code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurgeWeights {
    pub iv_rank: f64,
    pub momentum: f64,
    pub volume: f64,
    pub news: f64,
    pub rsi_deviation: f64,
}

impl Default for SurgeWeights {
    fn default() -> Self {
        Self {
            iv_rank: 0.35,
            momentum: 0.25,
            volume: 0.20,
            news: 0.15,
            rsi_deviation: 0.05,
        }
    }
}

/// Composite surge ranking score.
///
/// Unvalidated heuristic: weighted sum of IV rank, return magnitude
/// (10x the larger of |1d| and |5d|), positive volume z-score, news
/// count capped at 20, and half the RSI deviation from neutral.
pub fn surge_score(inputs: &SurgeInputs, weights: &SurgeWeights) -> f64 {
    let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
    let or_zero = |v: Option<f64>| finite(v).unwrap_or(0.0);

    let iv_rank = or_zero(inputs.iv_rank);
    let momentum = 10.0 * or_zero(inputs.ret_1d).abs().max(or_zero(inputs.ret_5d).abs());
    let volume = or_zero(inputs.vol_z).max(0.0);
    let news = or_zero(inputs.news_24h).min(20.0) / 10.0;
    let rsi_deviation = finite(inputs.rsi_14)
        .map(|r| ((r - 50.0).abs() / 50.0).max(0.0) * 0.5)
        .unwrap_or(0.0);

    weights.iv_rank * iv_rank
        + weights.momentum * momentum
        + weights.volume * volume
        + weights.news * news
        + weights.rsi_deviation * rsi_deviation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_from_code() {
        assert_eq!(Interval::from_code("1d"), Interval::Daily);
        assert_eq!(Interval::from_code("1WK"), Interval::Weekly);
        assert_eq!(Interval::from_code("60m"), Interval::Hourly);
        assert_eq!(Interval::from_code("1h"), Interval::Hourly);
        // Unknown codes fall back to daily annualization
        assert_eq!(Interval::from_code("90m"), Interval::Daily);
        assert_eq!(Interval::from_code(""), Interval::Daily);
    }

    #[test]
    fn test_periods_per_year_table() {
        assert_eq!(Interval::Daily.periods_per_year(), 252.0);
        assert_eq!(Interval::Weekly.periods_per_year(), 52.0);
        assert_eq!(Interval::Monthly.periods_per_year(), 12.0);
        assert_eq!(Interval::Hourly.periods_per_year(), 252.0 * 6.5);
        assert_eq!(Interval::OneMin.periods_per_year(), 252.0 * 390.0);
    }

    #[test]
    fn test_rsi_pure_uptrend_saturates_at_100() {
        let closes: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        let value = rsi(&closes, 14).unwrap();
        assert!((value - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_pure_downtrend_saturates_at_0() {
        let closes: Vec<f64> = (1..=40).rev().map(|i| i as f64).collect();
        let value = rsi(&closes, 14).unwrap();
        assert!(value.abs() < 1e-9);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let closes: Vec<f64> = (1..=14).map(|i| i as f64).collect();
        assert_eq!(rsi(&closes, 14), None);
        assert_eq!(rsi(&[], 14), None);
        assert_eq!(rsi(&closes, 0), None);
    }

    #[test]
    fn test_rsi_exact_seed_window() {
        // Exactly period + 1 closes: the seed estimate is the output.
        let closes = vec![10.0, 11.0, 10.5, 11.5, 12.0];
        let value = rsi(&closes, 4).unwrap();
        // gains = 1.0 + 1.0 + 0.5, losses = 0.5 over the 4 seed changes
        let rs: f64 = (2.5 / 4.0) / (0.5 / 4.0);
        let expected = 100.0 - 100.0 / (1.0 + rs);
        assert!((value - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_ignores_null_like_values() {
        let mut closes: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        closes.insert(5, f64::NAN);
        let value = rsi(&closes, 14).unwrap();
        assert!((value - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_sharpe_constant_returns_unavailable() {
        // Doubling closes give exactly equal +100% returns: zero
        // deviation, no defined Sharpe.
        let closes: Vec<f64> = (0..50).map(|i| 2.0f64.powi(i)).collect();
        assert_eq!(
            sharpe_from_closes(&closes, 30, 0.0, Interval::Daily),
            None
        );
    }

    #[test]
    fn test_sharpe_flat_series_unavailable() {
        let closes = vec![100.0; 50];
        assert_eq!(
            sharpe_from_closes(&closes, 30, 0.02, Interval::Daily),
            None
        );
    }

    #[test]
    fn test_sharpe_insufficient_data() {
        assert_eq!(sharpe_from_closes(&[100.0], 30, 0.0, Interval::Daily), None);
        let closes = vec![100.0, 101.0, 102.0];
        assert_eq!(sharpe_from_closes(&closes, 30, 0.0, Interval::Daily), None);
    }

    #[test]
    fn test_sharpe_known_value() {
        // Alternating +2% / -1% daily returns, rf = 0.
        let mut closes = vec![100.0];
        for i in 0..20 {
            let r = if i % 2 == 0 { 0.02 } else { -0.01 };
            let last = *closes.last().unwrap();
            closes.push(last * (1.0 + r));
        }
        let value = sharpe_from_closes(&closes, 21, 0.0, Interval::Daily).unwrap();

        let returns: Vec<f64> = (0..20)
            .map(|i| if i % 2 == 0 { 0.02 } else { -0.01 })
            .collect();
        let mean: f64 = returns.iter().sum::<f64>() / 20.0;
        let var: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / 19.0;
        let expected = mean / var.sqrt() * 252.0f64.sqrt();
        assert!((value - expected).abs() < 1e-9);
    }

    #[test]
    fn test_iv_rank_worked_examples() {
        let history = vec![10.0, 20.0, 30.0];

        let high = iv_rank_pct(&history, 30.0, 3);
        assert_eq!(high.rank, Some(100.0));
        assert_eq!(high.percentile, Some(100.0));

        let low = iv_rank_pct(&history, 10.0, 3);
        assert_eq!(low.rank, Some(0.0));
        assert!((low.percentile.unwrap() - 100.0 / 3.0).abs() < 1e-9);

        let mid = iv_rank_pct(&history, 20.0, 3);
        assert_eq!(mid.rank, Some(50.0));
    }

    #[test]
    fn test_iv_rank_flat_history_degenerate() {
        let history = vec![15.0, 15.0, 15.0];
        let standing = iv_rank_pct(&history, 15.0, 3);
        assert_eq!(standing.rank, None);
        assert_eq!(standing.percentile, Some(100.0));
    }

    #[test]
    fn test_iv_rank_empty_or_bad_current() {
        assert_eq!(iv_rank_pct(&[], 20.0, 10), IvStanding::default());
        assert_eq!(
            iv_rank_pct(&[10.0, 20.0], f64::NAN, 10),
            IvStanding::default()
        );
    }

    #[test]
    fn test_iv_rank_windows_trailing_values() {
        // Window of 2 only sees [20, 30]; 10 is outside the window.
        let history = vec![10.0, 20.0, 30.0];
        let standing = iv_rank_pct(&history, 20.0, 2);
        assert_eq!(standing.rank, Some(0.0));
        assert_eq!(standing.percentile, Some(50.0));
    }

    #[test]
    fn test_surge_score_missing_inputs_are_zero() {
        let score = surge_score(&SurgeInputs::default(), &SurgeWeights::default());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_surge_score_weighting() {
        let inputs = SurgeInputs {
            iv_rank: Some(80.0),
            ret_1d: Some(0.03),
            ret_5d: Some(-0.05),
            vol_z: Some(2.0),
            news_24h: Some(30.0),
            rsi_14: Some(75.0),
        };
        let score = surge_score(&inputs, &SurgeWeights::default());
        let expected = 0.35 * 80.0
            + 0.25 * 10.0 * 0.05
            + 0.20 * 2.0
            + 0.15 * 2.0
            + 0.05 * 0.25;
        assert!((score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_surge_score_negative_vol_z_clamped() {
        let inputs = SurgeInputs {
            vol_z: Some(-3.0),
            ..Default::default()
        };
        assert_eq!(surge_score(&inputs, &SurgeWeights::default()), 0.0);
    }
}
