//! Descriptive statistics over return slices.
//!
//! Variance and covariance are sample estimates (n - 1 denominator). Functions
//! return NaN where the statistic is undefined (empty input, fewer than two
//! observations) rather than panicking.

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// True when every element equals the first. Empty input is not constant.
pub fn is_constant(xs: &[f64]) -> bool {
    match xs.first() {
        Some(&first) => xs.iter().all(|&x| x == first),
        None => false,
    }
}

pub fn covariance(xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len().min(ys.len());
    if n < 2 {
        return f64::NAN;
    }
    let mx = mean(&xs[..n]);
    let my = mean(&ys[..n]);
    let sum: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - mx) * (y - my))
        .sum();
    sum / (n - 1) as f64
}

/// Sample variance. A constant series has variance exactly 0.
pub fn variance(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return f64::NAN;
    }
    if is_constant(xs) {
        return 0.0;
    }
    covariance(xs, xs)
}

pub fn std_dev(xs: &[f64]) -> f64 {
    variance(xs).sqrt()
}

/// Pearson correlation, NaN if either series is constant.
pub fn correlation(xs: &[f64], ys: &[f64]) -> f64 {
    let sx = std_dev(xs);
    let sy = std_dev(ys);
    if sx == 0.0 || sy == 0.0 {
        return f64::NAN;
    }
    let r = covariance(xs, ys) / (sx * sy);
    if r.is_nan() { r } else { r.clamp(-1.0, 1.0) }
}

/// Linearly interpolated percentile, `q` in `[0, 100]`.
pub fn percentile(xs: &[f64], q: f64) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Running product of `1 + r`.
pub fn cumulative_growth(xs: &[f64]) -> Vec<f64> {
    xs.iter()
        .scan(1.0_f64, |acc, r| {
            *acc *= 1.0 + r;
            Some(*acc)
        })
        .collect()
}
