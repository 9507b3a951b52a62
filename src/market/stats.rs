/// Order statistics over integer samples (prices in euros, mileages in km).
/// Median rather than mean throughout: classifieds pools contain placeholder
/// and mispriced entries that would drag a mean.

/// Median of the sample, midpoint-rounded for even sizes. None when empty.
pub fn median(values: &[u32]) -> Option<u32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        let low = sorted[mid - 1] as u64;
        let high = sorted[mid] as u64;
        Some(((low + high) / 2) as u32)
    }
}

pub fn median_i32(values: &[i32]) -> Option<i32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some(((sorted[mid - 1] as i64 + sorted[mid] as i64) / 2) as i32)
    }
}

/// Nearest-rank quantile, q in [0, 1]. Deterministic: sort then index.
pub fn quantile(values: &[u32], q: f64) -> Option<u32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let idx = ((sorted.len() - 1) as f64 * q).round() as usize;
    Some(sorted[idx.min(sorted.len() - 1)])
}

/// Interquantile range (p25, p75).
pub fn iqr(values: &[u32]) -> Option<(u32, u32)> {
    Some((quantile(values, 0.25)?, quantile(values, 0.75)?))
}

/// Range width relative to the center, (high - low) / center. Dispersion
/// input to the confidence mapping.
pub fn relative_spread(range: (u32, u32), center: u32) -> f64 {
    if center == 0 {
        return f64::INFINITY;
    }
    (range.1.saturating_sub(range.0)) as f64 / center as f64
}
