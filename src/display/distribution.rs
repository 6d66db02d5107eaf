use crate::math::stats::{mean, sample_stddev};

const HISTOGRAM_BINS: usize = 50;

/// Bar heights from empty to full block; index = bin count / divider.
const BAR_SYMBOLS: [&str; 9] = [
    "_", "\u{2581}", "\u{2582}", "\u{2583}", "\u{2584}", "\u{2585}", "\u{2586}", "\u{2587}",
    "\u{2588}",
];

/// Renders a one-line summary of a value distribution: mean, sample stddev,
/// and a 50-bin histogram drawn with unicode block characters.
///
/// Bar heights are scaled so the fullest bin maps to the tallest symbol:
/// divider = max(ceil(max_count / 8), 1), symbol index = count / divider.
pub fn format_distribution(values: &[f64]) -> String {
    let counts = histogram(values, HISTOGRAM_BINS);
    let max_count = counts.iter().copied().max().unwrap_or(0);
    let divider = ((max_count + 7) / 8).max(1);

    let bars: String = counts
        .iter()
        .map(|&count| BAR_SYMBOLS[count / divider])
        .collect();

    format!(
        "mean: {:.4}\tstddev: {:.4}\t[{}]",
        mean(values),
        sample_stddev(values),
        bars
    )
}

/// Histogram of `values` over `bins` equal-width bins spanning the value
/// range. All-equal (or empty) input lands everything in the first bin.
fn histogram(values: &[f64], bins: usize) -> Vec<usize> {
    let mut counts = vec![0usize; bins];
    if values.is_empty() {
        return counts;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range == 0.0 {
        counts[0] = values.len();
        return counts;
    }

    for &value in values {
        let bin = (((value - min) / range) * bins as f64) as usize;
        counts[bin.min(bins - 1)] += 1;
    }

    counts
}
