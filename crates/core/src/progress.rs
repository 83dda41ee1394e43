//! Cooldown progress: fraction computation and bar rendering.

/// Filled bar cell.
pub const FILLED_CELL: char = '█';
/// Empty bar cell.
pub const EMPTY_CELL: char = '-';

/// Map the current cooldown position to a fraction in `[0.0, 1.0]`.
///
/// Progress is linear between `peak` (0.0) and `target` (1.0). When the
/// recorded peak never exceeded the target the result is binary.
pub fn cooldown_fraction(current: f64, target: f64, peak: f64) -> f64 {
    if peak <= target {
        return if current <= target { 1.0 } else { 0.0 };
    }
    if current <= target {
        return 1.0;
    }
    ((peak - current) / (peak - target)).clamp(0.0, 1.0)
}

/// Render `fraction` as `width` cells: `floor(width * fraction)` filled,
/// the rest empty.
pub fn render_bar(fraction: f64, width: usize) -> String {
    let filled = ((width as f64) * fraction.clamp(0.0, 1.0)).floor() as usize;
    let filled = filled.min(width);
    let mut bar = String::with_capacity(width * FILLED_CELL.len_utf8());
    bar.extend(std::iter::repeat(FILLED_CELL).take(filled));
    bar.extend(std::iter::repeat(EMPTY_CELL).take(width - filled));
    bar
}
