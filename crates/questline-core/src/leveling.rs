//! Level curve: cumulative XP thresholds and their inverse.
//!
//! Early levels use a hand-tuned table (the curve was adjusted level by level
//! during balancing and does not fit a clean formula). Past the table the
//! per-level increment continues geometrically, so the threshold function is
//! defined and strictly increasing for arbitrarily large levels.

/// Cumulative XP required to reach levels 1..=20. Level 1 costs nothing.
const XP_TABLE: [u64; 20] = [
    0, 100, 250, 450, 700, 1_000, 1_400, 1_900, 2_500, 3_200, 4_000, 5_000, 6_200, 7_600, 9_200,
    11_000, 13_100, 15_500, 18_200, 21_200,
];

/// Per-level increment growth factor beyond the table.
const GROWTH_RATE: f64 = 1.15;

/// Cumulative XP required to reach `level`.
///
/// Saturates at `u64::MAX` once the geometric continuation exceeds the
/// representable range (around level 260).
pub fn xp_threshold(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }
    let idx = level as usize;
    if idx <= XP_TABLE.len() {
        return XP_TABLE[idx - 1];
    }

    let base = XP_TABLE[XP_TABLE.len() - 1] as f64;
    let step = (XP_TABLE[XP_TABLE.len() - 1] - XP_TABLE[XP_TABLE.len() - 2]) as f64;
    let extra = (idx - XP_TABLE.len()) as i32;

    // base + step * (r + r^2 + ... + r^extra)
    let total = base + step * GROWTH_RATE * (GROWTH_RATE.powi(extra) - 1.0) / (GROWTH_RATE - 1.0);
    if total >= u64::MAX as f64 {
        u64::MAX
    } else {
        total.floor() as u64
    }
}

/// Largest level whose threshold is at or below `xp`. Inverse of
/// [`xp_threshold`]; always at least 1.
pub fn level_for_xp(xp: u64) -> u32 {
    let mut level = 1;
    loop {
        let next = xp_threshold(level + 1);
        if next > xp || next == u64::MAX {
            return level;
        }
        level += 1;
    }
}

/// XP still required to reach the next level from `xp`.
pub fn xp_to_next_level(xp: u64) -> u64 {
    xp_threshold(level_for_xp(xp) + 1).saturating_sub(xp)
}
