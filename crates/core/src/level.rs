//
// ─── XP / LEVEL MODEL ──────────────────────────────────────────────────────────
//

/// Cumulative XP required to enter each level band.
///
/// The final entry caps the tabled bands; past it, every
/// [`XP_PER_EXTRA_LEVEL`] grants one more level.
pub const XP_THRESHOLDS: [u32; 11] = [
    0, 500, 1_200, 2_200, 3_500, 5_000, 7_000, 9_500, 12_500, 16_000, 20_000,
];

/// XP per level once the threshold table is exhausted.
pub const XP_PER_EXTRA_LEVEL: u32 = 4_000;

/// A user's level together with progress inside the current level band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: u32,
    pub xp_into_level: u32,
    pub xp_needed: u32,
}

/// Maps cumulative XP to a level and progress within that level.
///
/// Total function: every input produces a valid triple, there are no error
/// conditions. Within the table, the level is the largest 1-based index whose
/// threshold is met. At or past the final threshold, levels continue in flat
/// [`XP_PER_EXTRA_LEVEL`] bands starting from level 10.
///
/// ```
/// # use journey_core::level::level_for;
/// let p = level_for(500);
/// assert_eq!((p.level, p.xp_into_level, p.xp_needed), (2, 0, 700));
///
/// let p = level_for(24_000);
/// assert_eq!((p.level, p.xp_into_level, p.xp_needed), (11, 0, 4_000));
/// ```
#[must_use]
pub fn level_for(total_xp: u32) -> LevelProgress {
    let cap = XP_THRESHOLDS[XP_THRESHOLDS.len() - 1];

    if total_xp >= cap {
        let extra = total_xp - cap;
        return LevelProgress {
            level: 10 + extra / XP_PER_EXTRA_LEVEL,
            xp_into_level: extra % XP_PER_EXTRA_LEVEL,
            xp_needed: XP_PER_EXTRA_LEVEL,
        };
    }

    let mut level = 1;
    for (i, threshold) in XP_THRESHOLDS.iter().enumerate().skip(1) {
        if total_xp >= *threshold {
            level = i + 1;
        } else {
            break;
        }
    }

    let base = XP_THRESHOLDS[level - 1];
    let next = XP_THRESHOLDS[level];
    #[allow(clippy::cast_possible_truncation)]
    let level = level as u32;

    LevelProgress {
        level,
        xp_into_level: total_xp - base,
        xp_needed: next - base,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
