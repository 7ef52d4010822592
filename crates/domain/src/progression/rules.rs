//! Cost formulas.

/// Highest level a statistic can reach through a paid level-up.
pub const STATISTIC_MAX_LEVEL: u32 = 10;

/// XP multiplier for statistic level-ups.
pub const STATISTIC_COST_PER_LEVEL: u32 = 10;

/// XP needed to raise a statistic from `level` to `level + 1`.
pub fn statistic_level_up_cost(level: u32) -> u64 {
    u64::from(level) * u64::from(STATISTIC_COST_PER_LEVEL)
}

/// XP needed to raise a skill from `level` to `level + 1`.
pub fn skill_level_up_cost(level: u32, cost_per_level: u32) -> u64 {
    u64::from(level) * u64::from(cost_per_level)
}

/// XP paid in total to bring a skill from 0 to `level`: the triangular
/// number `level * (level + 1) / 2` times `cost_per_level`.
///
/// Returns `None` if the amount does not fit in a `u64`.
pub fn skill_refund(level: u32, cost_per_level: u32) -> Option<u64> {
    let level = u64::from(level);
    // One of level, level + 1 is even, so halve that one before multiplying.
    let triangular = if level % 2 == 0 {
        (level / 2).checked_mul(level + 1)?
    } else {
        level.checked_mul((level + 1) / 2)?
    };
    triangular.checked_mul(u64::from(cost_per_level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistic_cost_is_ten_per_level() {
        assert_eq!(statistic_level_up_cost(0), 0);
        assert_eq!(statistic_level_up_cost(3), 30);
        assert_eq!(statistic_level_up_cost(9), 90);
    }

    #[test]
    fn skill_cost_scales_with_cost_per_level() {
        assert_eq!(skill_level_up_cost(2, 2), 4);
        assert_eq!(skill_level_up_cost(5, 1), 5);
        assert_eq!(
            skill_level_up_cost(u32::MAX, u32::MAX),
            u64::from(u32::MAX) * u64::from(u32::MAX)
        );
    }

    #[test]
    fn refund_is_triangular() {
        assert_eq!(skill_refund(0, 2), Some(0));
        assert_eq!(skill_refund(1, 1), Some(1));
        assert_eq!(skill_refund(3, 1), Some(6));
        assert_eq!(skill_refund(2, 2), Some(6));
        assert_eq!(skill_refund(4, 3), Some(30));
    }

    #[test]
    fn refund_is_sum_of_one_through_level() {
        for cost_per_level in 1..=3u32 {
            for level in 0..=12u32 {
                let expected: u64 = (1..=u64::from(level))
                    .map(|l| l * u64::from(cost_per_level))
                    .sum();
                assert_eq!(skill_refund(level, cost_per_level), Some(expected));
            }
        }
    }

    #[test]
    fn refund_reports_overflow() {
        assert_eq!(skill_refund(u32::MAX, u32::MAX), None);
    }
}
