//! Reward arithmetic, kept free of `Env` so it can be tested directly.

/// Share of `reward_budget` owed for `invested` against `goal`.
///
/// `invested * reward_budget / goal`, rounded toward zero. The remainder
/// is dropped, never carried to another investor.
///
/// Returns `None` when `goal` is not positive or the product overflows.
pub fn compute_reward(invested: i128, reward_budget: i128, goal: i128) -> Option<i128> {
    if goal <= 0 {
        return None;
    }
    if invested <= 0 || reward_budget <= 0 {
        return Some(0);
    }
    invested.checked_mul(reward_budget).map(|product| product / goal)
}
