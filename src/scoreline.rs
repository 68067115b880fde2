use crate::intensity::IntensityPair;

/// Remaining-goal grid runs 0..=MAX_REMAINING_GOALS per side.
pub const MAX_REMAINING_GOALS: u32 = 5;

const NEXT_GOAL_FLOOR: f64 = 0.30;
const NEXT_GOAL_CEIL: f64 = 0.90;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeProbs {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl OutcomeProbs {
    pub fn total(&self) -> f64 {
        self.home + self.draw + self.away
    }
}

/// Poisson point mass with extra weight at zero, matching how often live
/// matches go scoreless from here compared to a pure Poisson.
pub fn zero_inflated_poisson(lambda: f64, k: u32, p_zero: f64) -> f64 {
    if k == 0 {
        p_zero + (1.0 - p_zero) * (-lambda).exp()
    } else {
        (1.0 - p_zero) * lambda.powi(k as i32) * (-lambda).exp() / factorial(k)
    }
}

fn factorial(k: u32) -> f64 {
    (1..=k).fold(1.0, |acc, n| acc * n as f64)
}

/// Sums the joint remaining-goal mass over the 6x6 grid, classifying each
/// cell against the current scoreline. Normalization is skipped when the
/// accumulated total is zero.
pub fn outcome_probs(
    pair: IntensityPair,
    home_goals: u32,
    away_goals: u32,
    p_zero: f64,
) -> OutcomeProbs {
    let mut home = 0.0;
    let mut draw = 0.0;
    let mut away = 0.0;

    for h in 0..=MAX_REMAINING_GOALS {
        let p_h = zero_inflated_poisson(pair.home, h, p_zero);
        for a in 0..=MAX_REMAINING_GOALS {
            let p = p_h * zero_inflated_poisson(pair.away, a, p_zero);
            let final_home = home_goals + h;
            let final_away = away_goals + a;
            if final_home > final_away {
                home += p;
            } else if final_home < final_away {
                away += p;
            } else {
                draw += p;
            }
        }
    }

    let total = home + draw + away;
    if total > 0.0 {
        home /= total;
        draw /= total;
        away /= total;
    }

    OutcomeProbs { home, draw, away }
}

/// Break-even price for a probability; degenerate probabilities fall back
/// to even money rather than dividing by zero.
pub fn fair_odds(probability: f64) -> f64 {
    if probability > 0.0 {
        1.0 / probability
    } else {
        1.0
    }
}

/// Probability of at least one more goal, from the combined intensity over
/// the remaining minutes. Clamped: never call a goal near-certain or
/// near-impossible off in-play stats alone.
pub fn next_goal_probability(pair: IntensityPair, remaining_minutes: f64) -> f64 {
    let g = 1.0 - (-(pair.total() * remaining_minutes / 45.0)).exp();
    g.clamp(NEXT_GOAL_FLOOR, NEXT_GOAL_CEIL)
}

#[cfg(test)]
mod tests {
    use super::*;

    const P_ZERO: f64 = 0.06;

    #[test]
    fn zip_masses_sum_to_one() {
        for lambda in [0.0, 0.1, 0.9, 1.7, 3.4] {
            let sum: f64 = (0..40)
                .map(|k| zero_inflated_poisson(lambda, k, P_ZERO))
                .sum();
            assert!((sum - 1.0).abs() < 1e-9, "lambda {lambda}: sum {sum}");
        }
    }

    #[test]
    fn zip_zero_mass_dominates_pure_poisson() {
        for lambda in [0.2, 1.0, 2.5] {
            let zip = zero_inflated_poisson(lambda, 0, P_ZERO);
            let pure = (1.0 - P_ZERO) * (-lambda).exp();
            assert!(zip >= pure);
            assert!((zip - pure - P_ZERO).abs() < 1e-12);
        }
    }

    #[test]
    fn outcome_probs_normalize_to_one() {
        let pair = IntensityPair {
            home: 1.4,
            away: 0.9,
        };
        for (gh, ga) in [(0, 0), (2, 1), (0, 3)] {
            let out = outcome_probs(pair, gh, ga, P_ZERO);
            assert!((out.total() - 1.0).abs() < 1e-9);
            assert!(out.home >= 0.0 && out.home <= 1.0);
            assert!(out.draw >= 0.0 && out.draw <= 1.0);
            assert!(out.away >= 0.0 && out.away <= 1.0);
        }
    }

    #[test]
    fn outcome_probs_respect_the_current_scoreline() {
        let pair = IntensityPair {
            home: 0.5,
            away: 0.5,
        };
        let level = outcome_probs(pair, 0, 0, P_ZERO);
        let home_up = outcome_probs(pair, 2, 0, P_ZERO);
        assert!(home_up.home > level.home);
        assert!(home_up.away < level.away);
    }

    #[test]
    fn stronger_home_intensity_moves_the_home_bucket() {
        let even = outcome_probs(
            IntensityPair {
                home: 1.0,
                away: 1.0,
            },
            0,
            0,
            P_ZERO,
        );
        let tilted = outcome_probs(
            IntensityPair {
                home: 2.0,
                away: 0.6,
            },
            0,
            0,
            P_ZERO,
        );
        assert!(tilted.home > even.home);
        assert!(tilted.away < even.away);
    }

    #[test]
    fn fair_odds_invert_with_zero_fallback() {
        assert_eq!(fair_odds(0.5), 2.0);
        assert_eq!(fair_odds(0.25), 4.0);
        assert_eq!(fair_odds(0.0), 1.0);
    }

    #[test]
    fn next_goal_probability_is_clamped() {
        let dead = IntensityPair {
            home: 0.0,
            away: 0.0,
        };
        assert_eq!(next_goal_probability(dead, 90.0), 0.30);

        let wild = IntensityPair {
            home: 4.0,
            away: 4.0,
        };
        assert_eq!(next_goal_probability(wild, 90.0), 0.90);

        let mid = IntensityPair {
            home: 0.6,
            away: 0.4,
        };
        let g = next_goal_probability(mid, 45.0);
        assert!((g - (1.0 - (-1.0_f64).exp())).abs() < 1e-12);
    }
}
