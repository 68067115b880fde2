use crate::config::ModelConfig;
use crate::scoreline::OutcomeProbs;
use crate::snapshot::{MatchSnapshot, Side};
use crate::trend::{Metric, TrendStore};

pub const LAMBDA_FLOOR: f64 = 0.1;

/// Adjusted expected-goal rates for the remainder of the match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityPair {
    pub home: f64,
    pub away: f64,
}

impl IntensityPair {
    pub fn get(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    pub fn total(&self) -> f64 {
        self.home + self.away
    }
}

/// Projection steps up to (and including) the optional pass/tackle tilts.
/// The market-feedback tilt and momentum weighting compound on top of this,
/// in that order.
pub fn project_base(cfg: &ModelConfig, snap: &MatchSnapshot) -> IntensityPair {
    let remaining = snap.remaining_minutes();

    let base_home = snap.in_play.home.xg + snap.season_xg.home * remaining / 90.0;
    let base_away = snap.in_play.away.xg + snap.season_xg.away * remaining / 90.0;

    let pair = IntensityPair {
        home: time_decay_adjustment(base_home, snap.minute, snap.in_play.home.xg),
        away: time_decay_adjustment(base_away, snap.minute, snap.in_play.away.xg),
    };
    let pair = adjust_for_scoreline(pair, snap.goal_diff(), snap.minute);

    IntensityPair {
        home: side_adjustments(cfg, snap, Side::Home, pair.home),
        away: side_adjustments(cfg, snap, Side::Away, pair.away),
    }
}

/// Damps the projection as the match ages, with a boost for sides already
/// producing chances and a sharper cut in the final minutes. Output never
/// drops below `LAMBDA_FLOOR`.
pub fn time_decay_adjustment(lambda: f64, elapsed_minutes: f64, in_play_xg: f64) -> f64 {
    let remaining = 90.0 - elapsed_minutes;
    let mut decay = (-0.01 * elapsed_minutes).exp().max(0.6);
    if in_play_xg > 1.5 {
        decay *= 1.15;
    } else if remaining < 10.0 {
        decay *= 0.65;
    }
    (lambda * decay).max(LAMBDA_FLOOR)
}

/// Scoreline game-state correction. Leaders sit back, trailers push; a
/// second pass compounds the effect once the match passes 75 minutes.
pub fn adjust_for_scoreline(pair: IntensityPair, goal_diff: i32, elapsed_minutes: f64) -> IntensityPair {
    let (mut home, mut away) = (pair.home, pair.away);

    if goal_diff == 1 {
        home *= 0.9;
        away *= 1.2;
    } else if goal_diff == -1 {
        home *= 1.2;
        away *= 0.9;
    } else if goal_diff == 0 {
        home *= 1.05;
        away *= 1.05;
    } else if goal_diff >= 2 {
        home *= 0.8;
        away *= 1.3;
    } else {
        home *= 1.3;
        away *= 0.8;
    }

    if elapsed_minutes > 75.0 && goal_diff.abs() >= 1 {
        if goal_diff > 0 {
            home *= 0.85;
            away *= 1.15;
        } else {
            home *= 1.15;
            away *= 0.85;
        }
    }

    IntensityPair { home, away }
}

fn side_adjustments(cfg: &ModelConfig, snap: &MatchSnapshot, side: Side, lambda: f64) -> f64 {
    let own_avg = snap.averages.get(side);
    let opp_avg = snap.averages.get(side.opponent());
    let own = snap.in_play.get(side);

    // Blend toward the season-long attack/defence matchup.
    let mut lambda = lambda * 0.85 + (own_avg.scored / opp_avg.conceded.max(0.75)) * 0.15;

    lambda *= 1.0 + (own.possession - 50.0) / 200.0;
    if own.xg > 1.2 {
        lambda *= 1.15;
    }
    lambda *= 1.0 + own.shots_on_target / 20.0;

    if cfg.extended_stats {
        lambda *= 1.0 + (own.pass_accuracy - 75.0) / 300.0;
        lambda *= 1.0 + (own.tackle_success - 50.0) / 400.0;
    }

    lambda
}

/// Feeds the model's own 1X2 view back into the intensities: the side the
/// model rates stronger gets a small bump, its opponent a matching trim.
pub fn apply_market_feedback(pair: IntensityPair, outcome: &OutcomeProbs) -> IntensityPair {
    let decisive = outcome.home + outcome.away;
    if decisive <= 0.0 {
        return pair;
    }
    let home_share = outcome.home / decisive;
    IntensityPair {
        home: pair.home * (1.0 + (home_share - 0.5) * 0.1),
        away: pair.away * (1.0 + ((1.0 - home_share) - 0.5) * 0.1),
    }
}

/// Momentum weighting from the rolling history: recent xG movement counts
/// more than shots-on-target movement.
pub fn apply_momentum(pair: IntensityPair, trends: &TrendStore) -> IntensityPair {
    let weight = |side: Side| {
        1.0 + trends.recent_trend(Metric::xg(side)) * 0.05
            + trends.recent_trend(Metric::shots_on_target(side)) * 0.03
    };
    IntensityPair {
        home: pair.home * weight(Side::Home),
        away: pair.away * weight(Side::Away),
    }
}
