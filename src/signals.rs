use crate::config::ModelConfig;
use crate::snapshot::{MarketOdds, MatchSnapshot, Side};
use crate::trend::{Metric, TrendStore};

const XG_SURGE: f64 = 0.3;
const SOT_SURGE: f64 = 1.0;
const POSSESSION_SWING: f64 = 3.0;
const OVERREACTION_RATIO: f64 = 1.15;
const UNDERREACTION_RATIO: f64 = 0.85;

/// A side is peaking when both its xG and shots-on-target trends climb
/// together.
pub fn momentum_peak(trends: &TrendStore, side: Side) -> Option<String> {
    let xg = trends.recent_trend(Metric::xg(side));
    let sot = trends.recent_trend(Metric::shots_on_target(side));
    if xg > XG_SURGE && sot > SOT_SURGE {
        Some(format!(
            "{} momentum peaking: xG up {xg:.2}, shots on target up {sot:.0}",
            side.label()
        ))
    } else {
        None
    }
}

/// A side is fading when its chance creation drops while the opponent
/// takes over the ball.
pub fn reversal_point(trends: &TrendStore, side: Side) -> Option<String> {
    let xg = trends.recent_trend(Metric::xg(side));
    let sot = trends.recent_trend(Metric::shots_on_target(side));
    let opp_possession = trends.recent_trend(Metric::possession(side.opponent()));
    if xg < 0.0 && sot < 0.0 && opp_possession > POSSESSION_SWING {
        Some(format!(
            "{} reversal: output fading while {} pulls possession their way",
            side.label(),
            side.opponent().label()
        ))
    } else {
        None
    }
}

/// Minute-banded advisory on how workable the current window is.
pub fn betting_window(elapsed_minutes: f64) -> String {
    let text = if elapsed_minutes < 30.0 {
        "early phase, thin sample, give the trends time to form"
    } else if elapsed_minutes < 45.0 {
        "run-in to half-time, next-goal prices firm up here"
    } else if elapsed_minutes < 60.0 {
        "second half settling, stats lag the restart for a few minutes"
    } else if elapsed_minutes < 75.0 {
        "substitution window, expect sharp price swings"
    } else {
        "closing stages, prices move fast and edges decay quickly"
    };
    format!("Window: {text}")
}

/// Flags 1X2 outcomes where the live price has drifted well past fair.
pub fn market_overreaction(fair: &MarketOdds, live: &MarketOdds) -> Vec<String> {
    let mut out = Vec::new();
    for (label, fair_odds, live_odds) in [
        ("home win", fair.home, live.home),
        ("draw", fair.draw, live.draw),
        ("away win", fair.away, live.away),
    ] {
        if live_odds > 0.0 && live_odds > fair_odds * OVERREACTION_RATIO {
            out.push(format!(
                "Market overreaction on {label}: live {live_odds:.2} vs fair {fair_odds:.2}"
            ));
        }
    }
    out
}

/// Two-sided check on the next-goal price against fair.
pub fn next_goal_overreaction(fair_odds: f64, live_odds: f64) -> Option<String> {
    if live_odds <= 0.0 {
        return None;
    }
    if live_odds > fair_odds * OVERREACTION_RATIO {
        Some(format!(
            "Next-goal price drifting: back value at {live_odds:.2} vs fair {fair_odds:.2}"
        ))
    } else if live_odds < fair_odds * UNDERREACTION_RATIO {
        Some(format!(
            "Next-goal price cramped: lay value at {live_odds:.2} vs fair {fair_odds:.2}"
        ))
    } else {
        None
    }
}

/// Runs every detector and concatenates whatever fires, in a fixed order.
/// Purely advisory; independent of the staking recommendation.
pub fn collect_insights(
    cfg: &ModelConfig,
    trends: &TrendStore,
    snap: &MatchSnapshot,
    fair_match_odds: &MarketOdds,
    fair_next_goal_odds: f64,
) -> Vec<String> {
    let mut out = Vec::new();

    for side in [Side::Home, Side::Away] {
        out.extend(momentum_peak(trends, side));
    }
    for side in [Side::Home, Side::Away] {
        out.extend(reversal_point(trends, side));
    }
    out.push(betting_window(snap.minute));
    if cfg.market_feedback {
        out.extend(market_overreaction(fair_match_odds, &snap.live_match_odds));
    }
    out.extend(next_goal_overreaction(
        fair_next_goal_odds,
        snap.live_next_goal_odds,
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(series: &[(Metric, &[f64])]) -> TrendStore {
        let mut store = TrendStore::new();
        for (metric, values) in series {
            for v in *values {
                store.update(*metric, *v);
            }
        }
        store
    }

    #[test]
    fn momentum_peak_requires_both_trends() {
        let surging = store_with(&[
            (Metric::HomeXg, &[0.1, 0.3, 0.6]),
            (Metric::HomeSot, &[1.0, 2.0, 3.0]),
        ]);
        assert!(momentum_peak(&surging, Side::Home).is_some());
        assert!(momentum_peak(&surging, Side::Away).is_none());

        let xg_only = store_with(&[
            (Metric::HomeXg, &[0.1, 0.3, 0.6]),
            (Metric::HomeSot, &[2.0, 2.0, 2.0]),
        ]);
        assert!(momentum_peak(&xg_only, Side::Home).is_none());
    }

    #[test]
    fn reversal_needs_the_opponent_to_take_the_ball() {
        let fading = store_with(&[
            (Metric::AwayXg, &[0.8, 0.6, 0.5]),
            (Metric::AwaySot, &[3.0, 2.0, 2.0]),
            (Metric::HomePossession, &[48.0, 51.0, 55.0]),
        ]);
        assert!(reversal_point(&fading, Side::Away).is_some());

        let flat_possession = store_with(&[
            (Metric::AwayXg, &[0.8, 0.6, 0.5]),
            (Metric::AwaySot, &[3.0, 2.0, 2.0]),
            (Metric::HomePossession, &[50.0, 50.0, 51.0]),
        ]);
        assert!(reversal_point(&flat_possession, Side::Away).is_none());
    }

    #[test]
    fn betting_window_bands_are_fixed() {
        assert!(betting_window(10.0).contains("early phase"));
        assert!(betting_window(30.0).contains("half-time"));
        assert!(betting_window(45.0).contains("second half"));
        assert!(betting_window(60.0).contains("substitution"));
        assert!(betting_window(75.0).contains("closing stages"));
        assert!(betting_window(89.0).contains("closing stages"));
    }

    #[test]
    fn market_overreaction_checks_each_outcome() {
        let fair = MarketOdds {
            home: 2.0,
            draw: 3.0,
            away: 4.0,
        };
        let live = MarketOdds {
            home: 2.5,
            draw: 3.1,
            away: 0.0,
        };
        let flags = market_overreaction(&fair, &live);
        assert_eq!(flags.len(), 1);
        assert!(flags[0].contains("home win"));
    }

    #[test]
    fn next_goal_overreaction_is_two_sided() {
        assert!(next_goal_overreaction(2.0, 2.4).unwrap().contains("back"));
        assert!(next_goal_overreaction(2.0, 1.5).unwrap().contains("lay"));
        assert!(next_goal_overreaction(2.0, 2.1).is_none());
        assert!(next_goal_overreaction(2.0, 0.0).is_none());
    }

    #[test]
    fn insights_keep_a_fixed_order() {
        let trends = store_with(&[
            (Metric::HomeXg, &[0.1, 0.3, 0.6]),
            (Metric::HomeSot, &[1.0, 2.0, 3.0]),
        ]);
        let snap = MatchSnapshot {
            minute: 80.0,
            live_next_goal_odds: 3.0,
            ..Default::default()
        };
        let fair = MarketOdds {
            home: 2.0,
            draw: 3.0,
            away: 4.0,
        };
        let insights =
            collect_insights(&ModelConfig::minimal(), &trends, &snap, &fair, 2.0);
        assert_eq!(insights.len(), 3);
        assert!(insights[0].contains("momentum peaking"));
        assert!(insights[1].contains("Window"));
        assert!(insights[2].contains("back value"));
    }
}
