use crate::config::{BackStrategy, ModelConfig};
use crate::intensity::{self, IntensityPair};
use crate::scoreline::{self, OutcomeProbs};
use crate::signals;
use crate::snapshot::{MarketOdds, MatchSnapshot};
use crate::staking::{self, AdviceKind, StakeAdvice};
use crate::trend::TrendStore;

/// Everything one evaluation produces. Built fresh per call; only the
/// trend store outlives it.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub intensities: IntensityPair,
    pub outcome: OutcomeProbs,
    pub fair_match_odds: MarketOdds,
    pub goal_probability: f64,
    pub fair_next_goal_odds: f64,
    pub advice: StakeAdvice,
    pub advice_text: String,
    pub insights: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn evaluate(cfg: &ModelConfig, trends: &mut TrendStore, snap: &MatchSnapshot) -> Evaluation {
    let warnings = snap.validate();
    trends.observe(snap);

    let mut pair = intensity::project_base(cfg, snap);
    if cfg.market_feedback {
        let preview = scoreline::outcome_probs(
            pair,
            snap.goals.home,
            snap.goals.away,
            cfg.zero_inflation,
        );
        pair = intensity::apply_market_feedback(pair, &preview);
    }
    let pair = intensity::apply_momentum(pair, trends);

    let outcome = scoreline::outcome_probs(
        pair,
        snap.goals.home,
        snap.goals.away,
        cfg.zero_inflation,
    );
    let fair_match_odds = MarketOdds {
        home: scoreline::fair_odds(outcome.home),
        draw: scoreline::fair_odds(outcome.draw),
        away: scoreline::fair_odds(outcome.away),
    };

    let goal_probability = scoreline::next_goal_probability(pair, snap.remaining_minutes());
    let fair_next_goal_odds = scoreline::fair_odds(goal_probability);

    let advice = staking::recommend(
        cfg,
        snap.balance,
        fair_next_goal_odds,
        snap.live_next_goal_odds,
    );
    let advice_text = advice_text(cfg, goal_probability, &advice);
    let insights = signals::collect_insights(cfg, trends, snap, &fair_match_odds, fair_next_goal_odds);

    Evaluation {
        intensities: pair,
        outcome,
        fair_match_odds,
        goal_probability,
        fair_next_goal_odds,
        advice,
        advice_text,
        insights,
        warnings,
    }
}

fn advice_text(cfg: &ModelConfig, goal_probability: f64, advice: &StakeAdvice) -> String {
    let mut text = format!(
        "Goal probability {:.1}% | fair next-goal odds {:.2}",
        goal_probability * 100.0,
        advice.fair_odds
    );
    match advice.kind {
        AdviceKind::Lay => {
            text.push_str(&format!(
                "\nLay next goal at {:.2} | stake {:.2} | liability {:.2}",
                advice.live_odds, advice.stake, advice.liability
            ));
        }
        AdviceKind::Back => match cfg.back_strategy {
            BackStrategy::Stake => {
                text.push_str(&format!(
                    "\nBack next goal at {:.2} | stake {:.2}",
                    advice.live_odds, advice.stake
                ));
            }
            BackStrategy::Exit => {
                text.push_str(&format!(
                    "\nBack value at {:.2} | exit existing position, no fresh stake",
                    advice.live_odds
                ));
            }
        },
        AdviceKind::None => {}
    }
    text
}
