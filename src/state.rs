use std::collections::VecDeque;

use crate::config::ModelConfig;
use crate::engine::{self, Evaluation};
use crate::snapshot::{MarketOdds, MatchSnapshot, PerSide, TeamAverages, TeamInPlay};
use crate::trend::TrendStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    HomeAvgScored,
    HomeAvgConceded,
    AwayAvgScored,
    AwayAvgConceded,
    HomeSeasonXg,
    AwaySeasonXg,
    ElapsedMinutes,
    HomeGoals,
    AwayGoals,
    HomeInPlayXg,
    AwayInPlayXg,
    HomePossession,
    AwayPossession,
    HomeShotsOnTarget,
    AwayShotsOnTarget,
    HomePassAccuracy,
    AwayPassAccuracy,
    HomeTackleSuccess,
    AwayTackleSuccess,
    AccountBalance,
    LiveNextGoalOdds,
    LiveHomeOdds,
    LiveDrawOdds,
    LiveAwayOdds,
}

impl InputField {
    pub const ALL: [InputField; 24] = [
        InputField::HomeAvgScored,
        InputField::HomeAvgConceded,
        InputField::AwayAvgScored,
        InputField::AwayAvgConceded,
        InputField::HomeSeasonXg,
        InputField::AwaySeasonXg,
        InputField::ElapsedMinutes,
        InputField::HomeGoals,
        InputField::AwayGoals,
        InputField::HomeInPlayXg,
        InputField::AwayInPlayXg,
        InputField::HomePossession,
        InputField::AwayPossession,
        InputField::HomeShotsOnTarget,
        InputField::AwayShotsOnTarget,
        InputField::HomePassAccuracy,
        InputField::AwayPassAccuracy,
        InputField::HomeTackleSuccess,
        InputField::AwayTackleSuccess,
        InputField::AccountBalance,
        InputField::LiveNextGoalOdds,
        InputField::LiveHomeOdds,
        InputField::LiveDrawOdds,
        InputField::LiveAwayOdds,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn label(self) -> &'static str {
        match self {
            InputField::HomeAvgScored => "Home avg goals scored",
            InputField::HomeAvgConceded => "Home avg goals conceded",
            InputField::AwayAvgScored => "Away avg goals scored",
            InputField::AwayAvgConceded => "Away avg goals conceded",
            InputField::HomeSeasonXg => "Home pre-match xG",
            InputField::AwaySeasonXg => "Away pre-match xG",
            InputField::ElapsedMinutes => "Elapsed minutes",
            InputField::HomeGoals => "Home goals",
            InputField::AwayGoals => "Away goals",
            InputField::HomeInPlayXg => "Home in-play xG",
            InputField::AwayInPlayXg => "Away in-play xG",
            InputField::HomePossession => "Home possession %",
            InputField::AwayPossession => "Away possession %",
            InputField::HomeShotsOnTarget => "Home shots on target",
            InputField::AwayShotsOnTarget => "Away shots on target",
            InputField::HomePassAccuracy => "Home pass accuracy %",
            InputField::AwayPassAccuracy => "Away pass accuracy %",
            InputField::HomeTackleSuccess => "Home tackle success %",
            InputField::AwayTackleSuccess => "Away tackle success %",
            InputField::AccountBalance => "Account balance",
            InputField::LiveNextGoalOdds => "Live next-goal odds",
            InputField::LiveHomeOdds => "Live home-win odds",
            InputField::LiveDrawOdds => "Live draw odds",
            InputField::LiveAwayOdds => "Live away-win odds",
        }
    }
}

/// Messages from the demo provider thread to the UI thread.
#[derive(Debug, Clone)]
pub enum Delta {
    SetFields(Vec<(InputField, f64)>),
    Log(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoCommand {
    Restart,
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetFields(updates) => {
            for (field, value) in updates {
                state.set_value(field, value);
            }
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

/// Session state owned by the caller: typed field values, the trend
/// store, the latest evaluation and a bounded rolling log.
#[derive(Debug, Clone)]
pub struct AppState {
    values: [f64; InputField::COUNT],
    pub selected: usize,
    pub editing: Option<String>,
    pub config: ModelConfig,
    pub trends: TrendStore,
    pub evaluation: Option<Evaluation>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub evaluations: usize,
}

impl AppState {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            values: [0.0; InputField::COUNT],
            selected: 0,
            editing: None,
            config,
            trends: TrendStore::new(),
            evaluation: None,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
            evaluations: 0,
        }
    }

    pub fn value(&self, field: InputField) -> f64 {
        self.values[field as usize]
    }

    pub fn set_value(&mut self, field: InputField, value: f64) {
        self.values[field as usize] = value;
    }

    pub fn selected_field(&self) -> InputField {
        InputField::ALL[self.selected]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % InputField::COUNT;
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + InputField::COUNT - 1) % InputField::COUNT;
    }

    pub fn begin_edit(&mut self) {
        let current = self.value(self.selected_field());
        self.editing = Some(if current == 0.0 {
            String::new()
        } else {
            trim_float(current)
        });
    }

    pub fn push_edit_char(&mut self, c: char) {
        if let Some(buf) = &mut self.editing {
            if c.is_ascii_digit() || c == '.' || (c == '-' && buf.is_empty()) {
                buf.push(c);
            }
        }
    }

    pub fn backspace_edit(&mut self) {
        if let Some(buf) = &mut self.editing {
            buf.pop();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn commit_edit(&mut self) {
        let Some(buf) = self.editing.take() else {
            return;
        };
        let field = self.selected_field();
        if buf.trim().is_empty() {
            self.set_value(field, 0.0);
            return;
        }
        match buf.trim().parse::<f64>() {
            Ok(value) => self.set_value(field, value),
            Err(_) => self.push_log(format!(
                "[WARN] Could not parse '{buf}' for {}",
                field.label()
            )),
        }
    }

    /// Zeroes every field and clears the trend history in one step.
    pub fn reset(&mut self) {
        self.values = [0.0; InputField::COUNT];
        self.trends.reset();
        self.evaluation = None;
        self.editing = None;
        self.push_log("[INFO] Fields and trend history reset");
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        let v = |f: InputField| self.value(f);
        MatchSnapshot {
            minute: v(InputField::ElapsedMinutes),
            goals: PerSide {
                home: v(InputField::HomeGoals).max(0.0) as u32,
                away: v(InputField::AwayGoals).max(0.0) as u32,
            },
            season_xg: PerSide {
                home: v(InputField::HomeSeasonXg),
                away: v(InputField::AwaySeasonXg),
            },
            averages: PerSide {
                home: TeamAverages {
                    scored: v(InputField::HomeAvgScored),
                    conceded: v(InputField::HomeAvgConceded),
                },
                away: TeamAverages {
                    scored: v(InputField::AwayAvgScored),
                    conceded: v(InputField::AwayAvgConceded),
                },
            },
            in_play: PerSide {
                home: TeamInPlay {
                    xg: v(InputField::HomeInPlayXg),
                    possession: v(InputField::HomePossession),
                    shots_on_target: v(InputField::HomeShotsOnTarget),
                    pass_accuracy: v(InputField::HomePassAccuracy),
                    tackle_success: v(InputField::HomeTackleSuccess),
                },
                away: TeamInPlay {
                    xg: v(InputField::AwayInPlayXg),
                    possession: v(InputField::AwayPossession),
                    shots_on_target: v(InputField::AwayShotsOnTarget),
                    pass_accuracy: v(InputField::AwayPassAccuracy),
                    tackle_success: v(InputField::AwayTackleSuccess),
                },
            },
            balance: v(InputField::AccountBalance),
            live_next_goal_odds: v(InputField::LiveNextGoalOdds),
            live_match_odds: MarketOdds {
                home: v(InputField::LiveHomeOdds),
                draw: v(InputField::LiveDrawOdds),
                away: v(InputField::LiveAwayOdds),
            },
        }
    }

    pub fn evaluate(&mut self) {
        let snap = self.snapshot();
        let eval = engine::evaluate(&self.config, &mut self.trends, &snap);
        for warning in &eval.warnings {
            self.push_log(format!("[WARN] {warning}"));
        }
        self.evaluations += 1;
        self.evaluation = Some(eval);
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

/// Display form without trailing zero noise.
pub fn trim_float(value: f64) -> String {
    let s = format!("{value:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
