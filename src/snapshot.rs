#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Home => "Home",
            Side::Away => "Away",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerSide<T> {
    pub home: T,
    pub away: T,
}

impl<T: Copy> PerSide<T> {
    pub fn get(&self, side: Side) -> T {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeamAverages {
    pub scored: f64,
    pub conceded: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeamInPlay {
    pub xg: f64,
    pub possession: f64,
    pub shots_on_target: f64,
    pub pass_accuracy: f64,
    pub tackle_success: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarketOdds {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

/// Immutable input record for one evaluation. All fields come from the
/// session's typed field set and default to zero when unset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchSnapshot {
    pub minute: f64,
    pub goals: PerSide<u32>,
    pub season_xg: PerSide<f64>,
    pub averages: PerSide<TeamAverages>,
    pub in_play: PerSide<TeamInPlay>,
    pub balance: f64,
    pub live_next_goal_odds: f64,
    pub live_match_odds: MarketOdds,
}

impl MatchSnapshot {
    pub fn remaining_minutes(&self) -> f64 {
        90.0 - self.minute
    }

    pub fn goal_diff(&self) -> i32 {
        self.goals.home as i32 - self.goals.away as i32
    }

    /// Range checks. Out-of-range values still flow into the arithmetic
    /// unchanged; the caller decides what to do with the warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.minute < 0.0 || self.minute > 120.0 {
            warnings.push(format!(
                "elapsed minutes {:.1} outside expected 0-120",
                self.minute
            ));
        }
        if self.balance < 0.0 {
            warnings.push(format!("account balance {:.2} is negative", self.balance));
        }

        for side in [Side::Home, Side::Away] {
            let name = side.label();
            let avg = self.averages.get(side);
            if avg.scored < 0.0 || avg.conceded < 0.0 {
                warnings.push(format!("{name} season averages contain negative values"));
            }
            if self.season_xg.get(side) < 0.0 {
                warnings.push(format!("{name} pre-match xG is negative"));
            }

            let live = self.in_play.get(side);
            if live.xg < 0.0 {
                warnings.push(format!("{name} in-play xG is negative"));
            }
            if live.shots_on_target < 0.0 {
                warnings.push(format!("{name} shots on target is negative"));
            }
            if !(0.0..=100.0).contains(&live.possession) {
                warnings.push(format!(
                    "{name} possession {:.1}% outside 0-100",
                    live.possession
                ));
            }
            if !(0.0..=100.0).contains(&live.pass_accuracy) {
                warnings.push(format!(
                    "{name} pass accuracy {:.1}% outside 0-100",
                    live.pass_accuracy
                ));
            }
            if !(0.0..=100.0).contains(&live.tackle_success) {
                warnings.push(format!(
                    "{name} tackle success {:.1}% outside 0-100",
                    live.tackle_success
                ));
            }
        }

        for (label, odds) in [
            ("next-goal", self.live_next_goal_odds),
            ("home-win", self.live_match_odds.home),
            ("draw", self.live_match_odds.draw),
            ("away-win", self.live_match_odds.away),
        ] {
            if odds < 0.0 {
                warnings.push(format!("live {label} odds {odds:.2} is negative"));
            } else if odds > 0.0 && odds < 1.0 {
                warnings.push(format!("live {label} odds {odds:.2} below 1.00"));
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral_snapshot() -> MatchSnapshot {
        MatchSnapshot {
            minute: 30.0,
            goals: PerSide { home: 1, away: 0 },
            season_xg: PerSide {
                home: 1.3,
                away: 1.1,
            },
            averages: PerSide {
                home: TeamAverages {
                    scored: 1.5,
                    conceded: 1.1,
                },
                away: TeamAverages {
                    scored: 1.2,
                    conceded: 1.4,
                },
            },
            in_play: PerSide {
                home: TeamInPlay {
                    xg: 0.6,
                    possession: 55.0,
                    shots_on_target: 3.0,
                    pass_accuracy: 82.0,
                    tackle_success: 60.0,
                },
                away: TeamInPlay {
                    xg: 0.3,
                    possession: 45.0,
                    shots_on_target: 1.0,
                    pass_accuracy: 74.0,
                    tackle_success: 48.0,
                },
            },
            balance: 500.0,
            live_next_goal_odds: 1.8,
            live_match_odds: MarketOdds {
                home: 2.1,
                draw: 3.4,
                away: 4.0,
            },
        }
    }

    #[test]
    fn well_formed_snapshot_has_no_warnings() {
        assert!(neutral_snapshot().validate().is_empty());
    }

    #[test]
    fn validate_flags_out_of_range_fields() {
        let mut snap = neutral_snapshot();
        snap.minute = 130.0;
        snap.balance = -10.0;
        snap.in_play.home.possession = 104.0;
        snap.live_next_goal_odds = -1.5;

        let warnings = snap.validate();
        assert_eq!(warnings.len(), 4);
        assert!(warnings.iter().any(|w| w.contains("elapsed minutes")));
        assert!(warnings.iter().any(|w| w.contains("balance")));
        assert!(warnings.iter().any(|w| w.contains("possession")));
        assert!(warnings.iter().any(|w| w.contains("next-goal")));
    }

    #[test]
    fn validate_flags_sub_unity_odds() {
        let mut snap = neutral_snapshot();
        snap.live_match_odds.draw = 0.4;
        let warnings = snap.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("below 1.00"));
    }

    #[test]
    fn goal_diff_is_home_minus_away() {
        let mut snap = neutral_snapshot();
        snap.goals = PerSide { home: 0, away: 3 };
        assert_eq!(snap.goal_diff(), -3);
        assert_eq!(snap.remaining_minutes(), 60.0);
    }
}
