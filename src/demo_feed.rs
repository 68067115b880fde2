use std::env;
use std::fs;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rand::Rng;
use serde::Deserialize;

use crate::state::{Delta, DemoCommand, InputField};

pub fn enabled() -> bool {
    match env::var("DEMO_FEED") {
        Ok(raw) => matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => false,
    }
}

/// One scripted field state. Minutes must be non-decreasing across the
/// script; unspecified stats keep their serde defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptTick {
    pub minute: f64,
    #[serde(default)]
    pub home_goals: u32,
    #[serde(default)]
    pub away_goals: u32,
    #[serde(default)]
    pub home_xg: f64,
    #[serde(default)]
    pub away_xg: f64,
    #[serde(default = "default_possession")]
    pub home_possession: f64,
    #[serde(default)]
    pub home_sot: f64,
    #[serde(default)]
    pub away_sot: f64,
    #[serde(default)]
    pub live_next_goal_odds: f64,
}

fn default_possession() -> f64 {
    50.0
}

impl ScriptTick {
    pub fn to_updates(&self) -> Vec<(InputField, f64)> {
        vec![
            (InputField::ElapsedMinutes, self.minute),
            (InputField::HomeGoals, self.home_goals as f64),
            (InputField::AwayGoals, self.away_goals as f64),
            (InputField::HomeInPlayXg, self.home_xg),
            (InputField::AwayInPlayXg, self.away_xg),
            (InputField::HomePossession, self.home_possession),
            (InputField::AwayPossession, 100.0 - self.home_possession),
            (InputField::HomeShotsOnTarget, self.home_sot),
            (InputField::AwayShotsOnTarget, self.away_sot),
            (InputField::LiveNextGoalOdds, self.live_next_goal_odds),
        ]
    }
}

pub fn parse_script(raw: &str) -> Result<Vec<ScriptTick>> {
    serde_json::from_str::<Vec<ScriptTick>>(raw).context("parse demo script json")
}

fn load_script() -> Result<Option<Vec<ScriptTick>>> {
    let Ok(path) = env::var("DEMO_SCRIPT") else {
        return Ok(None);
    };
    let path = path.trim().to_string();
    if path.is_empty() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path).with_context(|| format!("read demo script {path}"))?;
    Ok(Some(parse_script(&raw)?))
}

/// Random-walk state for the simulated match.
#[derive(Debug, Clone)]
struct SimMatch {
    minute: f64,
    home_goals: u32,
    away_goals: u32,
    home_xg: f64,
    away_xg: f64,
    home_possession: f64,
    home_sot: f64,
    away_sot: f64,
    live_next_goal_odds: f64,
    prematch: Vec<(InputField, f64)>,
}

impl SimMatch {
    fn fresh(rng: &mut impl Rng) -> Self {
        let prematch = vec![
            (InputField::HomeAvgScored, rng.gen_range(0.9..2.2)),
            (InputField::HomeAvgConceded, rng.gen_range(0.8..1.8)),
            (InputField::AwayAvgScored, rng.gen_range(0.8..2.0)),
            (InputField::AwayAvgConceded, rng.gen_range(0.9..1.9)),
            (InputField::HomeSeasonXg, rng.gen_range(0.9..1.8)),
            (InputField::AwaySeasonXg, rng.gen_range(0.8..1.6)),
            (InputField::HomePassAccuracy, rng.gen_range(70.0..88.0)),
            (InputField::AwayPassAccuracy, rng.gen_range(68.0..86.0)),
            (InputField::HomeTackleSuccess, rng.gen_range(40.0..65.0)),
            (InputField::AwayTackleSuccess, rng.gen_range(40.0..65.0)),
            (InputField::AccountBalance, 1000.0),
        ];
        Self {
            minute: 0.0,
            home_goals: 0,
            away_goals: 0,
            home_xg: 0.0,
            away_xg: 0.0,
            home_possession: rng.gen_range(45.0..55.0),
            home_sot: 0.0,
            away_sot: 0.0,
            live_next_goal_odds: rng.gen_range(1.4..2.4),
            prematch,
        }
    }

    fn finished(&self) -> bool {
        self.minute >= 90.0
    }

    fn advance(&mut self, rng: &mut impl Rng) {
        self.minute = (self.minute + rng.gen_range(1.0..4.0)).min(90.0);

        self.home_possession =
            (self.home_possession + rng.gen_range(-3.0..3.0)).clamp(30.0, 70.0);

        // Possession-weighted chance creation.
        let home_bias = self.home_possession / 100.0;
        let home_chance = rng.gen_range(0.0..0.12) * home_bias * 2.0;
        let away_chance = rng.gen_range(0.0..0.12) * (1.0 - home_bias) * 2.0;
        self.home_xg += home_chance;
        self.away_xg += away_chance;

        if home_chance > 0.07 {
            self.home_sot += 1.0;
            if rng.gen_bool(0.25) {
                self.home_goals += 1;
            }
        }
        if away_chance > 0.07 {
            self.away_sot += 1.0;
            if rng.gen_bool(0.25) {
                self.away_goals += 1;
            }
        }

        self.live_next_goal_odds =
            (self.live_next_goal_odds + rng.gen_range(-0.15..0.15)).clamp(1.2, 4.0);
    }

    fn to_updates(&self, include_prematch: bool) -> Vec<(InputField, f64)> {
        let mut updates = Vec::with_capacity(InputField::COUNT);
        if include_prematch {
            updates.extend(self.prematch.iter().copied());
        }
        updates.extend([
            (InputField::ElapsedMinutes, self.minute),
            (InputField::HomeGoals, self.home_goals as f64),
            (InputField::AwayGoals, self.away_goals as f64),
            (InputField::HomeInPlayXg, self.home_xg),
            (InputField::AwayInPlayXg, self.away_xg),
            (InputField::HomePossession, self.home_possession),
            (InputField::AwayPossession, 100.0 - self.home_possession),
            (InputField::HomeShotsOnTarget, self.home_sot),
            (InputField::AwayShotsOnTarget, self.away_sot),
            (InputField::LiveNextGoalOdds, self.live_next_goal_odds),
        ]);
        updates
    }
}

/// Spawns the demo provider thread: a simulated in-play match streamed to
/// the UI as field updates, or a scripted sequence when `DEMO_SCRIPT` is
/// set. Mirrors the request/response split of a real provider: the UI only
/// ever sees `Delta` messages.
pub fn spawn_demo_provider(tx: Sender<Delta>, cmd_rx: Receiver<DemoCommand>) {
    thread::spawn(move || {
        let mut rng = rand::thread_rng();
        let tick = Duration::from_secs(
            env::var("DEMO_TICK_SECS")
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(5)
                .max(1),
        );

        let script = match load_script() {
            Ok(Some(ticks)) => {
                let _ = tx.send(Delta::Log(format!(
                    "[INFO] Demo script loaded ({} ticks)",
                    ticks.len()
                )));
                Some(ticks)
            }
            Ok(None) => None,
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[WARN] Demo script: {err:#}")));
                None
            }
        };

        let mut sim = SimMatch::fresh(&mut rng);
        let mut script_pos = 0usize;
        let mut send_prematch = true;
        let mut last_tick = Instant::now() - tick;

        loop {
            thread::sleep(Duration::from_millis(250));

            while let Ok(cmd) = cmd_rx.try_recv() {
                match cmd {
                    DemoCommand::Restart => {
                        sim = SimMatch::fresh(&mut rng);
                        script_pos = 0;
                        send_prematch = true;
                        let _ = tx.send(Delta::Log("[INFO] Demo match restarted".to_string()));
                    }
                }
            }

            if last_tick.elapsed() < tick {
                continue;
            }
            last_tick = Instant::now();

            let updates = if let Some(ticks) = &script {
                let Some(next) = ticks.get(script_pos) else {
                    continue;
                };
                script_pos += 1;
                next.to_updates()
            } else {
                if sim.finished() {
                    continue;
                }
                sim.advance(&mut rng);
                let updates = sim.to_updates(send_prematch);
                send_prematch = false;
                updates
            };

            if tx.send(Delta::SetFields(updates)).is_err() {
                // UI is gone.
                return;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_parses_with_defaults() {
        let raw = r#"[
            {"minute": 10.0, "home_xg": 0.4, "home_possession": 60.0},
            {"minute": 25.0, "home_goals": 1, "home_xg": 0.9, "home_sot": 2.0,
             "live_next_goal_odds": 1.8}
        ]"#;
        let ticks = parse_script(raw).unwrap();
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].away_goals, 0);
        assert_eq!(ticks[0].home_possession, 60.0);
        assert_eq!(ticks[1].home_possession, 50.0);

        let updates = ticks[1].to_updates();
        assert!(updates.contains(&(InputField::ElapsedMinutes, 25.0)));
        assert!(updates.contains(&(InputField::AwayPossession, 50.0)));
        assert!(updates.contains(&(InputField::LiveNextGoalOdds, 1.8)));
    }

    #[test]
    fn malformed_script_is_an_error() {
        assert!(parse_script("{\"minute\": 1}").is_err());
        assert!(parse_script("not json").is_err());
    }

    #[test]
    fn sim_match_walks_forward_and_stops_at_ninety() {
        let mut rng = rand::thread_rng();
        let mut sim = SimMatch::fresh(&mut rng);
        for _ in 0..100 {
            sim.advance(&mut rng);
        }
        assert!(sim.finished());
        assert_eq!(sim.minute, 90.0);
        assert!(sim.home_xg >= 0.0);
        assert!((30.0..=70.0).contains(&sim.home_possession));
        assert!((1.2..=4.0).contains(&sim.live_next_goal_odds));
    }

    #[test]
    fn first_sim_tick_includes_prematch_fields() {
        let mut rng = rand::thread_rng();
        let sim = SimMatch::fresh(&mut rng);
        let first = sim.to_updates(true);
        let later = sim.to_updates(false);
        assert!(first.iter().any(|(f, _)| *f == InputField::HomeAvgScored));
        assert!(later.iter().all(|(f, _)| *f != InputField::HomeAvgScored));
        assert!(first.len() > later.len());
    }
}
