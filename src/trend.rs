use std::collections::{HashMap, VecDeque};

use crate::snapshot::{MatchSnapshot, Side};

pub const HISTORY_LEN: usize = 10;
const TREND_LAG: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    HomeXg,
    AwayXg,
    HomeSot,
    AwaySot,
    HomePossession,
    AwayPossession,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::HomeXg,
        Metric::AwayXg,
        Metric::HomeSot,
        Metric::AwaySot,
        Metric::HomePossession,
        Metric::AwayPossession,
    ];

    pub fn xg(side: Side) -> Metric {
        match side {
            Side::Home => Metric::HomeXg,
            Side::Away => Metric::AwayXg,
        }
    }

    pub fn shots_on_target(side: Side) -> Metric {
        match side {
            Side::Home => Metric::HomeSot,
            Side::Away => Metric::AwaySot,
        }
    }

    pub fn possession(side: Side) -> Metric {
        match side {
            Side::Home => Metric::HomePossession,
            Side::Away => Metric::AwayPossession,
        }
    }
}

/// Bounded rolling history per tracked metric. Appended once per
/// evaluation; oldest sample evicted past `HISTORY_LEN`.
#[derive(Debug, Clone, Default)]
pub struct TrendStore {
    series: HashMap<Metric, VecDeque<f64>>,
}

impl TrendStore {
    pub fn new() -> Self {
        Self {
            series: HashMap::with_capacity(Metric::ALL.len()),
        }
    }

    pub fn update(&mut self, metric: Metric, value: f64) {
        let seq = self.series.entry(metric).or_default();
        while seq.len() >= HISTORY_LEN {
            seq.pop_front();
        }
        seq.push_back(value);
    }

    /// Appends the latest snapshot values for all tracked metrics.
    pub fn observe(&mut self, snap: &MatchSnapshot) {
        for side in [Side::Home, Side::Away] {
            let live = snap.in_play.get(side);
            self.update(Metric::xg(side), live.xg);
            self.update(Metric::shots_on_target(side), live.shots_on_target);
            self.update(Metric::possession(side), live.possession);
        }
    }

    /// Delta between the newest and third-newest sample; zero until three
    /// samples have been recorded. A raw lagged difference, not a rate.
    pub fn recent_trend(&self, metric: Metric) -> f64 {
        let Some(seq) = self.series.get(&metric) else {
            return 0.0;
        };
        if seq.len() < TREND_LAG {
            return 0.0;
        }
        seq[seq.len() - 1] - seq[seq.len() - TREND_LAG]
    }

    pub fn samples(&self, metric: Metric) -> usize {
        self.series.get(&metric).map_or(0, VecDeque::len)
    }

    pub fn reset(&mut self) {
        self.series.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_evicts_oldest_past_capacity() {
        let mut store = TrendStore::new();
        for v in 1..=11 {
            store.update(Metric::HomeXg, v as f64);
        }
        assert_eq!(store.samples(Metric::HomeXg), HISTORY_LEN);
        // v1 is gone; v2..v11 remain in order.
        assert_eq!(store.recent_trend(Metric::HomeXg), 11.0 - 9.0);
        let mut probe = store.clone();
        probe.update(Metric::HomeXg, 12.0);
        assert_eq!(probe.samples(Metric::HomeXg), HISTORY_LEN);
        assert_eq!(probe.recent_trend(Metric::HomeXg), 12.0 - 10.0);
    }

    #[test]
    fn recent_trend_is_zero_under_three_samples() {
        let mut store = TrendStore::new();
        assert_eq!(store.recent_trend(Metric::AwaySot), 0.0);
        store.update(Metric::AwaySot, 2.0);
        assert_eq!(store.recent_trend(Metric::AwaySot), 0.0);
        store.update(Metric::AwaySot, 5.0);
        assert_eq!(store.recent_trend(Metric::AwaySot), 0.0);
        store.update(Metric::AwaySot, 6.0);
        assert_eq!(store.recent_trend(Metric::AwaySot), 4.0);
    }

    #[test]
    fn observe_records_all_six_metrics() {
        let mut store = TrendStore::new();
        let snap = MatchSnapshot {
            in_play: crate::snapshot::PerSide {
                home: crate::snapshot::TeamInPlay {
                    xg: 0.8,
                    possession: 60.0,
                    shots_on_target: 4.0,
                    ..Default::default()
                },
                away: crate::snapshot::TeamInPlay {
                    xg: 0.2,
                    possession: 40.0,
                    shots_on_target: 1.0,
                    ..Default::default()
                },
            },
            ..Default::default()
        };
        store.observe(&snap);
        for metric in Metric::ALL {
            assert_eq!(store.samples(metric), 1);
        }
    }

    #[test]
    fn reset_is_idempotent() {
        let mut store = TrendStore::new();
        for _ in 0..4 {
            store.update(Metric::HomePossession, 55.0);
        }
        store.reset();
        let once: Vec<usize> = Metric::ALL.iter().map(|m| store.samples(*m)).collect();
        store.reset();
        let twice: Vec<usize> = Metric::ALL.iter().map(|m| store.samples(*m)).collect();
        assert_eq!(once, vec![0; 6]);
        assert_eq!(once, twice);
    }
}
