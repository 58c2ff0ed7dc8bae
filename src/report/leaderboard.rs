use std::{
    cmp::{Ordering, Reverse},
    collections::{BTreeMap, BinaryHeap, HashMap, HashSet},
};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};

use crate::{
    error::{AgentError, IoError, TradeSimError},
    report::performance::PerformanceMetric,
};

const METRIC_COUNT: usize = PerformanceMetric::COUNT;

/// One placement of an agent for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub metric: PerformanceMetric,
    /// 1 = best.
    pub rank: u32,
    pub value: f64,
    pub agent_uid: u64,
    /// JSON serialization of the agent's parameterization.
    pub agent_parameterization: String,
}

/// The top-k agents per [`PerformanceMetric`] of a batched evaluation.
///
/// # Example Table
///
/// | metric           | rank | value | agent_uid | agent_parameterization                   |
/// |------------------|------|-------|-----------|------------------------------------------|
/// | total_return_pct | 1    | 12.4  | 17        | { "oversold": 25.0, "overbought": 70.0 } |
/// | total_return_pct | 2    | 11.9  | 3         | { "oversold": 30.0, "overbought": 75.0 } |
/// | sharpe_ratio     | 1    | 2.85  | 3         | { "oversold": 30.0, "overbought": 75.0 } |
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    rows: Vec<LeaderboardRow>,
}

impl Leaderboard {
    pub fn rows(&self) -> &[LeaderboardRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows of a single metric, best first.
    pub fn top(&self, metric: PerformanceMetric) -> impl Iterator<Item = &LeaderboardRow> {
        self.rows.iter().filter(move |row| row.metric == metric)
    }

    /// The best row of `metric`, if any agent produced a value for it.
    pub fn best(&self, metric: PerformanceMetric) -> Option<&LeaderboardRow> {
        self.top(metric).next()
    }
}

// ================================================================================================
// Accumulation
// ================================================================================================

/// Accumulates the top-k agents per metric while agents stream through the evaluation.
///
/// Each metric keeps a **min-heap** (`BinaryHeap<Reverse<LeaderboardEntry>>`) so the weakest
/// of the current top-k sits at the root and can be evicted in `O(log k)`. Agent
/// parameterizations are cached only while at least one heap references them.
#[derive(Debug)]
pub(crate) struct AgentLeaderboard<T> {
    top_per_metric: BTreeMap<PerformanceMetric, BinaryHeap<Reverse<LeaderboardEntry>>>,
    k: usize,
    agent_data: HashMap<u64, T>,
}

impl<T> AgentLeaderboard<T> {
    pub(crate) fn new(k: usize) -> Self {
        Self {
            top_per_metric: PerformanceMetric::iter()
                .map(|metric| (metric, BinaryHeap::with_capacity(k)))
                .collect(),
            k,
            agent_data: HashMap::with_capacity(k * METRIC_COUNT),
        }
    }

    pub(crate) fn update(&mut self, new_entries: &[LeaderboardEntry], agent: T) {
        let Some(uid) = new_entries.first().map(|e| e.agent_uid) else {
            return;
        };

        let mut is_global_winner = false;
        let mut potentially_evicted = Vec::with_capacity(METRIC_COUNT);

        for entry in new_entries {
            match self.process_entry(entry) {
                HeapAction::Rejected => {}
                HeapAction::Added => {
                    is_global_winner = true;
                }
                HeapAction::Swapped(evicted_uid) => {
                    is_global_winner = true;
                    if !potentially_evicted.contains(&evicted_uid) {
                        potentially_evicted.push(evicted_uid);
                    }
                }
            }
        }

        if is_global_winner {
            self.agent_data.entry(uid).or_insert(agent);
        }

        self.garbage_collect(uid, &potentially_evicted);
    }

    pub(crate) fn merge(mut self, other: Self) -> Self {
        for (metric, other_heap) in other.top_per_metric {
            let heap = self.top_per_metric.entry(metric).or_default();
            heap.extend(other_heap);
            while heap.len() > self.k {
                heap.pop();
            }
        }

        self.agent_data.extend(other.agent_data);
        let surviving_uids = self.top_per_metric.values().fold(
            HashSet::with_capacity(self.k * METRIC_COUNT),
            |mut set, heap| {
                set.extend(heap.iter().map(|entry| entry.0.agent_uid));
                set
            },
        );
        self.agent_data.retain(|uid, _| surviving_uids.contains(uid));

        self
    }

    fn is_agent_tracked(&self, uid: u64) -> bool {
        self.top_per_metric
            .values()
            .any(|heap| heap.iter().any(|entry| entry.0.agent_uid == uid))
    }

    fn process_entry(&mut self, entry: &LeaderboardEntry) -> HeapAction {
        if self.k == 0 {
            return HeapAction::Rejected;
        }
        let heap = self.top_per_metric.entry(entry.metric).or_default();

        if heap.len() < self.k {
            heap.push(Reverse(*entry));
            return HeapAction::Added;
        }

        let qualifies = heap.peek().is_none_or(|Reverse(worst)| entry > worst);
        if qualifies && let Some(Reverse(evicted)) = heap.pop() {
            heap.push(Reverse(*entry));
            return HeapAction::Swapped(evicted.agent_uid);
        }

        HeapAction::Rejected
    }

    fn garbage_collect(&mut self, safe_uid: u64, candidates: &[u64]) {
        for &uid in candidates {
            if uid != safe_uid && !self.is_agent_tracked(uid) {
                self.agent_data.remove(&uid);
            }
        }
    }
}

impl<T> TryFrom<AgentLeaderboard<T>> for Leaderboard
where
    T: Serialize,
{
    type Error = TradeSimError;

    fn try_from(value: AgentLeaderboard<T>) -> Result<Self, Self::Error> {
        let mut rows = Vec::with_capacity(value.top_per_metric.len() * value.k);

        for (metric, heap) in value.top_per_metric {
            // Ascending order of `Reverse` is descending order of score.
            let top_k = heap.into_sorted_vec().into_iter().map(|rev| rev.0);

            for (i, entry) in top_k.enumerate() {
                let agent = value
                    .agent_data
                    .get(&entry.agent_uid)
                    .ok_or(AgentError::Uncached(entry.agent_uid))?;

                rows.push(LeaderboardRow {
                    metric,
                    rank: (i + 1) as u32,
                    value: entry.denormalized_reward(),
                    agent_uid: entry.agent_uid,
                    agent_parameterization: serde_json::to_string(agent).map_err(IoError::Json)?,
                });
            }
        }

        Ok(Leaderboard { rows })
    }
}

enum HeapAction {
    Added,
    Swapped(u64),
    Rejected,
}

// ================================================================================================
// Entries
// ================================================================================================

/// A single agent's score for one metric.
///
/// Ordering is defined solely by the normalized `reward`, which makes the entry usable in a
/// min-heap (wrapped in [`Reverse`]) for top-k tracking. Ties do not displace incumbents.
#[derive(Copy, Clone, Debug)]
pub struct LeaderboardEntry {
    pub agent_uid: u64,
    pub metric: PerformanceMetric,
    /// Normalized score, larger is better.
    pub reward: OrderedFloat<f64>,
}

impl LeaderboardEntry {
    pub fn new(agent_uid: u64, metric: PerformanceMetric, value: f64) -> Self {
        Self {
            agent_uid,
            metric,
            reward: OrderedFloat(metric.to_heap_score(value)),
        }
    }

    pub fn normalized_reward(&self) -> f64 {
        self.reward.0
    }

    /// The original metric value, e.g. a drawdown of `12.0` rather than its score `-12.0`.
    pub fn denormalized_reward(&self) -> f64 {
        self.metric.from_heap_score(self.normalized_reward())
    }
}

impl PartialEq for LeaderboardEntry {
    fn eq(&self, other: &Self) -> bool {
        self.reward == other.reward
    }
}

impl Eq for LeaderboardEntry {}

impl PartialOrd for LeaderboardEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LeaderboardEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.reward.cmp(&other.reward)
    }
}
