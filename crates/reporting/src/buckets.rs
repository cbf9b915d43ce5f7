use std::collections::BTreeMap;

use serde::Serialize;

use tailorshop_core::{DayKey, Money};

/// Amounts per calendar day, ordered by day (`Unbucketed` first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Buckets(BTreeMap<DayKey, Money>);

impl Buckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: DayKey, amount: Money) {
        *self.0.entry(key).or_default() += amount;
    }

    /// Amount for `key`; zero when the day has no entries.
    pub fn get(&self, key: DayKey) -> Money {
        self.0.get(&key).copied().unwrap_or_default()
    }

    pub fn total(&self) -> Money {
        self.0.values().sum()
    }

    pub fn total_where(&self, mut include: impl FnMut(DayKey) -> bool) -> Money {
        self.0
            .iter()
            .filter(|(key, _)| include(**key))
            .map(|(_, amount)| *amount)
            .sum()
    }

    pub fn merged(&self, other: &Buckets) -> Buckets {
        let mut out = self.clone();
        for (key, amount) in other.iter() {
            out.add(key, amount);
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (DayKey, Money)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = DayKey> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(DayKey, Money)> for Buckets {
    fn from_iter<I: IntoIterator<Item = (DayKey, Money)>>(iter: I) -> Self {
        let mut buckets = Buckets::new();
        for (key, amount) in iter {
            buckets.add(key, amount);
        }
        buckets
    }
}
