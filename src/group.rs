use std::collections::HashMap;

use crate::target::Histogram;

/// Accepted histograms bucketed by group key, in first-seen order.
#[derive(Debug, Default)]
pub struct GroupMap {
    index: HashMap<String, usize>,
    groups: Vec<(String, Vec<Histogram>)>,
}

impl GroupMap {
    pub fn insert(&mut self, key: String, histogram: Histogram) {
        match self.index.get(&key) {
            Some(&position) => self.groups[position].1.push(histogram),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![histogram]));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn histogram_count(&self) -> usize {
        self.groups.iter().map(|(_, histograms)| histograms.len()).sum()
    }

    /// Order groups alphabetically by key; members keep insertion order.
    pub fn sort(&mut self) {
        self.groups.sort_by(|left, right| left.0.cmp(&right.0));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .groups
            .iter()
            .enumerate()
            .map(|(position, (key, _))| (key.clone(), position))
            .collect();
    }

    pub fn into_groups(self) -> Vec<(String, Vec<Histogram>)> {
        self.groups
    }
}

/// Ring of colors handed out by position within a group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<i16>,
}

impl Palette {
    pub fn new(colors: Vec<i16>) -> Self {
        Self { colors }
    }

    pub fn color(&self, position: usize) -> Option<i16> {
        if self.colors.is_empty() {
            return None;
        }
        Some(self.colors[position % self.colors.len()])
    }

    /// Color line and marker of every member by position, keeping colors a
    /// function already set.
    pub fn paint(&self, histograms: &mut [Histogram]) {
        for (position, histogram) in histograms.iter_mut().enumerate() {
            let Some(color) = self.color(position) else {
                return;
            };
            histogram.style.line_color.get_or_insert(color);
            histogram.style.marker_color.get_or_insert(color);
        }
    }
}
