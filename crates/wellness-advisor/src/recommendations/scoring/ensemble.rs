use std::sync::Arc;

use super::super::catalog::Catalog;
use super::RankedList;
use crate::config::MAX_RECOMMENDATIONS;

/// Merges rankings by weighted positional score: position `i` of a list of length `n`
/// contributes `(n - i) * weight`. The final cut never exceeds [`MAX_RECOMMENDATIONS`].
pub struct EnsembleCombiner {
    catalog: Arc<Catalog>,
    top_n: usize,
}

impl EnsembleCombiner {
    pub fn new(catalog: Arc<Catalog>, top_n: usize) -> Self {
        Self {
            catalog,
            top_n: top_n.min(MAX_RECOMMENDATIONS),
        }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Final ranking, cut to the configured size.
    pub fn combine(&self, weighted: &[(RankedList, f64)]) -> RankedList {
        let mut ranked = self.totals(weighted);
        ranked.truncate(self.top_n);
        ranked
    }

    /// Every item with a nonzero combined score, best first.
    pub fn totals(&self, weighted: &[(RankedList, f64)]) -> RankedList {
        let mut totals = vec![0.0; self.catalog.len()];

        for (list, weight) in weighted {
            let len = list.len();
            for (index, entry) in list.entries.iter().enumerate() {
                if let Some(position) = self.catalog.position(entry.item_id.as_str()) {
                    totals[position] += (len - index) as f64 * weight;
                }
            }
        }

        RankedList::from_totals(&self.catalog, &totals, |score| score != 0.0)
    }
}
