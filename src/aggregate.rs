use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::models::{BreakdownTable, InvestorPortfolio, InvestorRow};

/// Maps raw investment-type labels onto canonical report buckets. Labels
/// absent from the map contribute to no bucket column, but their company
/// still counts toward an investor's overall total.
#[derive(Debug, Clone)]
pub struct CategoryMap {
    entries: BTreeMap<String, String>,
}

impl CategoryMap {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        CategoryMap { entries }
    }

    /// The identity map over every raw label present in the given portfolios.
    /// Used when no convert map is supplied, so the report pivots on the raw
    /// investment types themselves.
    pub fn identity_over(portfolios: &BTreeMap<String, InvestorPortfolio>) -> Self {
        let entries = portfolios
            .values()
            .flat_map(|portfolio| portfolio.rounds.iter())
            .map(|round| (round.investment_type.clone(), round.investment_type.clone()))
            .collect();
        CategoryMap { entries }
    }

    pub fn bucket_for(&self, raw_label: &str) -> Option<&str> {
        self.entries.get(raw_label).map(String::as_str)
    }

    /// Distinct bucket labels, lexicographically sorted. This ordering is
    /// the report's column order.
    pub fn buckets(&self) -> Vec<String> {
        let distinct: BTreeSet<&String> = self.entries.values().collect();
        distinct.into_iter().cloned().collect()
    }
}

/// Pivots each investor's tracked-company rounds into per-bucket distinct
/// company counts plus an overall distinct total. The total spans the whole
/// round list, so a round with an unmapped category still counts its company
/// toward the total while appearing in no bucket column.
pub fn count_backed_companies(
    portfolios: &BTreeMap<String, InvestorPortfolio>,
    categories: &CategoryMap,
) -> BreakdownTable {
    let buckets = categories.buckets();

    let rows = portfolios
        .iter()
        .map(|(investor_uuid, portfolio)| {
            let mut per_bucket: BTreeMap<&str, HashSet<&str>> = buckets
                .iter()
                .map(|bucket| (bucket.as_str(), HashSet::new()))
                .collect();
            let mut all_companies: HashSet<&str> = HashSet::new();

            for round in &portfolio.rounds {
                all_companies.insert(round.org_uuid.as_str());
                if let Some(bucket) = categories.bucket_for(&round.investment_type) {
                    if let Some(companies) = per_bucket.get_mut(bucket) {
                        companies.insert(round.org_uuid.as_str());
                    }
                }
            }

            let counts = buckets
                .iter()
                .map(|bucket| per_bucket[bucket.as_str()].len())
                .collect();

            InvestorRow {
                investor_uuid: investor_uuid.clone(),
                investor_name: portfolio.name.clone(),
                counts,
                total: all_companies.len(),
            }
        })
        .collect();

    BreakdownTable { buckets, rows }
}
