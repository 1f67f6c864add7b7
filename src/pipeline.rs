use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::models::{CompanyRounds, FundingRound, Investment, InvestorPortfolio};

/// Investor type literal that qualifies an investor as active. Compared
/// exactly, no normalization.
const ORGANIZATION: &str = "organization";

/// Joins each tracked company to its funding rounds. Rounds are indexed by
/// `org_uuid` once, then probed per company. Companies with no rounds keep an
/// empty list rather than disappearing.
pub fn rounds_by_company(
    companies: &BTreeMap<String, String>,
    funding_rounds: &[FundingRound],
) -> BTreeMap<String, CompanyRounds> {
    let mut by_org: HashMap<&str, Vec<&FundingRound>> = HashMap::new();
    for round in funding_rounds {
        by_org.entry(round.org_uuid.as_str()).or_default().push(round);
    }

    companies
        .iter()
        .map(|(company_id, name)| {
            let rounds = by_org
                .get(company_id.as_str())
                .map(|rounds| rounds.iter().map(|&r| r.clone()).collect())
                .unwrap_or_default();
            (
                company_id.clone(),
                CompanyRounds {
                    name: name.clone(),
                    rounds,
                },
            )
        })
        .collect()
}

/// Resolves the active-investor set: organizational investors with at least
/// one investment in a tracked company's round. Display names are taken from
/// the first investment row seen for each investor uuid.
pub fn active_investors(
    company_rounds: &BTreeMap<String, CompanyRounds>,
    investments: &[Investment],
) -> BTreeMap<String, String> {
    let tracked_rounds: HashSet<&str> = company_rounds
        .values()
        .flat_map(|company| company.rounds.iter())
        .map(|round| round.uuid.as_str())
        .collect();

    let mut investors = BTreeMap::new();
    for investment in investments {
        if investment.investor_type != ORGANIZATION {
            continue;
        }
        if !tracked_rounds.contains(investment.funding_round_uuid.as_str()) {
            continue;
        }
        investors
            .entry(investment.investor_uuid.clone())
            .or_insert_with(|| investment.investor_name.clone());
    }

    debug!(active = investors.len(), "resolved active investors");
    investors
}

/// Gathers each active investor's complete portfolio: every funding round
/// they invested in across the whole dataset, tracked or not. Round ids that
/// resolve to no known round are stale references and dropped.
pub fn investor_portfolios(
    active: &BTreeMap<String, String>,
    investments: &[Investment],
    funding_rounds: &[FundingRound],
) -> BTreeMap<String, InvestorPortfolio> {
    let by_uuid: HashMap<&str, &FundingRound> = funding_rounds
        .iter()
        .map(|round| (round.uuid.as_str(), round))
        .collect();

    let mut portfolios: BTreeMap<String, InvestorPortfolio> = active
        .iter()
        .map(|(investor_id, name)| {
            (
                investor_id.clone(),
                InvestorPortfolio {
                    name: name.clone(),
                    rounds: Vec::new(),
                },
            )
        })
        .collect();

    for investment in investments {
        let Some(portfolio) = portfolios.get_mut(&investment.investor_uuid) else {
            continue;
        };
        if let Some(&round) = by_uuid.get(investment.funding_round_uuid.as_str()) {
            portfolio.rounds.push(round.clone());
        }
    }

    portfolios
}

/// Narrows each portfolio back to rounds raised by tracked companies.
/// Investors whose list empties out are retained, not pruned.
pub fn retain_tracked_rounds(
    portfolios: BTreeMap<String, InvestorPortfolio>,
    companies: &BTreeMap<String, String>,
) -> BTreeMap<String, InvestorPortfolio> {
    portfolios
        .into_iter()
        .map(|(investor_id, mut portfolio)| {
            portfolio
                .rounds
                .retain(|round| companies.contains_key(&round.org_uuid));
            (investor_id, portfolio)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(uuid: &str, org_uuid: &str, investment_type: &str) -> FundingRound {
        FundingRound {
            uuid: uuid.to_string(),
            org_uuid: org_uuid.to_string(),
            investment_type: investment_type.to_string(),
        }
    }

    fn investment(investor_uuid: &str, name: &str, kind: &str, round_uuid: &str) -> Investment {
        Investment {
            investor_uuid: investor_uuid.to_string(),
            investor_name: name.to_string(),
            investor_type: kind.to_string(),
            funding_round_uuid: round_uuid.to_string(),
        }
    }

    fn companies(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect()
    }

    #[test]
    fn company_without_rounds_keeps_empty_entry() {
        let tracked = companies(&[("c1", "Asana"), ("c2", "Quiet Co")]);
        let rounds = vec![round("r1", "c1", "seed")];

        let joined = rounds_by_company(&tracked, &rounds);

        assert_eq!(joined.len(), 2);
        assert_eq!(joined["c1"].rounds.len(), 1);
        assert!(joined["c2"].rounds.is_empty());
    }

    #[test]
    fn rounds_of_untracked_companies_are_not_joined() {
        let tracked = companies(&[("c1", "Asana")]);
        let rounds = vec![round("r1", "c1", "seed"), round("r2", "other", "seed")];

        let joined = rounds_by_company(&tracked, &rounds);

        assert_eq!(joined["c1"].rounds.len(), 1);
        assert_eq!(joined["c1"].rounds[0].uuid, "r1");
    }

    #[test]
    fn person_investors_are_excluded() {
        let tracked = companies(&[("c1", "Asana")]);
        let rounds = vec![round("r1", "c1", "seed")];
        let joined = rounds_by_company(&tracked, &rounds);
        let investments = vec![
            investment("i1", "Acme VC", "organization", "r1"),
            investment("i2", "Jane Angel", "person", "r1"),
        ];

        let active = active_investors(&joined, &investments);

        assert_eq!(active.len(), 1);
        assert!(active.contains_key("i1"));
        assert!(!active.contains_key("i2"));
    }

    #[test]
    fn investor_type_match_is_exact() {
        let tracked = companies(&[("c1", "Asana")]);
        let joined = rounds_by_company(&tracked, &[round("r1", "c1", "seed")]);
        let investments = vec![investment("i1", "Acme VC", "Organization", "r1")];

        assert!(active_investors(&joined, &investments).is_empty());
    }

    #[test]
    fn investor_name_is_first_seen() {
        let tracked = companies(&[("c1", "Asana")]);
        let joined = rounds_by_company(
            &tracked,
            &[round("r1", "c1", "seed"), round("r2", "c1", "series_a")],
        );
        let investments = vec![
            investment("i1", "Acme VC", "organization", "r1"),
            investment("i1", "Acme Ventures", "organization", "r2"),
        ];

        let active = active_investors(&joined, &investments);

        assert_eq!(active["i1"], "Acme VC");
    }

    #[test]
    fn investments_in_untracked_rounds_do_not_activate() {
        let tracked = companies(&[("c1", "Asana")]);
        let joined = rounds_by_company(&tracked, &[round("r1", "c1", "seed")]);
        let investments = vec![investment("i1", "Acme VC", "organization", "r9")];

        assert!(active_investors(&joined, &investments).is_empty());
    }

    #[test]
    fn portfolio_spans_untracked_companies() {
        let tracked = companies(&[("c1", "Asana")]);
        let rounds = vec![round("r1", "c1", "seed"), round("r2", "other", "series_a")];
        let joined = rounds_by_company(&tracked, &rounds);
        let investments = vec![
            investment("i1", "Acme VC", "organization", "r1"),
            investment("i1", "Acme VC", "organization", "r2"),
        ];

        let active = active_investors(&joined, &investments);
        let portfolios = investor_portfolios(&active, &investments, &rounds);

        let uuids: Vec<&str> = portfolios["i1"]
            .rounds
            .iter()
            .map(|r| r.uuid.as_str())
            .collect();
        assert_eq!(uuids, vec!["r1", "r2"]);
    }

    #[test]
    fn stale_round_references_are_dropped() {
        let tracked = companies(&[("c1", "Asana")]);
        let rounds = vec![round("r1", "c1", "seed")];
        let joined = rounds_by_company(&tracked, &rounds);
        let investments = vec![
            investment("i1", "Acme VC", "organization", "r1"),
            investment("i1", "Acme VC", "organization", "gone"),
        ];

        let active = active_investors(&joined, &investments);
        let portfolios = investor_portfolios(&active, &investments, &rounds);

        assert_eq!(portfolios["i1"].rounds.len(), 1);
    }

    #[test]
    fn filter_keeps_emptied_investors() {
        let tracked = companies(&[("c1", "Asana")]);
        let mut portfolios = BTreeMap::new();
        portfolios.insert(
            "i1".to_string(),
            InvestorPortfolio {
                name: "Acme VC".to_string(),
                rounds: vec![round("r2", "other", "seed")],
            },
        );

        let filtered = retain_tracked_rounds(portfolios, &tracked);

        assert!(filtered.contains_key("i1"));
        assert!(filtered["i1"].rounds.is_empty());
    }

    #[test]
    fn widen_then_filter_equals_filtering_first() {
        let tracked = companies(&[("c1", "Asana"), ("c2", "Linear")]);
        let rounds = vec![
            round("r1", "c1", "seed"),
            round("r2", "c2", "series_a"),
            round("r3", "other", "seed"),
            round("r4", "other2", "series_b"),
        ];
        let joined = rounds_by_company(&tracked, &rounds);
        let investments = vec![
            investment("i1", "Acme VC", "organization", "r1"),
            investment("i1", "Acme VC", "organization", "r3"),
            investment("i2", "Beta Cap", "organization", "r2"),
            investment("i2", "Beta Cap", "organization", "r4"),
        ];

        let active = active_investors(&joined, &investments);
        let widened = investor_portfolios(&active, &investments, &rounds);
        let filtered = retain_tracked_rounds(widened, &tracked);

        // Equivalent direct path: restrict investments to tracked rounds
        // before resolving, then never widen at all.
        let tracked_round_rounds: Vec<FundingRound> = rounds
            .iter()
            .filter(|r| tracked.contains_key(&r.org_uuid))
            .cloned()
            .collect();
        let direct = investor_portfolios(&active, &investments, &tracked_round_rounds);

        assert_eq!(filtered.len(), direct.len());
        for (investor_id, portfolio) in &filtered {
            let direct_uuids: Vec<&str> = direct[investor_id]
                .rounds
                .iter()
                .map(|r| r.uuid.as_str())
                .collect();
            let filtered_uuids: Vec<&str> =
                portfolio.rounds.iter().map(|r| r.uuid.as_str()).collect();
            assert_eq!(filtered_uuids, direct_uuids);
        }
    }
}
