use serde::Deserialize;

/// One fundraising event, as exported in `funding_rounds.csv`. Identifiers are
/// opaque strings; extra columns in the export are ignored on deserialize.
#[derive(Debug, Clone, Deserialize)]
pub struct FundingRound {
    pub uuid: String,
    pub org_uuid: String,
    pub investment_type: String,
}

/// One investment row from `investments.csv`, linking an investor to a
/// funding round. Only rows with `investor_type == "organization"` ever
/// qualify an investor as active.
#[derive(Debug, Clone, Deserialize)]
pub struct Investment {
    pub investor_uuid: String,
    pub investor_name: String,
    pub investor_type: String,
    pub funding_round_uuid: String,
}

/// A tracked company together with every round it raised. Companies that
/// raised nothing keep an empty round list.
#[derive(Debug, Clone)]
pub struct CompanyRounds {
    pub name: String,
    pub rounds: Vec<FundingRound>,
}

/// An active investor's resolved funding rounds. Before the disruptor filter
/// this spans the investor's whole portfolio; after it only tracked-company
/// rounds remain.
#[derive(Debug, Clone)]
pub struct InvestorPortfolio {
    pub name: String,
    pub rounds: Vec<FundingRound>,
}

/// One output row: distinct backed-company counts per bucket, in the same
/// order as `BreakdownTable::buckets`, plus the overall distinct total.
#[derive(Debug, Clone)]
pub struct InvestorRow {
    pub investor_uuid: String,
    pub investor_name: String,
    pub counts: Vec<usize>,
    pub total: usize,
}

/// The pivoted report table. Bucket order is fixed for the run and shared by
/// every row.
#[derive(Debug, Clone)]
pub struct BreakdownTable {
    pub buckets: Vec<String>,
    pub rows: Vec<InvestorRow>,
}
