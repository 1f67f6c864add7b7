use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::models::{FundingRound, Investment};

/// Everything one run operates on, loaded up front and never mutated.
/// Tracked companies map uuid to display name; the round and investment
/// collections cover the full universe, not just tracked companies.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub companies: BTreeMap<String, String>,
    pub funding_rounds: Vec<FundingRound>,
    pub investments: Vec<Investment>,
}

impl Snapshot {
    pub fn load(company_file: &Path, daily_report_dir: &Path) -> anyhow::Result<Self> {
        let companies = read_companies(company_file)?;
        let funding_rounds = read_funding_rounds(&daily_report_dir.join("funding_rounds.csv"))?;
        let investments = read_investments(&daily_report_dir.join("investments.csv"))?;

        info!(
            companies = companies.len(),
            funding_rounds = funding_rounds.len(),
            investments = investments.len(),
            "snapshot loaded"
        );

        Ok(Snapshot {
            companies,
            funding_rounds,
            investments,
        })
    }
}

/// Reads the curated disruptor list: two columns, no header, `uuid,name`.
/// A row with any other shape is a fatal error.
pub fn read_companies(path: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to open company file {}", path.display()))?;

    let mut companies = BTreeMap::new();
    for result in reader.deserialize::<(String, String)>() {
        let (uuid, name) =
            result.with_context(|| format!("malformed row in {}", path.display()))?;
        companies.insert(uuid, name);
    }
    Ok(companies)
}

pub fn read_funding_rounds(path: &Path) -> anyhow::Result<Vec<FundingRound>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open funding rounds file {}", path.display()))?;

    let mut rounds = Vec::new();
    for result in reader.deserialize::<FundingRound>() {
        rounds.push(result.with_context(|| format!("malformed row in {}", path.display()))?);
    }
    Ok(rounds)
}

pub fn read_investments(path: &Path) -> anyhow::Result<Vec<Investment>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open investments file {}", path.display()))?;

    let mut investments = Vec::new();
    for result in reader.deserialize::<Investment>() {
        investments.push(result.with_context(|| format!("malformed row in {}", path.display()))?);
    }
    Ok(investments)
}

/// Reads the optional category convert map: two columns with a header row,
/// raw investment type to canonical bucket label.
pub fn read_convert_map(path: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open convert map {}", path.display()))?;

    let mut map = BTreeMap::new();
    for result in reader.deserialize::<(String, String)>() {
        let (raw, bucket) =
            result.with_context(|| format!("malformed row in {}", path.display()))?;
        map.insert(raw, bucket);
    }
    Ok(map)
}
