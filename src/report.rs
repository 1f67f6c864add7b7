use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;

use crate::models::BreakdownTable;

/// Serializes the breakdown table as CSV. The trailing column name reflects
/// which variant ran: canonical stages when a convert map remapped the
/// categories, raw funding types otherwise.
pub fn write_breakdown(
    table: &BreakdownTable,
    out: &Path,
    remapped: bool,
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(out)
        .with_context(|| format!("failed to create report file {}", out.display()))?;

    let total_label = if remapped {
        "all funding stages"
    } else {
        "all funding types"
    };

    let mut header = vec!["active investor uuid".to_string(), "name".to_string()];
    header.extend(table.buckets.iter().cloned());
    header.push(total_label.to_string());
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![row.investor_uuid.clone(), row.investor_name.clone()];
        record.extend(row.counts.iter().map(|count| count.to_string()));
        record.push(row.total.to_string());
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to write report file {}", out.display()))?;
    Ok(())
}

/// Renders the active-investor set for stdout, one line per investor in
/// uuid order.
pub fn render_active_investors(active: &BTreeMap<String, String>, limit: usize) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    let _ = writeln!(output, "Active investors backing tracked companies:");
    for (investor_uuid, name) in active.iter().take(limit) {
        let _ = writeln!(output, "- {} ({})", name, investor_uuid);
    }
    if active.len() > limit {
        let _ = writeln!(output, "... and {} more", active.len() - limit);
    }
    output
}
