//! Sweep leaderboard: one row per variant.

use std::path::Path;

use csv::Writer;
use tracing::info;

use pt_sim::RunKpis;

use crate::row::LEADERBOARD_KEY_COLUMNS;
use crate::OutputResult;

pub const LEADERBOARD_FILE: &str = "leaderboard.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    pub variant:     String,
    pub param_path:  String,
    /// Empty for a `null` sweep value.
    pub param_value: String,
    pub kpis:        RunKpis,
}

impl LeaderboardRow {
    fn cell(&self, column: &str) -> String {
        match column {
            "variant" => self.variant.clone(),
            "param_path" => self.param_path.clone(),
            "param_value" => self.param_value.clone(),
            name => self
                .kpis
                .columns()
                .into_iter()
                .find(|(c, _)| *c == name)
                .map(|(_, v)| v.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Key columns first, then every remaining KPI column in metrics order.
pub fn leaderboard_columns(kpis: &RunKpis) -> Vec<&'static str> {
    let mut cols: Vec<&'static str> = LEADERBOARD_KEY_COLUMNS.to_vec();
    for (name, _) in kpis.columns() {
        if !cols.contains(&name) {
            cols.push(name);
        }
    }
    cols
}

/// Write `dir/leaderboard.csv`.  An empty sweep writes the key header only.
pub fn write_leaderboard(dir: &Path, rows: &[LeaderboardRow]) -> OutputResult<()> {
    let path = dir.join(LEADERBOARD_FILE);
    let columns = match rows.first() {
        Some(r) => leaderboard_columns(&r.kpis),
        None => LEADERBOARD_KEY_COLUMNS.to_vec(),
    };

    let mut w = Writer::from_path(&path)?;
    w.write_record(&columns)?;
    for row in rows {
        w.write_record(columns.iter().map(|c| row.cell(c)))?;
    }
    w.flush()?;

    info!(path = %path.display(), variants = rows.len(), "leaderboard written");
    Ok(())
}
