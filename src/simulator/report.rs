//! Prediction results and their text/JSON renderings.

use super::state::SimState;
use crate::core::constants::TICKS_PER_SECOND;
use crate::core::Progression;
use crate::resources::ResourceLedger;
use serde::{Deserialize, Serialize};

/// Snapshot taken after one plan entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    pub action: String,
    pub count: u32,
    pub mana_spent: u64,
    /// Ticks of the entry's last run.
    pub ticks: u64,
    pub resources: ResourceLedger,
    /// Present for loop actions.
    pub progression: Option<Progression>,
    pub valid: bool,
}

/// Result of one simulation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub rows: Vec<PredictionRow>,
    pub total_mana: u64,
    pub final_state: SimState,
    pub valid: bool,
}

impl Prediction {
    /// Real time the plan takes at normal game speed.
    pub fn estimated_seconds(&self) -> f64 {
        self.total_mana as f64 / TICKS_PER_SECOND
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                      LOOP PREDICTION\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str("  Action                 x     Mana     Left    Loops       OK\n");
        report.push_str("  ──────────────────── ──── ──────── ──────── ─────────── ──\n");
        for row in &self.rows {
            let loops = match &row.progression {
                Some(p) => format!("{} ({})", p.total, p.completed),
                None => String::new(),
            };
            report.push_str(&format!(
                "  {:<20} {:>4} {:>8} {:>8.0} {:>11} {}\n",
                truncate(&row.action, 20),
                row.count,
                row.mana_spent,
                row.resources.mana(),
                loops,
                if row.valid { "✓" } else { "✗" }
            ));
        }
        report.push('\n');

        report.push_str("── RESOURCES ────────────────────────────────────────────────────\n");
        for (resource, value) in self.final_state.resources.non_zero() {
            report.push_str(&format!("  {:<12} {:>10.1}\n", resource.name(), value));
        }
        report.push('\n');

        report.push_str("── STAT EXPERIENCE ──────────────────────────────────────────────\n");
        for (stat, experience) in self.final_state.stats.iter() {
            if experience > 0.0 {
                report.push_str(&format!("  {:<12} {:>10.1}\n", stat.abbrev(), experience));
            }
        }
        report.push('\n');

        report.push_str("── TOTALS ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Total Mana:     {}\n", self.total_mana));
        report.push_str(&format!(
            "  Est. Time:      {}\n",
            format_duration(self.estimated_seconds())
        ));
        if !self.valid {
            report.push_str("  ⚠️  Plan runs out of mana\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let mut short: String = name.chars().take(width - 1).collect();
        short.push('…');
        short
    }
}

/// `1h 02m 05s`, `2m 05s` or `5.0s`.
fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        return format!("{:.1}s", seconds);
    }
    let whole = seconds.round() as u64;
    let (hours, minutes, secs) = (whole / 3600, (whole % 3600) / 60, whole % 60);
    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, secs)
    } else {
        format!("{}m {:02}s", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostSnapshot;
    use crate::resources::Resource;

    fn prediction() -> Prediction {
        let mut resources = ResourceLedger::starting();
        resources.set(Resource::Gold, 12.0);
        let rows = vec![
            PredictionRow {
                action: "Wander".to_string(),
                count: 1,
                mana_spent: 250,
                ticks: 250,
                resources: resources.clone(),
                progression: None,
                valid: true,
            },
            PredictionRow {
                action: "Heal The Sick".to_string(),
                count: 2,
                mana_spent: 5000,
                ticks: 2500,
                resources: resources.clone(),
                progression: Some(Progression::seeded(3)),
                valid: false,
            },
        ];
        Prediction {
            rows,
            total_mana: 5250,
            final_state: SimState::new(&HostSnapshot::fresh_game(), resources),
            valid: false,
        }
    }

    #[test]
    fn test_text_report_lists_rows_and_totals() {
        let text = prediction().to_text();
        assert!(text.contains("Wander"));
        assert!(text.contains("Heal The Sick"));
        assert!(text.contains("Total Mana:     5250"));
        assert!(text.contains("Est. Time:      1m 45s"));
        assert!(text.contains("gold"));
        assert!(text.contains("runs out of mana"));
    }

    #[test]
    fn test_json_report_parses_back() {
        let original = prediction();
        let parsed: Prediction = serde_json::from_str(&original.to_json()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(5.0), "5.0s");
        assert_eq!(format_duration(125.0), "2m 05s");
        assert_eq!(format_duration(3725.0), "1h 02m 05s");
    }

    #[test]
    fn test_truncate_long_names() {
        assert_eq!(truncate("Wander", 20), "Wander");
        assert_eq!(truncate("Sit By Waterfall Forever", 10).chars().count(), 10);
    }
}
