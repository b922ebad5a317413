//! Conformance report rendering.

use serde::Serialize;

use crate::static_checks::StaticContractRecord;
use crate::verify::VerdictSummary;

/// Human- and machine-readable result of a run.
#[derive(Debug, Clone, Serialize)]
pub struct ConformanceReport {
    pub title: String,
    pub campaign: String,
    /// Run seed, rendered as hex.
    pub seed: String,
    pub timestamp: String,
    pub summary: VerdictSummary,
    /// `VerdictSummary::fingerprint` of `summary`.
    pub fingerprint: String,
    /// Compile-time contracts that held for this build.
    pub static_contracts: Vec<StaticContractRecord>,
}

impl ConformanceReport {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        campaign: impl Into<String>,
        seed: u64,
        timestamp: impl Into<String>,
        summary: VerdictSummary,
    ) -> Self {
        Self {
            title: title.into(),
            campaign: campaign.into(),
            seed: format!("{seed:#018x}"),
            timestamp: timestamp.into(),
            fingerprint: summary.fingerprint(),
            summary,
            static_contracts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_static_contracts(mut self, contracts: Vec<StaticContractRecord>) -> Self {
        self.static_contracts = contracts;
        self
    }

    /// Render as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let summary = &self.summary;
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Campaign: {}\n", self.campaign));
        out.push_str(&format!("- Seed: `{}`\n", self.seed));
        out.push_str(&format!("- Generated: {}\n", self.timestamp));
        out.push_str(&format!("- Verdict fingerprint: `{}`\n", self.fingerprint));
        out.push_str(&format!(
            "- Total: {} | Passed: {} | Failed: {} | Not run: {}\n",
            summary.total,
            summary.passed,
            summary.failed,
            summary.not_run.len()
        ));
        out.push_str(&format!("- Static contracts: {}\n\n", self.static_contracts.len()));

        out.push_str("| Case | Clause | Status | Parameter sets | Observations |\n");
        out.push_str("|------|--------|--------|----------------|--------------|\n");
        for v in &summary.verdicts {
            let status = if v.passed() { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                v.case_id,
                v.clause.replace('|', "\\|"),
                status,
                v.parameter_sets_run,
                v.observations_checked
            ));
        }
        for id in &summary.not_run {
            out.push_str(&format!("| {id} | | NOT RUN | 0 | 0 |\n"));
        }

        let failures: Vec<_> = summary
            .verdicts
            .iter()
            .filter_map(|v| v.failure.as_ref().map(|f| (v, f)))
            .collect();
        if !failures.is_empty() {
            out.push_str("\n## Failures\n");
            for (verdict, failure) in failures {
                out.push_str(&format!(
                    "\n### {} [{}]\n\n- Parameter set #{}: {}\n- Error ({}): {}\n",
                    verdict.case_id,
                    verdict.clause,
                    failure.parameter_index,
                    failure.parameter_set,
                    failure.kind,
                    failure.message
                ));
                if let Some(diff) = &failure.diff {
                    out.push_str(&format!("\n```diff\n{diff}```\n"));
                }
            }
        }
        out
    }

    /// Render as pretty-printed JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| String::from("{}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{CaseId, ParameterSet};
    use crate::verify::{CaseFailure, Verdict, VerdictStatus};

    fn sample() -> ConformanceReport {
        let passed = Verdict {
            case_id: CaseId::new("bitset.xor_assign"),
            clause: String::from("[template.bitset] operator^"),
            status: VerdictStatus::Passed,
            parameter_sets_run: 9,
            observations_checked: 9,
            failure: None,
        };
        let failed = Verdict {
            case_id: CaseId::new("pair.assign"),
            clause: String::from("[pairs.pair] operator="),
            status: VerdictStatus::Failed,
            parameter_sets_run: 1,
            observations_checked: 0,
            failure: Some(CaseFailure {
                parameter_index: 0,
                parameter_set: ParameterSet::sized(0),
                kind: "AssertionFailure",
                message: String::from("assertion failed: `p.first == 3.0`"),
                diff: Some(String::from("--- expected\n+++ actual\n")),
            }),
        };
        let summary = VerdictSummary::from_verdicts(
            vec![passed, failed],
            vec![CaseId::new("norm.overloads")],
        );
        ConformanceReport::new("stdconf", "unit", 0xDEAD_BEEF, "fixed", summary)
    }

    #[test]
    fn markdown_lists_cases_and_failures() {
        let md = sample().to_markdown();
        assert!(md.starts_with("# stdconf\n"));
        assert!(md.contains("- Seed: `0x00000000deadbeef`"));
        assert!(md.contains("| bitset.xor_assign | [template.bitset] operator^ | PASS | 9 | 9 |"));
        assert!(md.contains("| norm.overloads | | NOT RUN | 0 | 0 |"));
        assert!(md.contains("### pair.assign [[pairs.pair] operator=]"));
        assert!(md.contains("- Parameter set #0: N=0 {N=0}"));
        assert!(md.contains("```diff\n--- expected\n"));
    }

    #[test]
    fn json_carries_summary() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json()).unwrap();
        assert_eq!(json["summary"]["total"], 2);
        assert_eq!(json["summary"]["failed"], 1);
        assert_eq!(json["summary"]["not_run"][0], "norm.overloads");
        assert_eq!(json["summary"]["verdicts"][0]["status"], "passed");
        assert_eq!(json["timestamp"], "fixed");
        assert_eq!(json["fingerprint"].as_str().map(str::len), Some(64));
    }
}
