//! Quote ranking over the results of a finished call session.
//!
//! Pure and deterministic: the same input always yields the same order,
//! best option and summary text.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::session::CallResult;

pub const NO_QUOTES_SUMMARY: &str = "No quotations were obtained from the contacted shops.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteAnalysis {
    pub ranked: Vec<CallResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_option: Option<CallResult>,
    pub summary: String,
}

/// Ranks call results by quoted price, cheapest first.
///
/// Results without a positive price are dropped. Equal prices keep their
/// input order.
pub fn analyze_and_rank(results: &[CallResult]) -> QuoteAnalysis {
    let mut ranked: Vec<(f64, &CallResult)> =
        results.iter().filter_map(|r| r.quoted_price().map(|price| (price, r))).collect();
    // Vec::sort_by is stable, which gives the tie-break on input order.
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    let ranked: Vec<CallResult> = ranked.into_iter().map(|(_, r)| r.clone()).collect();
    let best_option = ranked.first().cloned();
    let summary = summarize(&ranked);
    QuoteAnalysis { ranked, best_option, summary }
}

fn summarize(ranked: &[CallResult]) -> String {
    let Some(best) = ranked.first() else {
        return NO_QUOTES_SUMMARY.to_owned();
    };

    let noun = if ranked.len() == 1 { "quote" } else { "quotes" };
    let mut out = format!("Received {} {noun}:\n", ranked.len());
    for (idx, result) in ranked.iter().enumerate() {
        let duration = result
            .quotation
            .as_ref()
            .and_then(|q| q.estimated_duration.as_deref())
            .unwrap_or("not provided");
        let _ = writeln!(
            out,
            "{}. {}: ${:.2} (estimated duration: {duration})",
            idx + 1,
            result.shop.name,
            result.quoted_price().unwrap_or_default(),
        );
    }
    let _ = write!(
        out,
        "\nRecommended: {} at ${:.2}.",
        best.shop.name,
        best.quoted_price().unwrap_or_default()
    );
    out
}
