//! CSV export of ranked deals.
//!
//! Column order is fixed and part of the artifact's contract with
//! downstream spreadsheet users.

use std::path::Path;

use chrono::Local;

use crate::domain::product::Deal;
use crate::error::Result;

/// Fixed export column order.
const COLUMNS: [&str; 12] = [
    "title",
    "current_price",
    "original_price",
    "discount_percent",
    "rating",
    "review_count",
    "availability",
    "prime_eligible",
    "deal_score",
    "page",
    "original_url",
    "affiliate_url",
];

/// Write `deals` to `path` in the fixed column order.
pub fn write_deals<P: AsRef<Path>>(deals: &[Deal], path: P) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(COLUMNS)?;

    for deal in deals {
        let row = [
            deal.title.clone(),
            format!("{:.2}", deal.current_price),
            format!("{:.2}", deal.original_price),
            format!("{:.2}", deal.discount_percent),
            format!("{:.1}", deal.rating),
            deal.review_count.to_string(),
            deal.availability_text.clone(),
            deal.is_prime_eligible.to_string(),
            format!("{:.2}", deal.deal_score),
            deal.page_index.to_string(),
            deal.source_url.clone(),
            deal.monetized_url.clone(),
        ];
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Timestamped default export filename.
#[must_use]
pub fn default_filename() -> String {
    format!("deals_{}.csv", Local::now().format("%Y%m%d_%H%M%S"))
}
