//! Ship history tab: former names, flags, and companies.

use equasis_core::{HistoricalCompany, HistoricalFlag, HistoricalName, HistorySections};
use scraper::Html;

use super::table_rows;

const NAME_ROWS: &str = "div#collapse1 table.tableLS tbody tr";
const FLAG_ROWS: &str = "div#collapse2 table.tableLS tbody tr";
const COMPANY_ROWS: &str = "div#collapse4 table.tableLS tbody tr";

pub(super) fn extract_history(html: &Html) -> HistorySections {
    HistorySections {
        names: table_rows(html, NAME_ROWS, 3, "historical names")
            .iter()
            .map(|row| HistoricalName {
                name: row.cell(0),
                date_of_effect: row.cell(1),
                source: row.cell(2),
            })
            .collect(),
        flags: table_rows(html, FLAG_ROWS, 3, "historical flags")
            .iter()
            .map(|row| HistoricalFlag {
                flag: row.cell(0),
                date_of_effect: row.cell(1),
                source: row.cell(2),
            })
            .collect(),
        companies: table_rows(html, COMPANY_ROWS, 4, "historical companies")
            .iter()
            .map(|row| HistoricalCompany {
                company: row.cell(0),
                role: row.cell(1),
                date_of_effect: row.cell(2),
                source: row.cell(3),
            })
            .collect(),
    }
}
