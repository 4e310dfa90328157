//! Ship info tab: overview, management, classification, geography.

use equasis_core::{
    ClassificationEntry, CompanyEntry, GeoEntry, ListColor, Overview, ShipInfoSections,
    UscgTargeting,
};
use scraper::Html;
use tracing::debug;

use super::{first_in, non_empty, select_all, select_in, table_rows, text_of};

const OVERVIEW_BADGES: &str = "div#collapse1 div.badge.bleu-equasis";
const MANAGEMENT_ROWS: &str = "div#collapse3 table.tableLS tbody tr";
const CLASSIFICATION_ITEMS: &str = "div#collapse4 div.access-body";
const GEOGRAPHICAL_ROWS: &str = "div#collapse7 table.tableLS tbody tr";

/// Which overview entry a badge describes.
#[derive(Debug, Clone, Copy)]
enum Programme {
    ParisMou,
    TokyoMou,
    Uscg,
}

/// Badge text (lowercased) to programme, first match wins.
const OVERVIEW_RULES: &[(&str, Programme)] = &[
    ("paris mou", Programme::ParisMou),
    ("tokyo mou", Programme::TokyoMou),
    ("uscg", Programme::Uscg),
];

pub(super) fn extract_ship_info(html: &Html) -> ShipInfoSections {
    ShipInfoSections {
        overview: extract_overview(html),
        management: extract_management(html),
        classification: extract_classification(html),
        geographical: extract_geographical(html),
    }
}

fn extract_overview(html: &Html) -> Option<Overview> {
    let mut overview = Overview::default();

    for badge in select_all(html, OVERVIEW_BADGES) {
        let text = text_of(badge).to_lowercase();
        let Some((_, programme)) = OVERVIEW_RULES.iter().find(|(k, _)| text.contains(k)) else {
            continue;
        };

        let colour = || {
            first_in(badge, "div[class*='round-']")
                .and_then(|d| d.value().attr("class"))
                .and_then(ListColor::from_classes)
        };

        match programme {
            Programme::ParisMou => overview.paris_mou = colour(),
            Programme::TokyoMou => overview.tokyo_mou = colour(),
            Programme::Uscg => {
                overview.uscg_targeting = Some(if text.contains("not targeted") {
                    UscgTargeting::NotTargeted
                } else {
                    UscgTargeting::Targeted
                });
            }
        }
    }

    (!overview.is_empty()).then_some(overview)
}

fn extract_management(html: &Html) -> Vec<CompanyEntry> {
    table_rows(html, MANAGEMENT_ROWS, 5, "management")
        .into_iter()
        .map(|row| CompanyEntry {
            imo: row.optional(0),
            role: row.cell(1),
            name: row.cell(2),
            address: row.optional(3),
            date_of_effect: row.optional(4),
        })
        .collect()
}

fn extract_classification(html: &Html) -> Vec<ClassificationEntry> {
    let mut entries = Vec::new();

    for item in select_all(html, CLASSIFICATION_ITEMS) {
        let paragraphs: Vec<String> = select_in(item, "p").into_iter().map(text_of).collect();
        let Some(society) = paragraphs.first().and_then(|p| non_empty(p)) else {
            debug!("Skipped classification entry without society");
            continue;
        };

        entries.push(ClassificationEntry {
            society,
            status: first_in(item, "span.badge").and_then(|b| non_empty(&text_of(b))),
            date_of_effect: paragraphs
                .iter()
                .find(|p| p.contains("during") || p.contains("since"))
                .cloned(),
        });
    }

    entries
}

fn extract_geographical(html: &Html) -> Vec<GeoEntry> {
    table_rows(html, GEOGRAPHICAL_ROWS, 3, "geographical")
        .into_iter()
        .map(|row| GeoEntry {
            date: row.cell(0),
            area: row.cell(1),
            source: row.cell(2),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
      <div id="collapse1">
        <div class="badge bleu-equasis">Paris MOU <div class="round-20 white"></div></div>
        <div class="badge bleu-equasis">Tokyo MOU <div class="round-20 grey"></div></div>
        <div class="badge bleu-equasis">USCG: not targeted</div>
      </div>
      <div id="collapse3">
        <table class="tableLS"><thead><tr><th>IMO</th></tr></thead><tbody>
          <tr><td>5428329</td><td>Registered owner</td><td>A.P. MOLLER - MAERSK A/S</td><td>Esplanaden 50, Copenhagen</td><td>since 01/09/2006</td></tr>
          <tr><td></td><td>ISM Manager</td><td>MAERSK A/S</td><td></td><td></td></tr>
          <tr><td>broken</td></tr>
        </tbody></table>
      </div>
      <div id="collapse4">
        <div class="access-body"><p>American Bureau of Shipping</p><span class="badge">Delivered</span><p>since 01/09/2006</p></div>
        <div class="access-body"><p></p></div>
      </div>
      <div id="collapse7">
        <table class="tableLS"><tbody>
          <tr><td>10/03/2024</td><td>North Sea</td><td>AIS</td></tr>
        </tbody></table>
      </div>
    "#;

    #[test]
    fn test_all_sections() {
        let sections = extract_ship_info(&Html::parse_document(PAGE));

        let overview = sections.overview.unwrap();
        assert_eq!(overview.paris_mou, Some(ListColor::White));
        assert_eq!(overview.tokyo_mou, Some(ListColor::Grey));
        assert_eq!(overview.uscg_targeting, Some(UscgTargeting::NotTargeted));

        assert_eq!(sections.management.len(), 2);
        assert_eq!(sections.management[0].imo.as_deref(), Some("5428329"));
        assert_eq!(sections.management[0].role, "Registered owner");
        assert_eq!(sections.management[0].name, "A.P. MOLLER - MAERSK A/S");
        assert!(sections.management[1].imo.is_none());
        assert!(sections.management[1].address.is_none());

        assert_eq!(sections.classification.len(), 1);
        assert_eq!(sections.classification[0].society, "American Bureau of Shipping");
        assert_eq!(sections.classification[0].status.as_deref(), Some("Delivered"));
        assert_eq!(
            sections.classification[0].date_of_effect.as_deref(),
            Some("since 01/09/2006")
        );

        assert_eq!(sections.geographical.len(), 1);
        assert_eq!(sections.geographical[0].area, "North Sea");
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let html = Html::parse_document(
            r#"<div id="collapse7"><table class="tableLS"><tr><td>d</td><td>a</td><td>s</td></tr></table></div>"#,
        );
        let sections = extract_ship_info(&html);

        assert!(sections.overview.is_none());
        assert!(sections.management.is_empty());
        assert!(sections.classification.is_empty());
        assert_eq!(sections.geographical.len(), 1);
    }

    #[test]
    fn test_targeted_when_not_negated() {
        let html = Html::parse_document(
            r#"<div id="collapse1"><div class="badge bleu-equasis">USCG: targeted</div></div>"#,
        );
        let overview = extract_overview(&html).unwrap();
        assert_eq!(overview.uscg_targeting, Some(UscgTargeting::Targeted));
        assert!(overview.paris_mou.is_none());
    }
}
