//! Profile merging.
//!
//! Scalar identity fields follow [`IdentityField::precedence`]: most are
//! first-non-empty-wins, and only the status-like fields take the latest
//! non-empty value. Each list section is owned by one tab and replaced
//! wholesale when that tab is merged, so re-merging a tab is a no-op and the
//! sections do not depend on tab arrival order.

use equasis_core::{
    FieldConflict, IdentityField, MergePrecedence, PartialRecord, TabContent, TabKind,
    VesselProfile,
};
use tracing::{debug, warn};

/// Merges one tab's partial record into a profile and returns the result.
///
/// Never fails. A record whose content does not belong to `tab` still
/// contributes its identity fields, but its sections are ignored.
pub fn merge(mut profile: VesselProfile, partial: PartialRecord, tab: TabKind) -> VesselProfile {
    merge_identity(&mut profile, &partial, tab);

    if partial.tab() == tab {
        match partial.content {
            TabContent::ShipInfo(sections) => profile.ship_info = sections,
            TabContent::Inspections(entries) => profile.inspections = entries,
            TabContent::ShipHistory(sections) => profile.history = sections,
        }
    } else {
        debug!(%tab, content = %partial.tab(), "Ignoring sections from another tab");
    }

    if !profile.merged_tabs.contains(&tab) {
        profile.merged_tabs.push(tab);
    }
    profile
}

fn merge_identity(profile: &mut VesselProfile, partial: &PartialRecord, tab: TabKind) {
    for field in IdentityField::ALL {
        let Some(incoming) = partial.identity.get(field) else {
            continue;
        };

        match (field.precedence(), profile.identity.get(field)) {
            (MergePrecedence::LatestNonEmpty, _) | (MergePrecedence::FirstNonEmpty, None) => {
                profile.identity.set(field, incoming);
            }
            (MergePrecedence::FirstNonEmpty, Some(kept)) if kept != incoming => {
                let conflict = FieldConflict {
                    field,
                    kept: kept.to_string(),
                    ignored: incoming.to_string(),
                    tab,
                };
                if !profile.conflicts.contains(&conflict) {
                    warn!(
                        field = field.label(),
                        kept = %conflict.kept,
                        ignored = %conflict.ignored,
                        %tab,
                        "Tabs disagree on identity field"
                    );
                    profile.conflicts.push(conflict);
                }
            }
            (MergePrecedence::FirstNonEmpty, Some(_)) => {}
        }
    }
}
