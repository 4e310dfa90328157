//! CLI output formatting tests.

use std::path::Path;
use std::time::Duration;

use equasis_collect::BatchRun;
use equasis_core::{
    BatchSummary, Failure, FailureKind, FleetProfile, InspectionEntry, OperationOutcome,
    TabFailure, TabKind, VesselIdentity, VesselProfile, VesselSummary,
};
use equasis_store::CredentialReport;

use super::csv::escape;
use super::{CsvFormatter, JsonFormatter, TextFormatter};

// ============================================================================
// Fixtures
// ============================================================================

fn profile() -> VesselProfile {
    let mut profile = VesselProfile::new();
    profile.identity = VesselIdentity {
        imo: Some("9074729".to_string()),
        name: Some("EMMA MAERSK".to_string()),
        flag: Some("Denmark".to_string()),
        flag_code: Some("DNK".to_string()),
        status: Some("In Service/Commission".to_string()),
        ..VesselIdentity::default()
    };
    profile.inspections = vec![InspectionEntry {
        authority: Some("Netherlands".to_string()),
        port: Some("Rotterdam".to_string()),
        date: "02/02/2024".to_string(),
        detention: "Y".to_string(),
        psc_organization: "Paris MoU".to_string(),
        inspection_type: None,
        duration: None,
        deficiencies: Some("3".to_string()),
        inspection_id: Some("3345521".to_string()),
    }];
    profile
}

fn summary(imo: &str, name: &str) -> VesselSummary {
    VesselSummary {
        imo: imo.to_string(),
        name: name.to_string(),
        gross_tonnage: None,
        vessel_type: Some("Container Ship".to_string()),
        year_built: Some("2007".to_string()),
        flag: Some("Denmark".to_string()),
        status: None,
    }
}

fn run_of<P>(outcomes: Vec<OperationOutcome<P>>, requested: usize) -> BatchRun<P> {
    let summary = BatchSummary::from_outcomes(&outcomes, Duration::from_secs(3));
    BatchRun {
        outcomes,
        summary,
        aborted: None,
        requested,
    }
}

fn not_found(key: &str) -> OperationOutcome<VesselProfile> {
    OperationOutcome::failed(
        key,
        Failure::new(FailureKind::NotFound, "no vessel with this IMO"),
        1,
        Duration::ZERO,
    )
}

// ============================================================================
// Text
// ============================================================================

#[test]
fn test_text_single_vessel_has_no_summary() {
    let run = run_of(
        vec![OperationOutcome::succeeded("9074729", profile(), vec![], 3, Duration::ZERO)],
        1,
    );
    let text = TextFormatter::new(false).format_vessel_run(&run);

    assert!(text.starts_with("EMMA MAERSK (IMO 9074729)"));
    assert!(text.contains("Flag:          Denmark (DNK)"));
    assert!(text.contains("Call sign:     N/A"));
    assert!(text.contains("Paris MoU at Rotterdam"));
    assert!(text.contains("Detention: Y"));
    assert!(!text.contains("Processed"));
}

#[test]
fn test_text_batch_lists_failures_and_summary() {
    let run = run_of(
        vec![
            OperationOutcome::succeeded("9074729", profile(), vec![], 3, Duration::ZERO),
            not_found("1234567"),
        ],
        2,
    );
    let text = TextFormatter::new(false).format_vessel_run(&run);

    assert!(text.contains("✗ 1234567: no vessel with this IMO"));
    assert!(text.contains(FailureKind::NotFound.hint()));
    assert!(text.contains("Processed 2: 1 succeeded (0 partial), 1 failed"));
    assert!(text.contains("Failed: 1234567"));
}

#[test]
fn test_text_partial_profile_notes_missing_tab() {
    let tab_failure = TabFailure {
        tab: TabKind::Inspections,
        failure: Failure::new(FailureKind::Server, "HTTP 503"),
    };
    let run = run_of(
        vec![OperationOutcome::succeeded(
            "9074729",
            profile(),
            vec![tab_failure],
            8,
            Duration::ZERO,
        )],
        1,
    );
    let text = TextFormatter::new(false).format_vessel_run(&run);

    assert!(text.contains(TabKind::Inspections.display_name()));
    assert!(text.contains("HTTP 503 (retry later)"));
}

#[test]
fn test_text_aborted_batch_shows_reason() {
    let mut run = run_of(vec![not_found("1234567")], 3);
    run.aborted = Some(Failure::new(FailureKind::Authentication, "login rejected"));
    let text = TextFormatter::new(false).format_vessel_run(&run);

    assert!(text.contains("Batch aborted: login rejected"));
}

#[test]
fn test_text_colors_only_when_enabled() {
    let run = run_of(vec![not_found("1234567")], 1);

    assert!(TextFormatter::new(true).format_vessel_run(&run).contains("\x1b["));
    assert!(!TextFormatter::new(false).format_vessel_run(&run).contains("\x1b["));
}

#[test]
fn test_text_fleet() {
    let fleet = FleetProfile::new(
        "MAERSK A/S",
        vec![summary("9321483", "ELEONORA MAERSK"), summary("9074729", "EMMA MAERSK")],
    );
    let run = run_of(
        vec![OperationOutcome::succeeded("MAERSK A/S", fleet, vec![], 1, Duration::ZERO)],
        1,
    );
    let text = TextFormatter::new(false).format_fleet_run(&run);

    assert!(text.contains("Fleet: MAERSK A/S"));
    assert!(text.contains("Total vessels: 2"));
    assert!(text.contains("9321483  ELEONORA MAERSK | Denmark | Container Ship | 2007"));
}

#[test]
fn test_text_search() {
    let formatter = TextFormatter::new(false);

    let found = formatter.format_search("EMMA", &[summary("9074729", "EMMA MAERSK")]);
    assert!(found.contains("Search results for \"EMMA\" (1 found)"));

    let empty = formatter.format_search("NOTHING", &[]);
    assert_eq!(empty, "No vessels found for \"NOTHING\"");
}

#[test]
fn test_text_credential_report() {
    let report = CredentialReport {
        env_username: false,
        env_password: false,
        configured_username: Some("alice".to_string()),
        keychain_password: true,
    };
    let text =
        TextFormatter::new(false).format_credential_report(&report, Path::new("/tmp/config.json"));

    assert!(text.contains("Configured username: alice"));
    assert!(text.contains("Keychain password:   ✓ set"));
    assert!(text.contains("EQUASIS_PASSWORD:    ✗ not set"));
    assert!(text.contains("/tmp/config.json"));
    assert!(!text.contains("none (see"));
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn test_json_run_report() {
    let run = run_of(
        vec![
            OperationOutcome::succeeded("9074729", profile(), vec![], 3, Duration::ZERO),
            not_found("1234567"),
        ],
        4,
    );
    let json = JsonFormatter::new(false).format_run(&run).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["outcomes"].as_array().unwrap().len(), 2);
    assert_eq!(value["outcomes"][0]["key"], "9074729");
    assert_eq!(value["summary"]["succeeded"], 1);
    assert_eq!(value["summary"]["failed_keys"][0], "1234567");
    assert_eq!(value["skipped"], 2);
    assert!(value.get("aborted").is_none());
}

#[test]
fn test_json_pretty_and_compact() {
    let vessels = vec![summary("9074729", "EMMA MAERSK")];

    let compact = JsonFormatter::new(false).format(&vessels).unwrap();
    let pretty = JsonFormatter::new(true).format(&vessels).unwrap();

    assert!(!compact.contains('\n'));
    assert!(pretty.contains('\n'));
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&compact).unwrap(),
        serde_json::from_str::<serde_json::Value>(&pretty).unwrap()
    );
}

// ============================================================================
// CSV
// ============================================================================

#[test]
fn test_csv_escape() {
    assert_eq!(escape("plain"), "plain");
    assert_eq!(escape("MAERSK, A/S"), "\"MAERSK, A/S\"");
    assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
}

#[test]
fn test_csv_vessel_outcomes() {
    let outcomes = vec![
        OperationOutcome::succeeded("9074729", profile(), vec![], 3, Duration::ZERO),
        not_found("1234567"),
    ];
    let csv = CsvFormatter::new().format_vessel_outcomes(&outcomes);
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("imo,name,flag,"));
    assert!(lines[0].ends_with(",error"));
    assert_eq!(
        lines[1],
        "9074729,EMMA MAERSK,Denmark,,,,,,,In Service/Commission,1,1,"
    );
    assert_eq!(lines[2], "1234567,,,,,,,,,,,,not_found: no vessel with this IMO");
}

#[test]
fn test_csv_fleet_outcomes() {
    let fleet = FleetProfile::new("MAERSK, A/S", vec![summary("9321483", "ELEONORA MAERSK")]);
    let outcomes = vec![
        OperationOutcome::succeeded("MAERSK, A/S", fleet, vec![], 1, Duration::ZERO),
        OperationOutcome::failed(
            "UNKNOWN CO",
            Failure::new(FailureKind::NotFound, "no such company"),
            1,
            Duration::ZERO,
        ),
    ];
    let csv = CsvFormatter::new().format_fleet_outcomes(&outcomes);
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], "company,imo,name,flag,vessel_type,gross_tonnage,year_built,status,error");
    assert_eq!(
        lines[1],
        "\"MAERSK, A/S\",9321483,ELEONORA MAERSK,Denmark,Container Ship,,2007,,"
    );
    assert_eq!(lines[2], "UNKNOWN CO,,,,,,,,not_found: no such company");
}

#[test]
fn test_csv_vessel_list() {
    let csv = CsvFormatter::new().format_vessel_list(&[summary("9074729", "EMMA MAERSK")]);

    assert_eq!(
        csv,
        "imo,name,flag,vessel_type,gross_tonnage,year_built,status\n\
         9074729,EMMA MAERSK,Denmark,Container Ship,,2007,\n"
    );
}
