//! Report tables built from parsed filings

use balans_data::cbso::{FilingReference, ModelType, PeriodSymbol};
use balans_data::{CompanyNumber, FetchError, FilingRecord, FilingSet, LineCodeTable};
use balans_output::{ExportFormat, Exporter, ReportTables};
use chrono::NaiveDate;
use std::fs;

const LOOKUP: &str = "label,code\nOmzet (70),70\nHandelsvorderingen (40),40\nHandelsschulden (44),44\n";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(reference: &str, year: i32, body_extra: &str) -> FilingRecord {
    let json = format!(
        r#"{{
            "ReferenceNumber": "{reference}",
            "EnterpriseName": "ACME NV",
            "Address": {{"Street": "Kerkstraat", "Number": "1", "PostalCode": "pcd:m9000", "City": "Gent", "Country": "cty:mBE"}},
            "LegalForm": "lgf:m014",
            "Rubrics": [
                {{"Code": "70", "Period": "N", "Value": 1000}},
                {{"Code": "40", "Period": "N", "Value": 100}},
                {{"Code": "70", "Period": "NM1", "Value": 800}}
            ]{body_extra}
        }}"#
    );
    let reference = FilingReference::new(reference)
        .with_period(date(year, 1, 1), date(year, 12, 31))
        .with_model_type(ModelType::Full)
        .with_activity_code("62010");
    FilingRecord::parse(&json).unwrap().with_reference(&reference)
}

fn filing_set() -> FilingSet {
    let administrators = r#",
        "Administrators": {
            "LegalPersons": [{
                "Entity": {"Name": "HOLDCO BV", "Identifier": "0123456789"},
                "Representatives": [{"FirstName": "MARIE", "LastName": "DUBOIS"}],
                "Mandates": [{"FunctionMandate": "fct:m10", "MandateDates": {"StartDate": "2019-05-01", "EndDate": "2025-05-01"}}]
            }],
            "NaturalPersons": [{"Person": {"FirstName": "PIETER", "LastName": "CLAES"}, "Mandates": []}]
        },
        "ParticipatingInterests": [{
            "Entity": {"Name": "DOCHTER BV"},
            "Currency": "ccy:mEUR",
            "ParticipatingInterestHeld": [
                {"Line": "1", "Nature": "Aandelen", "Number": 50, "PercentageDirectlyHeld": 50},
                {"Line": "2", "Nature": "Winstbewijzen", "Number": 10}
            ]
        }]"#;

    let mut set = FilingSet::new();
    set.insert("2023-00000001", Ok(record("2023-00000001", 2022, "")));
    set.insert("2024-00000001", Ok(record("2024-00000001", 2023, administrators)));
    set.insert("2024-00000002", Err(FetchError::Http { status: 500 }));
    set
}

fn company() -> CompanyNumber {
    CompanyNumber::parse("0428003392").unwrap()
}

#[test]
fn test_qualitative_tables_use_latest_filing() {
    let lookup = LineCodeTable::from_reader(LOOKUP.as_bytes()).unwrap();
    let tables = ReportTables::from_filings(&company(), &filing_set(), &[PeriodSymbol::Current], &lookup, false);

    let info = &tables.company_info.as_ref().unwrap().rows[0];
    assert_eq!(info.company_number, "BE 0428.003.392");
    assert_eq!(info.reference_number, "2024-00000001");
    assert_eq!(info.address.as_deref(), Some("Kerkstraat 1 9000 Gent BE"));
    assert_eq!(info.legal_form.as_deref(), Some("014"));
    assert_eq!(info.model_type.as_deref(), Some("full"));

    let admins = &tables.administrators.as_ref().unwrap().rows;
    assert_eq!(admins.len(), 2);
    assert_eq!(admins[0].kind, "legal_person");
    assert_eq!(admins[0].representatives, "Marie Dubois");
    assert_eq!(
        admins[0].mandates,
        "FunctionCode 10, from 2019-05-01 until 2025-05-01"
    );
    assert_eq!(admins[1].name, "Pieter Claes");

    let participations = &tables.participations.as_ref().unwrap().rows;
    assert_eq!(participations.len(), 2);
    assert_eq!(participations[0].currency.as_deref(), Some("EUR"));
    assert_eq!(participations[1].nature.as_deref(), Some("Winstbewijzen"));
    let lines: Vec<_> = participations.iter().map(|row| row.line.as_deref()).collect();
    assert_eq!(lines, vec![Some("1"), Some("2")]);

    assert!(tables.shareholders.is_none());
    assert_eq!(tables.missing, vec!["shareholders: not found in 2024-00000001".to_string()]);

    assert_eq!(tables.failures.rows.len(), 1);
    assert_eq!(tables.failures.rows[0].reference_number, "2024-00000002");
}

#[test]
fn test_financial_table_csv() {
    let lookup = LineCodeTable::from_reader(LOOKUP.as_bytes()).unwrap();
    let tables = ReportTables::from_filings(
        &company(),
        &filing_set(),
        &[PeriodSymbol::Current, PeriodSymbol::Prior],
        &lookup,
        false,
    );

    assert_eq!(tables.financials.rows.len(), 4);
    let csv = tables.financials.export_to_string(ExportFormat::Csv).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "reference_number,enterprise_name,symbol,period_start,period_end,model_type,Omzet (70),Handelsvorderingen (40),Handelsschulden (44)"
    );
    assert_eq!(
        lines[1],
        "2023-00000001,ACME NV,N,2022-01-01,2022-12-31,full,1000,100,0"
    );
    assert_eq!(
        lines[2],
        "2023-00000001,ACME NV,NM1,2022-01-01,2022-12-31,full,800,0,0"
    );
}

#[test]
fn test_financial_table_with_metrics() {
    let lookup = LineCodeTable::from_reader(LOOKUP.as_bytes()).unwrap();
    let tables = ReportTables::from_filings(&company(), &filing_set(), &[PeriodSymbol::Current], &lookup, true);

    let row = &tables.financials.rows[0];
    assert_eq!(row.metrics.len(), 10);
    let dso = row.metrics.iter().find(|m| m.name == "dso").unwrap();
    assert_eq!(dso.value, Some(36.0));

    let csv = tables.financials.export_to_string(ExportFormat::Csv).unwrap();
    let header = csv.lines().next().unwrap();
    assert!(header.ends_with("ebit_margin,ebitda_margin,net_margin"));
    assert!(csv.contains("zero division"));

    let json = tables.financials.export_to_string(ExportFormat::Json).unwrap();
    assert!(json.contains(r#""skipped":"ZeroDivision""#));
}

#[test]
fn test_empty_set() {
    let lookup = LineCodeTable::from_reader(LOOKUP.as_bytes()).unwrap();
    let tables = ReportTables::from_filings(&company(), &FilingSet::new(), &[PeriodSymbol::Current], &lookup, true);
    assert!(tables.company_info.is_none());
    assert!(tables.financials.rows.is_empty());
    assert_eq!(tables.missing.len(), 1);
}

#[test]
fn test_write_dir() {
    let lookup = LineCodeTable::from_reader(LOOKUP.as_bytes()).unwrap();
    let tables = ReportTables::from_filings(&company(), &filing_set(), &[PeriodSymbol::Current], &lookup, false);

    let dir = std::env::temp_dir().join(format!("balans-output-test-{}", std::process::id()));
    let written = tables.write_dir(&dir, ExportFormat::Json).unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "company_info.json",
            "financials.json",
            "administrators.json",
            "participations.json",
            "failures.json"
        ]
    );

    let company_json = fs::read_to_string(dir.join("company_info.json")).unwrap();
    assert!(company_json.contains("\"ACME NV\""));

    // Clean up
    fs::remove_dir_all(dir).ok();
}
