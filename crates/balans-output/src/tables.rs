//! Report tables built from fetched filings.
//!
//! The qualitative tables (company info, administrators, participating
//! interests, shareholders) describe the latest filing. The financial table
//! holds one row per filing and period column, with one column per line label
//! of the [`LineCodeTable`].

use crate::export::{ExportError, ExportFormat, Exporter, csv_into_string, export_rows};
use balans_data::cbso::{Administrator, Entity, FilingRecord, Person, PeriodSymbol, Shareholder};
use balans_data::{CompanyNumber, FilingSet, LineCodeTable, PeriodFigures, financial_rows};
use balans_metrics::{MetricOutcome, SkipReason, compute_all};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Identity of the company at its latest filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyInfoRow {
    /// Enterprise number, `BE dddd.ddd.ddd`
    pub company_number: String,
    /// Reference number of the latest filing
    pub reference_number: String,
    /// Company name
    pub enterprise_name: Option<String>,
    /// Formatted address
    pub address: Option<String>,
    /// Legal form code
    pub legal_form: Option<String>,
    /// NACE activity code
    pub activity_code: Option<String>,
    /// Accounting schema
    pub model_type: Option<String>,
    /// Start of the latest accounting period
    pub period_start: Option<NaiveDate>,
    /// End of the latest accounting period
    pub period_end: Option<NaiveDate>,
}

/// Company identity table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompanyInfoTable {
    /// Rows
    pub rows: Vec<CompanyInfoRow>,
}

/// One administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdministratorRow {
    /// `legal_person` or `natural_person`
    pub kind: &'static str,
    /// Company name or person's full name
    pub name: String,
    /// Enterprise number of a legal person
    pub identifier: Option<String>,
    /// Formatted address
    pub address: Option<String>,
    /// Permanent representatives, `; `-separated
    pub representatives: String,
    /// Mandates, `; `-separated
    pub mandates: String,
}

/// Administrators of the latest filing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdministratorTable {
    /// Rows
    pub rows: Vec<AdministratorRow>,
}

/// One holding in a participated company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipationRow {
    /// Participated company
    pub name: String,
    /// Its enterprise number
    pub identifier: Option<String>,
    /// Its formatted address
    pub address: Option<String>,
    /// Date of its latest accounts
    pub account_date: Option<NaiveDate>,
    /// Currency of its accounts
    pub currency: Option<String>,
    /// Its equity
    pub equity: Option<f64>,
    /// Its net result
    pub net_result: Option<f64>,
    /// Line of the holding in the participations table
    pub line: Option<String>,
    /// Nature of the shares held
    pub nature: Option<String>,
    /// Number of shares held
    pub number: Option<f64>,
    /// Percentage held directly
    pub percentage_directly_held: Option<f64>,
    /// Percentage held through subsidiaries
    pub percentage_subsidiaries: Option<f64>,
}

/// Participating interests of the latest filing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParticipationTable {
    /// Rows
    pub rows: Vec<ParticipationRow>,
}

/// One shareholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareholderRow {
    /// `entity` or `individual`
    pub kind: &'static str,
    /// Name of the shareholder
    pub name: String,
    /// Enterprise number of an entity
    pub identifier: Option<String>,
    /// Formatted address
    pub address: Option<String>,
    /// Nature of the shares
    pub nature: Option<String>,
    /// Number of shares
    pub number: Option<f64>,
}

/// Shareholders of the latest filing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShareholderTable {
    /// Rows
    pub rows: Vec<ShareholderRow>,
}

/// Value of one line label in a financial row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineValue {
    /// Report label
    pub label: String,
    /// Registry line code
    pub code: String,
    /// Value, zero when the filing omits the code
    pub value: f64,
}

/// Outcome of one metric in a financial row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricValue {
    /// Metric name
    pub name: String,
    /// Value when computable
    pub value: Option<f64>,
    /// Reason when not computable
    pub skipped: Option<SkipReason>,
}

impl MetricValue {
    fn new(name: &str, outcome: MetricOutcome) -> Self {
        Self {
            name: name.to_string(),
            value: outcome.value(),
            skipped: outcome.skip_reason(),
        }
    }

    fn cell(&self) -> String {
        match (self.value, self.skipped) {
            (Some(v), _) => v.to_string(),
            (None, Some(reason)) => reason.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Figures of one filing for one period column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialRow {
    /// Reference number of the filing
    pub reference_number: String,
    /// Company name at filing time
    pub enterprise_name: Option<String>,
    /// Period column
    pub symbol: String,
    /// Start of the accounting period
    pub period_start: Option<NaiveDate>,
    /// End of the accounting period
    pub period_end: Option<NaiveDate>,
    /// Accounting schema
    pub model_type: Option<String>,
    /// Line values in lookup-table order
    pub lines: Vec<LineValue>,
    /// Metric outcomes, empty unless requested
    pub metrics: Vec<MetricValue>,
}

impl FinancialRow {
    fn new(figures: &PeriodFigures, lookup: &LineCodeTable, with_metrics: bool) -> Self {
        let lines = lookup
            .iter()
            .map(|(label, code)| LineValue {
                label: label.to_string(),
                code: code.to_string(),
                value: figures.value(code),
            })
            .collect();

        let metrics = if with_metrics {
            compute_all(figures)
                .into_iter()
                .map(|(name, outcome)| MetricValue::new(name, outcome))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            reference_number: figures.reference_number.clone(),
            enterprise_name: figures.enterprise_name.clone(),
            symbol: figures.symbol.to_string(),
            period_start: figures.period_start,
            period_end: figures.period_end,
            model_type: figures.model_type.as_ref().map(|m| m.as_str().to_string()),
            lines,
            metrics,
        }
    }
}

/// Wide financial table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinancialTable {
    /// Rows, by reference number then period column
    pub rows: Vec<FinancialRow>,
}

impl FinancialTable {
    /// Build rows for every fetched record and requested period column.
    pub fn from_filings(
        set: &FilingSet,
        symbols: &[PeriodSymbol],
        lookup: &LineCodeTable,
        with_metrics: bool,
    ) -> Self {
        let rows = financial_rows(set, symbols)
            .iter()
            .map(|figures| FinancialRow::new(figures, lookup, with_metrics))
            .collect();
        Self { rows }
    }

    /// Column headers of the CSV form.
    pub fn headers(&self) -> Vec<String> {
        let mut headers: Vec<String> = [
            "reference_number",
            "enterprise_name",
            "symbol",
            "period_start",
            "period_end",
            "model_type",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        if let Some(first) = self.rows.first() {
            headers.extend(first.lines.iter().map(|line| line.label.clone()));
            headers.extend(first.metrics.iter().map(|metric| metric.name.clone()));
        }
        headers
    }
}

/// A filing that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRow {
    /// Reference number
    pub reference_number: String,
    /// What went wrong
    pub error: String,
}

/// Filings that could not be fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FailureTable {
    /// Rows
    pub rows: Vec<FailureRow>,
}

fn optional_text(value: Option<&NaiveDate>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

macro_rules! impl_row_exporter {
    ($($table:ty),* $(,)?) => {
        $(
            impl Exporter for $table {
                fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
                    export_rows(&self.rows, format)
                }
            }
        )*
    };
}

impl_row_exporter!(
    CompanyInfoTable,
    AdministratorTable,
    ParticipationTable,
    ShareholderTable,
    FailureTable,
);

impl Exporter for FinancialTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                wtr.write_record(self.headers())?;
                for row in &self.rows {
                    let mut record = vec![
                        row.reference_number.clone(),
                        row.enterprise_name.clone().unwrap_or_default(),
                        row.symbol.clone(),
                        optional_text(row.period_start.as_ref()),
                        optional_text(row.period_end.as_ref()),
                        row.model_type.clone().unwrap_or_default(),
                    ];
                    record.extend(row.lines.iter().map(|line| line.value.to_string()));
                    record.extend(row.metrics.iter().map(MetricValue::cell));
                    wtr.write_record(&record)?;
                }
                csv_into_string(wtr)
            }
            ExportFormat::Json => Ok(serde_json::to_string(&self.rows)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(&self.rows)?),
        }
    }
}

fn entity_fields(entity: &Entity) -> (String, Option<String>, Option<String>) {
    (
        entity.name.clone(),
        entity.identifier.clone(),
        entity.address.as_ref().map(|a| a.formatted()),
    )
}

fn person_fields(person: &Person) -> (String, Option<String>) {
    (
        person.display_name(),
        person.address.as_ref().map(|a| a.formatted()),
    )
}

fn administrator_row(admin: &Administrator) -> AdministratorRow {
    let mandates = admin
        .mandates()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");

    match admin {
        Administrator::LegalPerson {
            entity,
            representatives,
            ..
        } => {
            let (name, identifier, address) = entity_fields(entity);
            AdministratorRow {
                kind: "legal_person",
                name,
                identifier,
                address,
                representatives: representatives
                    .iter()
                    .map(Person::display_name)
                    .collect::<Vec<_>>()
                    .join("; "),
                mandates,
            }
        }
        Administrator::NaturalPerson { person, .. } => {
            let (name, address) = person_fields(person);
            AdministratorRow {
                kind: "natural_person",
                name,
                identifier: None,
                address,
                representatives: String::new(),
                mandates,
            }
        }
    }
}

fn shareholder_row(shareholder: &Shareholder) -> ShareholderRow {
    match shareholder {
        Shareholder::Entity {
            entity,
            nature,
            number,
        } => {
            let (name, identifier, address) = entity_fields(entity);
            ShareholderRow {
                kind: "entity",
                name,
                identifier,
                address,
                nature: nature.clone(),
                number: *number,
            }
        }
        Shareholder::Individual {
            person,
            nature,
            number,
        } => {
            let (name, address) = person_fields(person);
            ShareholderRow {
                kind: "individual",
                name,
                identifier: None,
                address,
                nature: nature.clone(),
                number: *number,
            }
        }
    }
}

fn participation_table(record: &FilingRecord) -> Option<ParticipationTable> {
    let interests = record.participating_interests.as_ref()?;
    let mut rows = Vec::new();

    for interest in interests {
        let (name, identifier, address) = entity_fields(&interest.entity);
        let base = ParticipationRow {
            name,
            identifier,
            address,
            account_date: interest.account_date,
            currency: interest.currency.clone(),
            equity: interest.equity,
            net_result: interest.net_result,
            line: None,
            nature: None,
            number: None,
            percentage_directly_held: None,
            percentage_subsidiaries: None,
        };

        if interest.holdings.is_empty() {
            rows.push(base);
            continue;
        }
        rows.extend(interest.holdings.iter().map(|held| ParticipationRow {
            line: held.line.clone(),
            nature: held.nature.clone(),
            number: held.number,
            percentage_directly_held: held.percentage_directly_held,
            percentage_subsidiaries: held.percentage_subsidiaries,
            ..base.clone()
        }));
    }

    Some(ParticipationTable { rows })
}

/// Every report table for one company.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportTables {
    /// Company identity, from the latest filing
    pub company_info: Option<CompanyInfoTable>,
    /// Administrators, when the latest filing has them
    pub administrators: Option<AdministratorTable>,
    /// Participating interests, when the latest filing has them
    pub participations: Option<ParticipationTable>,
    /// Shareholders, when the latest filing has them
    pub shareholders: Option<ShareholderTable>,
    /// Financial figures of every fetched filing
    pub financials: FinancialTable,
    /// Filings that could not be fetched
    pub failures: FailureTable,
    /// Tables that could not be built, with the reference they were looked
    /// for in
    pub missing: Vec<String>,
}

impl ReportTables {
    /// Build every table from a set of fetched filings.
    ///
    /// # Arguments
    /// * `company` - Company the filings belong to
    /// * `set` - Fetched filings and per-filing failures
    /// * `symbols` - Period columns to include in the financial table
    /// * `lookup` - Line labels and codes, in column order
    /// * `with_metrics` - Append derived metric columns
    pub fn from_filings(
        company: &CompanyNumber,
        set: &FilingSet,
        symbols: &[PeriodSymbol],
        lookup: &LineCodeTable,
        with_metrics: bool,
    ) -> Self {
        let mut tables = Self {
            financials: FinancialTable::from_filings(set, symbols, lookup, with_metrics),
            failures: FailureTable {
                rows: set
                    .failures()
                    .map(|(reference, error)| FailureRow {
                        reference_number: reference.to_string(),
                        error: error.to_string(),
                    })
                    .collect(),
            },
            ..Self::default()
        };

        let Some(latest) = set.latest() else {
            tables.missing.push("company info: no filing fetched".to_string());
            return tables;
        };
        let reference = &latest.reference_number;

        tables.company_info = Some(CompanyInfoTable {
            rows: vec![CompanyInfoRow {
                company_number: company.display_prefixed(),
                reference_number: reference.clone(),
                enterprise_name: latest.enterprise_name.clone(),
                address: latest.address.as_ref().map(|a| a.formatted()),
                legal_form: latest.legal_form.clone(),
                activity_code: latest.activity_code.clone(),
                model_type: latest.model_type.as_ref().map(|m| m.as_str().to_string()),
                period_start: latest.period_start,
                period_end: latest.period_end,
            }],
        });

        tables.administrators = latest.administrators.as_ref().map(|admins| AdministratorTable {
            rows: admins.iter().map(administrator_row).collect(),
        });
        tables.participations = participation_table(latest);
        tables.shareholders = latest.shareholders.as_ref().map(|holders| ShareholderTable {
            rows: holders.iter().map(shareholder_row).collect(),
        });

        for (name, present) in [
            ("administrators", tables.administrators.is_some()),
            ("participating interests", tables.participations.is_some()),
            ("shareholders", tables.shareholders.is_some()),
        ] {
            if !present {
                tracing::info!(reference = %reference, table = name, "section not in filing");
                tables.missing.push(format!("{name}: not found in {reference}"));
            }
        }

        tables
    }

    /// Write one file per available table into `dir`.
    ///
    /// The directory is created if needed. The failures table is only
    /// written when a filing failed.
    ///
    /// # Returns
    /// Paths of the files written.
    ///
    /// # Errors
    /// Returns an error if the directory or a file cannot be written.
    pub fn write_dir(&self, dir: &Path, format: ExportFormat) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(dir)?;

        let mut tables: Vec<(&str, &dyn Exporter)> = Vec::new();
        if let Some(table) = &self.company_info {
            tables.push(("company_info", table));
        }
        tables.push(("financials", &self.financials));
        if let Some(table) = &self.administrators {
            tables.push(("administrators", table));
        }
        if let Some(table) = &self.participations {
            tables.push(("participations", table));
        }
        if let Some(table) = &self.shareholders {
            tables.push(("shareholders", table));
        }
        if !self.failures.rows.is_empty() {
            tables.push(("failures", &self.failures));
        }

        let mut written = Vec::with_capacity(tables.len());
        for (name, table) in tables {
            let path = dir.join(format!("{name}.{}", format.extension()));
            table.export_to_file(&path, format)?;
            tracing::debug!(path = %path.display(), "table written");
            written.push(path);
        }
        Ok(written)
    }
}
