//! Parsed JSON-XBRL filing documents.
//!
//! A detail document carries the company's identity at filing time, the
//! financial figures ("rubrics") for the current and prior year, and a few
//! optional qualitative sections. The qualitative sections are shaped
//! differently per filing type; they are parsed into explicit variants here so
//! downstream code never has to test for missing keys.

use super::references::{FilingReference, ModelType};
use super::wire::{self, de_entries, de_lenient, de_number, de_text};
use crate::error::{DataError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Column a figure belongs to within one filing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PeriodSymbol {
    /// Current financial year (`N`)
    Current,
    /// Prior financial year (`NM1`)
    Prior,
    /// Any other column tag
    Other(String),
}

impl PeriodSymbol {
    /// Registry tag for this column.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Current => "N",
            Self::Prior => "NM1",
            Self::Other(tag) => tag,
        }
    }
}

impl From<&str> for PeriodSymbol {
    fn from(tag: &str) -> Self {
        match tag.trim() {
            "N" => Self::Current,
            "NM1" => Self::Prior,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for PeriodSymbol {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<PeriodSymbol> for String {
    fn from(symbol: PeriodSymbol) -> Self {
        symbol.as_str().to_string()
    }
}

impl FromStr for PeriodSymbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for PeriodSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    /// Street name
    #[serde(default, deserialize_with = "de_text")]
    pub street: Option<String>,
    /// House number
    #[serde(default, deserialize_with = "de_text")]
    pub number: Option<String>,
    /// Box
    #[serde(default, deserialize_with = "de_text")]
    pub r#box: Option<String>,
    /// Postal code
    #[serde(default, deserialize_with = "de_text")]
    pub postal_code: Option<String>,
    /// City
    #[serde(default, deserialize_with = "de_text")]
    pub city: Option<String>,
    /// Country code
    #[serde(default, deserialize_with = "de_text")]
    pub country: Option<String>,
}

impl Address {
    /// Single-line address: street, number, box, postal code, city, country.
    pub fn formatted(&self) -> String {
        [
            &self.street,
            &self.number,
            &self.r#box,
            &self.postal_code,
            &self.city,
            &self.country,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Company or other legal entity named in a filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    /// Registered name
    pub name: String,
    /// Enterprise number or foreign identifier
    pub identifier: Option<String>,
    /// Registered address
    pub address: Option<Address>,
}

/// Natural person named in a filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    /// First name
    pub first_name: Option<String>,
    /// Last name
    pub last_name: String,
    /// Address
    pub address: Option<Address>,
}

impl Person {
    /// Full name in title case.
    pub fn display_name(&self) -> String {
        match &self.first_name {
            Some(first) => format!("{} {}", title_case(first), title_case(&self.last_name)),
            None => title_case(&self.last_name),
        }
    }
}

/// Mandate held by an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mandate {
    /// Function code (taxonomy prefix removed)
    pub function: String,
    /// Start of the mandate
    pub start: Option<NaiveDate>,
    /// End of the mandate
    pub end: Option<NaiveDate>,
}

impl fmt::Display for Mandate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = |d: Option<NaiveDate>| d.map_or_else(|| "NA".to_string(), |d| d.to_string());
        write!(
            f,
            "FunctionCode {}, from {} until {}",
            self.function,
            date(self.start),
            date(self.end)
        )
    }
}

/// Member of the board or other administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Administrator {
    /// A company acting as administrator through its representatives
    LegalPerson {
        /// The administrating company
        entity: Entity,
        /// Permanent representatives
        representatives: Vec<Person>,
        /// Mandates held
        mandates: Vec<Mandate>,
    },
    /// A natural person acting as administrator
    NaturalPerson {
        /// The administrator
        person: Person,
        /// Mandates held
        mandates: Vec<Mandate>,
    },
}

impl Administrator {
    /// Mandates held, whatever the variant.
    pub fn mandates(&self) -> &[Mandate] {
        match self {
            Self::LegalPerson { mandates, .. } | Self::NaturalPerson { mandates, .. } => mandates,
        }
    }
}

/// Shares held in one participating interest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterestHeld {
    /// Line in the participations table
    pub line: Option<String>,
    /// Nature of the shares
    pub nature: Option<String>,
    /// Number of shares
    pub number: Option<f64>,
    /// Percentage held directly
    pub percentage_directly_held: Option<f64>,
    /// Percentage held through subsidiaries
    pub percentage_subsidiaries: Option<f64>,
}

/// Company in which the filer holds a participating interest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipatingInterest {
    /// The participated company
    pub entity: Entity,
    /// Date of its latest annual accounts
    pub account_date: Option<NaiveDate>,
    /// Currency of its accounts
    pub currency: Option<String>,
    /// Its equity
    pub equity: Option<f64>,
    /// Its net result
    pub net_result: Option<f64>,
    /// Shares held
    pub holdings: Vec<InterestHeld>,
}

/// Declared shareholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shareholder {
    /// Shareholder that is a legal entity
    Entity {
        /// The shareholder
        entity: Entity,
        /// Nature of the shares
        nature: Option<String>,
        /// Number of shares
        number: Option<f64>,
    },
    /// Shareholder that is a natural person
    Individual {
        /// The shareholder
        person: Person,
        /// Nature of the shares
        nature: Option<String>,
        /// Number of shares
        number: Option<f64>,
    },
}

/// Key of one figure: line code and period column.
pub type LineKey = (String, PeriodSymbol);

/// Detail document of one filing.
#[derive(Debug, Clone, PartialEq)]
pub struct FilingRecord {
    /// Reference number of the filing
    pub reference_number: String,
    /// Company name at filing time
    pub enterprise_name: Option<String>,
    /// Company address at filing time
    pub address: Option<Address>,
    /// Legal form at filing time
    pub legal_form: Option<String>,
    /// Figures by line code and period column
    pub line_items: BTreeMap<LineKey, f64>,
    /// Administrators, when the filing has that section
    pub administrators: Option<Vec<Administrator>>,
    /// Participating interests, when the filing has that section
    pub participating_interests: Option<Vec<ParticipatingInterest>>,
    /// Shareholders, when the filing has that section
    pub shareholders: Option<Vec<Shareholder>>,
    /// Start of the accounting period (copied from the reference)
    pub period_start: Option<NaiveDate>,
    /// End of the accounting period (copied from the reference)
    pub period_end: Option<NaiveDate>,
    /// Accounting schema (copied from the reference)
    pub model_type: Option<ModelType>,
    /// NACE activity code (copied from the reference)
    pub activity_code: Option<String>,
}

impl FilingRecord {
    /// Parse a JSON-XBRL detail document.
    ///
    /// Entries of the qualitative sections that lack required fields are
    /// skipped with a warning.
    ///
    /// # Errors
    /// Returns an error when the body is not JSON or has no reference number.
    pub fn parse(json: &str) -> Result<Self> {
        let raw: RawDocument = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Copy period bounds and classification from the originating reference.
    ///
    /// The detail document does not repeat them.
    pub fn with_reference(mut self, reference: &FilingReference) -> Self {
        self.period_start = reference.period_start;
        self.period_end = reference.period_end;
        self.model_type.clone_from(&reference.model_type);
        self.activity_code.clone_from(&reference.activity_code);
        if self.legal_form.is_none() {
            self.legal_form.clone_from(&reference.legal_form);
        }
        if self.enterprise_name.is_none() {
            self.enterprise_name.clone_from(&reference.enterprise_name);
        }
        self
    }

    /// Value of a line code in a period column.
    pub fn value(&self, code: &str, symbol: &PeriodSymbol) -> Option<f64> {
        self.line_items
            .get(&(code.to_string(), symbol.clone()))
            .copied()
    }

    /// Period columns present in this filing.
    pub fn symbols(&self) -> BTreeSet<&PeriodSymbol> {
        self.line_items.keys().map(|(_, symbol)| symbol).collect()
    }

    /// Figures of one period column, keyed by line code.
    pub fn figures_for(&self, symbol: &PeriodSymbol) -> BTreeMap<String, f64> {
        self.line_items
            .iter()
            .filter(|((_, s), _)| s == symbol)
            .map(|((code, _), value)| (code.clone(), *value))
            .collect()
    }

    /// Length of the accounting period in days.
    pub fn period_days(&self) -> Option<i64> {
        match (self.period_start, self.period_end) {
            (Some(start), Some(end)) => Some(end.signed_duration_since(start).num_days()),
            _ => None,
        }
    }
}

/// Title-case a name the way registry names are displayed: the first letter
/// of every alphabetic run is upper case, the rest lower case.
pub(crate) fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut previous_alpha = false;
    for c in name.trim().chars() {
        if previous_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_alpha = c.is_alphabetic();
    }
    out
}

// ---- wire format ----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawDocument {
    #[serde(default, deserialize_with = "de_text")]
    reference_number: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    enterprise_name: Option<String>,
    #[serde(default, deserialize_with = "de_lenient")]
    address: Option<Address>,
    #[serde(default, deserialize_with = "de_text")]
    legal_form: Option<String>,
    #[serde(default, deserialize_with = "de_entries")]
    rubrics: Vec<RawRubric>,
    // Qualitative sections vary per filing type; they are converted one by
    // one so a bad section never costs the figures.
    #[serde(default)]
    administrators: Option<Value>,
    #[serde(default)]
    participating_interests: Option<Value>,
    #[serde(default)]
    shareholders: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawRubric {
    #[serde(default, deserialize_with = "de_text")]
    code: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    period: Option<String>,
    #[serde(default, deserialize_with = "de_number")]
    value: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawEntity {
    #[serde(default, deserialize_with = "de_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    identifier: Option<String>,
    #[serde(default, deserialize_with = "de_lenient")]
    address: Option<Address>,
}

impl RawEntity {
    fn into_entity(self) -> Option<Entity> {
        Some(Entity {
            name: self.name?,
            identifier: self.identifier,
            address: self.address,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawPerson {
    #[serde(default, deserialize_with = "de_text")]
    first_name: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    last_name: Option<String>,
    #[serde(default, deserialize_with = "de_lenient")]
    address: Option<Address>,
}

impl RawPerson {
    fn into_person(self) -> Option<Person> {
        Some(Person {
            first_name: self.first_name,
            last_name: self.last_name?,
            address: self.address,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawMandate {
    #[serde(default, deserialize_with = "de_text")]
    function_mandate: Option<String>,
    #[serde(default, deserialize_with = "de_lenient")]
    mandate_dates: Option<RawMandateDates>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawMandateDates {
    #[serde(default, deserialize_with = "de_text")]
    start_date: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    end_date: Option<String>,
}

impl RawMandate {
    fn into_mandate(self) -> Option<Mandate> {
        let dates = self.mandate_dates.unwrap_or_default();
        Some(Mandate {
            function: self.function_mandate?,
            start: dates.start_date.as_deref().and_then(wire::parse_date),
            end: dates.end_date.as_deref().and_then(wire::parse_date),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawAdministrators {
    #[serde(default, deserialize_with = "de_entries")]
    legal_persons: Vec<RawLegalPerson>,
    #[serde(default, deserialize_with = "de_entries")]
    natural_persons: Vec<RawNaturalPerson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawLegalPerson {
    #[serde(default, deserialize_with = "de_lenient")]
    entity: Option<RawEntity>,
    #[serde(default, deserialize_with = "de_entries")]
    representatives: Vec<RawPerson>,
    #[serde(default, deserialize_with = "de_entries")]
    mandates: Vec<RawMandate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawNaturalPerson {
    #[serde(default, deserialize_with = "de_lenient")]
    person: Option<RawPerson>,
    #[serde(default, deserialize_with = "de_entries")]
    mandates: Vec<RawMandate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawParticipatingInterest {
    #[serde(default, deserialize_with = "de_lenient")]
    entity: Option<RawEntity>,
    #[serde(default, deserialize_with = "de_text")]
    account_date: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    currency: Option<String>,
    #[serde(default, deserialize_with = "de_number")]
    equity: Option<f64>,
    #[serde(default, deserialize_with = "de_number")]
    net_result: Option<f64>,
    #[serde(default, deserialize_with = "de_entries")]
    participating_interest_held: Vec<RawInterestHeld>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawInterestHeld {
    #[serde(default, deserialize_with = "de_text")]
    line: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    nature: Option<String>,
    #[serde(default, deserialize_with = "de_number")]
    number: Option<f64>,
    #[serde(default, deserialize_with = "de_number")]
    percentage_directly_held: Option<f64>,
    #[serde(default, deserialize_with = "de_number")]
    percentage_subsidiaries: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawShareholders {
    #[serde(default, rename = "EntityShareHolders", deserialize_with = "de_entries")]
    entity_shareholders: Vec<RawShareholder>,
    #[serde(default, rename = "IndividualShareHolders", deserialize_with = "de_entries")]
    individual_shareholders: Vec<RawShareholder>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawShareholder {
    #[serde(default, deserialize_with = "de_lenient")]
    entity: Option<RawEntity>,
    #[serde(default, deserialize_with = "de_lenient")]
    person: Option<RawPerson>,
    #[serde(default, deserialize_with = "de_text")]
    nature: Option<String>,
    #[serde(default, deserialize_with = "de_number")]
    number: Option<f64>,
}

impl TryFrom<RawDocument> for FilingRecord {
    type Error = DataError;

    fn try_from(raw: RawDocument) -> Result<Self> {
        let reference_number = raw
            .reference_number
            .ok_or_else(|| DataError::Parse("document has no ReferenceNumber".to_string()))?;

        let mut line_items = BTreeMap::new();
        for rubric in raw.rubrics {
            match (rubric.code, rubric.period, rubric.value) {
                (Some(code), Some(period), Some(value)) => {
                    line_items.insert((code, PeriodSymbol::from(period)), value);
                }
                (code, period, _) => tracing::debug!(
                    reference = %reference_number,
                    ?code,
                    ?period,
                    "skipping rubric without code, period or numeric value"
                ),
            }
        }

        let _span = tracing::info_span!("filing", reference = %reference_number).entered();

        let administrators = raw
            .administrators
            .and_then(|value| wire::section(value, "Administrators"))
            .map(|section| parse_administrators(section, &reference_number));
        let participating_interests = raw
            .participating_interests
            .and_then(|value| wire::section_entries(value, "ParticipatingInterests"))
            .map(|section| parse_participations(section, &reference_number));
        let shareholders = raw
            .shareholders
            .and_then(|value| wire::section(value, "Shareholders"))
            .map(|section| parse_shareholders(section, &reference_number));

        Ok(Self {
            reference_number,
            enterprise_name: raw.enterprise_name,
            address: raw.address,
            legal_form: raw.legal_form,
            line_items,
            administrators,
            participating_interests,
            shareholders,
            period_start: None,
            period_end: None,
            model_type: None,
            activity_code: None,
        })
    }
}

fn parse_mandates(raw: Vec<RawMandate>) -> Vec<Mandate> {
    raw.into_iter().filter_map(RawMandate::into_mandate).collect()
}

fn parse_administrators(section: RawAdministrators, reference: &str) -> Vec<Administrator> {
    let mut admins = Vec::new();

    for legal in section.legal_persons {
        let Some(entity) = legal.entity.and_then(RawEntity::into_entity) else {
            tracing::warn!(reference, "skipping legal-person administrator without entity name");
            continue;
        };
        admins.push(Administrator::LegalPerson {
            entity,
            representatives: legal
                .representatives
                .into_iter()
                .filter_map(RawPerson::into_person)
                .collect(),
            mandates: parse_mandates(legal.mandates),
        });
    }

    for natural in section.natural_persons {
        let Some(person) = natural.person.and_then(RawPerson::into_person) else {
            tracing::warn!(reference, "skipping natural-person administrator without last name");
            continue;
        };
        admins.push(Administrator::NaturalPerson {
            person,
            mandates: parse_mandates(natural.mandates),
        });
    }

    admins
}

fn parse_participations(
    section: Vec<RawParticipatingInterest>,
    reference: &str,
) -> Vec<ParticipatingInterest> {
    section
        .into_iter()
        .filter_map(|raw| {
            let Some(entity) = raw.entity.and_then(RawEntity::into_entity) else {
                tracing::warn!(reference, "skipping participating interest without entity name");
                return None;
            };
            Some(ParticipatingInterest {
                entity,
                account_date: raw.account_date.as_deref().and_then(wire::parse_date),
                currency: raw.currency,
                equity: raw.equity,
                net_result: raw.net_result,
                holdings: raw
                    .participating_interest_held
                    .into_iter()
                    .map(|held| InterestHeld {
                        line: held.line,
                        nature: held.nature,
                        number: held.number,
                        percentage_directly_held: held.percentage_directly_held,
                        percentage_subsidiaries: held.percentage_subsidiaries,
                    })
                    .collect(),
            })
        })
        .collect()
}

fn parse_shareholders(section: RawShareholders, reference: &str) -> Vec<Shareholder> {
    let entities = section.entity_shareholders.into_iter().filter_map(|raw| {
        let entity = raw.entity.and_then(RawEntity::into_entity);
        if entity.is_none() {
            tracing::warn!(reference, "skipping entity shareholder without name");
        }
        Some(Shareholder::Entity {
            entity: entity?,
            nature: raw.nature,
            number: raw.number,
        })
    });

    let individuals = section.individual_shareholders.into_iter().filter_map(|raw| {
        let person = raw.person.and_then(RawPerson::into_person);
        if person.is_none() {
            tracing::warn!(reference, "skipping individual shareholder without last name");
        }
        Some(Shareholder::Individual {
            person: person?,
            nature: raw.nature,
            number: raw.number,
        })
    });

    entities.chain(individuals).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "ReferenceNumber": "2024-00091714",
        "EnterpriseName": "DREAMLAND",
        "Address": {
            "Street": "Brusselsesteenweg",
            "Number": "12",
            "Box": null,
            "PostalCode": "pcd:m2800",
            "City": "Mechelen",
            "Country": "cty:mBE"
        },
        "LegalForm": {"Code": "lgf:m610"},
        "Rubrics": [
            {"Code": "70", "Period": "N", "Value": "1500000.50"},
            {"Code": "70", "Period": "NM1", "Value": 1400000},
            {"Code": "40", "Period": "N", "Value": "250000"},
            {"Code": "9903", "Period": "N", "Value": null}
        ],
        "Administrators": {
            "LegalPersons": [
                {
                    "Entity": {"Name": "HOLDCO NV", "Identifier": "0123456789", "Address": {"City": "Gent"}},
                    "Representatives": [{"FirstName": "JAN", "LastName": "PEETERS", "Address": null}],
                    "Mandates": [{"FunctionMandate": "fct:m10", "MandateDates": {"StartDate": "2020-06-01"}}]
                },
                {"Entity": null, "Representatives": [], "Mandates": []}
            ],
            "NaturalPersons": [
                {
                    "Person": {"FirstName": "an", "LastName": "de smet-janssens"},
                    "Mandates": []
                }
            ]
        },
        "ParticipatingInterests": [
            {
                "Entity": {"Name": "SUBCO BV", "Identifier": "0987654321"},
                "AccountDate": "2023-12-31",
                "Currency": "ccy:mEUR",
                "Equity": "500000",
                "NetResult": -2500.5,
                "ParticipatingInterestHeld": [
                    {"Line": "1", "Nature": "Aandelen", "Number": 100, "PercentageDirectlyHeld": "99.0", "PercentageSubsidiaries": 1}
                ]
            }
        ],
        "Shareholders": {
            "EntityShareHolders": [{"Entity": {"Name": "PARENT SA"}, "Nature": "Aandelen", "Number": "1000"}],
            "IndividualShareHolders": null
        }
    }"#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_identity() {
        let record = FilingRecord::parse(DOCUMENT).unwrap();
        assert_eq!(record.reference_number, "2024-00091714");
        assert_eq!(record.enterprise_name.as_deref(), Some("DREAMLAND"));
        assert_eq!(record.legal_form.as_deref(), Some("610"));
        assert_eq!(
            record.address.as_ref().unwrap().formatted(),
            "Brusselsesteenweg 12 2800 Mechelen BE"
        );
    }

    #[test]
    fn test_parse_line_items() {
        let record = FilingRecord::parse(DOCUMENT).unwrap();
        assert_eq!(record.line_items.len(), 3);
        assert_eq!(record.value("70", &PeriodSymbol::Current), Some(1_500_000.5));
        assert_eq!(record.value("70", &PeriodSymbol::Prior), Some(1_400_000.0));
        assert_eq!(record.value("9903", &PeriodSymbol::Current), None);

        let symbols = record.symbols();
        assert!(symbols.contains(&PeriodSymbol::Current));
        assert!(symbols.contains(&PeriodSymbol::Prior));

        let current = record.figures_for(&PeriodSymbol::Current);
        assert_eq!(current.len(), 2);
        assert_eq!(current.get("40"), Some(&250_000.0));
    }

    #[test]
    fn test_parse_administrators() {
        let record = FilingRecord::parse(DOCUMENT).unwrap();
        let admins = record.administrators.unwrap();
        // the legal person without entity is skipped
        assert_eq!(admins.len(), 2);

        match &admins[0] {
            Administrator::LegalPerson {
                entity,
                representatives,
                mandates,
            } => {
                assert_eq!(entity.name, "HOLDCO NV");
                assert_eq!(representatives[0].display_name(), "Jan Peeters");
                assert_eq!(mandates[0].function, "10");
                assert_eq!(mandates[0].start, Some(date(2020, 6, 1)));
                assert_eq!(
                    mandates[0].to_string(),
                    "FunctionCode 10, from 2020-06-01 until NA"
                );
            }
            other => panic!("expected legal person, got {other:?}"),
        }

        match &admins[1] {
            Administrator::NaturalPerson { person, mandates } => {
                assert_eq!(person.display_name(), "An De Smet-Janssens");
                assert!(mandates.is_empty());
            }
            other => panic!("expected natural person, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_participations_and_shareholders() {
        let record = FilingRecord::parse(DOCUMENT).unwrap();

        let participations = record.participating_interests.unwrap();
        assert_eq!(participations.len(), 1);
        let p = &participations[0];
        assert_eq!(p.entity.name, "SUBCO BV");
        assert_eq!(p.currency.as_deref(), Some("EUR"));
        assert_eq!(p.equity, Some(500_000.0));
        assert_eq!(p.net_result, Some(-2500.5));
        assert_eq!(p.account_date, Some(date(2023, 12, 31)));
        assert_eq!(p.holdings[0].percentage_directly_held, Some(99.0));

        let shareholders = record.shareholders.unwrap();
        assert_eq!(shareholders.len(), 1);
        assert!(matches!(
            &shareholders[0],
            Shareholder::Entity { entity, number: Some(n), .. } if entity.name == "PARENT SA" && *n == 1000.0
        ));
    }

    #[test]
    fn test_missing_sections_are_none() {
        let record = FilingRecord::parse(r#"{"ReferenceNumber": "2023-1", "Rubrics": null}"#).unwrap();
        assert!(record.line_items.is_empty());
        assert!(record.administrators.is_none());
        assert!(record.participating_interests.is_none());
        assert!(record.shareholders.is_none());
    }

    const FIGURES: &str = r#""ReferenceNumber": "2023-00000077",
        "Rubrics": [
            {"Code": "70", "Period": "N", "Value": 900},
            "not a rubric",
            {"Code": "40", "Period": "N", "Value": 90}
        ]"#;

    #[test]
    fn test_section_of_wrong_shape_keeps_figures() {
        let json = format!(
            r#"{{{FIGURES},
                "Address": "Somewhere 1",
                "Administrators": ["unexpected"],
                "ParticipatingInterests": "none",
                "Shareholders": {{"EntityShareHolders": 12}}
            }}"#
        );
        let record = FilingRecord::parse(&json).unwrap();

        assert_eq!(record.value("70", &PeriodSymbol::Current), Some(900.0));
        assert_eq!(record.value("40", &PeriodSymbol::Current), Some(90.0));
        assert!(record.address.is_none());
        assert!(record.administrators.is_none());
        assert!(record.participating_interests.is_none());
        // a readable section with an unreadable list is present but empty
        assert_eq!(record.shareholders, Some(Vec::new()));
    }

    #[test]
    fn test_single_participation_object() {
        let json = format!(
            r#"{{{FIGURES},
                "ParticipatingInterests": {{"Entity": {{"Name": "LONE BV"}}, "Currency": "ccy:mEUR"}}
            }}"#
        );
        let record = FilingRecord::parse(&json).unwrap();

        let participations = record.participating_interests.unwrap();
        assert_eq!(participations.len(), 1);
        assert_eq!(participations[0].entity.name, "LONE BV");
        assert_eq!(record.line_items.len(), 2);
    }

    #[test]
    fn test_bad_entries_are_skipped() {
        let json = format!(
            r#"{{{FIGURES},
                "Administrators": {{
                    "NaturalPersons": [
                        {{"Person": {{"LastName": "MAES"}}, "Mandates": [{{"FunctionMandate": "fct:m10", "MandateDates": "2020-01-01"}}]}},
                        42,
                        {{"Person": "VERMEULEN"}}
                    ]
                }},
                "ParticipatingInterests": [
                    "junk",
                    {{"Entity": {{"Name": "SUBCO BV"}}, "ParticipatingInterestHeld": {{"Line": "2", "Nature": "Aandelen"}}}}
                ]
            }}"#
        );
        let record = FilingRecord::parse(&json).unwrap();
        assert_eq!(record.line_items.len(), 2);

        let admins = record.administrators.unwrap();
        assert_eq!(admins.len(), 1);
        match &admins[0] {
            Administrator::NaturalPerson { person, mandates } => {
                assert_eq!(person.last_name, "MAES");
                assert_eq!(mandates[0].function, "10");
                assert_eq!(mandates[0].start, None);
            }
            other => panic!("expected natural person, got {other:?}"),
        }

        let participations = record.participating_interests.unwrap();
        assert_eq!(participations.len(), 1);
        assert_eq!(participations[0].holdings[0].line.as_deref(), Some("2"));
    }

    #[test]
    fn test_missing_reference_number() {
        let result = FilingRecord::parse(r#"{"EnterpriseName": "X"}"#);
        assert!(matches!(result, Err(DataError::Parse(_))));

        let result = FilingRecord::parse("<xbrl/>");
        assert!(matches!(result, Err(DataError::Serialization(_))));
    }

    #[test]
    fn test_with_reference_copies_metadata() {
        let reference = FilingReference::new("2024-00091714")
            .with_period(date(2023, 1, 1), date(2023, 12, 31))
            .with_model_type(ModelType::Full)
            .with_activity_code("41101");

        let record = FilingRecord::parse(DOCUMENT)
            .unwrap()
            .with_reference(&reference);
        assert_eq!(record.period_end, Some(date(2023, 12, 31)));
        assert_eq!(record.period_days(), Some(364));
        assert_eq!(record.model_type, Some(ModelType::Full));
        assert_eq!(record.activity_code.as_deref(), Some("41101"));
    }

    #[test]
    fn test_period_symbol_round_trip() {
        assert_eq!(PeriodSymbol::from("N"), PeriodSymbol::Current);
        assert_eq!(PeriodSymbol::from("NM1"), PeriodSymbol::Prior);
        assert_eq!(PeriodSymbol::from("NM2").as_str(), "NM2");
        assert_eq!("NM1".parse::<PeriodSymbol>().unwrap().to_string(), "NM1");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("JAN"), "Jan");
        assert_eq!(title_case("van den broeck"), "Van Den Broeck");
        assert_eq!(title_case("o'NEILL"), "O'Neill");
    }
}
