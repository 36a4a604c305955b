//! Line-code lookup table.
//!
//! The registry tags every financial figure with a line code (`70` for
//! turnover, `40` for trade receivables, ...). [`LineCodeTable`] maps the
//! human-readable labels used in reports onto those codes. The default table
//! is embedded in the crate and can be replaced by a CSV file with a
//! `label,code` header.

use crate::error::{DataError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const EMBEDDED_TABLE: &str = include_str!("../data/line_codes.csv");

#[derive(Debug, Deserialize)]
struct LineCodeRow {
    label: String,
    code: String,
}

/// Ordered mapping from report labels to registry line codes.
#[derive(Debug, Clone)]
pub struct LineCodeTable {
    entries: Vec<(String, String)>,
    by_label: HashMap<String, usize>,
    by_code: HashMap<String, usize>,
}

impl LineCodeTable {
    /// Table shipped with the crate.
    ///
    /// # Errors
    /// Only fails if the embedded CSV is malformed.
    pub fn embedded() -> Result<Self> {
        Self::from_reader(EMBEDDED_TABLE.as_bytes())
    }

    /// Load a table from a CSV file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a table from any CSV source with a `label,code` header.
    ///
    /// Labels must be unique; several labels may share a code.
    ///
    /// # Errors
    /// Returns [`DataError::Csv`] for malformed rows and [`DataError::Parse`]
    /// for duplicate or empty labels.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut entries = Vec::new();
        let mut by_label = HashMap::new();
        let mut by_code = HashMap::new();

        for row in rdr.deserialize() {
            let row: LineCodeRow = row?;
            if row.label.is_empty() || row.code.is_empty() {
                return Err(DataError::Parse(format!(
                    "Empty label or code in line-code table near entry {}",
                    entries.len() + 1
                )));
            }
            if by_label.contains_key(&row.label) {
                return Err(DataError::Parse(format!(
                    "Duplicate label in line-code table: {}",
                    row.label
                )));
            }

            let idx = entries.len();
            by_label.insert(row.label.clone(), idx);
            by_code.entry(row.code.clone()).or_insert(idx);
            entries.push((row.label, row.code));
        }

        Ok(Self {
            entries,
            by_label,
            by_code,
        })
    }

    /// Line code for a label.
    pub fn code_for(&self, label: &str) -> Option<&str> {
        self.by_label
            .get(label)
            .map(|&idx| self.entries[idx].1.as_str())
    }

    /// First label registered for a code.
    pub fn label_for(&self, code: &str) -> Option<&str> {
        self.by_code
            .get(code)
            .map(|&idx| self.entries[idx].0.as_str())
    }

    /// Iterate over `(label, code)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(label, code)| (label.as_str(), code.as_str()))
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table holds no labels.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Line codes read by the derived metrics.
///
/// Codes follow the registry's full-schema numbering.
pub mod codes {
    /// Raw materials and consumables (stock)
    pub const RAW_MATERIALS: &str = "30/31";
    /// Work in progress
    pub const WORK_IN_PROGRESS: &str = "32";
    /// Finished goods
    pub const FINISHED_GOODS: &str = "33";
    /// Goods purchased for resale
    pub const GOODS_FOR_RESALE: &str = "34";
    /// Immovable property intended for sale
    pub const PROPERTY_FOR_SALE: &str = "35";
    /// Advance payments on stock
    pub const STOCK_ADVANCES: &str = "36";
    /// Contracts in progress
    pub const CONTRACTS_IN_PROGRESS: &str = "37";
    /// Trade debtors due within one year
    pub const TRADE_RECEIVABLES: &str = "40";
    /// Trade debts payable within one year
    pub const TRADE_PAYABLES: &str = "44";

    /// Turnover
    pub const TURNOVER: &str = "70";
    /// Change in work in progress and finished goods
    pub const STOCK_VARIATION: &str = "71";
    /// Own work capitalised
    pub const OWN_CONSTRUCTION: &str = "72";
    /// Other operating income
    pub const OTHER_OPERATING_INCOME: &str = "74";
    /// Operating subsidies and compensatory amounts
    pub const OPERATING_SUBSIDIES: &str = "740";
    /// Gross margin (abbreviated schema)
    pub const GROSS_MARGIN: &str = "9900";

    /// Raw materials, consumables and goods for resale (costs)
    pub const COST_OF_GOODS: &str = "60";
    /// Purchases
    pub const PURCHASES: &str = "600/8";
    /// Services and other goods
    pub const SERVICES: &str = "61";
    /// Remuneration, social security and pensions
    pub const REMUNERATION: &str = "62";
    /// Depreciation of fixed assets
    pub const DEPRECIATION: &str = "630";
    /// Write-downs on stocks, contracts in progress and trade debtors
    pub const STOCK_WRITE_DOWNS: &str = "631/4";
    /// Provisions for liabilities and charges
    pub const PROVISIONS: &str = "635/8";
    /// Other operating charges
    pub const OTHER_OPERATING_CHARGES: &str = "640/8";
    /// Operating charges capitalised as reorganisation costs
    pub const CAPITALISED_REORGANISATION: &str = "649";

    /// Debt charges
    pub const DEBT_CHARGES: &str = "650";
    /// Write-downs on current assets other than stock and trade debtors
    pub const OTHER_CURRENT_WRITE_DOWNS: &str = "651";
    /// Other financial charges
    pub const OTHER_FINANCIAL_CHARGES: &str = "652/9";
    /// Non-recurring financial charges
    pub const NON_RECURRING_FINANCIAL_CHARGES: &str = "66B";
    /// Income from financial fixed assets
    pub const FINANCIAL_FIXED_ASSET_INCOME: &str = "750";
    /// Income from current assets
    pub const CURRENT_ASSET_INCOME: &str = "751";
    /// Other financial income
    pub const OTHER_FINANCIAL_INCOME: &str = "752/9";
    /// Non-recurring financial income
    pub const NON_RECURRING_FINANCIAL_INCOME: &str = "76B";

    /// Capital subsidies credited to the income statement
    pub const CAPITAL_SUBSIDIES: &str = "9125";
    /// VAT charged to the company
    pub const VAT_CHARGED_TO_COMPANY: &str = "9145";
    /// VAT charged by the company
    pub const VAT_CHARGED_BY_COMPANY: &str = "9146";
    /// Endorsed trade bills in circulation
    pub const ENDORSED_TRADE_BILLS: &str = "9150";
    /// Profit (loss) for the period before taxes
    pub const PROFIT_BEFORE_TAX: &str = "9903";
    /// Profit (loss) for the period
    pub const PROFIT_FOR_PERIOD: &str = "9904";
}
