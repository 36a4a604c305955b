#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/balans/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod tables;

pub use export::{ExportError, ExportFormat, Exporter};
pub use tables::{
    AdministratorRow, AdministratorTable, CompanyInfoRow, CompanyInfoTable, FailureRow,
    FailureTable, FinancialRow, FinancialTable, LineValue, MetricValue, ParticipationRow,
    ParticipationTable, ReportTables, ShareholderRow, ShareholderTable,
};
