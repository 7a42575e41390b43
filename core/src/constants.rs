//! Fixed values shared by the client and the endpoint catalog.

/// Production API root.
pub const API_URL: &str = "https://api.smartsheet.com/2.0";

/// Government cloud API root.
pub const GOV_API_URL: &str = "https://api.smartsheetgov.com/2.0";

/// Prefix of every `User-Agent` header this crate sends.
pub const USER_AGENT: &str = concat!("smartsheet-rust-sdk/", env!("CARGO_PKG_VERSION"));

pub const JSON_TYPE: &str = "application/json";
pub const CSV_TYPE: &str = "text/csv";
pub const PDF_TYPE: &str = "application/pdf";
pub const EXCEL_TYPE: &str = "application/vnd.ms-excel";
pub const XLSX_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const ASSUME_USER_HEADER: &str = "Assume-User";
