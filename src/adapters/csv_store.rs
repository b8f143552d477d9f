use crate::core::{AccountStore, Result};
use crate::domain::model::AccountRecord;
use crate::utils::error::AssistError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct AccountRow {
    mobile_number: String,
    holder_name: String,
    account_no: String,
    branch_name: String,
    account_type: String,
    loan_status: Option<String>,
    end_date: Option<String>,
}

impl AccountRow {
    fn into_record(self, line: u64) -> Result<AccountRecord> {
        let end_date = match non_empty(self.end_date) {
            Some(raw) => Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
                AssistError::storage(format!("invalid end_date '{}' on line {}: {}", raw, line, e))
            })?),
            None => None,
        };

        Ok(AccountRecord {
            mobile_number: self.mobile_number.trim().to_string(),
            holder_name: self.holder_name.trim().to_string(),
            account_no: self.account_no.trim().to_string(),
            branch_name: self.branch_name.trim().to_string(),
            account_type: self.account_type.trim().to_string(),
            loan_status: non_empty(self.loan_status),
            end_date,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Account store backed by a CSV export, loaded into memory once.
#[derive(Debug, Clone, Default)]
pub struct CsvAccountStore {
    accounts: HashMap<String, AccountRecord>,
}

impl CsvAccountStore {
    /// 從 CSV 檔案載入帳戶資料
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading accounts from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mut raw = csv::StringRecord::new();
        let mut accounts = HashMap::new();

        while csv_reader.read_record(&mut raw)? {
            let line = raw.position().map(|pos| pos.line()).unwrap_or_default();
            let row: AccountRow = raw.deserialize(Some(&headers))?;
            let record = row.into_record(line)?;

            if accounts.contains_key(&record.mobile_number) {
                tracing::warn!("Duplicate mobile number on line {}; keeping the first row", line);
                continue;
            }
            accounts.insert(record.mobile_number.clone(), record);
        }

        tracing::info!("Loaded {} accounts", accounts.len());
        Ok(Self { accounts })
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountStore for CsvAccountStore {
    async fn find_by_mobile(&self, mobile_number: &str) -> Result<Option<AccountRecord>> {
        Ok(self.accounts.get(mobile_number).cloned())
    }
}
