use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request body for create and update.
///
/// The account number is assigned by the store, so a client-supplied
/// `accountNumber` is ignored. A JSON number amount is read from its literal
/// text, never through `f64`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub amount: Option<Decimal>,
}

impl AccountDto {
    pub fn with_amount(amount: Decimal) -> Self {
        Self {
            amount: Some(amount),
        }
    }
}

/// One row of a seed CSV file. Amounts are read from their textual form so
/// that their scale survives (`10.00` stays `10.00`).
#[derive(Debug, PartialEq, Deserialize)]
pub struct SeedRow {
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub amount: Option<Decimal>,
}

impl From<SeedRow> for AccountDto {
    fn from(row: SeedRow) -> Self {
        Self { amount: row.amount }
    }
}
