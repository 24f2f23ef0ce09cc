use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::amount::Amount;

/// Record keys that every account carries regardless of configuration
pub const FIXED_FIELDS: [&str; 5] = ["account", "free", "reserved", "frozen", "total_token"];

/// Balances of a single account, including derived LP and farming holdings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub account: String,
    pub free: Amount,
    pub reserved: Amount,
    pub frozen: Amount,
    holdings: IndexMap<String, Amount>,
    pub total: Amount,
}

impl AccountRecord {
    /// Create a record with every field set to zero
    pub fn new(account: &str, fields: &[String]) -> Self {
        Self {
            account: account.to_string(),
            free: Amount::zero(),
            reserved: Amount::zero(),
            frozen: Amount::zero(),
            holdings: fields.iter().map(|f| (f.clone(), Amount::zero())).collect(),
            total: Amount::zero(),
        }
    }

    /// Get a derived holding by its output field name
    pub fn holding(&self, field: &str) -> Option<&Amount> {
        self.holdings.get(field)
    }

    /// Look up any amount field by name, `free` included
    pub fn field(&self, name: &str) -> Option<&Amount> {
        match name {
            "free" => Some(&self.free),
            "reserved" => Some(&self.reserved),
            "frozen" => Some(&self.frozen),
            other => self.holdings.get(other),
        }
    }

    /// Set a derived holding. Returns `false` if the field is not tracked.
    pub fn set_holding(&mut self, field: &str, amount: Amount) -> bool {
        match self.holdings.get_mut(field) {
            Some(slot) => {
                *slot = amount;
                true
            }
            None => false,
        }
    }

    /// Iterate derived holdings in configuration order
    pub fn holdings(&self) -> impl Iterator<Item = (&str, &Amount)> {
        self.holdings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Recompute `total` from the final field values.
    ///
    /// `total = free + every derived holding`. Calling this any number of
    /// times yields the same result.
    pub fn compute_total(&mut self) -> &Amount {
        let derived: Amount = self.holdings.values().sum();
        self.total = derived + &self.free;
        &self.total
    }
}

impl Serialize for AccountRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5 + self.holdings.len()))?;
        map.serialize_entry("account", &self.account)?;
        map.serialize_entry("free", &self.free)?;
        map.serialize_entry("reserved", &self.reserved)?;
        map.serialize_entry("frozen", &self.frozen)?;
        for (field, amount) in &self.holdings {
            map.serialize_entry(field, amount)?;
        }
        map.serialize_entry("total_token", &self.total)?;
        map.end()
    }
}

/// Account records keyed by account, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct HoldingsLedger {
    fields: Vec<String>,
    records: IndexMap<String, AccountRecord>,
}

impl HoldingsLedger {
    /// Create an empty ledger tracking the given derived holding fields
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields, records: IndexMap::new() }
    }

    /// Get the record for `account`, creating a zeroed one if absent
    pub fn upsert(&mut self, account: &str) -> &mut AccountRecord {
        let fields = &self.fields;
        self.records
            .entry(account.to_string())
            .or_insert_with(|| AccountRecord::new(account, fields))
    }

    pub fn get(&self, account: &str) -> Option<&AccountRecord> {
        self.records.get(account)
    }

    /// Remove a record, keeping the order of the remaining ones
    pub fn remove(&mut self, account: &str) -> Option<AccountRecord> {
        self.records.shift_remove(account)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &AccountRecord> {
        self.records.values()
    }

    /// Compute `total` for every record from its final field values
    pub fn finalize_totals(&mut self) {
        for record in self.records.values_mut() {
            record.compute_total();
        }
    }

    /// Sum of `total` across all records
    pub fn grand_total(&self) -> Amount {
        self.records.values().map(|r| &r.total).sum()
    }

    pub fn into_records(self) -> Vec<AccountRecord> {
        self.records.into_values().collect()
    }
}
