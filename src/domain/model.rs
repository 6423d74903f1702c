use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// One row of the checkout file, dates already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRecord {
    pub patron_id: String,
    pub date_checkout: NaiveDate,
    pub date_due: NaiveDate,
    pub date_returned: NaiveDate,
    /// 1-based line in the source file, header included.
    pub line: u64,
}

impl CheckoutRecord {
    /// Whole days between due and returned; zero when returned on time or early.
    pub fn days_late(&self) -> u64 {
        if self.date_returned > self.date_due {
            (self.date_returned - self.date_due).num_days() as u64
        } else {
            0
        }
    }
}

/// A currency amount in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LateFee(u64);

impl LateFee {
    pub const ZERO: LateFee = LateFee(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub fn cents(self) -> u64 {
        self.0
    }
}

impl std::ops::Add for LateFee {
    type Output = LateFee;

    fn add(self, rhs: LateFee) -> LateFee {
        LateFee(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for LateFee {
    fn add_assign(&mut self, rhs: LateFee) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for LateFee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for LateFee {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportOrder {
    /// Order in which patrons first appear in the input.
    #[default]
    FirstSeen,
    PatronId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for ReportOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "first_seen" => Ok(ReportOrder::FirstSeen),
            "patron_id" => Ok(ReportOrder::PatronId),
            other => Err(format!("unknown order '{}', expected first_seen or patron_id", other)),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown format '{}', expected csv or json", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeReportRow {
    pub patron_id: String,
    pub late_fees: LateFee,
}

/// Accumulated fee per patron for one report run.
///
/// Keys keep the order in which they were first inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LateFeeLedger {
    fees: HashMap<String, LateFee>,
    order: Vec<String>,
}

impl LateFeeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accrue(&mut self, patron_id: &str, fee: LateFee) {
        match self.fees.get_mut(patron_id) {
            Some(total) => *total += fee,
            None => {
                self.order.push(patron_id.to_string());
                self.fees.insert(patron_id.to_string(), fee);
            }
        }
    }

    /// Inserts a zero entry unless the patron already has one.
    pub fn ensure_entry(&mut self, patron_id: &str) {
        self.accrue(patron_id, LateFee::ZERO);
    }

    pub fn get(&self, patron_id: &str) -> Option<LateFee> {
        self.fees.get(patron_id).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn total(&self) -> LateFee {
        self.fees.values().fold(LateFee::ZERO, |acc, fee| acc + *fee)
    }

    pub fn patron_ids(&self) -> HashSet<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, LateFee)> + '_ {
        self.order
            .iter()
            .map(move |id| (id.as_str(), self.fees[id.as_str()]))
    }

    pub fn rows(&self, order: ReportOrder) -> Vec<FeeReportRow> {
        let mut rows: Vec<FeeReportRow> = self
            .iter()
            .map(|(patron_id, late_fees)| FeeReportRow {
                patron_id: patron_id.to_string(),
                late_fees,
            })
            .collect();

        if order == ReportOrder::PatronId {
            rows.sort_by(|a, b| a.patron_id.cmp(&b.patron_id));
        }
        rows
    }
}

#[derive(Debug, Clone)]
pub struct FeeReport {
    pub ledger: LateFeeLedger,
    pub rows: Vec<FeeReportRow>,
}
