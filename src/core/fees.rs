use crate::core::dates::parse_checkout_date;
use crate::domain::model::{
    CheckoutRecord, FeeReportRow, LateFee, LateFeeLedger, OutputFormat, ReportOrder,
};
use crate::utils::error::{FeesError, Result};
use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};
use std::path::Path;

pub const LATE_FEE_PER_DAY: LateFee = LateFee::from_cents(25);

pub const PATRON_ID: &str = "patron_id";
pub const DATE_CHECKOUT: &str = "date_checkout";
pub const DATE_DUE: &str = "date_due";
pub const DATE_RETURNED: &str = "date_returned";
pub const LATE_FEES: &str = "late_fees";

/// Accumulates late fees over checkout records.
///
/// Records are fed with [`FeesCalculator::record`]; [`FeesCalculator::finalize`]
/// then gives every patron seen an entry, zero if they were never late.
#[derive(Debug, Default)]
pub struct FeesCalculator {
    accrued: HashMap<String, LateFee>,
    seen: Vec<String>,
    seen_set: HashSet<String>,
}

impl FeesCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a, I>(records: I) -> LateFeeLedger
    where
        I: IntoIterator<Item = &'a CheckoutRecord>,
    {
        let mut calculator = Self::new();
        for record in records {
            calculator.record(record);
        }
        calculator.finalize()
    }

    pub fn record(&mut self, record: &CheckoutRecord) {
        let days_late = record.days_late();
        if days_late > 0 {
            let fee = LateFee::from_cents(days_late * LATE_FEE_PER_DAY.cents());
            *self.accrued.entry(record.patron_id.clone()).or_default() += fee;
            tracing::trace!(
                "Patron {} returned {} days late on line {}",
                record.patron_id,
                days_late,
                record.line
            );
        }

        if self.seen_set.insert(record.patron_id.clone()) {
            self.seen.push(record.patron_id.clone());
        }
    }

    pub fn finalize(self) -> LateFeeLedger {
        let mut ledger = LateFeeLedger::new();
        for patron_id in &self.seen {
            match self.accrued.get(patron_id) {
                Some(fee) => ledger.accrue(patron_id, *fee),
                None => ledger.ensure_entry(patron_id),
            }
        }
        ledger
    }
}

struct Columns {
    patron_id: usize,
    date_checkout: usize,
    date_due: usize,
    date_returned: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| FeesError::MissingFieldError {
                    field: name.to_string(),
                    line: Some(1),
                })
        };

        Ok(Self {
            patron_id: find(PATRON_ID)?,
            date_checkout: find(DATE_CHECKOUT)?,
            date_due: find(DATE_DUE)?,
            date_returned: find(DATE_RETURNED)?,
        })
    }
}

fn field<'r>(row: &'r csv::StringRecord, index: usize, name: &str, line: u64) -> Result<&'r str> {
    row.get(index).ok_or_else(|| FeesError::MissingFieldError {
        field: name.to_string(),
        line: Some(line),
    })
}

fn date_field(row: &csv::StringRecord, index: usize, name: &str, line: u64) -> Result<chrono::NaiveDate> {
    let value = field(row, index, name, line)?;
    parse_checkout_date(value).map_err(|e| match e {
        FeesError::DateFormatError { value, expected, .. } => FeesError::DateFormatError {
            value,
            expected,
            line: Some(line),
        },
        other => other,
    })
}

/// Reads every checkout row, failing on the first malformed one.
pub fn read_checkouts<R: Read>(reader: R) -> Result<Vec<CheckoutRecord>> {
    // Rows longer than the header are allowed; short rows fail in `field`.
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::from_headers(csv_reader.headers()?)?;

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        let patron_id = field(&row, columns.patron_id, PATRON_ID, line)?;

        records.push(CheckoutRecord {
            patron_id: patron_id.to_string(),
            date_checkout: date_field(&row, columns.date_checkout, DATE_CHECKOUT, line)?,
            date_due: date_field(&row, columns.date_due, DATE_DUE, line)?,
            date_returned: date_field(&row, columns.date_returned, DATE_RETURNED, line)?,
            line,
        });
    }

    tracing::debug!("Read {} checkout records", records.len());
    Ok(records)
}

pub fn write_report_csv<W: Write>(rows: &[FeeReportRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([PATRON_ID, LATE_FEES])?;
    for row in rows {
        csv_writer.write_record([row.patron_id.as_str(), row.late_fees.to_string().as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn render_report(rows: &[FeeReportRow], format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => {
            let mut buffer = Vec::new();
            write_report_csv(rows, &mut buffer)?;
            Ok(buffer)
        }
        OutputFormat::Json => Ok(serde_json::to_vec_pretty(rows)?),
    }
}

/// Builds the fee report from `input` and writes it as CSV to `output`.
///
/// Nothing is written unless every row parsed.
pub fn fees_report<R: Read, W: Write>(input: R, mut output: W) -> Result<LateFeeLedger> {
    let records = read_checkouts(input)?;
    let ledger = FeesCalculator::from_records(&records);
    let report = render_report(&ledger.rows(ReportOrder::FirstSeen), OutputFormat::Csv)?;
    output.write_all(&report)?;
    output.flush()?;
    Ok(ledger)
}

/// File variant of [`fees_report`]; `outfile` is replaced only on success.
pub fn fees_report_file<P: AsRef<Path>, Q: AsRef<Path>>(infile: P, outfile: Q) -> Result<LateFeeLedger> {
    let input = std::fs::File::open(infile.as_ref())?;
    let mut report = Vec::new();
    let ledger = fees_report(std::io::BufReader::new(input), &mut report)?;
    crate::config::local::write_atomic(outfile.as_ref(), &report)?;
    tracing::info!(
        "Wrote late fees for {} patrons to {}",
        ledger.len(),
        outfile.as_ref().display()
    );
    Ok(ledger)
}
