use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ImportError;
use crate::model::{FileType, ImportResult, ImportedTransaction, FALLBACK_DESCRIPTION};

/// Parses an SGML-flavored OFX statement.
///
/// OFX as banks actually export it is not XML: closing tags are routinely
/// absent and nesting is unreliable, so this is a tag scan, not a tree parse.
/// A strict parser would reject real files.
///
/// Blocks missing a readable date or amount are skipped with a diagnostic;
/// the parse never aborts on a single bad block.
pub fn parse_ofx(content: &str) -> ImportResult {
    // Block runs to the closing tag or, for a truncated final block, to EOF.
    let block_re = match Regex::new(r"(?is)<STMTTRN>(.*?)(?:</STMTTRN>|\z)") {
        Ok(re) => re,
        Err(e) => return ImportResult::fatal(FileType::Ofx, ImportError::Scan(e.to_string())),
    };

    let mut result = ImportResult::for_type(FileType::Ofx);
    result.bank_name = scan_tag(content, "ORG").or_else(|| scan_tag(content, "BANKID"));
    result.account_number = scan_tag(content, "ACCTID");

    for (index, cap) in block_re.captures_iter(content).enumerate() {
        match parse_block(&cap[1]) {
            Some(tx) => result.transactions.push(tx),
            None => result.push_error(ImportError::Block { index: index + 1 }),
        }
    }

    result.transactions.sort_by_key(|t| t.date);
    result.finish();

    tracing::debug!(
        transactions = result.transactions.len(),
        skipped = result.errors.len(),
        "parsed OFX statement"
    );
    result
}

/// One `<STMTTRN>` block. `None` when date or amount is missing or unreadable.
fn parse_block(block: &str) -> Option<ImportedTransaction> {
    let date = scan_tag(block, "DTPOSTED").and_then(|v| parse_ofx_date(&v))?;
    let signed = scan_tag(block, "TRNAMT").and_then(|v| parse_ofx_amount(&v))?;

    let memo = scan_tag(block, "MEMO");
    let name = scan_tag(block, "NAME");
    let description = name
        .or_else(|| memo.clone())
        .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string());

    // TRNTYPE is advisory only; direction comes from the amount's sign.
    let mut tx = ImportedTransaction::from_signed(date, signed, description);
    tx.memo = memo;
    tx.fitid = scan_tag(block, "FITID");
    tx.check_num = scan_tag(block, "CHECKNUM");
    Some(tx)
}

/// Best-effort single-value pull: `<TAG>value`, value running to the next
/// tag or end of line. Tolerates the unclosed-tag style.
fn scan_tag(source: &str, tag: &str) -> Option<String> {
    let needle = format!("<{tag}>");
    let start = source.find(&needle)? + needle.len();
    let rest = &source[start..];
    let end = rest.find(['<', '\r', '\n']).unwrap_or(rest.len());
    let value = rest[..end].trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// `DTPOSTED` is `YYYYMMDD`, often with a time/timezone suffix appended
/// (`20240115120000[-5:EST]`). Only the leading 8 digits count.
fn parse_ofx_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() < 8 || !raw.as_bytes()[..8].iter().all(u8::is_ascii_digit) {
        return None;
    }
    let y: i32 = raw[0..4].parse().ok()?;
    let m: u32 = raw[4..6].parse().ok()?;
    let d: u32 = raw[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

/// `TRNAMT` uses either `,` or `.` as the fractional separator, never a
/// thousands separator.
fn parse_ofx_amount(raw: &str) -> Option<Decimal> {
    Decimal::from_str(&raw.trim().replace(',', ".")).ok()
}
