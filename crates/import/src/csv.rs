use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ImportError;
use crate::model::{FileType, ImportResult, ImportedTransaction, FALLBACK_DESCRIPTION};

/// Brazilian bank exports overwhelmingly use `;`; the detector overrides
/// this when the header says otherwise.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Which header columns feed which canonical field, found by substring
/// match against the lowercased column names. First hit wins per field.
struct ColumnMap {
    date: usize,
    amount: usize,
    description: Option<usize>,
}

const DATE_NAMES: &[&str] = &["data", "date", "dt"];
const AMOUNT_NAMES: &[&str] = &["valor", "amount", "quantia"];
const DESCRIPTION_NAMES: &[&str] = &["descri", "memo", "hist", "observ"];

fn detect_columns(header: &csv::StringRecord) -> Result<ColumnMap, ImportError> {
    let names: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
    let find = |candidates: &[&str]| {
        names
            .iter()
            .position(|name| candidates.iter().any(|c| name.contains(c)))
    };

    Ok(ColumnMap {
        date: find(DATE_NAMES).ok_or(ImportError::MissingDateColumn)?,
        amount: find(AMOUNT_NAMES).ok_or(ImportError::MissingAmountColumn)?,
        description: find(DESCRIPTION_NAMES),
    })
}

/// Parses a delimited statement export. The first line is the header.
///
/// Unlike the OFX path the output is NOT sorted by date: rows come back in
/// file order, and the statement period is read from the first and last row
/// as-is. Rows whose amount is not numeric are dropped silently — bank
/// exports end in footer/total lines and flagging every one is noise.
pub fn parse_csv(content: &str, delimiter: u8) -> ImportResult {
    if content.lines().count() < 2 {
        return ImportResult::fatal(FileType::Csv, ImportError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());
    let mut records = reader.records();

    let header = match records.next() {
        Some(Ok(header)) => header,
        _ => return ImportResult::fatal(FileType::Csv, ImportError::EmptyFile),
    };
    let columns = match detect_columns(&header) {
        Ok(columns) => columns,
        Err(e) => return ImportResult::fatal(FileType::Csv, e),
    };

    let mut result = ImportResult::for_type(FileType::Csv);

    for (index, record) in records.enumerate() {
        // 1-based file line, counting the header. The csv reader knows the
        // real position; the fallback only covers records without one.
        let fallback_line = index + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(fallback_line);
                result.push_error(ImportError::Row {
                    line,
                    reason: "não foi possível ler a linha".to_string(),
                });
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(fallback_line);

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let (Some(raw_date), Some(raw_amount)) =
            (record.get(columns.date), record.get(columns.amount))
        else {
            result.push_error(ImportError::Row {
                line,
                reason: "colunas de data ou valor ausentes".to_string(),
            });
            continue;
        };

        // Non-numeric amount: footer or summary row, skip without noise.
        let Some(signed) = parse_brl_amount(raw_amount) else {
            continue;
        };

        let Some(date) = parse_row_date(raw_date) else {
            result.push_error(ImportError::Row {
                line,
                reason: format!("data inválida: {}", raw_date.trim()),
            });
            continue;
        };

        let description = columns
            .description
            .and_then(|col| record.get(col))
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(FALLBACK_DESCRIPTION)
            .to_string();

        let mut tx = ImportedTransaction::from_signed(date, signed, description);
        tx.original_line = Some(raw_line(&record, delimiter));
        result.transactions.push(tx);
    }

    result.finish();

    tracing::debug!(
        transactions = result.transactions.len(),
        diagnostics = result.errors.len(),
        "parsed CSV statement"
    );
    result
}

fn raw_line(record: &csv::StringRecord, delimiter: u8) -> String {
    record
        .iter()
        .collect::<Vec<_>>()
        .join(&(delimiter as char).to_string())
}

/// `DD/MM/YYYY` or already-ISO `YYYY-MM-DD`.
fn parse_row_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

/// Brazilian money text: optional currency prefix, `.` as thousands
/// separator, `,` as the decimal separator. `R$ 1.234,56` → `1234.56`.
/// Every `.` is treated as a thousands separator and removed.
fn parse_brl_amount(raw: &str) -> Option<Decimal> {
    let kept: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-' | '+'))
        .collect();
    let normalized = kept.replace('.', "").replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use carteira_core::TransactionKind;

    // ── amount normalization ──────────────────────────────────────────────────

    #[test]
    fn parse_brl_amount_comma_decimal() {
        assert_eq!(parse_brl_amount("-45,90"), Decimal::from_str("-45.90").ok());
    }

    #[test]
    fn parse_brl_amount_currency_prefix_and_thousands() {
        assert_eq!(
            parse_brl_amount("R$ 1.234,56"),
            Decimal::from_str("1234.56").ok()
        );
    }

    #[test]
    fn parse_brl_amount_dot_is_thousands_separator() {
        // Brazilian convention: the dot never marks decimals.
        assert_eq!(parse_brl_amount("45.90"), Decimal::from_str("4590").ok());
    }

    #[test]
    fn parse_brl_amount_rejects_text() {
        assert_eq!(parse_brl_amount("Saldo final"), None);
        assert_eq!(parse_brl_amount(""), None);
        assert_eq!(parse_brl_amount("--"), None);
    }

    // ── date normalization ────────────────────────────────────────────────────

    #[test]
    fn parse_row_date_brazilian_order() {
        assert_eq!(
            parse_row_date("15/01/2024"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn parse_row_date_iso_passthrough() {
        assert_eq!(
            parse_row_date("2024-01-15"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn parse_row_date_invalid() {
        assert_eq!(parse_row_date("32/01/2024"), None);
        assert_eq!(parse_row_date("Total"), None);
    }

    // ── full parse ────────────────────────────────────────────────────────────

    #[test]
    fn parses_brazilian_statement() {
        let content = "Data;Valor;Descrição\n15/01/2024;-45,90;Mercado\n20/01/2024;1500,00;Salário\n";
        let result = parse_csv(content, b';');

        assert!(result.success);
        assert_eq!(result.file_type, Some(FileType::Csv));
        assert_eq!(result.transactions.len(), 2);
        assert!(result.errors.is_empty());

        let tx = &result.transactions[0];
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(tx.amount, Decimal::from_str("45.90").unwrap());
        assert_eq!(tx.kind, TransactionKind::Expense);
        assert_eq!(tx.description, "Mercado");
        assert_eq!(tx.original_line.as_deref(), Some("15/01/2024;-45,90;Mercado"));
    }

    #[test]
    fn column_discovery_is_substring_based() {
        // "dt_lancamento" matches "dt", "quantia_brl" matches "quantia",
        // "historico" matches "hist".
        let content = "dt_lancamento;quantia_brl;historico\n2024-01-15;-10,00;Padaria\n";
        let result = parse_csv(content, b';');
        assert!(result.success);
        assert_eq!(result.transactions[0].description, "Padaria");
    }

    #[test]
    fn output_keeps_file_order_and_period_follows_it() {
        // Later date first: the CSV path does not sort.
        let content = "data;valor\n20/01/2024;-1,00\n15/01/2024;-2,00\n";
        let result = parse_csv(content, b';');
        assert_eq!(
            result.transactions[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()
        );
        assert_eq!(
            result.transactions[1].date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(result.start_date, NaiveDate::from_ymd_opt(2024, 1, 20));
        assert_eq!(result.end_date, NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn missing_description_column_uses_placeholder() {
        let content = "data;valor\n15/01/2024;-45,90\n";
        let result = parse_csv(content, b';');
        assert!(result.success);
        assert_eq!(result.transactions[0].description, "Transação importada");
    }

    #[test]
    fn comma_delimiter() {
        let content = "date,amount,memo\n2024-01-15,\"-45,90\",Mercado\n";
        let result = parse_csv(content, b',');
        assert!(result.success);
        assert_eq!(
            result.transactions[0].amount,
            Decimal::from_str("45.90").unwrap()
        );
    }

    // ── failure modes ─────────────────────────────────────────────────────────

    #[test]
    fn header_only_file_is_fatal() {
        let result = parse_csv("Data;Valor;Descrição\n", b';');
        assert!(!result.success);
        assert!(result.transactions.is_empty());
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn missing_date_column_is_fatal() {
        let result = parse_csv("coluna_a;valor\nx;-1,00\n", b';');
        assert!(!result.success);
        assert_eq!(result.errors, vec!["coluna de data não encontrada no cabeçalho"]);
    }

    #[test]
    fn missing_amount_column_is_fatal() {
        let result = parse_csv("data;coluna_b\n15/01/2024;x\n", b';');
        assert!(!result.success);
        assert_eq!(result.errors, vec!["coluna de valor não encontrada no cabeçalho"]);
    }

    #[test]
    fn footer_row_with_text_amount_is_skipped_silently() {
        let content = "data;valor;descricao\n15/01/2024;-45,90;Mercado\nTotal;Saldo final;\n";
        let result = parse_csv(content, b';');
        assert!(result.success);
        assert_eq!(result.transactions.len(), 1);
        // Deliberately no diagnostic for the footer row.
        assert!(result.errors.is_empty());
    }

    #[test]
    fn bad_date_with_numeric_amount_gets_line_tagged_diagnostic() {
        let content = "data;valor\n15/01/2024;-1,00\nontem;-2,00\n20/01/2024;-3,00\n";
        let result = parse_csv(content, b';');
        assert!(result.success);
        assert_eq!(result.transactions.len(), 2);
        assert_eq!(result.errors, vec!["linha 3: data inválida: ontem"]);
    }

    #[test]
    fn short_row_gets_line_tagged_diagnostic() {
        // Second data row lacks the amount column entirely.
        let content = "data;valor\n15/01/2024;-1,00\n16/01/2024\n17/01/2024;-3,00\n";
        let result = parse_csv(content, b';');
        assert_eq!(result.transactions.len(), 2);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("linha 3:"));
    }

    #[test]
    fn blank_rows_are_skipped_without_diagnostic() {
        let content = "data;valor\n15/01/2024;-1,00\n;;\n16/01/2024;-2,00\n";
        let result = parse_csv(content, b';');
        assert_eq!(result.transactions.len(), 2);
        assert!(result.errors.is_empty());
    }
}
