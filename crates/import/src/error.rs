use thiserror::Error;

/// Diagnostics produced while importing a statement file.
///
/// None of these ever cross the crate boundary as `Err`: each one is rendered
/// through `Display` into [`ImportResult::errors`], so a single bad row never
/// sinks the rest of the file. Messages are pt-BR because the review screen
/// shows them to the user verbatim.
///
/// [`ImportResult::errors`]: crate::model::ImportResult
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("arquivo inválido: é necessário um cabeçalho e ao menos uma linha de dados")]
    EmptyFile,

    #[error("coluna de data não encontrada no cabeçalho")]
    MissingDateColumn,

    #[error("coluna de valor não encontrada no cabeçalho")]
    MissingAmountColumn,

    /// A single CSV data row could not be read. `line` is 1-based and counts
    /// the header, matching what the user sees in a text editor.
    #[error("linha {line}: {reason}")]
    Row { line: usize, reason: String },

    /// An OFX `<STMTTRN>` block without a readable date or amount. `index` is
    /// the 1-based position of the block within the statement.
    #[error("transação {index} ignorada: data ou valor ausente")]
    Block { index: usize },

    #[error("falha ao ler o arquivo: {0}")]
    Scan(String),
}
