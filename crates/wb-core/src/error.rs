use thiserror::Error;

/// Errors originating from the core module.
///
/// Every variant is a precondition violation: the caller supplied inputs or a
/// configuration the computation cannot run on. Degenerate-but-valid inputs
/// (fully unsegmented series, rejected frames) never produce an error.
#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Two series of the same analysis run disagree on their frame count.
    #[error("Longueur incohérente pour {what} : attendu {expected}, obtenu {actual}")]
    LengthMismatch {
        /// Name of the offending input.
        what: &'static str,
        /// Frame count of the reference series.
        expected: usize,
        /// Frame count actually supplied.
        actual: usize,
    },

    /// A partition row range does not fit inside the bend-angle matrix.
    #[error("Partition {partition} hors limites : lignes {start}..{end} pour {rows} lignes")]
    PartitionOutOfRange {
        /// Partition name.
        partition: &'static str,
        /// First row (inclusive).
        start: usize,
        /// Last row (exclusive).
        end: usize,
        /// Number of rows available.
        rows: usize,
    },

    /// A point set has no skeleton points.
    #[error("Ensemble de points vide : {0}")]
    EmptyPointSet(&'static str),
}
