// src/common/db_utils.rs

/// Código SQLSTATE do Postgres para violação de unicidade.
const UNIQUE_VIOLATION: &str = "23505";

/// Verifica se o erro veio de uma constraint UNIQUE (ex.: colisão de código
/// de cartão, e-mail ou slug repetidos).
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Como `is_unique_violation`, mas restrito a uma constraint específica.
pub(crate) fn violates_constraint(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
