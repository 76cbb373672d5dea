use sqlx::{Postgres, QueryBuilder};

use crate::seedwork::search::SearchParams;

// ============================================================================
// SQL helpers shared by the Postgres repositories
// ============================================================================

/// Escapes LIKE wildcards so user input only ever matches literally.
pub fn escape_like_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Appends ` AND <column> ILIKE '%value%'`, case-insensitive substring match.
pub fn push_contains(builder: &mut QueryBuilder<'_, Postgres>, column: &str, value: &str) {
    builder.push(format!(" AND {column} ILIKE "));
    builder.push_bind(format!("%{}%", escape_like_literal(value)));
    builder.push(" ESCAPE E'\\\\'");
}

pub fn push_page<F>(builder: &mut QueryBuilder<'_, Postgres>, params: &SearchParams<F>) {
    builder.push(" LIMIT ");
    builder.push_bind(i64::try_from(params.limit()).unwrap_or(i64::MAX));
    builder.push(" OFFSET ");
    builder.push_bind(i64::try_from(params.offset()).unwrap_or(i64::MAX));
}
