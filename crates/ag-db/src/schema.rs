//! Bootstrap schema
//!
//! Statements are idempotent and applied in order at startup, so a fresh
//! database and an existing one converge on the same layout.

use sqlx::PgPool;

/// Ordered DDL; tables precede the tables that reference them.
pub const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS workers (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255) UNIQUE,
        phone VARCHAR(50),
        role VARCHAR(100) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS fields (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        description TEXT,
        coordinates JSONB NOT NULL,
        area DOUBLE PRECISION NOT NULL DEFAULT 0 CHECK (area >= 0),
        crop_type VARCHAR(100) NOT NULL DEFAULT '',
        period VARCHAR(100) NOT NULL DEFAULT '',
        region VARCHAR(255) NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS schedules (
        id BIGSERIAL PRIMARY KEY,
        worker_id BIGINT NOT NULL REFERENCES workers(id) ON DELETE CASCADE,
        date DATE NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS operations (
        id BIGSERIAL PRIMARY KEY,
        schedule_id BIGINT REFERENCES schedules(id) ON DELETE CASCADE,
        worker_id BIGINT REFERENCES workers(id) ON DELETE CASCADE,
        field_id BIGINT NOT NULL REFERENCES fields(id) ON DELETE CASCADE,
        type VARCHAR(100) NOT NULL,
        description TEXT,
        status VARCHAR(20) NOT NULL DEFAULT 'planned'
            CHECK (status IN ('planned', 'in_progress', 'completed', 'cancelled')),
        start_time TIMESTAMPTZ,
        end_time TIMESTAMPTZ,
        completed_at TIMESTAMPTZ,
        notes TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_schedules_worker_date ON schedules (worker_id, date)",
    "CREATE INDEX IF NOT EXISTS idx_operations_worker_start ON operations (worker_id, start_time)",
    "CREATE INDEX IF NOT EXISTS idx_operations_field_start ON operations (field_id, start_time)",
    "CREATE INDEX IF NOT EXISTS idx_operations_status ON operations (status)",
];

/// Apply the bootstrap schema
pub async fn apply(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!(statements = STATEMENTS.len(), "Schema applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(table: &str) -> usize {
        let needle = format!("CREATE TABLE IF NOT EXISTS {} ", table);
        STATEMENTS
            .iter()
            .position(|s| s.contains(&needle))
            .unwrap_or_else(|| panic!("missing table {table}"))
    }

    #[test]
    fn test_tables_precede_references() {
        assert!(position("workers") < position("schedules"));
        assert!(position("schedules") < position("operations"));
        assert!(position("fields") < position("operations"));
    }

    #[test]
    fn test_statements_are_idempotent() {
        for statement in STATEMENTS {
            assert!(statement.contains("IF NOT EXISTS"), "{statement}");
        }
    }
}
