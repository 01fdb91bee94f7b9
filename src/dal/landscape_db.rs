use serde_json::Value;
use sqlx::PgPool;

pub async fn analyze_competitive_landscape_by_zip(
    pool: &PgPool,
    zip_code: &str,
    naics_code: &str,
    employee_count: i32,
) -> Result<Option<Value>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<Value>>(
        r#"
        select
            analyze_competitive_landscape_by_zip(
                p_zip_code => $1,
                p_naics_code => $2,
                p_company_employee_count => $3
            )::jsonb
        "#,
    )
    .bind(zip_code)
    .bind(naics_code)
    .bind(employee_count)
    .fetch_one(pool)
    .await
}

pub async fn analyze_competitive_landscape_by_state(
    pool: &PgPool,
    state_abbr: &str,
    naics_code: &str,
    employee_count: i32,
) -> Result<Option<Value>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<Value>>(
        r#"
        select
            analyze_competitive_landscape_by_state(
                p_state_abbr => $1,
                p_naics_code => $2,
                p_company_employee_count => $3
            )::jsonb
        "#,
    )
    .bind(state_abbr)
    .bind(naics_code)
    .bind(employee_count)
    .fetch_one(pool)
    .await
}
