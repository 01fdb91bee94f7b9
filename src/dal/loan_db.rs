use serde_json::Value;
use sqlx::PgPool;

use crate::domain::params::LoanQueryParams;

pub async fn get_loan_data_stats(
    pool: &PgPool,
    params: &LoanQueryParams,
) -> Result<Option<Value>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<Value>>(
        r#"
        select
            get_loan_data_stats(
                p_state => $1,
                p_zip_code => $2,
                p_naics_prefixes => $3,
                p_zip_range => $4
            )::jsonb
        "#,
    )
    .bind(params.state.as_deref())
    .bind(params.zip_code)
    .bind(params.naics_prefixes.as_slice())
    .bind(params.zip_range)
    .fetch_one(pool)
    .await
}

pub async fn get_loan_stats(
    pool: &PgPool,
    params: &LoanQueryParams,
) -> Result<Option<Value>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<Value>>(
        r#"
        select
            get_loan_stats(
                p_state => $1,
                p_zip_code => $2,
                p_naics_prefixes => $3,
                p_zip_range => $4
            )::jsonb
        "#,
    )
    .bind(params.state.as_deref())
    .bind(params.zip_code)
    .bind(params.naics_prefixes.as_slice())
    .bind(params.zip_range)
    .fetch_one(pool)
    .await
}

pub async fn get_top_banks_info(
    pool: &PgPool,
    params: &LoanQueryParams,
    top_n: i32,
) -> Result<Option<Value>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<Value>>(
        r#"
        select
            get_top_banks_info(
                p_state => $1,
                p_zip_code => $2,
                p_naics_prefixes => $3,
                p_zip_range => $4,
                p_top_n => $5
            )::jsonb
        "#,
    )
    .bind(params.state.as_deref())
    .bind(params.zip_code)
    .bind(params.naics_prefixes.as_slice())
    .bind(params.zip_range)
    .bind(top_n)
    .fetch_one(pool)
    .await
}
