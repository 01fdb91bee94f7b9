use sqlx::PgPool;

const MODE_PREFERENCE_KEY: &str = "analyst-mode-preference";

pub async fn get_mode_preference(pool: &PgPool) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        select
            value
        from
            configuration
        where
            key = $1
        "#,
    )
    .bind(MODE_PREFERENCE_KEY)
    .fetch_optional(pool)
    .await
}

pub async fn set_mode_preference(pool: &PgPool, mode: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        insert into configuration
            (key, value)
        values
            ($1, $2)
        on conflict(key) do update set
            value = $2,
            updated_at = now()
        "#,
    )
    .bind(MODE_PREFERENCE_KEY)
    .bind(mode)
    .execute(pool)
    .await?;

    Ok(())
}
