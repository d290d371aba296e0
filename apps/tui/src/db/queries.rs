use sqlx::{query, query_as, SqlitePool};
use tour_itinerary::{Language, MapScope};

use crate::db::models::{PreferenceKey, PreferenceRecord, Preferences};

pub async fn get_preference(
    pool: &SqlitePool,
    key: PreferenceKey,
) -> Result<Option<PreferenceRecord>, sqlx::Error> {
    query_as::<_, PreferenceRecord>("SELECT key, value, updated FROM preferences WHERE key = ?")
        .bind(key.as_str())
        .fetch_optional(pool)
        .await
}

/// Inserts or replaces a preference, stamping it with the current time.
pub async fn set_preference(
    pool: &SqlitePool,
    key: PreferenceKey,
    value: &str,
) -> Result<(), sqlx::Error> {
    let updated = chrono::Utc::now().to_rfc3339();
    query(
        "INSERT INTO preferences (key, value, updated) VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated = excluded.updated",
    )
    .bind(key.as_str())
    .bind(value)
    .bind(updated)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn load_preferences(pool: &SqlitePool) -> Result<Preferences, sqlx::Error> {
    let language = get_preference(pool, PreferenceKey::Language)
        .await?
        .and_then(|record| Language::parse(&record.value));
    let scope = get_preference(pool, PreferenceKey::Scope)
        .await?
        .and_then(|record| MapScope::parse(&record.value));

    Ok(Preferences { language, scope })
}

pub async fn save_preferences(pool: &SqlitePool, prefs: &Preferences) -> Result<(), sqlx::Error> {
    if let Some(language) = prefs.language {
        set_preference(pool, PreferenceKey::Language, language.as_str()).await?;
    }
    if let Some(scope) = prefs.scope {
        set_preference(pool, PreferenceKey::Scope, scope.as_str()).await?;
    }
    Ok(())
}
