use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::BootstrapSettings;
use crate::errors::InternalError;
use crate::errors::internal::DatabaseError;

/// Connect to the registry database
///
/// Does NOT run migrations - call `migrate_database()` separately.
pub async fn connect_database(
    bootstrap_settings: &BootstrapSettings,
) -> Result<DatabaseConnection, InternalError> {
    let database_url = bootstrap_settings.database_url();

    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .map_err(|e| InternalError::database("connect_database", e))?;

    tracing::debug!("Connected to database: {}", database_url);

    Ok(db)
}

/// Run all pending migrations
pub async fn migrate_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    Migrator::up(db, None)
        .await
        .map_err(|source| InternalError::Database(DatabaseError::Migration { source }))?;

    tracing::debug!("Database migrations completed");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;
    use sea_orm::{ConnectionTrait, Statement};

    #[tokio::test]
    async fn test_connect_and_migrate_in_memory() {
        let env = MockEnvironment::empty()
            .with_var("DATABASE_URL", "sqlite::memory:")
            .shared();
        let settings = BootstrapSettings::from_env_provider(env).unwrap();

        let db = connect_database(&settings).await.unwrap();
        migrate_database(&db).await.unwrap();

        let row = db
            .query_one(Statement::from_string(
                db.get_database_backend(),
                "SELECT COUNT(*) AS n FROM students".to_owned(),
            ))
            .await
            .unwrap()
            .unwrap();
        let count: i64 = row.try_get("", "n").unwrap();
        assert_eq!(count, 0);
    }
}
