//! SQLite-backed entity store.
//!
//! Table layout matches the original inventory database (`product`, `location`,
//! `product_movement`), so an existing file can be opened directly.
//!
//! ## Atomicity
//!
//! Every mutating operation runs in one `BEGIN IMMEDIATE` transaction that
//! covers its existence and reference checks plus the write. The write lock is
//! taken up front, so concurrent writers queue on the busy timeout instead of
//! failing a lock upgrade. A failed operation rolls back (the transaction is
//! dropped without commit) and leaves the database unchanged. `snapshot` reads
//! all three tables inside one deferred transaction.
//!
//! File databases run in WAL mode so readers never block the writer.
//!
//! ## Legacy Rows
//!
//! Rows written by older versions load as-is: naive timestamps, empty-string
//! locations, movements with neither location, and zero or negative
//! quantities. Quantity checks apply to new input only.
//!
//! ## Error Mapping
//!
//! | Condition | Error |
//! |-----------|-------|
//! | id already present (checked, or unique violation on insert) | `Domain(DuplicateKey)` |
//! | edit of missing id | `Domain(NotFound)` |
//! | product/location reference missing | `Domain(InvalidReference)` |
//! | row fails domain validation on load | `CorruptRow` |
//! | any sqlx failure | `Database` |

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::instrument;

use stockroom_core::{
    DomainError, EntityKind, LocationId, MovementId, Name, ProductId, Quantity,
};
use stockroom_locations::{EditLocation, Location};
use stockroom_movements::{EditMovement, Movement};
use stockroom_products::{EditProduct, Product};

use super::{EntityStore, Snapshot, StoreError, StoreResult, sort_movements};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS product (
        product_id  VARCHAR(50)  NOT NULL PRIMARY KEY,
        name        VARCHAR(100) NOT NULL,
        description TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS location (
        location_id VARCHAR(50)  NOT NULL PRIMARY KEY,
        name        VARCHAR(100) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS product_movement (
        movement_id   VARCHAR(50) NOT NULL PRIMARY KEY,
        timestamp     DATETIME    NOT NULL,
        from_location VARCHAR(50) REFERENCES location (location_id),
        to_location   VARCHAR(50) REFERENCES location (location_id),
        product_id    VARCHAR(50) REFERENCES product (product_id),
        qty           INTEGER     NOT NULL
    )
    "#,
];

#[derive(Debug, FromRow)]
struct ProductRow {
    product_id: String,
    name: String,
    description: Option<String>,
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let corrupt = |e: DomainError| StoreError::CorruptRow {
            table: "product",
            message: e.to_string(),
        };
        Ok(Product::restore(
            ProductId::new(row.product_id).map_err(corrupt)?,
            Name::new(row.name).map_err(corrupt)?,
            row.description,
        ))
    }
}

#[derive(Debug, FromRow)]
struct LocationRow {
    location_id: String,
    name: String,
}

impl TryFrom<LocationRow> for Location {
    type Error = StoreError;

    fn try_from(row: LocationRow) -> Result<Self, Self::Error> {
        let corrupt = |e: DomainError| StoreError::CorruptRow {
            table: "location",
            message: e.to_string(),
        };
        Ok(Location::restore(
            LocationId::new(row.location_id).map_err(corrupt)?,
            Name::new(row.name).map_err(corrupt)?,
        ))
    }
}

#[derive(Debug, FromRow)]
struct MovementRow {
    movement_id: String,
    timestamp: DateTime<Utc>,
    from_location: Option<String>,
    to_location: Option<String>,
    product_id: Option<String>,
    qty: i64,
}

impl TryFrom<MovementRow> for Movement {
    type Error = StoreError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let corrupt = |e: DomainError| StoreError::CorruptRow {
            table: "product_movement",
            message: e.to_string(),
        };
        let product_id = row.product_id.ok_or_else(|| StoreError::CorruptRow {
            table: "product_movement",
            message: format!("movement '{}' has no product_id", row.movement_id),
        })?;
        // Legacy rows may hold empty strings where NULL was meant.
        let location = |v: Option<String>| -> StoreResult<Option<LocationId>> {
            match v.filter(|s| !s.trim().is_empty()) {
                Some(s) => Ok(Some(LocationId::new(s).map_err(corrupt)?)),
                None => Ok(None),
            }
        };
        Ok(Movement::restore(
            MovementId::new(row.movement_id).map_err(corrupt)?,
            row.timestamp,
            location(row.from_location)?,
            location(row.to_location)?,
            ProductId::new(product_id).map_err(corrupt)?,
            Quantity::from_stored(row.qty).map_err(corrupt)?,
        ))
    }
}

/// SQLite-backed entity store.
#[derive(Debug, Clone)]
pub struct SqliteEntityStore {
    pool: SqlitePool,
}

impl SqliteEntityStore {
    /// Connect (creating the database file if needed) and ensure the schema.
    ///
    /// In-memory URLs (`sqlite::memory:`) get a single long-lived connection,
    /// since every SQLite in-memory connection is its own database.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::database("connect", e))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);
        let options = if in_memory {
            options
        } else {
            options.journal_mode(SqliteJournalMode::Wal)
        };

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| StoreError::database("connect", e))?;

        let store = Self { pool };
        store.migrate().await?;
        tracing::info!(url, "sqlite entity store ready");
        Ok(store)
    }

    /// Create the tables if they do not exist.
    pub async fn migrate(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::database("migrate", e))?;
        }
        Ok(())
    }

    /// Deferred transaction, for reads.
    async fn begin(&self, operation: &'static str) -> StoreResult<sqlx::Transaction<'static, sqlx::Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| StoreError::database(operation, e))
    }

    /// Transaction holding the database write lock from its first statement.
    async fn begin_write(&self, operation: &'static str) -> StoreResult<sqlx::Transaction<'static, sqlx::Sqlite>> {
        self.pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| StoreError::database(operation, e))
    }
}

/// How long a writer waits for the write lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// Map an insert failure. A primary-key collision that got past the existence
/// check (another process writing the same file) is still a duplicate key.
fn insert_error(kind: EntityKind, id: &str, operation: &'static str, e: sqlx::Error) -> StoreError {
    let unique = e
        .as_database_error()
        .is_some_and(|d| d.is_unique_violation());
    if unique {
        DomainError::duplicate_key(kind, id).into()
    } else {
        StoreError::database(operation, e)
    }
}

async fn commit(tx: sqlx::Transaction<'static, sqlx::Sqlite>, operation: &'static str) -> StoreResult<()> {
    tx.commit()
        .await
        .map_err(|e| StoreError::database(operation, e))
}

async fn exists(
    conn: &mut SqliteConnection,
    sql: &'static str,
    id: &str,
    operation: &'static str,
) -> StoreResult<bool> {
    let found: i64 = sqlx::query_scalar(sql)
        .bind(id)
        .fetch_one(conn)
        .await
        .map_err(|e| StoreError::database(operation, e))?;
    Ok(found != 0)
}

const PRODUCT_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM product WHERE product_id = ?1)";
const LOCATION_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM location WHERE location_id = ?1)";
const MOVEMENT_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM product_movement WHERE movement_id = ?1)";

async fn check_references(
    conn: &mut SqliteConnection,
    product_id: &ProductId,
    from: Option<&LocationId>,
    to: Option<&LocationId>,
    operation: &'static str,
) -> StoreResult<()> {
    if !exists(&mut *conn, PRODUCT_EXISTS, product_id.as_str(), operation).await? {
        return Err(DomainError::invalid_reference(EntityKind::Product, product_id.as_str()).into());
    }
    for location_id in from.into_iter().chain(to) {
        if !exists(&mut *conn, LOCATION_EXISTS, location_id.as_str(), operation).await? {
            return Err(
                DomainError::invalid_reference(EntityKind::Location, location_id.as_str()).into(),
            );
        }
    }
    Ok(())
}

async fn fetch_products(conn: &mut SqliteConnection) -> StoreResult<Vec<Product>> {
    sqlx::query_as::<_, ProductRow>(
        "SELECT product_id, name, description FROM product ORDER BY product_id",
    )
    .fetch_all(conn)
    .await
    .map_err(|e| StoreError::database("list_products", e))?
    .into_iter()
    .map(Product::try_from)
    .collect()
}

async fn fetch_locations(conn: &mut SqliteConnection) -> StoreResult<Vec<Location>> {
    sqlx::query_as::<_, LocationRow>("SELECT location_id, name FROM location ORDER BY location_id")
        .fetch_all(conn)
        .await
        .map_err(|e| StoreError::database("list_locations", e))?
        .into_iter()
        .map(Location::try_from)
        .collect()
}

async fn fetch_movements(conn: &mut SqliteConnection) -> StoreResult<Vec<Movement>> {
    let mut movements = sqlx::query_as::<_, MovementRow>(
        r#"
        SELECT movement_id, timestamp, from_location, to_location, product_id, qty
        FROM product_movement
        "#,
    )
    .fetch_all(conn)
    .await
    .map_err(|e| StoreError::database("list_movements", e))?
    .into_iter()
    .map(Movement::try_from)
    .collect::<StoreResult<Vec<_>>>()?;
    // Sorted in Rust: stored timestamp text formats may differ between writers.
    sort_movements(&mut movements);
    Ok(movements)
}

async fn fetch_product(conn: &mut SqliteConnection, id: &ProductId) -> StoreResult<Option<Product>> {
    sqlx::query_as::<_, ProductRow>(
        "SELECT product_id, name, description FROM product WHERE product_id = ?1",
    )
    .bind(id.as_str())
    .fetch_optional(conn)
    .await
    .map_err(|e| StoreError::database("get_product", e))?
    .map(Product::try_from)
    .transpose()
}

async fn fetch_location(conn: &mut SqliteConnection, id: &LocationId) -> StoreResult<Option<Location>> {
    sqlx::query_as::<_, LocationRow>("SELECT location_id, name FROM location WHERE location_id = ?1")
        .bind(id.as_str())
        .fetch_optional(conn)
        .await
        .map_err(|e| StoreError::database("get_location", e))?
        .map(Location::try_from)
        .transpose()
}

async fn fetch_movement(conn: &mut SqliteConnection, id: &MovementId) -> StoreResult<Option<Movement>> {
    sqlx::query_as::<_, MovementRow>(
        r#"
        SELECT movement_id, timestamp, from_location, to_location, product_id, qty
        FROM product_movement
        WHERE movement_id = ?1
        "#,
    )
    .bind(id.as_str())
    .fetch_optional(conn)
    .await
    .map_err(|e| StoreError::database("get_movement", e))?
    .map(Movement::try_from)
    .transpose()
}

#[async_trait::async_trait]
impl EntityStore for SqliteEntityStore {
    #[instrument(skip_all, fields(product_id = %product.product_id()))]
    async fn create_product(&self, product: Product) -> StoreResult<Product> {
        let mut tx = self.begin_write("create_product").await?;
        if exists(&mut tx, PRODUCT_EXISTS, product.product_id().as_str(), "create_product").await? {
            return Err(DomainError::duplicate_key(EntityKind::Product, product.product_id().as_str()).into());
        }
        sqlx::query("INSERT INTO product (product_id, name, description) VALUES (?1, ?2, ?3)")
            .bind(product.product_id().as_str())
            .bind(product.name().as_str())
            .bind(product.description())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                insert_error(EntityKind::Product, product.product_id().as_str(), "create_product", e)
            })?;
        commit(tx, "create_product").await?;
        Ok(product)
    }

    async fn get_product(&self, id: &ProductId) -> StoreResult<Option<Product>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| StoreError::database("get_product", e))?;
        fetch_product(&mut conn, id).await
    }

    #[instrument(skip_all, fields(product_id = %id))]
    async fn update_product(&self, id: &ProductId, edit: EditProduct) -> StoreResult<Product> {
        let mut tx = self.begin_write("update_product").await?;
        let mut product = fetch_product(&mut tx, id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Product, id.as_str()))?;
        product.apply_edit(edit);
        sqlx::query("UPDATE product SET name = ?2, description = ?3 WHERE product_id = ?1")
            .bind(id.as_str())
            .bind(product.name().as_str())
            .bind(product.description())
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::database("update_product", e))?;
        commit(tx, "update_product").await?;
        Ok(product)
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| StoreError::database("list_products", e))?;
        fetch_products(&mut conn).await
    }

    #[instrument(skip_all, fields(location_id = %location.location_id()))]
    async fn create_location(&self, location: Location) -> StoreResult<Location> {
        let mut tx = self.begin_write("create_location").await?;
        if exists(&mut tx, LOCATION_EXISTS, location.location_id().as_str(), "create_location").await? {
            return Err(
                DomainError::duplicate_key(EntityKind::Location, location.location_id().as_str()).into(),
            );
        }
        sqlx::query("INSERT INTO location (location_id, name) VALUES (?1, ?2)")
            .bind(location.location_id().as_str())
            .bind(location.name().as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                insert_error(EntityKind::Location, location.location_id().as_str(), "create_location", e)
            })?;
        commit(tx, "create_location").await?;
        Ok(location)
    }

    async fn get_location(&self, id: &LocationId) -> StoreResult<Option<Location>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| StoreError::database("get_location", e))?;
        fetch_location(&mut conn, id).await
    }

    #[instrument(skip_all, fields(location_id = %id))]
    async fn update_location(&self, id: &LocationId, edit: EditLocation) -> StoreResult<Location> {
        let mut tx = self.begin_write("update_location").await?;
        let mut location = fetch_location(&mut tx, id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Location, id.as_str()))?;
        location.apply_edit(edit);
        sqlx::query("UPDATE location SET name = ?2 WHERE location_id = ?1")
            .bind(id.as_str())
            .bind(location.name().as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::database("update_location", e))?;
        commit(tx, "update_location").await?;
        Ok(location)
    }

    async fn list_locations(&self) -> StoreResult<Vec<Location>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| StoreError::database("list_locations", e))?;
        fetch_locations(&mut conn).await
    }

    #[instrument(skip_all, fields(movement_id = %movement.movement_id()))]
    async fn create_movement(&self, movement: Movement) -> StoreResult<Movement> {
        let mut tx = self.begin_write("create_movement").await?;
        if exists(&mut tx, MOVEMENT_EXISTS, movement.movement_id().as_str(), "create_movement").await? {
            return Err(
                DomainError::duplicate_key(EntityKind::Movement, movement.movement_id().as_str()).into(),
            );
        }
        check_references(
            &mut tx,
            movement.product_id(),
            movement.from_location(),
            movement.to_location(),
            "create_movement",
        )
        .await?;
        sqlx::query(
            r#"
            INSERT INTO product_movement
                (movement_id, timestamp, from_location, to_location, product_id, qty)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(movement.movement_id().as_str())
        .bind(movement.timestamp())
        .bind(movement.from_location().map(LocationId::as_str))
        .bind(movement.to_location().map(LocationId::as_str))
        .bind(movement.product_id().as_str())
        .bind(movement.qty().get())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            insert_error(EntityKind::Movement, movement.movement_id().as_str(), "create_movement", e)
        })?;
        commit(tx, "create_movement").await?;
        Ok(movement)
    }

    async fn get_movement(&self, id: &MovementId) -> StoreResult<Option<Movement>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| StoreError::database("get_movement", e))?;
        fetch_movement(&mut conn, id).await
    }

    #[instrument(skip_all, fields(movement_id = %id))]
    async fn update_movement(&self, id: &MovementId, edit: EditMovement) -> StoreResult<Movement> {
        let mut tx = self.begin_write("update_movement").await?;
        let mut movement = fetch_movement(&mut tx, id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Movement, id.as_str()))?;
        check_references(
            &mut tx,
            &edit.product_id,
            edit.from_location.as_ref(),
            edit.to_location.as_ref(),
            "update_movement",
        )
        .await?;
        movement.apply_edit(edit)?;
        sqlx::query(
            r#"
            UPDATE product_movement
            SET timestamp = ?2, from_location = ?3, to_location = ?4, product_id = ?5, qty = ?6
            WHERE movement_id = ?1
            "#,
        )
        .bind(id.as_str())
        .bind(movement.timestamp())
        .bind(movement.from_location().map(LocationId::as_str))
        .bind(movement.to_location().map(LocationId::as_str))
        .bind(movement.product_id().as_str())
        .bind(movement.qty().get())
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::database("update_movement", e))?;
        commit(tx, "update_movement").await?;
        Ok(movement)
    }

    async fn list_movements(&self) -> StoreResult<Vec<Movement>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| StoreError::database("list_movements", e))?;
        fetch_movements(&mut conn).await
    }

    async fn snapshot(&self) -> StoreResult<Snapshot> {
        let mut tx = self.begin("snapshot").await?;
        let products = fetch_products(&mut tx).await?;
        let locations = fetch_locations(&mut tx).await?;
        let movements = fetch_movements(&mut tx).await?;
        commit(tx, "snapshot").await?;
        Ok(Snapshot {
            products,
            locations,
            movements,
        })
    }
}
