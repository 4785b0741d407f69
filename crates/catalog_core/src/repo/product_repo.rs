//! Product repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the five store primitives over the `products` table: insert,
//!   count, paged list, single lookup and update-by-id.
//! - Keep SQL and price encoding inside the persistence boundary.
//!
//! # Invariants
//! - Listing and counting only consider `available = 1` rows.
//! - Listing order is `id ASC`, so pages are stable and disjoint.
//! - Update-by-id does not filter on availability; visibility gating is the
//!   service's job.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::product::{to_price_scale, NewProduct, Product, ProductId, ProductPatch};
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    price,
    available,
    created_at,
    updated_at
FROM products";

const REQUIRED_COLUMNS: [&str; 6] = [
    "id",
    "name",
    "price",
    "available",
    "created_at",
    "updated_at",
];

/// Characters the `products.name` CHECK strips before testing for emptiness.
const NAME_PADDING: [char; 6] = [' ', '\t', '\n', '\u{0B}', '\u{0C}', '\r'];

const NOW_MS_SQL: &str = "(CAST(strftime('%s', 'now') AS INTEGER) * 1000)";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for product persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ProductId),
    InvalidData(String),
    UnrepresentablePrice(Decimal),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "product row not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted product data: {message}"),
            Self::UnrepresentablePrice(price) => {
                write!(f, "price `{price}` cannot be stored with fixed scale")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db first"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store primitives required by the catalog service.
pub trait ProductRepository {
    /// Inserts an available product and returns the generated id.
    fn insert_product(&self, product: &NewProduct) -> RepoResult<ProductId>;
    /// Counts available products.
    fn count_available(&self) -> RepoResult<u64>;
    /// Lists available products in `id` order, skipping `offset` rows.
    fn list_available(&self, offset: u64, limit: u32) -> RepoResult<Vec<Product>>;
    /// Finds one product by id, optionally including soft-deleted rows.
    fn find_product(&self, id: ProductId, include_unavailable: bool)
        -> RepoResult<Option<Product>>;
    /// Applies the present patch fields to the row with `id`.
    fn update_product(&self, id: ProductId, patch: &ProductPatch) -> RepoResult<()>;
    /// Sets the availability flag on the row with `id`.
    fn set_available(&self, id: ProductId, available: bool) -> RepoResult<()>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Wraps a connection already known to be migrated.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Wraps a connection after checking schema version and table shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self::new(conn))
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn insert_product(&self, product: &NewProduct) -> RepoResult<ProductId> {
        self.conn.execute(
            &format!(
                "INSERT INTO products (name, price, available, created_at, updated_at)
                 VALUES (?1, ?2, 1, {NOW_MS_SQL}, {NOW_MS_SQL});"
            ),
            params![product.name.as_str(), price_to_db(product.price)?],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn count_available(&self) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM products WHERE available = 1;",
            [],
            |row| row.get(0),
        )?;

        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative product count `{count}`")))
    }

    fn list_available(&self, offset: u64, limit: u32) -> RepoResult<Vec<Product>> {
        // An offset past i64::MAX cannot match any row anyway.
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);

        let mut stmt = self.conn.prepare(&format!(
            "{PRODUCT_SELECT_SQL}
             WHERE available = 1
             ORDER BY id ASC
             LIMIT ?1 OFFSET ?2;"
        ))?;

        let mut rows = stmt.query(params![i64::from(limit), offset])?;
        let mut products = Vec::new();
        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }

    fn find_product(
        &self,
        id: ProductId,
        include_unavailable: bool,
    ) -> RepoResult<Option<Product>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PRODUCT_SELECT_SQL}
             WHERE id = ?1
               AND (?2 = 1 OR available = 1);"
        ))?;

        let mut rows = stmt.query(params![id, bool_to_int(include_unavailable)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }

        Ok(None)
    }

    fn update_product(&self, id: ProductId, patch: &ProductPatch) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE products
                 SET
                    name = COALESCE(?2, name),
                    price = COALESCE(?3, price),
                    updated_at = {NOW_MS_SQL}
                 WHERE id = ?1;"
            ),
            params![
                id,
                patch.name.as_deref(),
                patch.price.map(price_to_db).transpose()?
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn set_available(&self, id: ProductId, available: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE products
                 SET
                    available = ?2,
                    updated_at = {NOW_MS_SQL}
                 WHERE id = ?1;"
            ),
            params![id, bool_to_int(available)],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let id: ProductId = row.get("id")?;

    let name: String = row.get("name")?;
    if name.trim_matches(&NAME_PADDING[..]).is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty name in products.name for id {id}"
        )));
    }

    let price_text: String = row.get("price")?;
    let price = Decimal::from_str(&price_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid price value `{price_text}` in products.price for id {id}"
        ))
    })?;

    let available = match row.get::<_, i64>("available")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid available value `{other}` in products.available for id {id}"
            )));
        }
    };

    Ok(Product {
        id,
        name,
        price,
        available,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Encodes a price as fixed-scale text, e.g. `10` -> `"10.0000"`.
fn price_to_db(price: Decimal) -> RepoResult<String> {
    to_price_scale(price)
        .map(|scaled| scaled.to_string())
        .ok_or(RepoError::UnrepresentablePrice(price))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "products")? {
        return Err(RepoError::MissingRequiredTable("products"));
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "products", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "products",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
