use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Item, ItemFilter, ItemId, ItemStatus, ItemStoreError, Market, Page, PageRequest, Result,
    SortField, Version,
    store::{ItemStore, ReplaceOptions},
};

const ITEM_COLUMNS: &str =
    "id, name, description, market, price, stock, status, version, created_at, updated_at";

/// PostgreSQL-backed item store implementation.
#[derive(Clone)]
pub struct PostgresItemStore {
    pool: PgPool,
}

impl PostgresItemStore {
    /// Creates a new PostgreSQL item store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        tracing::info!("item store migrations applied");
        Ok(())
    }

    fn row_to_item(row: PgRow) -> Result<Item> {
        let market: String = row.try_get("market")?;
        let status: String = row.try_get("status")?;

        Ok(Item {
            id: ItemId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            market: Market::parse(market.trim())
                .map_err(|e| ItemStoreError::Decode(e.to_string()))?,
            price: row.try_get::<Decimal, _>("price")?,
            stock: row.try_get("stock")?,
            status: ItemStatus::from_name(&status)
                .map_err(|e| ItemStoreError::Decode(e.to_string()))?,
            version: Version::new(row.try_get("version")?),
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }

    /// Builds the `ORDER BY` clause for a page request.
    ///
    /// Column and direction come from closed enums, never from raw input.
    /// Text columns compare bytewise so pages order the same as the
    /// in-memory store whatever the database collation is.
    fn order_by(request: &PageRequest) -> String {
        let collate = match request.sort() {
            SortField::Name | SortField::Market | SortField::Status => " COLLATE \"C\"",
            _ => "",
        };
        format!(
            " ORDER BY {}{collate} {}, id ASC",
            request.sort().column(),
            request.direction().as_str()
        )
    }

    /// Appends the WHERE clause for `filter` and returns the next free
    /// parameter index.
    fn push_filter(sql: &mut String, filter: &ItemFilter) -> usize {
        let mut param_count = 0;

        sql.push_str(" WHERE 1=1");
        if filter.name.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND name ILIKE ${param_count}"));
        }
        if filter.market.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND market = UPPER(${param_count})"));
        }
        if filter.status.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND status = ${param_count}"));
        }

        param_count
    }

    fn bind_filter<'q>(
        mut query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
        filter: &ItemFilter,
    ) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
        if let Some(ref name) = filter.name {
            query = query.bind(format!("%{}%", escape_like(name)));
        }
        if let Some(ref market) = filter.market {
            query = query.bind(market.clone());
        }
        if let Some(status) = filter.status {
            query = query.bind(status.as_str());
        }
        query
    }
}

/// Escapes LIKE wildcards so the filter matches them literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl ItemStore for PostgresItemStore {
    async fn find(&self, id: ItemId) -> Result<Option<Item>> {
        let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_item).transpose()
    }

    async fn insert(&self, item: Item) -> Result<Item> {
        let item_id = item.id;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO items ({ITEM_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(item.id.as_uuid())
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.market.as_str())
        .bind(item.price)
        .bind(item.stock)
        .bind(item.status.as_str())
        .bind(Version::first().as_i64())
        .bind(item.created_at)
        .bind(item.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return ItemStoreError::DuplicateId(item_id);
            }
            ItemStoreError::Database(e)
        })?;

        Self::row_to_item(row)
    }

    async fn replace(&self, item: Item, options: ReplaceOptions) -> Result<Item> {
        let mut sql = String::from(
            r#"
            UPDATE items
            SET name = $2, description = $3, market = $4, price = $5, stock = $6,
                status = $7, updated_at = $8, version = version + 1
            WHERE id = $1
            "#,
        );
        if options.expected_version.is_some() {
            sql.push_str(" AND version = $9");
        }
        sql.push_str(&format!(" RETURNING {ITEM_COLUMNS}"));

        let mut query = sqlx::query(&sql)
            .bind(item.id.as_uuid())
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.market.as_str())
            .bind(item.price)
            .bind(item.stock)
            .bind(item.status.as_str())
            .bind(item.updated_at);
        if let Some(expected) = options.expected_version {
            query = query.bind(expected.as_i64());
        }

        if let Some(row) = query.fetch_optional(&self.pool).await? {
            return Self::row_to_item(row);
        }

        // Nothing updated: either the row is gone or its version moved on
        let actual: Option<i64> = sqlx::query_scalar("SELECT version FROM items WHERE id = $1")
            .bind(item.id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        match (actual, options.expected_version) {
            (Some(actual), Some(expected)) => {
                tracing::debug!(item_id = %item.id, %expected, actual, "stale item version");
                Err(ItemStoreError::ConcurrencyConflict {
                    item_id: item.id,
                    expected,
                    actual: Version::new(actual),
                })
            }
            _ => Err(ItemStoreError::NotFound(item.id)),
        }
    }

    async fn delete(&self, id: ItemId) -> Result<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ItemStoreError::NotFound(id));
        }
        Ok(())
    }

    async fn list(&self, filter: ItemFilter, request: PageRequest) -> Result<Page<Item>> {
        let mut count_sql = String::from("SELECT COUNT(*) FROM items");
        Self::push_filter(&mut count_sql, &filter);

        let total: i64 = Self::bind_filter(sqlx::query(&count_sql), &filter)
            .fetch_one(&self.pool)
            .await?
            .try_get(0)?;

        let mut sql = format!("SELECT {ITEM_COLUMNS} FROM items");
        let mut param_count = Self::push_filter(&mut sql, &filter);

        sql.push_str(&Self::order_by(&request));
        param_count += 1;
        sql.push_str(&format!(" LIMIT ${param_count}"));
        param_count += 1;
        sql.push_str(&format!(" OFFSET ${param_count}"));

        let rows = Self::bind_filter(sqlx::query(&sql), &filter)
            .bind(i64::from(request.size()))
            .bind(i64::try_from(request.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        let content = rows
            .into_iter()
            .map(Self::row_to_item)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::new(content, &request, total.max(0) as u64))
    }
}
