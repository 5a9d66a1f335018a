use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, types::Json};

use super::{Document, DocumentStore, Filter, StoreError, UpdateResult, WriteOp, merge_upsert};

/// Postgres-backed document store.
///
/// All collections share the `documents` table; rows are scoped by
/// `namespace` (the configured database name) and `collection`. Filters are
/// evaluated with JSONB containment, so only top-level equality is supported.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    namespace: String,
}

impl PgStore {
    pub fn new(pool: PgPool, namespace: impl Into<String>) -> Self {
        Self {
            pool,
            namespace: namespace.into(),
        }
    }
}

async fn insert(
    conn: &mut PgConnection,
    namespace: &str,
    collection: &str,
    document: &Document,
) -> Result<(), StoreError> {
    sqlx::query("INSERT INTO documents (namespace, collection, body) VALUES ($1, $2, $3)")
        .bind(namespace)
        .bind(collection)
        .bind(Json(document))
        .execute(&mut *conn)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Duplicate(collection.to_string())
            }
            other => StoreError::Database(other),
        })?;
    Ok(())
}

async fn update(
    conn: &mut PgConnection,
    namespace: &str,
    collection: &str,
    filter: &Filter,
    set: Document,
    upsert: bool,
) -> Result<UpdateResult, StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE documents
        SET body = body || $4
        WHERE id = (
            SELECT id FROM documents
            WHERE namespace = $1 AND collection = $2 AND body @> $3
            ORDER BY id
            LIMIT 1
            FOR UPDATE
        )
        "#,
    )
    .bind(namespace)
    .bind(collection)
    .bind(Json(filter.as_document()))
    .bind(Json(&set))
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() > 0 {
        return Ok(UpdateResult {
            matched: result.rows_affected(),
            upserted: false,
        });
    }
    if upsert {
        insert(conn, namespace, collection, &merge_upsert(filter, set)).await?;
    }
    Ok(UpdateResult {
        matched: 0,
        upserted: upsert,
    })
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_scalar::<_, Json<Document>>(
            r#"
            SELECT body FROM documents
            WHERE namespace = $1 AND collection = $2 AND body @> $3
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(&self.namespace)
        .bind(collection)
        .bind(Json(filter.as_document()))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|Json(body)| body))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_scalar::<_, Json<Document>>(
            r#"
            SELECT body FROM documents
            WHERE namespace = $1 AND collection = $2 AND body @> $3
            ORDER BY id
            "#,
        )
        .bind(&self.namespace)
        .bind(collection)
        .bind(Json(filter.as_document()))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(body)| body).collect())
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        insert(&mut conn, &self.namespace, collection, &document).await
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for document in &documents {
            insert(&mut tx, &self.namespace, collection, document).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateResult, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = update(&mut tx, &self.namespace, collection, filter, set, upsert).await?;
        tx.commit().await?;
        Ok(result)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM documents WHERE namespace = $1 AND collection = $2 AND body @> $3",
        )
        .bind(&self.namespace)
        .bind(collection)
        .bind(Json(filter.as_document()))
        .fetch_one(&self.pool)
        .await?;
        Ok(total.max(0) as u64)
    }

    async fn commit(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for op in ops {
            match op {
                WriteOp::Insert {
                    collection,
                    document,
                } => insert(&mut tx, &self.namespace, &collection, &document).await?,
                WriteOp::Update {
                    collection,
                    filter,
                    set,
                    upsert,
                } => {
                    update(&mut tx, &self.namespace, &collection, &filter, set, upsert).await?;
                }
            }
        }
        tx.commit().await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
