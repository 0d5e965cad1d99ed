//! Search / filter / sort / paginate query builder.
//!
//! Builds a dynamic `WHERE` clause with positional binds (same approach as a
//! hand-written search query, generalized over [`Filterable`] row types) and
//! runs a `COUNT(*)` plus a page query with identical conditions.

use catalog_core::listing::{like_pattern, ListQuery, Page};
use catalog_core::types::EntityId;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::capabilities::Filterable;

/// A value bound to a positional parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Bool(bool),
    SmallInt(i16),
    Ids(Vec<EntityId>),
}

/// One entity-specific filter condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column = $n`
    Equals {
        column: &'static str,
        value: BindValue,
    },
    /// Row is linked through `junction` to at least one of `ids`.
    RelatedToAny {
        junction: &'static str,
        owner_column: &'static str,
        related_column: &'static str,
        ids: Vec<EntityId>,
    },
}

impl Condition {
    /// Render the condition as SQL, pushing its bind values onto `binds`.
    fn to_sql(&self, binds: &mut Vec<BindValue>) -> String {
        match self {
            Condition::Equals { column, value } => {
                binds.push(value.clone());
                format!("{column} = ${}", binds.len())
            }
            Condition::RelatedToAny {
                junction,
                owner_column,
                related_column,
                ids,
            } => {
                binds.push(BindValue::Ids(ids.clone()));
                format!(
                    "id IN (SELECT {owner_column} FROM {junction} \
                     WHERE {related_column} = ANY(${}))",
                    binds.len()
                )
            }
        }
    }
}

/// `WHERE` clause body and bind values for a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// Build the conditions shared by the count and page queries:
/// live rows, optional search, then entity filters.
pub fn build_where<T: Filterable>(query: &ListQuery, filter: &T::Filter) -> WhereClause {
    let mut conditions = vec!["deleted_at IS NULL".to_string()];
    let mut binds = Vec::new();

    if let Some(search) = query.search.as_deref() {
        binds.push(BindValue::Text(like_pattern(search)));
        let idx = binds.len();
        let matches: Vec<String> = T::SEARCH_COLUMNS
            .iter()
            .map(|column| format!("{column} ILIKE ${idx}"))
            .collect();
        conditions.push(format!("({})", matches.join(" OR ")));
    }

    for condition in T::filter_conditions(filter) {
        conditions.push(condition.to_sql(&mut binds));
    }

    WhereClause {
        sql: conditions.join(" AND "),
        binds,
    }
}

/// `ORDER BY` body. Unknown sort columns fall back to insertion order.
pub fn build_order_by<T: Filterable>(query: &ListQuery) -> String {
    match query.sort_column(T::SORTABLE_COLUMNS) {
        Some(column) => format!(
            "{column} {}, created_at ASC, id ASC",
            query.dir.as_sql()
        ),
        None => "created_at ASC, id ASC".to_string(),
    }
}

/// Run a filtered, sorted, paginated listing of `T`.
pub async fn list_page<T: Filterable>(
    pool: &PgPool,
    query: &ListQuery,
    filter: &T::Filter,
) -> Result<Page<T>, sqlx::Error> {
    let clause = build_where::<T>(query, filter);

    let count_sql = format!("SELECT COUNT(*) FROM {} WHERE {}", T::TABLE, clause.sql);
    let (total,): (i64,) = bind_all(sqlx::query_as::<_, (i64,)>(&count_sql), &clause.binds)
        .fetch_one(pool)
        .await?;

    let limit_idx = clause.binds.len() + 1;
    let page_sql = format!(
        "SELECT {} FROM {} WHERE {} ORDER BY {} LIMIT ${limit_idx} OFFSET ${}",
        T::COLUMNS,
        T::TABLE,
        clause.sql,
        build_order_by::<T>(query),
        limit_idx + 1,
    );
    let rows = bind_all(sqlx::query_as::<_, T>(&page_sql), &clause.binds)
        .bind(query.per_page)
        .bind(query.offset())
        .fetch_all(pool)
        .await?;

    tracing::debug!(
        entity = T::ENTITY,
        total,
        page = query.page,
        rows = rows.len(),
        "Listed page"
    );
    Ok(Page::new(query, rows, total))
}

/// Bind dynamic parameters in order.
fn bind_all<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    binds: &[BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in binds {
        query = match value {
            BindValue::Text(v) => query.bind(v.clone()),
            BindValue::Bool(v) => query.bind(*v),
            BindValue::SmallInt(v) => query.bind(*v),
            BindValue::Ids(v) => query.bind(v.clone()),
        };
    }
    query
}
