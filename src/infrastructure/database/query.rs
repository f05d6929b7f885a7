//! Executes a resolved [`ListQuery`] against one table

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};

use crate::domain::{ListQuery, SearchTarget};
use crate::shared::SortOrder;

/// Apply search, count the matches, then fetch the requested page.
///
/// The count runs on the filtered but unpaginated select, so `total` never
/// depends on `page` or `page_size`. Ties in the requested order are broken
/// by ascending `id`, which keeps consecutive pages disjoint.
pub async fn fetch_page<E, C>(
    db: &C,
    select: Select<E>,
    query: &ListQuery<E::Column>,
    default_order: E::Column,
    id: E::Column,
) -> Result<(Vec<E::Model>, u64), DbErr>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    let select = match &query.search {
        Some(search) => {
            let pattern = search.pattern();
            match &search.target {
                SearchTarget::Field(column) => select.filter(column.like(pattern)),
                SearchTarget::AnyOf(columns) => select.filter(
                    columns
                        .iter()
                        .fold(Condition::any(), |cond, column| {
                            cond.add(column.like(pattern.as_str()))
                        }),
                ),
            }
        }
        None => select,
    };

    let total = select.clone().count(db).await?;

    let select = match query.sort {
        Some((column, SortOrder::Asc)) => select.order_by_asc(column),
        Some((column, SortOrder::Desc)) => select.order_by_desc(column),
        None => select.order_by_desc(default_order),
    };

    let rows = select
        .order_by_asc(id)
        .offset(query.offset())
        .limit(query.page_size)
        .all(db)
        .await?;

    Ok((rows, total))
}
