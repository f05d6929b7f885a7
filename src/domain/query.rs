//! List query resolution
//!
//! Turns a raw [`PageRequest`] into a [`ListQuery`] whose sort and search
//! targets are concrete columns taken from a closed, per-resource field map.
//! Unknown field names are rejected here, before anything touches the
//! database.

use crate::domain::{DomainError, DomainResult, FieldKind};
use crate::shared::{page_offset, PageRequest, SortOrder};

/// Allow-list of public field names and the column each one maps to
pub type FieldMap<C> = &'static [(&'static str, C)];

/// Look up `name` in `fields` (ASCII case-insensitive).
pub fn resolve_field<C: Copy>(fields: FieldMap<C>, name: &str) -> Option<C> {
    fields
        .iter()
        .find(|(field, _)| field.eq_ignore_ascii_case(name))
        .map(|(_, column)| *column)
}

/// Where a keyword is matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget<C> {
    /// A single allow-listed column
    Field(C),
    /// Every searchable column, combined with OR
    AnyOf(Vec<C>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Search<C> {
    pub keyword: String,
    pub target: SearchTarget<C>,
}

impl<C> Search<C> {
    /// `%keyword%` pattern used for LIKE matching
    pub fn pattern(&self) -> String {
        format!("%{}%", self.keyword)
    }
}

/// A fully validated list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<C> {
    pub page: u64,
    pub page_size: u64,
    /// `None` means the resource's default order
    pub sort: Option<(C, SortOrder)>,
    pub search: Option<Search<C>>,
}

impl<C: Copy> ListQuery<C> {
    pub fn resolve(
        request: &PageRequest,
        sortable: FieldMap<C>,
        searchable: FieldMap<C>,
    ) -> DomainResult<Self> {
        let sort = match request.sort_by() {
            Some(name) => {
                let column = resolve_field(sortable, name).ok_or_else(|| {
                    DomainError::InvalidField {
                        kind: FieldKind::Sort,
                        field: name.to_string(),
                    }
                })?;
                Some((column, request.sort_order()))
            }
            None => None,
        };

        let search_field = match request.search_by() {
            Some(name) => Some(resolve_field(searchable, name).ok_or_else(|| {
                DomainError::InvalidField {
                    kind: FieldKind::Search,
                    field: name.to_string(),
                }
            })?),
            None => None,
        };

        let search = request.keyword().and_then(|keyword| {
            let target = match search_field {
                Some(column) => SearchTarget::Field(column),
                None if searchable.is_empty() => return None,
                None => SearchTarget::AnyOf(searchable.iter().map(|(_, c)| *c).collect()),
            };
            Some(Search {
                keyword: keyword.to_string(),
                target,
            })
        });

        Ok(Self {
            page: request.page(),
            page_size: request.page_size(),
            sort,
            search,
        })
    }

    pub fn offset(&self) -> u64 {
        page_offset(self.page, self.page_size)
    }
}
