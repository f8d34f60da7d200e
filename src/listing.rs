//! In-memory filter, sort and pagination of loaded collections
//!
//! Every management page holds a snapshot of its collection and derives the
//! rows to display from a [`ListQuery`]: a free-text search over the entity's
//! searchable fields, categorical filters, an optional sort and an optional page.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A named field value exposed by an entity for filtering and sorting.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Bool(bool),
    Date(DateTime<Utc>),
}

impl FieldValue {
    /// Compare two values of the same kind. Mixed kinds never compare.
    fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => {
                Some(a.to_lowercase().cmp(&b.to_lowercase()))
            }
            (FieldValue::Int(a), FieldValue::Int(b)) => Some(a.cmp(b)),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => Some(a.cmp(b)),
            (FieldValue::Date(a), FieldValue::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Exact match against a filter value coming from a query string.
    fn matches(&self, expected: &str) -> bool {
        let expected = expected.trim();
        match self {
            FieldValue::Text(v) => v.eq_ignore_ascii_case(expected),
            FieldValue::Int(v) => expected.parse::<i64>().map(|e| e == *v).unwrap_or(false),
            FieldValue::Bool(v) => match expected.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "active" => *v,
                "false" | "0" | "no" | "inactive" => !*v,
                _ => false,
            },
            FieldValue::Date(v) => v.to_rfc3339().starts_with(expected),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(v: &String) -> Self {
        FieldValue::Text(v.clone())
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v.into())
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::Date(v)
    }
}

/// Entities that can be searched, filtered and sorted by field name.
pub trait Listable {
    /// Fields matched by the free-text search.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Look up a field by name. `None` means the field is unknown or unset.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Whether `name` is a field of this entity at all.
    fn has_field(name: &str) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Parameters of one list view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListQuery {
    /// Free-text search, case-insensitive
    pub search: String,
    /// Field → expected value
    pub filters: BTreeMap<String, String>,
    pub sort: Option<SortSpec>,
    /// 1-based page number
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

const RESERVED_KEYS: &[&str] = &["q", "search", "sort", "dir", "page", "per_page"];

impl ListQuery {
    /// Build a query from console query-string parameters. Any key that is not
    /// one of `q`, `sort`, `dir`, `page`, `per_page` is a categorical filter.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let search = params
            .get("q")
            .or_else(|| params.get("search"))
            .cloned()
            .unwrap_or_default();

        let sort = params
            .get("sort")
            .filter(|s| !s.trim().is_empty())
            .map(|field| SortSpec {
                field: field.trim().to_string(),
                direction: match params.get("dir").map(|d| d.to_ascii_lowercase()) {
                    Some(d) if d == "desc" => SortDirection::Desc,
                    _ => SortDirection::Asc,
                },
            });

        let filters = params
            .iter()
            .filter(|(k, v)| !RESERVED_KEYS.contains(&k.as_str()) && !v.trim().is_empty())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            search,
            filters,
            sort,
            page: params.get("page").and_then(|p| p.parse().ok()),
            per_page: params.get("per_page").and_then(|p| p.parse().ok()),
        }
    }
}

/// Result of applying a [`ListQuery`] to a collection.
#[derive(Debug, Clone, Serialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    /// Number of matches before pagination
    pub total: usize,
    pub page: usize,
    pub per_page: Option<usize>,
    pub pages: usize,
}

/// Whether `item` contains `search` in one of its searchable fields.
pub fn matches_search<T: Listable>(item: &T, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    T::SEARCH_FIELDS.iter().any(|name| match item.field(name) {
        Some(FieldValue::Text(text)) => text.to_lowercase().contains(&needle),
        _ => false,
    })
}

fn matches_filters<T: Listable>(item: &T, filters: &BTreeMap<String, String>) -> bool {
    filters
        .iter()
        .filter(|(name, _)| T::has_field(name))
        .all(|(name, expected)| {
            item.field(name)
                .map(|value| value.matches(expected))
                .unwrap_or(false)
        })
}

/// Stable sort by `spec`. Unset values come first in both directions.
pub fn sort_items<T: Listable>(items: &mut [T], spec: &SortSpec) {
    if !T::has_field(&spec.field) {
        return;
    }
    items.sort_by(|a, b| {
        match (a.field(&spec.field), b.field(&spec.field)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = x.compare(&y).unwrap_or(Ordering::Equal);
                match spec.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
        }
    });
}

/// Filter, sort and paginate `items` according to `query`.
pub fn apply<T: Listable + Clone>(items: &[T], query: &ListQuery) -> Listing<T> {
    let mut matched: Vec<T> = items
        .iter()
        .filter(|item| matches_search(*item, &query.search))
        .filter(|item| matches_filters(*item, &query.filters))
        .cloned()
        .collect();

    if let Some(spec) = &query.sort {
        sort_items(&mut matched, spec);
    }

    let total = matched.len();
    match query.per_page.filter(|p| *p > 0) {
        None => Listing {
            items: matched,
            total,
            page: 1,
            per_page: None,
            pages: 1,
        },
        Some(per_page) => {
            let pages = total.div_ceil(per_page).max(1);
            let page = query.page.unwrap_or(1).clamp(1, pages);
            let items = matched
                .into_iter()
                .skip((page - 1) * per_page)
                .take(per_page)
                .collect();
            Listing {
                items,
                total,
                page,
                per_page: Some(per_page),
                pages,
            }
        }
    }
}
