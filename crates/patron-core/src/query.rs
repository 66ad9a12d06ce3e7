//! # Customer Query
//!
//! Typed parameters for listing customers: paging, filters and sorting.
//!
//! ## Paging Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Page Window Resolution                             │
//! │                                                                         │
//! │  max     absent ──► 10                                                 │
//! │          present ─► clamp(max, 1, 100)                                 │
//! │                                                                         │
//! │  offset  page present ──► (page - 1) * max                             │
//! │          else ──────────► offset, or 0                                 │
//! │                                                                         │
//! │  report  present ──► no LIMIT / OFFSET at all (exports)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sorting
//! Only fields in [`SortField`] can be sorted on. Each maps to a fixed
//! column name, so a caller-supplied string never reaches the ORDER BY
//! clause.
//!
//! ## Loose Parameters
//! Request layers that only have a JSON map can use
//! [`CustomerQuery::from_params`]. It recognizes `max`, `page`, `offset`,
//! `company`, `customerType`, `filter`, `order`, `sort` and `report`, and
//! ignores every other key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::validation::ValidationResult;
use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

// =============================================================================
// Sorting
// =============================================================================

/// Customer fields a listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Id,
    Name,
    FullName,
    TaxId,
    Email,
    Contact,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Id,
        SortField::Name,
        SortField::FullName,
        SortField::TaxId,
        SortField::Email,
        SortField::Contact,
    ];

    /// Column in the `customers` table.
    pub const fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::FullName => "full_name",
            SortField::TaxId => "tax_id",
            SortField::Email => "email",
            SortField::Contact => "contact",
        }
    }

    /// Name used in request parameters.
    pub const fn param_name(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::FullName => "fullName",
            SortField::TaxId => "taxId",
            SortField::Email => "email",
            SortField::Contact => "contact",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param_name())
    }
}

impl FromStr for SortField {
    type Err = ValidationError;

    /// Accepts either the parameter name (`fullName`) or the column name
    /// (`full_name`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SortField::ALL
            .into_iter()
            .find(|field| field.param_name() == s || field.column() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "order".to_string(),
                allowed: SortField::ALL
                    .iter()
                    .map(|field| field.param_name().to_string())
                    .collect(),
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `"desc"` (any case) sorts descending, anything else ascending.
    pub fn from_param(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A sort field together with its direction.
///
/// Keeping both in one value means a direction can never be given without
/// a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

// =============================================================================
// Pagination
// =============================================================================

/// The LIMIT / OFFSET window of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u64,
}

// =============================================================================
// Customer Query
// =============================================================================

/// Parameters of a customer listing.
///
/// Every field is optional; `CustomerQuery::default()` lists the first page
/// of all customers ordered by id.
///
/// ## Example
/// ```rust
/// use patron_core::query::{CustomerQuery, SortDirection, SortField};
///
/// let query = CustomerQuery::new()
///     .company(1)
///     .filter("acme")
///     .order_by(SortField::Email, SortDirection::Asc)
///     .page(2);
///
/// let window = query.pagination().unwrap();
/// assert_eq!(window.limit, 10);
/// assert_eq!(window.offset, 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerQuery {
    /// Requested page size (clamped to 1..=100, default 10).
    pub max: Option<u32>,

    /// 1-based page number; wins over `offset`.
    pub page: Option<u32>,

    /// Explicit row offset, used only when `page` is absent.
    pub offset: Option<u32>,

    /// Owning company id.
    pub company: Option<i64>,

    /// Customer type id.
    pub customer_type: Option<i64>,

    /// Case-insensitive substring matched against name, full name, tax id,
    /// email and contact.
    pub filter: Option<String>,

    pub sort: Option<Sort>,

    /// Lift paging entirely (full exports).
    pub report: bool,
}

impl CustomerQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn company(mut self, company_id: i64) -> Self {
        self.company = Some(company_id);
        self
    }

    pub fn customer_type(mut self, customer_type_id: i64) -> Self {
        self.customer_type = Some(customer_type_id);
        self
    }

    /// Text filter. Surrounding whitespace is ignored and a blank filter
    /// matches everything; inner spaces are kept.
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn order_by(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort = Some(Sort { field, direction });
        self
    }

    pub fn report(mut self) -> Self {
        self.report = true;
        self
    }

    /// Effective page size.
    ///
    /// Clamping is idempotent: feeding the result back in as `max` yields
    /// the same value.
    pub fn page_size(&self) -> u32 {
        self.max
            .map_or(DEFAULT_PAGE_SIZE, |max| max.clamp(1, MAX_PAGE_SIZE))
    }

    /// Effective row offset: `(page - 1) * page_size` when a page is given,
    /// otherwise the explicit offset or 0.
    pub fn effective_offset(&self) -> u64 {
        match self.page {
            Some(page) => u64::from(page.saturating_sub(1)) * u64::from(self.page_size()),
            None => u64::from(self.offset.unwrap_or(0)),
        }
    }

    /// The LIMIT / OFFSET window, or `None` for report queries.
    pub fn pagination(&self) -> Option<Pagination> {
        if self.report {
            return None;
        }

        Some(Pagination {
            limit: self.page_size(),
            offset: self.effective_offset(),
        })
    }

    /// LIKE pattern for the text filter, or `None` when no filter applies.
    ///
    /// The filter is trimmed and lowercased to match the stored search
    /// text. `%`, `_` and `\` typed by the user are escaped (with `\`) so
    /// they match literally.
    pub fn filter_pattern(&self) -> Option<String> {
        let filter = self.filter.as_deref()?.trim().to_lowercase();
        if filter.is_empty() {
            return None;
        }

        let mut pattern = String::with_capacity(filter.len() + 2);
        pattern.push('%');
        for c in filter.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');

        Some(pattern)
    }

    /// Builds a query from a loosely-typed parameter map.
    ///
    /// `None` is treated as an empty map. Numbers may arrive as JSON
    /// numbers or numeric strings. `report` is a presence flag: the key
    /// switches report mode on whatever its value, `false` included.
    ///
    /// ## Errors
    /// - `sort` without `order` → `Required { field: "order" }`
    /// - `order` outside [`SortField`] → `NotAllowed`
    /// - non-numeric paging or id values → `InvalidFormat`
    /// - `page` of 0 → `OutOfRange`
    pub fn from_params(params: Option<&Map<String, Value>>) -> ValidationResult<Self> {
        let empty = Map::new();
        let params = params.unwrap_or(&empty);

        let page = read_u32(params, "page")?;
        if page == Some(0) {
            return Err(ValidationError::OutOfRange {
                field: "page".to_string(),
                min: 1,
                max: i64::from(u32::MAX),
            });
        }

        let order = read_str(params, "order")?;
        let direction = read_str(params, "sort")?;
        let sort = match (order, direction) {
            (Some(order), direction) => Some(Sort {
                field: order.parse()?,
                direction: direction.map_or(SortDirection::Asc, SortDirection::from_param),
            }),
            (None, Some(_)) => return Err(ValidationError::required("order")),
            (None, None) => None,
        };

        let report = params.contains_key("report");

        Ok(CustomerQuery {
            max: read_u32(params, "max")?,
            page,
            offset: read_u32(params, "offset")?,
            company: read_id(params, "company")?,
            customer_type: read_id(params, "customerType")?,
            filter: read_str(params, "filter")?.map(str::to_string),
            sort,
            report,
        })
    }
}

// =============================================================================
// Parameter Readers
// =============================================================================

fn read_u32(params: &Map<String, Value>, key: &str) -> ValidationResult<Option<u32>> {
    let invalid = || ValidationError::invalid_format(key, "expected a non-negative whole number");

    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse::<u32>().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

fn read_id(params: &Map<String, Value>, key: &str) -> ValidationResult<Option<i64>> {
    let invalid = || ValidationError::invalid_format(key, "expected a numeric id");

    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

fn read_str<'a>(params: &'a Map<String, Value>, key: &str) -> ValidationResult<Option<&'a str>> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ValidationError::invalid_format(key, "expected text")),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn test_page_size_defaults_and_clamps() {
        assert_eq!(CustomerQuery::new().page_size(), 10);
        assert_eq!(CustomerQuery::new().max(25).page_size(), 25);
        assert_eq!(CustomerQuery::new().max(101).page_size(), 100);
        assert_eq!(CustomerQuery::new().max(u32::MAX).page_size(), 100);
        assert_eq!(CustomerQuery::new().max(0).page_size(), 1);
    }

    #[test]
    fn test_clamp_is_idempotent() {
        for max in [0, 1, 10, 99, 100, 101, 5000] {
            let once = CustomerQuery::new().max(max).page_size();
            let twice = CustomerQuery::new().max(once).page_size();
            assert_eq!(once, twice, "max = {max}");
        }
    }

    #[test]
    fn test_offset_follows_page() {
        for page in 1..=5u32 {
            for max in [1u32, 10, 37, 100] {
                let query = CustomerQuery::new().max(max).page(page);
                assert_eq!(
                    query.effective_offset(),
                    u64::from(page - 1) * u64::from(max)
                );
            }
        }
    }

    #[test]
    fn test_page_wins_over_explicit_offset() {
        let query = CustomerQuery::new().offset(7).page(3);
        assert_eq!(query.effective_offset(), 20);

        let query = CustomerQuery::new().offset(7);
        assert_eq!(query.effective_offset(), 7);

        assert_eq!(CustomerQuery::new().effective_offset(), 0);
    }

    #[test]
    fn test_report_lifts_pagination() {
        assert!(CustomerQuery::new().report().pagination().is_none());
        assert_eq!(
            CustomerQuery::new().pagination(),
            Some(Pagination { limit: 10, offset: 0 })
        );
    }

    #[test]
    fn test_filter_pattern() {
        assert_eq!(
            CustomerQuery::new().filter("acme").filter_pattern().as_deref(),
            Some("%acme%")
        );
        assert_eq!(
            CustomerQuery::new().filter(" 50%_off\\ ").filter_pattern().as_deref(),
            Some("%50\\%\\_off\\\\%")
        );
        assert_eq!(
            CustomerQuery::new().filter("  JOSÉ Peña ").filter_pattern().as_deref(),
            Some("%josé peña%")
        );
        assert!(CustomerQuery::new().filter("   ").filter_pattern().is_none());
        assert!(CustomerQuery::new().filter_pattern().is_none());
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!("fullName".parse::<SortField>().unwrap(), SortField::FullName);
        assert_eq!("full_name".parse::<SortField>().unwrap(), SortField::FullName);
        assert_eq!("taxId".parse::<SortField>().unwrap(), SortField::TaxId);

        let err = "name; DROP TABLE customers".parse::<SortField>().unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { .. }));
    }

    #[test]
    fn test_sort_direction_from_param() {
        assert_eq!(SortDirection::from_param("desc"), SortDirection::Desc);
        assert_eq!(SortDirection::from_param("DESC"), SortDirection::Desc);
        assert_eq!(SortDirection::from_param("asc"), SortDirection::Asc);
        assert_eq!(SortDirection::from_param("sideways"), SortDirection::Asc);
    }

    #[test]
    fn test_from_params_absent_map_is_empty_query() {
        let query = CustomerQuery::from_params(None).unwrap();
        assert_eq!(query, CustomerQuery::default());
        assert_eq!(query.pagination(), Some(Pagination { limit: 10, offset: 0 }));
    }

    #[test]
    fn test_from_params_reads_all_keys() {
        let map = params(json!({
            "max": 500,
            "page": "3",
            "offset": 4,
            "company": 12,
            "customerType": "2",
            "filter": "acme",
            "order": "email",
            "sort": "desc",
            "report": true,
            "unrelated": [1, 2, 3]
        }));

        let query = CustomerQuery::from_params(Some(&map)).unwrap();

        assert_eq!(query.page_size(), 100);
        assert_eq!(query.effective_offset(), 200);
        assert_eq!(query.company, Some(12));
        assert_eq!(query.customer_type, Some(2));
        assert_eq!(query.filter.as_deref(), Some("acme"));
        assert_eq!(
            query.sort,
            Some(Sort {
                field: SortField::Email,
                direction: SortDirection::Desc
            })
        );
        assert!(query.report);
    }

    #[test]
    fn test_from_params_sort_without_order_is_rejected() {
        let map = params(json!({ "sort": "desc" }));
        let err = CustomerQuery::from_params(Some(&map)).unwrap_err();
        assert_eq!(err, ValidationError::required("order"));
    }

    #[test]
    fn test_from_params_order_without_sort_is_ascending() {
        let map = params(json!({ "order": "name" }));
        let query = CustomerQuery::from_params(Some(&map)).unwrap();
        assert_eq!(
            query.sort,
            Some(Sort {
                field: SortField::Name,
                direction: SortDirection::Asc
            })
        );
    }

    #[test]
    fn test_from_params_rejects_unknown_order() {
        let map = params(json!({ "order": "password" }));
        let err = CustomerQuery::from_params(Some(&map)).unwrap_err();
        assert_eq!(err.field(), "order");
    }

    #[test]
    fn test_from_params_rejects_bad_numbers() {
        for bad in [json!({ "max": "ten" }), json!({ "max": -5 }), json!({ "offset": 1.5 })] {
            let map = params(bad);
            let err = CustomerQuery::from_params(Some(&map)).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidFormat { .. }));
        }

        let map = params(json!({ "company": "acme" }));
        assert!(CustomerQuery::from_params(Some(&map)).is_err());

        let map = params(json!({ "page": 0 }));
        let err = CustomerQuery::from_params(Some(&map)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn test_from_params_report_flag_is_presence() {
        for value in [json!(false), json!(null), json!("pdf"), json!(true)] {
            let map = params(json!({ "report": value }));
            assert!(CustomerQuery::from_params(Some(&map)).unwrap().report);
        }

        let map = params(json!({ "max": 5 }));
        assert!(!CustomerQuery::from_params(Some(&map)).unwrap().report);
    }
}
