//! Filtering, ordering and windowing types for store queries
//!
//! These types describe *what* a paginator asks of a [`Queryable`](super::Queryable)
//! store; how a store evaluates them is up to the store.
//!
//! # Example
//!
//! ```rust
//! use pagekit::store::{Filter, FilterCondition, SortDirection, SortSpec, Window};
//!
//! let filter = Filter::new()
//!     .with(FilterCondition::eq("status", "active"))
//!     .with(FilterCondition::gte("age", 18));
//!
//! let sort = SortSpec::field("created_at", SortDirection::Descending);
//! let window = Window::new(40, 20);
//! assert_eq!(filter.len(), 2);
//! assert_eq!(window.limit, 20);
//! # let _ = sort;
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Direction for ordering results
///
/// ```rust
/// use pagekit::store::SortDirection;
///
/// assert_eq!(SortDirection::from_code(1), SortDirection::Ascending);
/// assert_eq!(SortDirection::from_code(-1), SortDirection::Descending);
/// assert_eq!(SortDirection::from_code(0), SortDirection::Descending);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    Descending,
}

impl SortDirection {
    /// Map a numeric direction code: `1` is ascending, anything else descending.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        if code == 1 {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    /// Numeric code for this direction (`1` or `-1`).
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Ordering requested from the store
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortSpec {
    /// Whatever order the store returns by default
    #[default]
    Natural,
    /// By record identifier, highest first
    IdDescending,
    /// By a named field
    Field {
        /// Field to order by
        field: String,
        /// Order direction
        direction: SortDirection,
    },
}

impl SortSpec {
    /// Order by `field` in `direction`
    pub fn field(field: impl Into<String>, direction: SortDirection) -> Self {
        Self::Field {
            field: field.into(),
            direction,
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Natural => write!(f, "natural"),
            Self::IdDescending => write!(f, "_id desc"),
            Self::Field { field, direction } => write!(f, "{} {}", field, direction),
        }
    }
}

/// Skip/limit window over an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Number of results to skip
    pub skip: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Window {
    /// Create a new window
    #[must_use]
    pub const fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }

    /// The first `limit` results
    #[must_use]
    pub const fn first(limit: u64) -> Self {
        Self { skip: 0, limit }
    }
}

/// Comparison operators for filter conditions
///
/// ```rust
/// use pagekit::store::FilterOperator;
///
/// assert_eq!(format!("{}", FilterOperator::Equal), "=");
/// assert_eq!(format!("{}", FilterOperator::Like), "LIKE");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equal to (=)
    Equal,
    /// Not equal to (!=)
    NotEqual,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal to (>=)
    GreaterThanOrEqual,
    /// Less than (<)
    LessThan,
    /// Less than or equal to (<=)
    LessThanOrEqual,
    /// Pattern matching (LIKE), `%` matches any run and `_` a single character
    Like,
    /// Value is in a list (IN)
    In,
    /// Value is null or missing (IS NULL)
    IsNull,
    /// Value is present and not null (IS NOT NULL)
    IsNotNull,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::NotEqual => write!(f, "!="),
            Self::GreaterThan => write!(f, ">"),
            Self::GreaterThanOrEqual => write!(f, ">="),
            Self::LessThan => write!(f, "<"),
            Self::LessThanOrEqual => write!(f, "<="),
            Self::Like => write!(f, "LIKE"),
            Self::In => write!(f, "IN"),
            Self::IsNull => write!(f, "IS NULL"),
            Self::IsNotNull => write!(f, "IS NOT NULL"),
        }
    }
}

/// A value that can be used in filter conditions
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// String value
    String(String),
    /// 64-bit integer value
    Integer(i64),
    /// 64-bit floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// List of string values (for IN operator)
    StringList(Vec<String>),
    /// List of integer values (for IN operator)
    IntegerList(Vec<i64>),
    /// Null value (for IS NULL / IS NOT NULL)
    Null,
    /// Untyped text from a filter expression
    ///
    /// Matches a string field literally; against any other field type it is
    /// read through [`FilterValue::infer`].
    Text(String),
}

impl FilterValue {
    /// Interpret raw text as the narrowest matching value.
    ///
    /// Integers win over floats, floats over booleans, and anything else is a
    /// string.
    pub fn infer(raw: &str) -> Self {
        if let Ok(n) = raw.parse::<i64>() {
            return Self::Integer(n);
        }
        if let Ok(n) = raw.parse::<f64>() {
            if n.is_finite() {
                return Self::Float(n);
            }
        }
        match raw {
            "true" => Self::Boolean(true),
            "false" => Self::Boolean(false),
            _ => Self::String(raw.to_string()),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(list: Vec<String>) -> Self {
        Self::StringList(list)
    }
}

impl From<Vec<i64>> for FilterValue {
    fn from(list: Vec<i64>) -> Self {
        Self::IntegerList(list)
    }
}

/// A single filter condition on a named field
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    /// The field name to filter on
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: FilterValue,
}

impl FilterCondition {
    /// Create a new filter condition
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Equality filter (field = value)
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::Equal, value.into())
    }

    /// Not-equal filter (field != value)
    pub fn ne(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::NotEqual, value.into())
    }

    /// Greater-than filter (field > value)
    pub fn gt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::GreaterThan, value.into())
    }

    /// Greater-than-or-equal filter (field >= value)
    pub fn gte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::GreaterThanOrEqual, value.into())
    }

    /// Less-than filter (field < value)
    pub fn lt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::LessThan, value.into())
    }

    /// Less-than-or-equal filter (field <= value)
    pub fn lte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::LessThanOrEqual, value.into())
    }

    /// LIKE pattern filter
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Like, FilterValue::String(pattern.into()))
    }

    /// IN list filter for strings
    pub fn in_strings(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(field, FilterOperator::In, FilterValue::StringList(values))
    }

    /// IN list filter for integers
    pub fn in_integers(field: impl Into<String>, values: Vec<i64>) -> Self {
        Self::new(field, FilterOperator::In, FilterValue::IntegerList(values))
    }

    /// IS NULL filter
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsNull, FilterValue::Null)
    }

    /// IS NOT NULL filter
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsNotNull, FilterValue::Null)
    }
}

/// Conjunction of filter conditions
///
/// Paginators treat a filter as opaque and hand it to the store as-is.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
    conditions: Vec<FilterCondition>,
}

impl Filter {
    /// An empty filter matching every record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition
    #[must_use]
    pub fn with(mut self, condition: FilterCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add a condition in place
    pub fn push(&mut self, condition: FilterCondition) {
        self.conditions.push(condition);
    }

    /// The conditions, all of which must hold
    #[must_use]
    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    /// Number of conditions
    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Whether the filter matches everything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl From<Vec<FilterCondition>> for Filter {
    fn from(conditions: Vec<FilterCondition>) -> Self {
        Self { conditions }
    }
}

/// A `field:value` pair in a filter expression was malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid filter expression `{0}`: expected `field:value`")]
pub struct FilterParseError(pub String);

/// Parses comma-separated `field:value` equality pairs.
///
/// Values stay as [`FilterValue::Text`] so the store can decide how to read
/// them against each field's type.
///
/// ```rust
/// use pagekit::store::{Filter, FilterCondition, FilterValue};
///
/// let filter: Filter = "status:active,zip:02134".parse().unwrap();
/// assert_eq!(
///     filter.conditions()[0],
///     FilterCondition::eq("status", FilterValue::Text("active".to_string()))
/// );
/// assert_eq!(
///     filter.conditions()[1],
///     FilterCondition::eq("zip", FilterValue::Text("02134".to_string()))
/// );
///
/// assert!("".parse::<Filter>().unwrap().is_empty());
/// assert!("status".parse::<Filter>().is_err());
/// ```
impl FromStr for Filter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut filter = Filter::new();
        for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (field, raw) = pair
                .split_once(':')
                .ok_or_else(|| FilterParseError(pair.to_string()))?;
            let field = field.trim();
            if field.is_empty() {
                return Err(FilterParseError(pair.to_string()));
            }
            filter.push(FilterCondition::eq(field, FilterValue::Text(raw.trim().to_string())));
        }
        Ok(filter)
    }
}

/// Everything a store needs to decide which records match
///
/// `id_before` is set only by cursor pagination and restricts the match to
/// identifiers strictly less than the bound.
#[derive(Debug)]
pub struct Selection<'a, Id> {
    /// Caller-supplied filter, untouched
    pub filter: &'a Filter,
    /// Exclusive upper bound on the record identifier
    pub id_before: Option<&'a Id>,
}

impl<'a, Id> Selection<'a, Id> {
    /// Select records matching `filter`
    pub fn new(filter: &'a Filter) -> Self {
        Self {
            filter,
            id_before: None,
        }
    }

    /// Additionally require identifiers strictly below `id`
    #[must_use]
    pub fn before(mut self, id: Option<&'a Id>) -> Self {
        self.id_before = id;
        self
    }
}
