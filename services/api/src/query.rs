//! Filter, sort and pagination for contact listings
//!
//! A listing request names one contact field to filter on, one of thirteen
//! operators, and a list of string values. The same [`Filter`] renders as a
//! SQL predicate for Postgres and evaluates directly against a [`Contact`]
//! for the in-memory store; text comparisons use byte order (`COLLATE "C"`)
//! in both so the two agree.

use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::Contact;

/// Default number of contacts per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A filterable and sortable contact field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Id,
    FirstName,
    LastName,
    Phone,
    Email,
}

impl ContactField {
    pub const ALL: [ContactField; 5] = [
        ContactField::Id,
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::Phone,
        ContactField::Email,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ContactField::Id => "id",
            ContactField::FirstName => "first_name",
            ContactField::LastName => "last_name",
            ContactField::Phone => "phone",
            ContactField::Email => "email",
        }
    }

    /// SQL expression yielding the field as text
    fn text_expr(self) -> &'static str {
        match self {
            ContactField::Id => "CAST(id AS TEXT)",
            other => other.name(),
        }
    }

    fn text_of(self, contact: &Contact) -> Cow<'_, str> {
        match self {
            ContactField::Id => Cow::Owned(contact.id.to_string()),
            ContactField::FirstName => Cow::Borrowed(&contact.first_name),
            ContactField::LastName => Cow::Borrowed(&contact.last_name),
            ContactField::Phone => Cow::Borrowed(&contact.phone),
            ContactField::Email => Cow::Borrowed(&contact.email),
        }
    }
}

impl FromStr for ContactField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContactField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = ContactField::ALL.iter().map(|f| f.name()).collect();
                format!("Field must be one of [{}], got '{}'", names.join(", "), s)
            })
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("Sort order must be 'asc' or 'desc', got '{}'", other)),
        }
    }
}

/// Sort field and direction; ties are always broken by ascending id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: ContactField,
    pub order: SortOrder,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            field: ContactField::Id,
            order: SortOrder::Asc,
        }
    }
}

impl Sort {
    pub fn compare(&self, a: &Contact, b: &Contact) -> Ordering {
        let primary = match self.field {
            ContactField::Id => a.id.cmp(&b.id),
            field => field.text_of(a).cmp(&field.text_of(b)),
        };
        let primary = match self.order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let direction = match self.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };

        match self.field {
            ContactField::Id => {
                qb.push(format!(" ORDER BY id {}", direction));
            }
            field => {
                qb.push(format!(
                    " ORDER BY {} COLLATE \"C\" {}, id ASC",
                    field.name(),
                    direction
                ));
            }
        }
    }
}

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Contains,
    Equals,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
    IsAnyOf,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 13] = [
        FilterOperator::Eq,
        FilterOperator::Ne,
        FilterOperator::Lt,
        FilterOperator::Le,
        FilterOperator::Gt,
        FilterOperator::Ge,
        FilterOperator::Contains,
        FilterOperator::Equals,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
        FilterOperator::IsEmpty,
        FilterOperator::IsNotEmpty,
        FilterOperator::IsAnyOf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterOperator::Eq => "=",
            FilterOperator::Ne => "!=",
            FilterOperator::Lt => "<",
            FilterOperator::Le => "<=",
            FilterOperator::Gt => ">",
            FilterOperator::Ge => ">=",
            FilterOperator::Contains => "contains",
            FilterOperator::Equals => "equals",
            FilterOperator::StartsWith => "starts_with",
            FilterOperator::EndsWith => "ends_with",
            FilterOperator::IsEmpty => "is_empty",
            FilterOperator::IsNotEmpty => "is_not_empty",
            FilterOperator::IsAnyOf => "is_any_of",
        }
    }

    /// Operators that read only the first value
    fn needs_first_value(self) -> bool {
        !matches!(
            self,
            FilterOperator::Contains
                | FilterOperator::IsEmpty
                | FilterOperator::IsNotEmpty
                | FilterOperator::IsAnyOf
        )
    }

    /// Operators evaluated numerically on the id field
    fn numeric_on_id(self) -> bool {
        matches!(
            self,
            FilterOperator::Eq
                | FilterOperator::Ne
                | FilterOperator::Lt
                | FilterOperator::Le
                | FilterOperator::Gt
                | FilterOperator::Ge
                | FilterOperator::Equals
                | FilterOperator::IsAnyOf
        )
    }

    fn sql_comparison(self) -> &'static str {
        match self {
            FilterOperator::Ne => "<>",
            FilterOperator::Lt => "<",
            FilterOperator::Le => "<=",
            FilterOperator::Gt => ">",
            FilterOperator::Ge => ">=",
            _ => "=",
        }
    }

    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            FilterOperator::Ne => ordering != Ordering::Equal,
            FilterOperator::Lt => ordering == Ordering::Less,
            FilterOperator::Le => ordering != Ordering::Greater,
            FilterOperator::Gt => ordering == Ordering::Greater,
            FilterOperator::Ge => ordering != Ordering::Less,
            _ => ordering == Ordering::Equal,
        }
    }
}

impl FromStr for FilterOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterOperator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<_> = FilterOperator::ALL.iter().map(|o| o.as_str()).collect();
                format!("Operator must be one of [{}], got '{}'", names.join(", "), s)
            })
    }
}

/// A single-field filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    field: ContactField,
    operator: FilterOperator,
    values: Vec<String>,
    /// Parsed values when the filter compares ids numerically
    numbers: Vec<i64>,
}

impl Default for Filter {
    /// Matches every contact
    fn default() -> Self {
        Self {
            field: ContactField::Id,
            operator: FilterOperator::Contains,
            values: vec![String::new()],
            numbers: Vec::new(),
        }
    }
}

impl Filter {
    pub fn new(
        field: ContactField,
        operator: FilterOperator,
        values: Vec<String>,
    ) -> Result<Self, String> {
        if operator.needs_first_value() && values.is_empty() {
            return Err(format!(
                "Operator '{}' requires at least one value",
                operator.as_str()
            ));
        }

        let numbers = if field == ContactField::Id && operator.numeric_on_id() {
            let considered = if operator.needs_first_value() {
                &values[..1]
            } else {
                &values[..]
            };
            considered
                .iter()
                .map(|value| {
                    value
                        .trim()
                        .parse::<i64>()
                        .map_err(|_| format!("Value '{}' is not a valid id", value))
                })
                .collect::<Result<Vec<_>, _>>()?
        } else {
            Vec::new()
        };

        Ok(Self {
            field,
            operator,
            values,
            numbers,
        })
    }

    fn is_numeric(&self) -> bool {
        self.field == ContactField::Id && self.operator.numeric_on_id()
    }

    fn first_value(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or_default()
    }

    /// Evaluate the filter against one contact
    pub fn matches(&self, contact: &Contact) -> bool {
        if self.is_numeric() {
            return match self.operator {
                FilterOperator::IsAnyOf => self.numbers.contains(&contact.id),
                op => self
                    .numbers
                    .first()
                    .is_some_and(|n| op.accepts(contact.id.cmp(n))),
            };
        }

        let text = self.field.text_of(contact);
        let text = text.as_ref();
        let first = self.first_value();

        match self.operator {
            FilterOperator::Contains => self.values.iter().all(|v| text.contains(v.as_str())),
            FilterOperator::StartsWith => text.starts_with(first),
            FilterOperator::EndsWith => text.ends_with(first),
            FilterOperator::IsEmpty => text.is_empty(),
            FilterOperator::IsNotEmpty => !text.is_empty(),
            FilterOperator::IsAnyOf => self.values.iter().any(|v| v == text),
            op => op.accepts(text.cmp(first)),
        }
    }

    /// Render the filter as a SQL predicate with bound values
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if self.is_numeric() {
            match self.operator {
                FilterOperator::IsAnyOf => {
                    qb.push("id = ANY(");
                    qb.push_bind(self.numbers.clone());
                    qb.push(")");
                }
                op => match self.numbers.first() {
                    Some(n) => {
                        qb.push(format!("id {} ", op.sql_comparison()));
                        qb.push_bind(*n);
                    }
                    None => {
                        qb.push("FALSE");
                    }
                },
            }
            return;
        }

        let expr = self.field.text_expr();
        let first = self.first_value().to_string();

        match self.operator {
            FilterOperator::Contains => {
                if self.values.is_empty() {
                    qb.push("TRUE");
                    return;
                }
                qb.push("(");
                for (i, value) in self.values.iter().enumerate() {
                    if i > 0 {
                        qb.push(" AND ");
                    }
                    qb.push(format!("strpos({}, ", expr));
                    qb.push_bind(value.clone());
                    qb.push(") > 0");
                }
                qb.push(")");
            }
            FilterOperator::StartsWith => {
                qb.push(format!("starts_with({}, ", expr));
                qb.push_bind(first);
                qb.push(")");
            }
            FilterOperator::EndsWith => {
                qb.push(format!("right({}, char_length(", expr));
                qb.push_bind(first.clone());
                qb.push(")) = ");
                qb.push_bind(first);
            }
            FilterOperator::IsEmpty => {
                qb.push(format!("{} = ''", expr));
            }
            FilterOperator::IsNotEmpty => {
                qb.push(format!("{} <> ''", expr));
            }
            FilterOperator::IsAnyOf => {
                qb.push(format!("{} = ANY(", expr));
                qb.push_bind(self.values.clone());
                qb.push(")");
            }
            op => {
                qb.push(format!("{} COLLATE \"C\" {} ", expr, op.sql_comparison()));
                qb.push_bind(first);
            }
        }
    }
}

/// Zero-indexed page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Result<Self, String> {
        if page_size == 0 {
            return Err("Page size must be a positive integer".to_string());
        }
        Ok(Self { page, page_size })
    }

    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_mul(self.page_size as usize)
    }

    /// Slice this page out of the full result set
    pub fn window<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset())
            .take(self.page_size as usize)
            .collect()
    }
}

/// A validated listing request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactQuery {
    pub filter: Filter,
    pub sort: Sort,
    pub pagination: Pagination,
}

/// Raw query string parameters for `GET /contacts`
#[derive(Debug, Default, Deserialize)]
pub struct ListContactsParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    pub filter_field: Option<String>,
    pub filter_operator: Option<String>,
    /// Repeated key; an absent list means `[""]`
    #[serde(default)]
    pub filter_values: Vec<String>,
    /// Bracketed spelling of `filter_values`, appended after it
    #[serde(default, rename = "filter_values[]")]
    pub filter_values_bracketed: Vec<String>,
}

fn parse_count(name: &str, raw: Option<&str>, default: u32) -> Result<u32, String> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("{} must be a non-negative integer, got '{}'", name, raw)),
    }
}

impl TryFrom<ListContactsParams> for ContactQuery {
    type Error = String;

    fn try_from(params: ListContactsParams) -> Result<Self, Self::Error> {
        let page = parse_count("page", params.page.as_deref(), 0)?;
        let page_size = parse_count(
            "page_size",
            params.page_size.as_deref(),
            DEFAULT_PAGE_SIZE,
        )?;
        let pagination = Pagination::new(page, page_size)?;

        let sort = Sort {
            field: params.sort_field.as_deref().unwrap_or("id").parse()?,
            order: params.sort_order.as_deref().unwrap_or("asc").parse()?,
        };

        let mut values = params.filter_values;
        values.extend(params.filter_values_bracketed);
        if values.is_empty() {
            values.push(String::new());
        }

        let filter = Filter::new(
            params.filter_field.as_deref().unwrap_or("id").parse()?,
            params
                .filter_operator
                .as_deref()
                .unwrap_or("contains")
                .parse()?,
            values,
        )?;

        Ok(Self {
            filter,
            sort,
            pagination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn contact(id: i64, first: &str, last: &str, phone: &str, email: &str) -> Contact {
        Contact {
            id,
            owner_id: Uuid::nil(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
        }
    }

    fn fixture() -> Vec<Contact> {
        vec![
            contact(1, "Annabelle", "Smith", "+1-555-000-001", "annabelle@example.com"),
            contact(2, "Anna", "Jones", "+1-555-000-002", "anna@example.org"),
            contact(3, "Bob", "Annan", "+44-555-000-003", "bob@example.com"),
            contact(4, "Carl", "Smith", "+1-555-000-004", "carl@example.net"),
            contact(12, "ann", "Lowe", "+972-555-000-012", "low@example.com"),
        ]
    }

    fn matching(field: &str, op: &str, values: &[&str]) -> Vec<i64> {
        let filter = Filter::new(
            field.parse().unwrap(),
            op.parse().unwrap(),
            values.iter().map(|v| v.to_string()).collect(),
        )
        .unwrap();
        fixture()
            .iter()
            .filter(|c| filter.matches(c))
            .map(|c| c.id)
            .collect()
    }

    fn sql(filter: &Filter) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("");
        filter.push_sql(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn test_parse_fields_and_operators() {
        assert_eq!("first_name".parse::<ContactField>(), Ok(ContactField::FirstName));
        assert!("owner_id".parse::<ContactField>().is_err());
        assert!("password".parse::<ContactField>().is_err());

        for op in FilterOperator::ALL {
            assert_eq!(op.as_str().parse::<FilterOperator>(), Ok(op));
        }
        assert!("like".parse::<FilterOperator>().is_err());
        assert!("ASC".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_contains_is_case_sensitive_substring() {
        assert_eq!(matching("first_name", "contains", &["Ann"]), vec![1, 2]);
        assert_eq!(matching("first_name", "contains", &["nnab"]), vec![1]);
    }

    #[test]
    fn test_contains_requires_every_value() {
        assert_eq!(matching("first_name", "contains", &["Ann", "belle"]), vec![1]);
        assert_eq!(matching("email", "contains", &["example", ".com"]), vec![1, 3, 12]);
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let filter = Filter::default();
        assert!(fixture().iter().all(|c| filter.matches(c)));
    }

    #[test]
    fn test_equals_and_comparisons_on_text() {
        assert_eq!(matching("last_name", "equals", &["Smith"]), vec![1, 4]);
        assert_eq!(matching("last_name", "=", &["Smith"]), vec![1, 4]);
        assert_eq!(matching("last_name", "!=", &["Smith"]), vec![2, 3, 12]);
        // byte order: uppercase sorts before lowercase
        assert_eq!(matching("first_name", "<", &["B"]), vec![1, 2]);
        assert_eq!(matching("first_name", ">=", &["Bob"]), vec![3, 4, 12]);
        assert_eq!(matching("first_name", "<=", &["Anna"]), vec![2]);
        assert_eq!(matching("first_name", ">", &["Carl"]), vec![12]);
    }

    #[test]
    fn test_numeric_comparisons_on_id() {
        assert_eq!(matching("id", ">", &["3"]), vec![4, 12]);
        assert_eq!(matching("id", "<=", &["2"]), vec![1, 2]);
        assert_eq!(matching("id", "=", &["12"]), vec![12]);
        assert_eq!(matching("id", "!=", &["1"]), vec![2, 3, 4, 12]);
        assert_eq!(matching("id", "is_any_of", &["1", "4", "99"]), vec![1, 4]);
        // text semantics for substring operators
        assert_eq!(matching("id", "contains", &["1"]), vec![1, 12]);
        assert_eq!(matching("id", "starts_with", &["1"]), vec![1, 12]);
        assert_eq!(matching("id", "ends_with", &["2"]), vec![2, 12]);
    }

    #[test]
    fn test_prefix_and_suffix() {
        assert_eq!(matching("phone", "starts_with", &["+1-"]), vec![1, 2, 4]);
        assert_eq!(matching("email", "ends_with", &[".com"]), vec![1, 3, 12]);
        assert_eq!(matching("first_name", "starts_with", &["Ann", "ignored"]), vec![1, 2]);
    }

    #[test]
    fn test_is_any_of_on_text() {
        assert_eq!(matching("first_name", "is_any_of", &["Bob", "Carl", "Dan"]), vec![3, 4]);
        assert!(matching("first_name", "is_any_of", &[]).is_empty());
    }

    #[test]
    fn test_emptiness() {
        let mut contacts = fixture();
        contacts[0].last_name.clear();

        let empty = Filter::new(ContactField::LastName, FilterOperator::IsEmpty, vec![]).unwrap();
        let filled =
            Filter::new(ContactField::LastName, FilterOperator::IsNotEmpty, vec![]).unwrap();

        let ids = |f: &Filter| -> Vec<i64> {
            contacts.iter().filter(|c| f.matches(c)).map(|c| c.id).collect()
        };
        assert_eq!(ids(&empty), vec![1]);
        assert_eq!(ids(&filled), vec![2, 3, 4, 12]);
        assert!(matching("id", "is_empty", &[""]).is_empty());
    }

    #[test]
    fn test_invalid_filters() {
        assert!(Filter::new(ContactField::Id, FilterOperator::Gt, vec!["x".to_string()]).is_err());
        assert!(Filter::new(ContactField::Email, FilterOperator::Equals, vec![]).is_err());
        assert!(
            Filter::new(
                ContactField::Id,
                FilterOperator::IsAnyOf,
                vec!["1".to_string(), "two".to_string()]
            )
            .is_err()
        );
        // only the first value is read, so trailing junk is fine
        assert!(
            Filter::new(
                ContactField::Id,
                FilterOperator::Lt,
                vec!["5".to_string(), "junk".to_string()]
            )
            .is_ok()
        );
    }

    #[test]
    fn test_filter_sql() {
        let f = |field, op, values: &[&str]| {
            Filter::new(field, op, values.iter().map(|v| v.to_string()).collect()).unwrap()
        };

        assert_eq!(
            sql(&f(ContactField::FirstName, FilterOperator::Contains, &["An", "na"])),
            "(strpos(first_name, $1) > 0 AND strpos(first_name, $2) > 0)"
        );
        assert_eq!(
            sql(&f(ContactField::FirstName, FilterOperator::Contains, &[])),
            "TRUE"
        );
        assert_eq!(
            sql(&f(ContactField::Email, FilterOperator::Lt, &["m"])),
            "email COLLATE \"C\" < $1"
        );
        assert_eq!(
            sql(&f(ContactField::Phone, FilterOperator::Ne, &["+1-555-000-001"])),
            "phone COLLATE \"C\" <> $1"
        );
        assert_eq!(
            sql(&f(ContactField::Id, FilterOperator::Ge, &["3"])),
            "id >= $1"
        );
        assert_eq!(
            sql(&f(ContactField::Id, FilterOperator::IsAnyOf, &["1", "2"])),
            "id = ANY($1)"
        );
        assert_eq!(
            sql(&f(ContactField::Id, FilterOperator::StartsWith, &["1"])),
            "starts_with(CAST(id AS TEXT), $1)"
        );
        assert_eq!(
            sql(&f(ContactField::Email, FilterOperator::EndsWith, &[".com"])),
            "right(email, char_length($1)) = $2"
        );
        assert_eq!(
            sql(&f(ContactField::LastName, FilterOperator::IsEmpty, &[])),
            "last_name = ''"
        );
        assert_eq!(
            sql(&f(ContactField::LastName, FilterOperator::IsNotEmpty, &[])),
            "last_name <> ''"
        );
        assert_eq!(
            sql(&f(ContactField::FirstName, FilterOperator::IsAnyOf, &["Bob"])),
            "first_name = ANY($1)"
        );
    }

    #[test]
    fn test_sort_compare_and_sql() {
        let mut contacts = fixture();
        let sort = Sort {
            field: ContactField::LastName,
            order: SortOrder::Desc,
        };
        contacts.sort_by(|a, b| sort.compare(a, b));
        let ids: Vec<_> = contacts.iter().map(|c| c.id).collect();
        // Smith(1), Smith(4) tie-break by id ascending even when descending
        assert_eq!(ids, vec![1, 4, 12, 2, 3]);

        let mut qb = QueryBuilder::<Postgres>::new("");
        sort.push_sql(&mut qb);
        assert_eq!(qb.sql(), " ORDER BY last_name COLLATE \"C\" DESC, id ASC");

        let mut qb = QueryBuilder::<Postgres>::new("");
        Sort::default().push_sql(&mut qb);
        assert_eq!(qb.sql(), " ORDER BY id ASC");
    }

    #[test]
    fn test_pagination_window_concatenates_to_whole() {
        let items: Vec<u32> = (0..23).collect();
        let page_size = 5;
        let mut collected = Vec::new();
        for page in 0..6 {
            let pagination = Pagination::new(page, page_size).unwrap();
            collected.extend(pagination.window(items.clone()));
        }
        assert_eq!(collected, items);
        assert!(Pagination::new(9, 5).unwrap().window(items).is_empty());
        assert!(Pagination::new(0, 0).is_err());
    }

    #[test]
    fn test_params_defaults() {
        let query = ContactQuery::try_from(ListContactsParams::default()).unwrap();
        assert_eq!(query, ContactQuery::default());
    }

    #[test]
    fn test_params_merge_plain_and_bracketed_values() {
        let query = ContactQuery::try_from(ListContactsParams {
            filter_field: Some("first_name".to_string()),
            filter_operator: Some("is_any_of".to_string()),
            filter_values: vec!["Ann".to_string()],
            filter_values_bracketed: vec!["Bob".to_string()],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(query.filter.values, vec!["Ann".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn test_params_errors() {
        let bad = |params: ListContactsParams| ContactQuery::try_from(params).is_err();

        assert!(bad(ListContactsParams {
            page: Some("-1".to_string()),
            ..Default::default()
        }));
        assert!(bad(ListContactsParams {
            page_size: Some("0".to_string()),
            ..Default::default()
        }));
        assert!(bad(ListContactsParams {
            sort_field: Some("owner_id".to_string()),
            ..Default::default()
        }));
        assert!(bad(ListContactsParams {
            filter_operator: Some("like".to_string()),
            ..Default::default()
        }));
        assert!(bad(ListContactsParams {
            filter_field: Some("id".to_string()),
            filter_operator: Some(">".to_string()),
            filter_values: vec!["abc".to_string()],
            ..Default::default()
        }));
    }
}
