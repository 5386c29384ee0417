//! Record filtering
//!
//! A [`FilterSpec`] is compiled into a list of predicates; a record passes
//! when every predicate accepts it. Empty fields compile to nothing, so
//! `FilterSpec::default()` keeps every record.

use serde::{Deserialize, Serialize};

use crate::core::record::Record;

/// Optional constraints narrowing a record set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    /// Exact match on `order_type`
    pub order_type: Option<String>,
    /// Exact match on `item_type`
    pub item_type: Option<String>,
    /// Case-insensitive substring of `item_name` or `customer_id`
    pub search_text: Option<String>,
}

type Predicate<'s> = Box<dyn Fn(&Record) -> bool + Send + Sync + 's>;

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order_type(mut self, order_type: impl Into<String>) -> Self {
        self.order_type = Some(order_type.into());
        self
    }

    pub fn with_item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    pub fn with_search_text(mut self, search_text: impl Into<String>) -> Self {
        self.search_text = Some(search_text.into());
        self
    }

    /// Whether no field imposes a constraint
    pub fn is_unconstrained(&self) -> bool {
        self.predicates().is_empty()
    }

    /// Compile the non-empty fields into predicates
    fn predicates(&self) -> Vec<Predicate<'_>> {
        let mut predicates: Vec<Predicate<'_>> = Vec::new();

        if let Some(order_type) = non_empty(&self.order_type) {
            predicates.push(Box::new(move |r: &Record| r.order_type == order_type));
        }

        if let Some(item_type) = non_empty(&self.item_type) {
            predicates.push(Box::new(move |r: &Record| r.item_type == item_type));
        }

        if let Some(search) = non_empty(&self.search_text) {
            let needle = search.to_lowercase();
            predicates.push(Box::new(move |r: &Record| {
                contains_folded(&r.item_name, &needle) || contains_folded(&r.customer_id, &needle)
            }));
        }

        predicates
    }

    /// Whether a single record satisfies every constraint
    pub fn matches(&self, record: &Record) -> bool {
        self.predicates().iter().all(|p| p(record))
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    !haystack.is_empty() && haystack.to_lowercase().contains(needle)
}

/// Apply a filter, keeping input order
///
/// Takes borrowed records so results can be filtered again without copying:
/// `apply(apply(&records, &a), &b)` is the same as filtering once by `a`
/// and `b` together.
pub fn apply<'a, I>(records: I, spec: &FilterSpec) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let predicates = spec.predicates();
    records
        .into_iter()
        .filter(|record| predicates.iter().all(|p| p(*record)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, order_type: &str, item_type: &str, item_name: &str, customer: &str) -> Record {
        let mut r = Record::new(id);
        r.order_type = order_type.to_string();
        r.item_type = item_type.to_string();
        r.item_name = item_name.to_string();
        r.customer_id = customer.to_string();
        r
    }

    fn sample() -> Vec<Record> {
        vec![
            record(1, "外卖", "主食", "干煸豆角", "CUST_19833"),
            record(2, "堂食", "主食", "鱼香肉丝", "CUST_00001"),
            record(3, "外卖", "饮品", "Lemon Tea", "cust_42"),
            record(4, "堂食", "饮品", "", ""),
            record(5, "外卖", "主食", "宫保鸡丁", "CUST_77777"),
        ]
    }

    fn ids(records: &[&Record]) -> Vec<u64> {
        records.iter().map(|r| r.order_id).collect()
    }

    #[test]
    fn test_empty_spec_is_identity() {
        let records = sample();
        let filtered = apply(&records, &FilterSpec::default());
        assert_eq!(ids(&filtered), vec![1, 2, 3, 4, 5]);
        assert!(FilterSpec::default().is_unconstrained());
    }

    #[test]
    fn test_empty_strings_impose_no_constraint() {
        let records = sample();
        let spec = FilterSpec::new()
            .with_order_type("")
            .with_item_type("")
            .with_search_text("");
        assert!(spec.is_unconstrained());
        assert_eq!(apply(&records, &spec).len(), 5);
    }

    #[test]
    fn test_exact_match_fields() {
        let records = sample();
        let spec = FilterSpec::new().with_order_type("外卖");
        assert_eq!(ids(&apply(&records, &spec)), vec![1, 3, 5]);

        let spec = FilterSpec::new().with_item_type("饮品");
        assert_eq!(ids(&apply(&records, &spec)), vec![3, 4]);

        // Exact, not substring
        let spec = FilterSpec::new().with_order_type("外");
        assert!(apply(&records, &spec).is_empty());
    }

    #[test]
    fn test_search_text_matches_item_or_customer() {
        let records = sample();

        let spec = FilterSpec::new().with_search_text("角");
        assert_eq!(ids(&apply(&records, &spec)), vec![1]);

        let spec = FilterSpec::new().with_search_text("cust_0");
        assert_eq!(ids(&apply(&records, &spec)), vec![2]);

        let spec = FilterSpec::new().with_search_text("LEMON");
        assert_eq!(ids(&apply(&records, &spec)), vec![3]);
    }

    #[test]
    fn test_search_text_against_single_records() {
        let spec = FilterSpec::new().with_search_text("角");
        assert!(spec.matches(&record(1, "", "", "干煸豆角", "")));
        assert!(!spec.matches(&record(2, "", "", "鱼香肉丝", "")));
    }

    #[test]
    fn test_search_skips_empty_text_fields() {
        let records = sample();
        let spec = FilterSpec::new().with_search_text("x");
        assert!(apply(&records, &spec).iter().all(|r| r.order_id != 4));
    }

    #[test]
    fn test_conjunction_equals_chained_application() {
        let records = sample();
        let combined = FilterSpec::new().with_order_type("外卖").with_item_type("主食");

        let chained = apply(
            apply(&records, &FilterSpec::new().with_order_type("外卖")),
            &FilterSpec::new().with_item_type("主食"),
        );

        assert_eq!(ids(&chained), ids(&apply(&records, &combined)));
        assert_eq!(ids(&chained), vec![1, 5]);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let spec: FilterSpec =
            serde_json::from_str(r#"{"orderType":"外卖","searchText":"角"}"#).unwrap();
        assert_eq!(spec.order_type.as_deref(), Some("外卖"));
        assert_eq!(spec.item_type, None);
        assert_eq!(spec.search_text.as_deref(), Some("角"));
    }
}
