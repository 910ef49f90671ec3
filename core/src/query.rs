//! Presence filtering for GET query parameters.
//!
//! A value is present unless it is absent or an empty string. Numeric zero
//! and `false` are present. Output keeps the caller's order and does not
//! deduplicate names; percent-encoding is left to whoever sends the request.

/// A single query value of heterogeneous type.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Absent,
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl QueryValue {
    pub fn is_present(&self) -> bool {
        match self {
            QueryValue::Absent => false,
            QueryValue::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Stringified form, `None` for `Absent`.
    pub fn render(&self) -> Option<String> {
        match self {
            QueryValue::Absent => None,
            QueryValue::Str(s) => Some(s.clone()),
            QueryValue::Int(n) => Some(n.to_string()),
            QueryValue::UInt(n) => Some(n.to_string()),
            QueryValue::Float(n) => Some(n.to_string()),
            QueryValue::Bool(b) => Some(b.to_string()),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        QueryValue::Str(value.clone())
    }
}

macro_rules! impl_from_int {
    ($variant:ident as $target:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue::$variant(value as $target)
                }
            }
        )*
    };
}

impl_from_int!(Int as i64: i8, i16, i32, i64);
impl_from_int!(UInt as u64: u8, u16, u32, u64, usize);

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(QueryValue::Absent, Into::into)
    }
}

/// Ordered, already-filtered query parameters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append `name=value` when `value` is present.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<QueryValue>) {
        let value = value.into();
        if !value.is_present() {
            return;
        }
        if let Some(rendered) = value.render() {
            self.pairs.push((name.into(), rendered));
        }
    }

    /// First value recorded under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }
}

/// Keep only the entries whose value is present, in input order.
pub fn filter_search_params<'a, I>(entries: I) -> SearchParams
where
    I: IntoIterator<Item = (&'a str, QueryValue)>,
{
    let mut params = SearchParams::new();
    for (name, value) in entries {
        params.push(name, value);
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_absent_and_empty_values() {
        let country: Option<&str> = None;
        let params = filter_search_params([
            ("city", "Paris".into()),
            ("country", country.into()),
            ("name", "".into()),
        ]);
        assert_eq!(params.into_pairs(), vec![("city".to_string(), "Paris".to_string())]);
    }

    #[test]
    fn zero_is_present() {
        let params = filter_search_params([("pageIndex", 0u32.into())]);
        assert_eq!(params.get("pageIndex"), Some("0"));
    }

    #[test]
    fn false_is_present() {
        let params = filter_search_params([("archived", false.into())]);
        assert_eq!(params.get("archived"), Some("false"));
    }

    #[test]
    fn keeps_input_order_and_duplicates() {
        let params = filter_search_params([
            ("b", 2i64.into()),
            ("a", "x".into()),
            ("b", 3i64.into()),
        ]);
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("b", "2"), ("a", "x"), ("b", "3")]);
    }

    #[test]
    fn does_not_encode() {
        let params = filter_search_params([("address", "Karlsplatz 13/1".into())]);
        assert_eq!(params.get("address"), Some("Karlsplatz 13/1"));
    }

    #[test]
    fn whitespace_only_string_is_present() {
        let params = filter_search_params([("name", " ".into())]);
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn optional_numbers() {
        let params = filter_search_params([
            ("seatingPlanId", Some(3i64).into()),
            ("eventShowId", Option::<i64>::None.into()),
        ]);
        assert_eq!(params.into_pairs(), vec![("seatingPlanId".to_string(), "3".to_string())]);
    }

    #[test]
    fn float_values_render_with_display() {
        assert_eq!(QueryValue::from(1.5).render().as_deref(), Some("1.5"));
        assert_eq!(QueryValue::Absent.render(), None);
    }
}
