//! Page/size/sort query parsing and pagination headers.

use std::cmp::Ordering;

use serde_json::Value;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 2000;

/// One `sort=property[,asc|desc]` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub property: String,
    pub ascending: bool,
}

impl SortOrder {
    fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(',').map(str::trim);
        let property = parts.next().filter(|p| !p.is_empty())?.to_string();
        let ascending = !matches!(parts.next(), Some(dir) if dir.eq_ignore_ascii_case("desc"));
        Some(Self {
            property,
            ascending,
        })
    }

    fn as_param(&self) -> String {
        format!("{},{}", self.property, if self.ascending { "asc" } else { "desc" })
    }
}

/// Parsed pagination request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pageable {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<SortOrder>,
}

impl Default for Pageable {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Vec::new(),
        }
    }
}

impl Pageable {
    /// Build from raw query pairs. Unparsable numbers fall back to defaults
    /// and unknown keys (such as `cacheBuster`) are ignored.
    pub fn from_query(pairs: &[(String, String)]) -> Self {
        let mut pageable = Pageable::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" => {
                    if let Ok(page) = value.parse() {
                        pageable.page = page;
                    }
                }
                "size" => {
                    if let Ok(size) = value.parse::<u32>() {
                        if size > 0 {
                            pageable.size = size.min(MAX_PAGE_SIZE);
                        }
                    }
                }
                "sort" => pageable.sort.extend(SortOrder::parse(value)),
                _ => {}
            }
        }
        pageable
    }

    pub fn offset(&self) -> usize {
        self.page as usize * self.size as usize
    }

    /// Order two serialized records by the requested sort, falling back to id.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        self.sort
            .iter()
            .map(|order| {
                let ord = compare_values(&a[&order.property], &b[&order.property]);
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            })
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| compare_values(&a["id"], &b["id"]))
    }

    /// RFC 5988 `Link` header value for `path`.
    pub fn link_header(&self, path: &str, total: u64) -> String {
        let size = u64::from(self.size);
        let total_pages = total.div_ceil(size);
        let last_page = total_pages.saturating_sub(1);
        let page = u64::from(self.page);

        let sort: String = self
            .sort
            .iter()
            .map(|s| format!("&sort={}", s.as_param()))
            .collect();
        let link = |p: u64, rel: &str| format!("<{}?page={}&size={}{}>; rel=\"{}\"", path, p, size, sort, rel);

        let mut links = Vec::with_capacity(4);
        if page < last_page {
            links.push(link(page + 1, "next"));
        }
        if page > 0 {
            links.push(link(page - 1, "prev"));
        }
        links.push(link(last_page, "last"));
        links.push(link(0, "first"));
        links.join(",")
    }
}

/// Nulls first, then numbers, strings and booleans in natural order.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
