//! Query (`_find`) construction
//!
//! ```rust
//! use cloudant_link::query::{eq, gt, and, QueryBuilder, Sort};
//!
//! let query = QueryBuilder::new(and([eq("foo", "bar"), gt("n", 3)]))
//!     .fields(["_id", "foo"])
//!     .sort([Sort::asc("n")])
//!     .limit(10)
//!     .use_index("ddoc")
//!     .build();
//! assert!(query.contains("\"$and\""));
//! ```

use serde_json::{Map, Value};

/// A selector expression
#[derive(Debug, Clone, PartialEq)]
pub struct Selector(Value);

impl Selector {
    /// Selector from raw JSON.
    pub fn raw(value: Value) -> Self {
        Selector(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

fn operator(field: &str, op: &str, value: Value) -> Selector {
    let mut condition = Map::new();
    condition.insert(op.to_string(), value);
    let mut selector = Map::new();
    selector.insert(field.to_string(), Value::Object(condition));
    Selector(Value::Object(selector))
}

fn combine<I>(op: &str, selectors: I) -> Selector
where
    I: IntoIterator<Item = Selector>,
{
    let list = selectors.into_iter().map(Selector::into_value).collect();
    let mut selector = Map::new();
    selector.insert(op.to_string(), Value::Array(list));
    Selector(Value::Object(selector))
}

pub fn eq(field: &str, value: impl Into<Value>) -> Selector {
    operator(field, "$eq", value.into())
}

pub fn ne(field: &str, value: impl Into<Value>) -> Selector {
    operator(field, "$ne", value.into())
}

pub fn gt(field: &str, value: impl Into<Value>) -> Selector {
    operator(field, "$gt", value.into())
}

pub fn gte(field: &str, value: impl Into<Value>) -> Selector {
    operator(field, "$gte", value.into())
}

pub fn lt(field: &str, value: impl Into<Value>) -> Selector {
    operator(field, "$lt", value.into())
}

pub fn lte(field: &str, value: impl Into<Value>) -> Selector {
    operator(field, "$lte", value.into())
}

pub fn exists(field: &str, exists: bool) -> Selector {
    operator(field, "$exists", Value::Bool(exists))
}

pub fn and<I: IntoIterator<Item = Selector>>(selectors: I) -> Selector {
    combine("$and", selectors)
}

pub fn or<I: IntoIterator<Item = Selector>>(selectors: I) -> Selector {
    combine("$or", selectors)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    field: String,
    descending: bool,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    fn to_value(&self) -> Value {
        let mut sort = Map::new();
        let direction = if self.descending { "desc" } else { "asc" };
        sort.insert(self.field.clone(), Value::from(direction));
        Value::Object(sort)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    selector: Selector,
    fields: Vec<String>,
    sort: Vec<Sort>,
    limit: Option<u64>,
    skip: Option<u64>,
    bookmark: Option<String>,
    use_index: Option<Value>,
    execution_stats: bool,
}

impl QueryBuilder {
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            fields: Vec::new(),
            sort: Vec::new(),
            limit: None,
            skip: None,
            bookmark: None,
            use_index: None,
            execution_stats: false,
        }
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn sort<I: IntoIterator<Item = Sort>>(mut self, sort: I) -> Self {
        self.sort = sort.into_iter().collect();
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn bookmark(mut self, bookmark: impl Into<String>) -> Self {
        self.bookmark = Some(bookmark.into());
        self
    }

    /// Use any index in design document `ddoc`.
    pub fn use_index(mut self, ddoc: &str) -> Self {
        self.use_index = Some(Value::from(ddoc));
        self
    }

    /// Use index `name` in design document `ddoc`.
    pub fn use_index_named(mut self, ddoc: &str, name: &str) -> Self {
        self.use_index = Some(Value::Array(vec![Value::from(ddoc), Value::from(name)]));
        self
    }

    pub fn execution_stats(mut self, enabled: bool) -> Self {
        self.execution_stats = enabled;
        self
    }

    pub fn to_value(&self) -> Value {
        let mut query = Map::new();
        query.insert("selector".to_string(), self.selector.as_value().clone());
        if !self.fields.is_empty() {
            query.insert(
                "fields".to_string(),
                Value::Array(self.fields.iter().map(|f| Value::from(f.as_str())).collect()),
            );
        }
        if !self.sort.is_empty() {
            query.insert(
                "sort".to_string(),
                Value::Array(self.sort.iter().map(Sort::to_value).collect()),
            );
        }
        if let Some(limit) = self.limit {
            query.insert("limit".to_string(), Value::from(limit));
        }
        if let Some(skip) = self.skip {
            query.insert("skip".to_string(), Value::from(skip));
        }
        if let Some(bookmark) = &self.bookmark {
            query.insert("bookmark".to_string(), Value::from(bookmark.as_str()));
        }
        if let Some(use_index) = &self.use_index {
            query.insert("use_index".to_string(), use_index.clone());
        }
        if self.execution_stats {
            query.insert("execution_stats".to_string(), Value::Bool(true));
        }
        Value::Object(query)
    }

    /// The query as JSON text.
    pub fn build(&self) -> String {
        self.to_value().to_string()
    }
}
