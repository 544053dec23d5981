use std::collections::{HashMap, HashSet};

use crate::product::Product;

/// The session's product catalog. Built once, never mutated.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog. If two records share an id, lookups resolve to the
    /// first one.
    pub fn new(products: Vec<Product>) -> Self {
        let mut index = HashMap::with_capacity(products.len());
        for (i, p) in products.iter().enumerate() {
            index.entry(p.id.as_str().to_owned()).or_insert(i);
        }
        Self { products, index }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.index.get(id).map(|&i| &self.products[i])
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&Product> {
        filter(self, criteria)
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        distinct(self.products.iter().map(|p| p.category.as_str()))
    }

    /// Distinct concerns in first-seen order. Concern matching ignores case,
    /// so `Acne` and `acne` collapse into whichever spelling came first.
    pub fn concerns(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .flat_map(|p| p.concerns.iter().map(String::as_str))
            .filter(|c| !c.is_empty() && seen.insert(c.to_lowercase()))
            .collect()
    }
}

fn distinct<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    items.filter(|item| !item.is_empty() && seen.insert(*item)).collect()
}

/// Transient catalog filter. Empty strings behave like `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub category: Option<String>,
    pub concern: Option<String>,
    pub query: Option<String>,
}

impl FilterCriteria {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_concern(mut self, concern: impl Into<String>) -> Self {
        self.concern = Some(concern.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = match non_empty(&self.category) {
            Some(cat) => product.category == cat,
            None => true,
        };
        let concern_ok = match non_empty(&self.concern) {
            Some(con) => {
                let con = con.to_lowercase();
                product.concerns.iter().any(|c| c.to_lowercase() == con)
            }
            None => true,
        };
        let query_ok = match self.query.as_deref().filter(|q| !q.trim().is_empty()) {
            Some(q) => product.search_text().contains(&q.to_lowercase()),
            None => true,
        };
        category_ok && concern_ok && query_ok
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Products matching every present criterion, in catalog order.
pub fn filter<'a>(catalog: &'a Catalog, criteria: &FilterCriteria) -> Vec<&'a Product> {
    catalog
        .products()
        .iter()
        .filter(|p| criteria.matches(p))
        .collect()
}
