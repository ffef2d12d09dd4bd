//! OData list parameters and paging.

use serde::Deserialize;

use crate::message::Message;

/// Query parameters for listing messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    select: Vec<String>,
    top: Option<u32>,
    filter: Option<String>,
    order_by: Option<String>,
}

impl ListQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the returned properties (`$select`).
    #[must_use]
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Sets the page size (`$top`).
    #[must_use]
    pub const fn top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    /// Sets an OData filter (`$filter`).
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Sets the sort order (`$orderby`).
    #[must_use]
    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// Returns the query string pairs, in a stable order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.select.is_empty() {
            pairs.push(("$select", self.select.join(",")));
        }
        if let Some(top) = self.top {
            pairs.push(("$top", top.to_string()));
        }
        if let Some(filter) = &self.filter {
            pairs.push(("$filter", filter.clone()));
        }
        if let Some(order_by) = &self.order_by {
            pairs.push(("$orderby", order_by.clone()));
        }
        pairs
    }
}

/// One page of a message listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MessagePage {
    /// Messages on this page.
    #[serde(default)]
    pub value: Vec<Message>,
    /// Absolute URL of the next page, if any.
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}
