//! List responses come back in whichever shape the endpoint happens to
//! use: a bare array, a paged `{events, pagination}` object, or an object
//! wrapping the array under `data`, a resource-named key or `items`.

use agenda_core::Pagination;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Deserialize)]
#[serde(untagged)]
enum ListShape {
    Bare(Vec<Value>),
    Paged {
        events: Vec<Value>,
        #[serde(default)]
        pagination: Option<Value>,
    },
    Wrapped(Map<String, Value>),
}

/// Items of a list response plus its pagination block, if it sent one.
pub(crate) struct Listing {
    pub items: Vec<Value>,
    pub pagination: Option<Pagination>,
}

impl Listing {
    /// Pagination as sent, else a single page holding every item.
    pub fn pagination_or_single(&self) -> Pagination {
        self.pagination
            .unwrap_or_else(|| Pagination::single_page(self.items.len()))
    }
}

/// Decode a list body. `resource_key` is the endpoint's own wrapper key
/// (`eventos`, `promoters`, ...). Anything unrecognized is an empty list.
pub(crate) fn listing(body: Value, resource_key: &str) -> Listing {
    match ListShape::deserialize(body) {
        Ok(ListShape::Bare(items)) => Listing {
            items,
            pagination: None,
        },
        Ok(ListShape::Paged { events, pagination }) => Listing {
            items: events,
            pagination: pagination.and_then(|p| serde_json::from_value(p).ok()),
        },
        Ok(ListShape::Wrapped(mut obj)) => {
            let items = ["data", resource_key, "items"]
                .iter()
                .find_map(|k| match obj.remove(*k) {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                })
                .unwrap_or_default();
            Listing {
                items,
                pagination: None,
            }
        }
        Err(_) => Listing {
            items: Vec::new(),
            pagination: None,
        },
    }
}
