// ── Envelope, pagination, and list queries ──

use serde::{Deserialize, Serialize};

/// The `{ success, message, data, errors }` wrapper used by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Lenient view of an error body. Non-2xx responses are not guaranteed to
/// follow the envelope, so every field is optional.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Pagination block returned next to list payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// One page of a list endpoint.
///
/// The backend names the list after the resource (`alerts`, `violations`,
/// `bills`, ...); all of those land in `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(
        alias = "alerts",
        alias = "violations",
        alias = "bills",
        alias = "payments",
        alias = "users"
    )]
    pub items: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Query parameters shared by list endpoints. `None` fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListQuery {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn page_accepts_resource_named_lists() {
        let body = json!({
            "violations": [1, 2, 3],
            "pagination": { "currentPage": 1, "totalPages": 2, "totalItems": 6, "itemsPerPage": 3 }
        });
        let page: Page<u32> = serde_json::from_value(body).unwrap();
        assert_eq!(page.items, vec![1, 2, 3]);
        assert!(page.pagination.has_next());
    }

    #[test]
    fn envelope_without_data_deserializes() {
        let env: Envelope<u32> =
            serde_json::from_value(json!({ "success": false, "message": "bad" })).unwrap();
        assert!(!env.success);
        assert_eq!(env.data, None);
        assert!(env.errors.is_empty());
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct NoDefault {
        id: String,
    }

    fn decode<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Envelope<T> {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn envelope_payload_needs_no_default() {
        let env: Envelope<NoDefault> = decode(json!({ "success": true, "data": { "id": "a1" } }));
        assert_eq!(env.data, Some(NoDefault { id: "a1".into() }));

        let empty: Envelope<NoDefault> = decode(json!({ "success": true }));
        assert_eq!(empty.data, None);
    }

    #[test]
    fn list_query_omits_unset_fields() {
        let q = ListQuery {
            kind: Some("water".into()),
            ..ListQuery::page(2, 10)
        };
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v, json!({ "page": 2, "limit": 10, "type": "water" }));
    }
}
