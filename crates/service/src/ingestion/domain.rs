use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

/// Body of a content API `entries` response. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct EntriesResponse {
    #[serde(default)]
    pub items: Vec<ContentItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentItem {
    pub sys: EntrySys,
    pub fields: ProductFields,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySys {
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_decode_with_extra_fields() {
        let body = r#"{
            "sys": {"type": "Array"},
            "total": 1,
            "items": [{
                "sys": {"createdAt": "2024-01-23T21:47:08.012Z", "id": "4HZH"},
                "fields": {"sku": "ZIMPDOPD", "name": "Apple Mi Watch", "category": "Smartwatch", "price": 1410.29, "stock": 7}
            }]
        }"#;
        let r: EntriesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(r.items.len(), 1);
        let item = &r.items[0];
        assert_eq!(item.fields.name.as_deref(), Some("Apple Mi Watch"));
        assert_eq!(item.fields.price, Some(1410.29));
        assert_eq!(item.sys.created_at.timestamp_millis(), 1706046428012);
    }

    #[test]
    fn missing_items_is_empty() {
        let r: EntriesResponse = serde_json::from_str("{}").unwrap();
        assert!(r.items.is_empty());
    }
}
