//! schema.org JSON-LD strategy: pull `sku` out of `Product` records.

/// Extracts SKUs from one JSON-LD script body.
///
/// Accepts a top-level object, a top-level array, or an `@graph` container
/// (many themes wrap structured data in `{"@graph": [...]}`). A record
/// contributes its `sku` only when its declared `@type` is `"Product"`;
/// `@type` may be a plain string or an array of strings.
///
/// Malformed JSON yields an empty result — a bad block must not abort
/// extraction of candidates from other strategies.
pub(super) fn product_skus(json_text: &str) -> Vec<String> {
    let value: serde_json::Value = match serde_json::from_str(json_text.trim()) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(error = %e, "skipping malformed JSON-LD block");
            return Vec::new();
        }
    };

    let candidates: Vec<serde_json::Value> = if let Some(arr) = value.as_array() {
        arr.clone()
    } else {
        vec![value]
    };

    // Expand @graph containers alongside the top-level items.
    let mut items = candidates.clone();
    for item in &candidates {
        if let Some(graph) = item.get("@graph").and_then(serde_json::Value::as_array) {
            items.extend(graph.iter().cloned());
        }
    }

    items.iter().filter_map(product_sku).collect()
}

fn product_sku(item: &serde_json::Value) -> Option<String> {
    let type_node = item.get("@type")?;
    let is_product = if let Some(s) = type_node.as_str() {
        s == "Product"
    } else if let Some(arr) = type_node.as_array() {
        arr.iter().filter_map(|v| v.as_str()).any(|s| s == "Product")
    } else {
        false
    };
    if !is_product {
        return None;
    }

    // `sku` is a string in the schema but numeric in the wild on some themes.
    match item.get("sku")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
