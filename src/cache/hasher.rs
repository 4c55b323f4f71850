use crate::utils::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use xxhash_rust::xxh3::{xxh3_64, Xxh3};

/// Deterministic, non-cryptographic fingerprints of input collections.
///
/// Values are serialized to JSON with object keys sorted, and collection
/// elements are sorted by their serialized form before hashing, so the same
/// elements in a different order give the same fingerprint. Use
/// [`ContentHasher::hash_value`] when the result depends on element order.
pub struct ContentHasher;

impl ContentHasher {
    pub fn hash_collection<T: Serialize>(items: &[T]) -> Result<String> {
        let mut encoded = items
            .iter()
            .map(canonical_json)
            .collect::<Result<Vec<String>>>()?;
        encoded.sort_unstable();

        let mut hasher = Xxh3::new();
        hasher.update(&(encoded.len() as u64).to_le_bytes());
        for element in &encoded {
            hasher.update(&(element.len() as u64).to_le_bytes());
            hasher.update(element.as_bytes());
        }
        Ok(format!("{:016x}", hasher.digest()))
    }

    pub fn hash_value<T: Serialize + ?Sized>(value: &T) -> Result<String> {
        let encoded = canonical_json(value)?;
        Ok(format!("{:016x}", xxh3_64(encoded.as_bytes())))
    }

    /// Folds several fingerprints into one; part order matters here.
    pub fn combine(parts: &[&str]) -> String {
        let mut hasher = Xxh3::new();
        for part in parts {
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        format!("{:016x}", hasher.digest())
    }
}

fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let value = canonicalize(serde_json::to_value(value)?);
    Ok(serde_json::to_string(&value)?)
}

// serde_json 開了 preserve_order 時 Map 會保留插入順序，所以手動排序
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<(String, Value)> = map.into_iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            let sorted: Map<String, Value> = pairs
                .into_iter()
                .map(|(key, inner)| (key, canonicalize(inner)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Service, Testimonial};

    fn testimonial(id: &str, rating: u8) -> Testimonial {
        Testimonial {
            id: id.to_string(),
            name: format!("Client {}", id),
            service: Service::Performance,
            service_sub_type: "wedding".to_string(),
            rating,
            location: Some("Melbourne, VIC".to_string()),
            event: None,
            date: Some("2024-01-01".to_string()),
            verified: true,
            featured: false,
        }
    }

    #[test]
    fn test_identical_content_hashes_identically() {
        let a = vec![testimonial("1", 5), testimonial("2", 4)];
        let b = a.clone();
        assert_eq!(
            ContentHasher::hash_collection(&a).unwrap(),
            ContentHasher::hash_collection(&b).unwrap()
        );
    }

    #[test]
    fn test_field_change_changes_hash() {
        let a = vec![testimonial("1", 5)];
        let b = vec![testimonial("1", 4)];
        assert_ne!(
            ContentHasher::hash_collection(&a).unwrap(),
            ContentHasher::hash_collection(&b).unwrap()
        );
    }

    #[test]
    fn test_length_change_changes_hash() {
        let a = vec![testimonial("1", 5)];
        let b = vec![testimonial("1", 5), testimonial("1", 5)];
        assert_ne!(
            ContentHasher::hash_collection(&a).unwrap(),
            ContentHasher::hash_collection(&b).unwrap()
        );
    }

    #[test]
    fn test_element_order_does_not_change_hash() {
        let a = vec![testimonial("1", 5), testimonial("2", 4)];
        let b = vec![testimonial("2", 4), testimonial("1", 5)];
        assert_eq!(
            ContentHasher::hash_collection(&a).unwrap(),
            ContentHasher::hash_collection(&b).unwrap()
        );
    }

    #[test]
    fn test_empty_collection_has_stable_hash() {
        let empty: Vec<Testimonial> = Vec::new();
        let hash = ContentHasher::hash_collection(&empty).unwrap();
        assert_eq!(hash.len(), 16);
        assert_eq!(hash, ContentHasher::hash_collection(&empty).unwrap());
    }

    #[test]
    fn test_hash_value_keeps_element_order() {
        let a = vec![testimonial("1", 5), testimonial("2", 4)];
        let b = vec![testimonial("2", 4), testimonial("1", 5)];
        assert_ne!(
            ContentHasher::hash_value(&a).unwrap(),
            ContentHasher::hash_value(&b).unwrap()
        );
        assert_eq!(
            ContentHasher::hash_value(&a).unwrap(),
            ContentHasher::hash_value(&a.clone()).unwrap()
        );
    }

    #[test]
    fn test_combine_is_order_sensitive() {
        assert_ne!(
            ContentHasher::combine(&["a", "b"]),
            ContentHasher::combine(&["b", "a"])
        );
        assert_ne!(
            ContentHasher::combine(&["ab", "c"]),
            ContentHasher::combine(&["a", "bc"])
        );
    }
}
