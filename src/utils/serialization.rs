// Canonical binary encoding. Header and transaction hashes are computed over
// these bytes, so the configuration must stay fixed across every node.
use crate::error::{ChainError, Result};

/// Serialize data using bincode 2.0 with standard configuration
pub fn serialize<T: bincode::Encode>(data: &T) -> Result<Vec<u8>> {
    let config = bincode::config::standard();
    bincode::encode_to_vec(data, config)
        .map_err(|e| ChainError::Serialization(format!("Serialization failed: {e}")))
}

/// Deserialize data using bincode 2.0 with standard configuration
pub fn deserialize<T: bincode::Decode<()>>(bytes: &[u8]) -> Result<T> {
    let config = bincode::config::standard();
    let (data, _) = bincode::decode_from_slice(bytes, config)
        .map_err(|e| ChainError::Serialization(format!("Deserialization failed: {e}")))?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
    struct TestData {
        id: u64,
        name: String,
        values: Vec<i32>,
    }

    #[test]
    fn test_serialize_deserialize() {
        let original = TestData {
            id: 42,
            name: "test".to_string(),
            values: vec![1, 2, 3, 4, 5],
        };

        let serialized = serialize(&original).expect("Serialization should work");
        let deserialized: TestData = deserialize(&serialized).expect("Deserialization should work");

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let data = TestData {
            id: 7,
            name: "same".to_string(),
            values: vec![9, 9, 9],
        };
        assert_eq!(serialize(&data).unwrap(), serialize(&data).unwrap());
    }

    #[test]
    fn test_deserialize_invalid_data() {
        let invalid_bytes = vec![0xFF, 0xFF, 0xFF, 0xFF];
        let result: Result<TestData> = deserialize(&invalid_bytes);
        assert!(result.is_err());
    }
}
