//! Serde helpers for the service's JSON encoding of binary and time fields.

/// Binary fields travel as standard base64 strings.
pub mod blob {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    /// Serializes bytes as a base64 string.
    pub fn serialize<T, S>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<[u8]>,
        S: Serializer,
    {
        serializer.serialize_str(&BASE64.encode(bytes.as_ref()))
    }

    /// Deserializes a base64 string into bytes.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        BASE64
            .decode(encoded.as_bytes())
            .map_err(|e| D::Error::custom(format!("invalid base64: {e}")))
    }
}

/// Timestamps travel as fractional seconds since the Unix epoch.
pub mod epoch {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serializer};

    /// Serializes an optional timestamp as epoch seconds.
    pub fn serialize<S>(time: &Option<SystemTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(time) => {
                let secs = time
                    .duration_since(UNIX_EPOCH)
                    .map_err(|_| S::Error::custom("timestamp before Unix epoch"))?
                    .as_secs_f64();
                serializer.serialize_some(&secs)
            }
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes optional epoch seconds into a timestamp.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SystemTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<f64>::deserialize(deserializer)?
            .map(|secs| {
                Duration::try_from_secs_f64(secs)
                    .ok()
                    .and_then(|since| UNIX_EPOCH.checked_add(since))
                    .ok_or_else(|| D::Error::custom(format!("invalid epoch seconds: {secs}")))
            })
            .transpose()
    }
}
