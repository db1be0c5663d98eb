use indexmap::IndexMap;
use serde::{ser::SerializeMap as _, Deserialize as _};

use crate::kerning::Kerning;

pub(crate) fn kerning_map<S>(map: &Kerning, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let mut ser_map = serializer.serialize_map(Some(map.len()))?;
    for ((left, right), value) in map {
        let key = format!("{}:{}", left, right);
        ser_map.serialize_entry(&key, value)?;
    }
    ser_map.end()
}

pub(crate) fn kerning_unmap<'de, D>(deserializer: D) -> Result<Kerning, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw_map: IndexMap<String, f64> = IndexMap::deserialize(deserializer)?;
    let mut map = Kerning::new();
    for (key, value) in raw_map {
        let Some((left, right)) = key.split_once(':') else {
            return Err(serde::de::Error::custom(format!(
                "Invalid kerning key format: {}",
                key
            )));
        };
        map.insert((left.into(), right.into()), value);
    }
    Ok(map)
}
