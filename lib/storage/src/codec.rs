// Artifact encoding: pretty-printed JSON, gzip-compressed
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use pubmed_temporal_core::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    serde_json::to_writer_pretty(&mut encoder, value)?;
    encoder.write_all(b"\n")?;
    Ok(encoder.finish()?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut decoder = GzDecoder::new(bytes);
    let mut json_data = Vec::new();
    decoder.read_to_end(&mut json_data)?;
    Ok(serde_json::from_slice(&json_data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubmed_temporal_core::{Error, IndexMap};

    #[test]
    fn test_payload_is_indented_json() {
        let bytes = encode(&IndexMap::new(vec![2, 1, 0])).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);

        let mut json = String::new();
        GzDecoder::new(bytes.as_slice()).read_to_string(&mut json).unwrap();
        assert_eq!(json, "[\n  2,\n  1,\n  0\n]\n");

        let map: IndexMap = decode(&bytes).unwrap();
        assert_eq!(map.as_slice(), &[2, 1, 0]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode::<IndexMap>(b"not gzip"), Err(Error::Io(_))));

        let bytes = encode(&"a string").unwrap();
        assert!(matches!(decode::<IndexMap>(&bytes), Err(Error::Serialization(_))));
    }
}
