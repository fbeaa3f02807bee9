//! Decoding of S3 notification batches into object references

use aws_lambda_events::event::s3::{S3Event, S3EventRecord};
use object_storage::ObjectRef;
use serde::{Deserialize, Deserializer};
use url::form_urlencoded;

use crate::types::InvalidRecord;

/// Lambda payload of an S3 notification
///
/// Unlike [`S3Event`], a missing or `null` `Records` field is an empty batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct S3Notification {
    /// Notification records in delivery order
    #[serde(rename = "Records", default, deserialize_with = "null_as_default")]
    pub records: Vec<S3EventRecord>,
}

impl From<S3Event> for S3Notification {
    fn from(event: S3Event) -> Self {
        Self {
            records: event.records,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Turns a notification batch into object references, one per record, in batch order
///
/// A missing (`null`) batch yields no records.
#[must_use]
pub fn notification_batch(
    event: Option<&S3Notification>,
) -> Vec<Result<ObjectRef, InvalidRecord>> {
    event.map_or_else(Vec::new, |event| {
        event
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| object_ref(index, record))
            .collect()
    })
}

fn object_ref(index: usize, record: &S3EventRecord) -> Result<ObjectRef, InvalidRecord> {
    let bucket = record.s3.bucket.name.as_deref().filter(|name| !name.is_empty());
    let key = record
        .s3
        .object
        .url_decoded_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .or_else(|| {
            record
                .s3
                .object
                .key
                .as_deref()
                .filter(|key| !key.is_empty())
                .map(decode_key)
        });

    match (bucket, key) {
        (Some(bucket), Some(key)) => Ok(ObjectRef::new(bucket, key)),
        (None, key) => Err(InvalidRecord::MissingBucket { index, key }),
        (Some(bucket), None) => Err(InvalidRecord::MissingKey {
            index,
            bucket: Some(bucket.to_string()),
        }),
    }
}

/// Decodes an object key as it appears in an S3 notification
///
/// S3 form-encodes keys in events: spaces become `+` and other reserved
/// characters are percent-escaped.
#[must_use]
pub fn decode_key(raw: &str) -> String {
    // '&' and '=' would otherwise split the key into pairs
    let escaped = raw.replace('&', "%26").replace('=', "%3D");
    form_urlencoded::parse(escaped.as_bytes())
        .next()
        .map_or_else(|| raw.to_string(), |(key, _)| key.into_owned())
}
