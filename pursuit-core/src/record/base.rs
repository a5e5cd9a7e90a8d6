//! Base implementation of records for logging.
//!
//! This module provides a flexible record system for storing and retrieving
//! scalars, arrays and strings.
use crate::error::PursuitError;
use std::{
    collections::{
        hash_map::{IntoIter, Iter, Keys},
        HashMap,
    },
    convert::Into,
};

/// Represents possible types of values that can be stored in a [`Record`].
///
/// # Variants
///
/// * `Scalar(f32)` - A single floating-point value, typically used for metrics
/// * `Array1(Vec<f32>)` - A 1-dimensional array of floating-point values
/// * `String(String)` - A text value
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, like a reward or a distance.
    Scalar(f32),

    /// A 1-dimensional array of floating-point values, like an observation.
    Array1(Vec<f32>),

    /// A text value, useful for storing labels like the outcome of an episode.
    String(String),
}

/// A container for storing key-value pairs of various data types.
///
/// # Examples
///
/// ```rust
/// use pursuit_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("distance", 4.5);
/// record.insert("outcome", RecordValue::String("captured".to_string()));
///
/// let distance = record.get_scalar("distance").unwrap();
/// assert_eq!(distance, 4.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys in the record.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Returns an iterator that consumes the record.
    pub fn into_iter_in_record(self) -> IntoIter<String, RecordValue> {
        self.0.into_iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records, consuming both.
    ///
    /// If both records contain the same key, the value from the second record
    /// will overwrite the value from the first record.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges another record into this one in place.
    pub fn merge_inplace(&mut self, record: Record) {
        for (k, v) in record.into_iter_in_record() {
            self.0.insert(k, v);
        }
    }

    /// Gets a scalar value from the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not exist or the value is not a scalar.
    pub fn get_scalar(&self, k: &str) -> Result<f32, PursuitError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(PursuitError::RecordValueTypeError("Scalar".to_string())),
            None => Err(PursuitError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a 1-dimensional array from the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not exist or the value is not an array.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, PursuitError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(PursuitError::RecordValueTypeError("Array1".to_string())),
            None => Err(PursuitError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value from the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not exist or the value is not a string.
    pub fn get_string(&self, k: &str) -> Result<String, PursuitError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(PursuitError::RecordValueTypeError("String".to_string())),
            None => Err(PursuitError::RecordKeyError(k.to_string())),
        }
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of entries in the record.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_with_wrong_type_or_key() {
        let record = Record::from_slice(&[
            ("reward", RecordValue::Scalar(1.0)),
            ("outcome", RecordValue::String("escaped".to_string())),
        ]);

        assert_eq!(record.get_scalar("reward").unwrap(), 1.0);
        assert_eq!(record.get_string("outcome").unwrap(), "escaped");
        assert!(matches!(
            record.get_scalar("outcome"),
            Err(PursuitError::RecordValueTypeError(_))
        ));
        assert!(matches!(
            record.get_array1("obs"),
            Err(PursuitError::RecordKeyError(_))
        ));
    }

    #[test]
    fn test_merge_overwrites_with_second() {
        let a = Record::from_scalar("distance", 1.0);
        let b = Record::from_slice(&[
            ("distance", RecordValue::Scalar(2.0)),
            ("time_remaining", RecordValue::Scalar(3.0)),
        ]);
        let merged = a.merge(b);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get_scalar("distance").unwrap(), 2.0);
    }
}
