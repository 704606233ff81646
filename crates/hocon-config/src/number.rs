//! Numeric configuration values.

use std::hash::{Hash, Hasher};

/// The numeric payload of a [`ConfigNumber`].
#[derive(Debug, Clone, Copy)]
pub enum NumberValue {
    Int(i64),
    Float(f64),
}

/// A number, keeping the text it was written as when known.
///
/// Integers and floats compare numerically: `3` equals `3.0`, and both hash
/// like the integer. Fractional values compare as floats.
#[derive(Debug, Clone)]
pub struct ConfigNumber {
    value: NumberValue,
    original_text: Option<String>,
}

impl ConfigNumber {
    pub fn from_i64(value: i64, original_text: Option<String>) -> Self {
        Self {
            value: NumberValue::Int(value),
            original_text,
        }
    }

    /// A float that stays a float, even when whole.
    pub fn from_f64(value: f64, original_text: Option<String>) -> Self {
        Self {
            value: NumberValue::Float(value),
            original_text,
        }
    }

    /// Pick the narrowest representation: whole values in `i64` range
    /// become integers.
    pub fn new_number(value: f64, original_text: Option<String>) -> Self {
        match whole(value) {
            Some(int) => Self::from_i64(int, original_text),
            None => Self::from_f64(value, original_text),
        }
    }

    pub fn value(&self) -> NumberValue {
        self.value
    }

    pub fn original_text(&self) -> Option<&str> {
        self.original_text.as_deref()
    }

    pub fn is_int(&self) -> bool {
        matches!(self.value, NumberValue::Int(_))
    }

    /// The value as an integer, when it is whole.
    pub fn as_i64(&self) -> Option<i64> {
        match self.value {
            NumberValue::Int(int) => Some(int),
            NumberValue::Float(float) => whole(float),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self.value {
            NumberValue::Int(int) => int as f64,
            NumberValue::Float(float) => float,
        }
    }

    /// Text used when the number is concatenated into a string.
    pub fn transform_to_string(&self) -> String {
        if let Some(text) = &self.original_text {
            return text.clone();
        }
        match self.value {
            NumberValue::Int(int) => int.to_string(),
            NumberValue::Float(float) => format!("{:?}", float),
        }
    }
}

fn whole(value: f64) -> Option<i64> {
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

impl PartialEq for ConfigNumber {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_i64(), other.as_i64()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.as_f64() == other.as_f64(),
            _ => false,
        }
    }
}

impl Eq for ConfigNumber {}

impl Hash for ConfigNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.as_i64() {
            Some(int) => int.hash(state),
            None => self.as_f64().to_bits().hash(state),
        }
    }
}
