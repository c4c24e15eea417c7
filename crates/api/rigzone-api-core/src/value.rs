//! Parameter value kinds supported by the state-machine sink.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Bool,
    Float,
}

/// A parameter value, either a boolean flag or a continuous float.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ParamValue {
    Bool(bool),
    Float(f32),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Bool(_) => ParamKind::Bool,
            ParamValue::Float(_) => ParamKind::Float,
        }
    }

    pub fn as_float(&self) -> f32 {
        match *self {
            ParamValue::Float(f) => f,
            ParamValue::Bool(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    pub fn as_bool(&self) -> bool {
        match *self {
            ParamValue::Bool(b) => b,
            ParamValue::Float(f) => f != 0.0,
        }
    }
}

impl Default for ParamValue {
    fn default() -> Self {
        ParamValue::Float(0.0)
    }
}
