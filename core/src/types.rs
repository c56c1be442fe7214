//! Request vocabulary for the Petfinder API.
//!
//! # Design
//! `Params` is an insertion-ordered map: the remote service verifies the
//! authentication signature against the exact query ordering, so a hash map
//! would not do. Inserting an existing key replaces its value but keeps its
//! position. `Input` is what the operation methods accept, either the one
//! conventional scalar (an id, an animal, a location) or a full mapping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::request::convert_method;

/// Body format requested from the remote service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    Json,
    #[default]
    Xml,
}

impl ResponseFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ResponseFormat::Json),
            "xml" => Ok(ResponseFormat::Xml),
            other => Err(ConfigError::InvalidFormat(other.to_string())),
        }
    }
}

/// One remote capability of the Petfinder API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Operation {
    AuthGetToken,
    BreedList,
    PetGet,
    PetGetRandom,
    PetFind,
    ShelterFind,
    ShelterGet,
    ShelterGetPets,
    ShelterListByBreed,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::AuthGetToken,
        Operation::BreedList,
        Operation::PetGet,
        Operation::PetGetRandom,
        Operation::PetFind,
        Operation::ShelterFind,
        Operation::ShelterGet,
        Operation::ShelterGetPets,
        Operation::ShelterListByBreed,
    ];

    /// Method identifier, with `_` where the remote name has a dot.
    pub fn method_name(self) -> &'static str {
        match self {
            Operation::AuthGetToken => "auth_getToken",
            Operation::BreedList => "breed_list",
            Operation::PetGet => "pet_get",
            Operation::PetGetRandom => "pet_getRandom",
            Operation::PetFind => "pet_find",
            Operation::ShelterFind => "shelter_find",
            Operation::ShelterGet => "shelter_get",
            Operation::ShelterGetPets => "shelter_getPets",
            Operation::ShelterListByBreed => "shelter_listByBreed",
        }
    }

    /// Dotted name used in the request path, e.g. `pet.find`.
    pub fn remote_name(self) -> String {
        convert_method(self.method_name())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.remote_name())
    }
}

/// Accepts both the dotted remote name and the underscore method name.
impl FromStr for Operation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dotted = convert_method(s);
        Operation::ALL
            .into_iter()
            .find(|op| op.remote_name() == dotted)
            .ok_or_else(|| ConfigError::UnknownOperation(s.to_string()))
    }
}

impl TryFrom<String> for Operation {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A query parameter value. Lists encode as `key[0]=a&key[1]=b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    List(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Single(value.clone())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Insertion-ordered parameter mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`, replacing an existing value in place. Returns the old value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// A fresh mapping holding `self` overridden by `overrides`. Keys already
    /// present keep their position; new keys are appended in order.
    pub fn merged(&self, overrides: &Params) -> Params {
        let mut merged = self.clone();
        for (key, value) in overrides.iter() {
            merged.insert(key, value.clone());
        }
        merged
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<K: Into<String>, V: Into<ParamValue>, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Argument of an operation method: the conventional scalar or a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Scalar(String),
    Params(Params),
}

impl Input {
    /// Normalise into a mapping, placing a scalar under `key`.
    pub(crate) fn into_params(self, key: &str) -> Params {
        match self {
            Input::Scalar(value) => Params::new().with(key, value),
            Input::Params(params) => params,
        }
    }
}

impl From<&str> for Input {
    fn from(value: &str) -> Self {
        Input::Scalar(value.to_string())
    }
}

impl From<String> for Input {
    fn from(value: String) -> Self {
        Input::Scalar(value)
    }
}

impl From<&String> for Input {
    fn from(value: &String) -> Self {
        Input::Scalar(value.clone())
    }
}

impl From<Params> for Input {
    fn from(params: Params) -> Self {
        Input::Params(params)
    }
}

impl From<&Params> for Input {
    fn from(params: &Params) -> Self {
        Input::Params(params.clone())
    }
}

macro_rules! scalar_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Input {
                fn from(value: $ty) -> Self {
                    Input::Scalar(value.to_string())
                }
            }

            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::Single(value.to_string())
                }
            }
        )*
    };
}

scalar_from_int!(i32, i64, u32, u64);
