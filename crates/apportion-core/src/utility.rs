//! # Utility Types — Single Source of Truth
//!
//! Defines the closed `UtilityType` enum and `UtilityMap<T>`, a fixed-shape
//! record holding exactly one value per utility type.
//!
//! Every computation that iterates utility types (tenant allocation,
//! company portion, invoice lines) goes through [`UtilityType::all()`] or a
//! `UtilityMap`, so the key set can never drift between them. A typo in an
//! external utility type string fails at parse time instead of silently
//! creating a seventh bucket.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// The kinds of supplier invoices that get apportioned to tenants.
///
/// Variant order is the canonical order: it drives `Ord`, iteration in
/// [`UtilityType::all()`], and the key order of serialized maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilityType {
    /// Electric power.
    Electricity,
    /// Natural gas.
    Gas,
    /// Water and sewage.
    Water,
    /// Internet connectivity.
    Internet,
    /// Sanitation and waste collection.
    Salubrity,
    /// Anything else billed per building.
    Other,
}

/// Total number of utility types.
pub const UTILITY_TYPE_COUNT: usize = 6;

impl UtilityType {
    /// Returns all utility types in canonical order.
    pub fn all() -> &'static [UtilityType; UTILITY_TYPE_COUNT] {
        &[
            Self::Electricity,
            Self::Gas,
            Self::Water,
            Self::Internet,
            Self::Salubrity,
            Self::Other,
        ]
    }

    /// Position of this type in [`UtilityType::all()`].
    pub fn index(self) -> usize {
        match self {
            Self::Electricity => 0,
            Self::Gas => 1,
            Self::Water => 2,
            Self::Internet => 3,
            Self::Salubrity => 4,
            Self::Other => 5,
        }
    }

    /// Returns the snake_case identifier, matching the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electricity => "electricity",
            Self::Gas => "gas",
            Self::Water => "water",
            Self::Internet => "internet",
            Self::Salubrity => "salubrity",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for UtilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UtilityType {
    type Err = CoreError;

    /// Parse a utility type from its snake_case identifier. Case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "electricity" => Ok(Self::Electricity),
            "gas" => Ok(Self::Gas),
            "water" => Ok(Self::Water),
            "internet" => Ok(Self::Internet),
            "salubrity" => Ok(Self::Salubrity),
            "other" => Ok(Self::Other),
            other => Err(CoreError::UnknownUtilityType(other.to_string())),
        }
    }
}

// ─── UtilityMap ──────────────────────────────────────────────────────

/// Exactly one `T` per utility type.
///
/// Serializes as a JSON object with all six keys in canonical order.
/// Deserializing accepts any subset of keys and fills the rest with
/// `T::default()`; unknown keys are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtilityMap<T>([T; UTILITY_TYPE_COUNT]);

impl<T> UtilityMap<T> {
    /// Build a map by evaluating `f` once per utility type, in canonical order.
    pub fn from_fn(mut f: impl FnMut(UtilityType) -> T) -> Self {
        let all = UtilityType::all();
        Self(std::array::from_fn(|i| f(all[i])))
    }

    /// Borrow the value for `utility`.
    pub fn get(&self, utility: UtilityType) -> &T {
        &self.0[utility.index()]
    }

    /// Replace the value for `utility`.
    pub fn set(&mut self, utility: UtilityType, value: T) {
        self.0[utility.index()] = value;
    }

    /// Iterate `(type, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (UtilityType, &T)> + '_ {
        UtilityType::all().iter().copied().zip(self.0.iter())
    }

    /// Iterate values in canonical order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.0.iter()
    }

    /// Transform every value, keeping the key set.
    pub fn map<U>(&self, mut f: impl FnMut(UtilityType, &T) -> U) -> UtilityMap<U> {
        UtilityMap::from_fn(|utility| f(utility, self.get(utility)))
    }
}

impl<T: Default> Default for UtilityMap<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<UtilityType> for UtilityMap<T> {
    type Output = T;

    fn index(&self, utility: UtilityType) -> &T {
        self.get(utility)
    }
}

impl<T> IndexMut<UtilityType> for UtilityMap<T> {
    fn index_mut(&mut self, utility: UtilityType) -> &mut T {
        &mut self.0[utility.index()]
    }
}

impl<T: Serialize> Serialize for UtilityMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(UTILITY_TYPE_COUNT))?;
        for (utility, value) in self.iter() {
            map.serialize_entry(utility.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de> + Default> Deserialize<'de> for UtilityMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct UtilityMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de> + Default> Visitor<'de> for UtilityMapVisitor<T> {
            type Value = UtilityMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map keyed by utility type")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut out = UtilityMap::<T>::default();
                let mut seen = [false; UTILITY_TYPE_COUNT];
                while let Some(key) = access.next_key::<String>()? {
                    let utility = UtilityType::from_str(&key).map_err(serde::de::Error::custom)?;
                    if seen[utility.index()] {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate utility type key: {key:?}"
                        )));
                    }
                    seen[utility.index()] = true;
                    out.set(utility, access.next_value()?);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(UtilityMapVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_count_and_index() {
        assert_eq!(UtilityType::all().len(), UTILITY_TYPE_COUNT);
        for (i, utility) in UtilityType::all().iter().enumerate() {
            assert_eq!(utility.index(), i);
        }
    }

    #[test]
    fn test_as_str_roundtrip() {
        for utility in UtilityType::all() {
            let parsed: UtilityType = utility.as_str().parse().unwrap();
            assert_eq!(*utility, parsed);
            assert_eq!(utility.to_string(), utility.as_str());
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("Electricity".parse::<UtilityType>().is_err());
        assert!("heating".parse::<UtilityType>().is_err());
        assert!("".parse::<UtilityType>().is_err());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for utility in UtilityType::all() {
            let json = serde_json::to_string(utility).unwrap();
            assert_eq!(json, format!("\"{}\"", utility.as_str()));
        }
    }

    #[test]
    fn test_ord_follows_canonical_order() {
        let mut shuffled = vec![
            UtilityType::Other,
            UtilityType::Water,
            UtilityType::Electricity,
            UtilityType::Salubrity,
            UtilityType::Gas,
            UtilityType::Internet,
        ];
        shuffled.sort();
        assert_eq!(shuffled.as_slice(), UtilityType::all().as_slice());
    }

    #[test]
    fn test_utility_map_serializes_all_keys() {
        let mut map = UtilityMap::<u32>::default();
        map[UtilityType::Water] = 7;
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(
            json,
            r#"{"electricity":0,"gas":0,"water":7,"internet":0,"salubrity":0,"other":0}"#
        );
    }

    #[test]
    fn test_utility_map_deserialize_fills_defaults() {
        let map: UtilityMap<u32> = serde_json::from_str(r#"{"gas": 3}"#).unwrap();
        assert_eq!(map[UtilityType::Gas], 3);
        assert_eq!(map[UtilityType::Electricity], 0);
        assert_eq!(map.values().sum::<u32>(), 3);
    }

    #[test]
    fn test_utility_map_deserialize_rejects_unknown_key() {
        let result: Result<UtilityMap<u32>, _> = serde_json::from_str(r#"{"heating": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_utility_map_deserialize_rejects_duplicate_key() {
        let result: Result<UtilityMap<u32>, _> =
            serde_json::from_str(r#"{"gas": 1, "gas": 2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_utility_map_map_keeps_keys() {
        let base = UtilityMap::from_fn(|u| u.index() as u32);
        let doubled = base.map(|_, v| v * 2);
        for (utility, value) in doubled.iter() {
            assert_eq!(*value, utility.index() as u32 * 2);
        }
    }
}
