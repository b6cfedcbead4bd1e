//! Binary and JSON encoding for every container.
//!
//! Maps serialize as a key/value object in iteration order; sets as a
//! sequence in iteration order. The binary form of a [`SliceMap`] is two
//! consecutive values, the plain table and then the key order, so the order
//! survives a round trip exactly.
//!
//! Decoding always builds the new contents aside and swaps them in only when
//! the whole input was valid. Maps are replaced by what was decoded; sets
//! grow by it. A sort function is never encoded: decoding into a map that
//! has one keeps it and re-sorts, decoding into a fresh map leaves none.

use crate::error::{Error, Result};
use crate::locked::{Locked, LockedSet};
use crate::ordered_set::OrderedSet;
use crate::set::Set;
use crate::set_like::SetLike;
use crate::slice_map::SliceMap;
use crate::slice_set::SliceSet;
use crate::std_map::StdMap;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use hashbrown::HashMap;
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Compact binary encoding (bincode).
pub trait BinaryCodec {
    fn marshal_binary(&self) -> Result<Vec<u8>>;

    /// Decode `data` into `self`. On error `self` is unchanged.
    fn unmarshal_binary(&mut self, data: &[u8]) -> Result<()>;
}

/// JSON text encoding (serde_json).
pub trait JsonCodec {
    fn marshal_json(&self) -> Result<String>;

    /// Decode `data` into `self`. On error `self` is unchanged.
    fn unmarshal_json(&mut self, data: &str) -> Result<()>;
}

// ---------- SliceMap ----------

impl<K, V, H> Serialize for SliceMap<K, V, H>
where
    K: Serialize + Eq + Hash + Clone,
    V: Serialize,
    H: BuildHasher,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct SliceMapVisitor<K, V, H> {
    marker: PhantomData<fn() -> SliceMap<K, V, H>>,
}

impl<'de, K, V, H> Visitor<'de> for SliceMapVisitor<K, V, H>
where
    K: Deserialize<'de> + Eq + Hash + Clone,
    V: Deserialize<'de>,
    H: BuildHasher + Default,
{
    type Value = SliceMap<K, V, H>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map")
    }

    // Entries land in document order; a repeated key keeps its first
    // position and takes the last value.
    fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let cap = access.size_hint().unwrap_or(0).min(4096);
        let mut map = SliceMap::with_capacity_and_hasher(cap, H::default());
        while let Some((key, value)) = access.next_entry()? {
            map.set(key, value);
        }
        Ok(map)
    }
}

impl<'de, K, V, H> Deserialize<'de> for SliceMap<K, V, H>
where
    K: Deserialize<'de> + Eq + Hash + Clone,
    V: Deserialize<'de>,
    H: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SliceMapVisitor {
            marker: PhantomData,
        })
    }
}

// `order` must list each key of `items` exactly once.
fn check_order<K, V, H>(items: &HashMap<K, V, H>, order: &[K]) -> Result<()>
where
    K: Eq + Hash,
    H: BuildHasher,
{
    if items.len() != order.len() {
        return Err(Error::corrupt(format!(
            "order lists {} keys, table holds {}",
            order.len(),
            items.len()
        )));
    }
    let mut seen = hashbrown::HashSet::with_capacity(order.len());
    for k in order {
        if !items.contains_key(k) {
            return Err(Error::corrupt("order lists a key missing from the table"));
        }
        if !seen.insert(k) {
            return Err(Error::corrupt("order lists a key twice"));
        }
    }
    Ok(())
}

impl<K, V, H> SliceMap<K, V, H>
where
    K: Eq + Hash + Clone,
    H: BuildHasher,
{
    // Take the decoded contents, keeping our sort function.
    fn replace_with(&mut self, mut decoded: SliceMap<K, V, H>) {
        decoded.less = self.less.take();
        decoded.resort();
        *self = decoded;
        log::debug!("slice map: decoded {} entries", self.len());
    }
}

impl<K, V, H> BinaryCodec for SliceMap<K, V, H>
where
    K: Serialize + DeserializeOwned + Eq + Hash + Clone,
    V: Serialize + DeserializeOwned,
    H: BuildHasher + Default,
{
    fn marshal_binary(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&(&self.items, &self.order))?)
    }

    fn unmarshal_binary(&mut self, data: &[u8]) -> Result<()> {
        let (items, order): (HashMap<K, V, H>, Vec<K>) = bincode::deserialize(data)?;
        if let Err(e) = check_order(&items, &order) {
            log::warn!("slice map: rejected binary input: {}", e);
            return Err(e);
        }
        self.replace_with(SliceMap {
            items,
            order,
            less: None,
        });
        Ok(())
    }
}

impl<K, V, H> JsonCodec for SliceMap<K, V, H>
where
    K: Serialize + DeserializeOwned + Eq + Hash + Clone,
    V: Serialize + DeserializeOwned,
    H: BuildHasher + Default,
{
    fn marshal_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn unmarshal_json(&mut self, data: &str) -> Result<()> {
        let decoded: SliceMap<K, V, H> = serde_json::from_str(data)?;
        self.replace_with(decoded);
        Ok(())
    }
}

// ---------- StdMap ----------

impl<K, V, H> Serialize for StdMap<K, V, H>
where
    K: Serialize + Eq + Hash,
    V: Serialize,
    H: BuildHasher,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.items.serialize(serializer)
    }
}

impl<'de, K, V, H> Deserialize<'de> for StdMap<K, V, H>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
    H: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        HashMap::deserialize(deserializer).map(StdMap::from)
    }
}

impl<K, V, H> BinaryCodec for StdMap<K, V, H>
where
    K: Serialize + DeserializeOwned + Eq + Hash,
    V: Serialize + DeserializeOwned,
    H: BuildHasher + Default,
{
    fn marshal_binary(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self.items)?)
    }

    fn unmarshal_binary(&mut self, data: &[u8]) -> Result<()> {
        self.items = bincode::deserialize(data)?;
        log::debug!("map: decoded {} entries", self.items.len());
        Ok(())
    }
}

impl<K, V, H> JsonCodec for StdMap<K, V, H>
where
    K: Serialize + DeserializeOwned + Eq + Hash,
    V: Serialize + DeserializeOwned,
    H: BuildHasher + Default,
{
    fn marshal_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn unmarshal_json(&mut self, data: &str) -> Result<()> {
        self.items = serde_json::from_str(data)?;
        log::debug!("map: decoded {} entries", self.items.len());
        Ok(())
    }
}

// ---------- sets ----------

// Sets encode as a plain sequence of members in iteration order and decode
// additively: the whole input is read first, then every member is added.
macro_rules! set_codecs {
    ($set:ident, [$($key_bound:tt)+]) => {
        impl<K, H> Serialize for $set<K, H>
        where
            K: Serialize + $($key_bound)+,
            H: BuildHasher,
        {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.collect_seq(SetLike::all(self))
            }
        }

        impl<'de, K, H> Deserialize<'de> for $set<K, H>
        where
            K: Deserialize<'de> + $($key_bound)+,
            H: BuildHasher + Default,
        {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let members = Vec::<K>::deserialize(deserializer)?;
                Ok(members.into_iter().collect())
            }
        }

        impl<K, H> BinaryCodec for $set<K, H>
        where
            K: Serialize + DeserializeOwned + $($key_bound)+,
            H: BuildHasher + Default,
        {
            fn marshal_binary(&self) -> Result<Vec<u8>> {
                Ok(bincode::serialize(self)?)
            }

            fn unmarshal_binary(&mut self, data: &[u8]) -> Result<()> {
                let members: Vec<K> = bincode::deserialize(data)?;
                log::debug!("set: decoded {} members", members.len());
                SetLike::insert(self, members);
                Ok(())
            }
        }

        impl<K, H> JsonCodec for $set<K, H>
        where
            K: Serialize + DeserializeOwned + $($key_bound)+,
            H: BuildHasher + Default,
        {
            fn marshal_json(&self) -> Result<String> {
                Ok(serde_json::to_string(self)?)
            }

            fn unmarshal_json(&mut self, data: &str) -> Result<()> {
                let members: Vec<K> = serde_json::from_str(data)?;
                log::debug!("set: decoded {} members", members.len());
                SetLike::insert(self, members);
                Ok(())
            }
        }
    };
}

set_codecs!(Set, [Eq + Hash + Clone]);
set_codecs!(SliceSet, [Eq + Hash + Clone]);
set_codecs!(OrderedSet, [Ord + Hash + Clone]);

// ---------- lock wrappers ----------

// Encoding reads under one read lock; decoding through `&self` holds the
// write lock while the inner container swaps in its new contents.
macro_rules! locked_codecs {
    ($wrapper:ident) => {
        impl<T: Serialize> Serialize for $wrapper<T> {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                self.with_read(|inner| inner.serialize(serializer))
            }
        }

        impl<'de, T: Deserialize<'de>> Deserialize<'de> for $wrapper<T> {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                T::deserialize(deserializer).map($wrapper::new)
            }
        }

        impl<T: BinaryCodec> $wrapper<T> {
            pub fn marshal_binary(&self) -> Result<Vec<u8>> {
                self.with_read(|inner| inner.marshal_binary())
            }

            pub fn unmarshal_binary(&self, data: &[u8]) -> Result<()> {
                self.with_write(|inner| inner.unmarshal_binary(data))
            }
        }

        impl<T: JsonCodec> $wrapper<T> {
            pub fn marshal_json(&self) -> Result<String> {
                self.with_read(|inner| inner.marshal_json())
            }

            pub fn unmarshal_json(&self, data: &str) -> Result<()> {
                self.with_write(|inner| inner.unmarshal_json(data))
            }
        }

        impl<T: BinaryCodec> BinaryCodec for $wrapper<T> {
            fn marshal_binary(&self) -> Result<Vec<u8>> {
                self.with_read(|inner| inner.marshal_binary())
            }

            fn unmarshal_binary(&mut self, data: &[u8]) -> Result<()> {
                self.get_mut().unmarshal_binary(data)
            }
        }

        impl<T: JsonCodec> JsonCodec for $wrapper<T> {
            fn marshal_json(&self) -> Result<String> {
                self.with_read(|inner| inner.marshal_json())
            }

            fn unmarshal_json(&mut self, data: &str) -> Result<()> {
                self.get_mut().unmarshal_json(data)
            }
        }
    };
}

locked_codecs!(Locked);
locked_codecs!(LockedSet);
