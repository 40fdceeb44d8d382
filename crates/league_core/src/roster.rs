//! Registered players in registration order
//!
//! The snapshot stores players as a JSON object keyed by name. The roster
//! keeps the order keys were registered (or read) in, so draws and
//! leaderboard ties come out the same after a save and load.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::types::{Player, PlayerStats};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    /// Appends a player; returns false if the name is taken
    pub(crate) fn insert(&mut self, player: Player) -> bool {
        if self.contains(&player.name) {
            return false;
        }
        self.players.push(player);
        true
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.name == name)?;
        Some(self.players.remove(idx))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.players.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.players.iter().map(|p| p.name.as_str())
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Player;
    type IntoIter = std::slice::Iter<'a, Player>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.iter()
    }
}

impl Serialize for Roster {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.players.len()))?;
        for player in &self.players {
            map.serialize_entry(&player.name, &player.stats)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Roster {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RosterVisitor)
    }
}

struct RosterVisitor;

impl<'de> Visitor<'de> for RosterVisitor {
    type Value = Roster;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of player name to {totalProfit, daysPlayed}")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut roster = Roster::new();
        while let Some((name, stats)) = access.next_entry::<String, PlayerStats>()? {
            if !roster.insert(Player { name: name.clone(), stats }) {
                return Err(serde::de::Error::custom(format!("duplicate player '{name}'")));
            }
        }
        Ok(roster)
    }
}

#[cfg(test)]
#[path = "roster_tests.rs"]
mod roster_tests;
