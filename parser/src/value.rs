//! Resolved argument values.

use chat_command_core::{CommandSchema, FlagType};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single resolved flag value.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Value of a string flag.
    Text(String),
    /// Value of a number flag.
    Number(f64),
    /// Snowflake of a user, role, or channel.
    Id(String),
    /// State of a void flag.
    Bool(bool),
}

impl ArgValue {
    /// Returns `false` only for a void flag that was not given.
    pub fn is_set(&self) -> bool {
        !matches!(self, ArgValue::Bool(false))
    }
}

/// Mapping from flag name to resolved value, in declaration order.
///
/// A slot holding `None` is unset, which is different from a void flag
/// holding `Bool(false)`.
///
/// # Examples
///
/// ```
/// use chat_command_core::{CommandSchema, FlagSchema, FlagType};
/// use chat_command_parser::{ArgValue, ArgumentMap};
///
/// let schema = CommandSchema::new("tag")
///     .with_primary(FlagSchema::new("name", FlagType::String))
///     .with_flag(FlagSchema::new("silent", FlagType::Void));
///
/// let mut args = ArgumentMap::for_command(&schema);
/// assert_eq!(args.get("name"), None);
/// assert_eq!(args.get("silent"), Some(&ArgValue::Bool(false)));
///
/// args.set("name", ArgValue::Text("welcome".into()));
/// assert_eq!(args.text("name"), Some("welcome"));
/// assert_eq!(
///     serde_json::to_string(&args).unwrap(),
///     r#"{"name":"welcome","silent":false}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentMap {
    slots: Vec<(String, Option<ArgValue>)>,
}

impl ArgumentMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map with one slot per declared flag: `false` for void
    /// flags, unset for everything else.
    pub fn for_command(schema: &CommandSchema) -> Self {
        let slots = schema
            .all_flags()
            .map(|flag| {
                let initial = match flag.flag_type {
                    FlagType::Void => Some(ArgValue::Bool(false)),
                    _ => None,
                };
                (flag.name.clone(), initial)
            })
            .collect();
        Self { slots }
    }

    /// Stores a value, overwriting whatever the slot held.
    pub fn set(&mut self, name: &str, value: ArgValue) {
        match self.slots.iter_mut().find(|(slot, _)| slot == name) {
            Some((_, current)) => *current = Some(value),
            None => self.slots.push((name.to_string(), Some(value))),
        }
    }

    /// Returns the value of a slot, or `None` if it is unset or undeclared.
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.slots
            .iter()
            .find(|(slot, _)| slot == name)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Returns `true` if a slot exists for `name`, set or not.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.iter().any(|(slot, _)| slot == name)
    }

    /// Returns `true` if the slot holds a value other than an absent void
    /// flag.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(ArgValue::is_set)
    }

    /// Returns the text of a string flag.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            ArgValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the value of a number flag.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            ArgValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the snowflake of a user, role, or channel flag.
    pub fn id(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            ArgValue::Id(id) => Some(id),
            _ => None,
        }
    }

    /// Returns `true` if a void flag was given.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some(ArgValue::Bool(true)))
    }

    /// Iterates over slots in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ArgValue>)> {
        self.slots
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    /// Names of slots that are still unset.
    pub fn unset(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name)
    }

    /// Returns the number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Serialize for ArgumentMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (name, value) in &self.slots {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
