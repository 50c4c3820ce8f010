//! Per-address attribute record.
//!
//! Every attribute is a sequence internally, scalars included. The only asymmetry is
//! the `age` attribute, which may be read back unwrapped when it holds exactly one
//! timestamp and is written to JSON as a bare string in that case.

use std::collections::{BTreeSet, HashSet};

use serde_json::Value;

use super::age::AgeValue;
use super::field::{FIELDS, Field, TEXT_FIELDS};
use super::raw::field_to_list;
use crate::error::{BookmergeError, Result};

/// Borrowed view of one attribute, as returned by [`AttributeRecord::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef<'a> {
    Text(&'a [String]),
    Ages(&'a [AgeValue]),
    /// Singleton age unwrapped by `get(Field::Age, true)`.
    Age(AgeValue),
}

impl<'a> FieldRef<'a> {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(values) => values.len(),
            Self::Ages(values) => values.len(),
            Self::Age(_) => 1,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&'a [String]> {
        match self {
            Self::Text(values) => Some(values),
            _ => None,
        }
    }

    /// String form of every element, used by reports and match listings.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        match self {
            Self::Text(values) => values.to_vec(),
            Self::Ages(values) => values.iter().map(ToString::to_string).collect(),
            Self::Age(value) => vec![value.to_string()],
        }
    }
}

/// Normalized input for one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldValues {
    Text(Vec<String>),
    Ages(Vec<AgeValue>),
}

/// Label, age, tags, location, description, and source files for one address.
///
/// The owning URL lives in the [`crate::AddressTable`] key, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeRecord {
    label: Vec<String>,
    age: Vec<AgeValue>,
    tags: Vec<String>,
    location: Vec<String>,
    description: Vec<String>,
    source_file: Vec<String>,
}

impl AttributeRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Read access ---------------------------------------------------------------------

    /// Read one attribute. With `drop_singleton`, a single-element `age` comes back as
    /// [`FieldRef::Age`]; every other attribute is always a sequence.
    #[must_use]
    pub fn get(&self, field: Field, drop_singleton: bool) -> FieldRef<'_> {
        match field {
            Field::Age if drop_singleton && self.age.len() == 1 => FieldRef::Age(self.age[0]),
            Field::Age => FieldRef::Ages(&self.age),
            _ => FieldRef::Text(self.text_slot(field)),
        }
    }

    pub fn get_by_name(&self, name: &str, drop_singleton: bool) -> Result<FieldRef<'_>> {
        Ok(self.get(Field::from_name(name)?, drop_singleton))
    }

    pub fn get_by_position(&self, index: i64, drop_singleton: bool) -> Result<FieldRef<'_>> {
        Ok(self.get(Field::from_position(index)?, drop_singleton))
    }

    /// Text attribute values; `None` for `age`.
    #[must_use]
    pub fn text(&self, field: Field) -> Option<&[String]> {
        if field.is_age() {
            None
        } else {
            Some(self.text_slot(field))
        }
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.label
    }

    #[must_use]
    pub fn ages(&self) -> &[AgeValue] {
        &self.age
    }

    #[must_use]
    pub fn first_age(&self) -> Option<AgeValue> {
        self.age.first().copied()
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub fn locations(&self) -> &[String] {
        &self.location
    }

    #[must_use]
    pub fn descriptions(&self) -> &[String] {
        &self.description
    }

    #[must_use]
    pub fn source_files(&self) -> &[String] {
        &self.source_file
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        FIELDS.iter().all(|field| self.get(*field, false).is_empty())
    }

    // -- Upserts -------------------------------------------------------------------------

    /// Upsert one attribute from any JSON-shaped value.
    ///
    /// Scalars become one-element sequences, nulls are dropped, strings are trimmed, and
    /// `age` entries are coerced to [`AgeValue`]. With `overwrite` the attribute is
    /// replaced; otherwise an empty attribute is replaced and a populated one only gains
    /// values it does not already hold, in input order.
    pub fn set(&mut self, field: Field, value: impl Into<Value>, overwrite: bool) -> Result<()> {
        let normalized = normalize(field, &value.into())?;
        self.apply(field, normalized, overwrite);
        Ok(())
    }

    pub fn set_by_name(&mut self, name: &str, value: impl Into<Value>, overwrite: bool) -> Result<()> {
        self.set(Field::from_name(name)?, value, overwrite)
    }

    pub fn set_by_position(
        &mut self,
        index: i64,
        value: impl Into<Value>,
        overwrite: bool,
    ) -> Result<()> {
        self.set(Field::from_position(index)?, value, overwrite)
    }

    /// Typed upsert for string values; `age` strings are parsed.
    pub fn set_strings<I, S>(&mut self, field: Field, values: I, overwrite: bool) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        let normalized = if field.is_age() {
            FieldValues::Ages(
                values
                    .iter()
                    .map(|value| value.parse())
                    .collect::<Result<Vec<_>>>()?,
            )
        } else {
            FieldValues::Text(values.into_iter().map(|value| value.trim().to_string()).collect())
        };
        self.apply(field, normalized, overwrite);
        Ok(())
    }

    /// Infallible upsert for text attributes; ignored for `age`.
    pub(crate) fn set_text(&mut self, field: Field, values: Vec<String>, overwrite: bool) {
        if !field.is_age() {
            let trimmed = values.into_iter().map(|value| value.trim().to_string()).collect();
            self.apply(field, FieldValues::Text(trimmed), overwrite);
        }
    }

    pub fn set_ages<I>(&mut self, ages: I, overwrite: bool)
    where
        I: IntoIterator<Item = AgeValue>,
    {
        self.apply(Field::Age, FieldValues::Ages(ages.into_iter().collect()), overwrite);
    }

    fn apply(&mut self, field: Field, values: FieldValues, overwrite: bool) {
        match values {
            FieldValues::Ages(ages) => upsert(&mut self.age, ages, overwrite),
            FieldValues::Text(text) => {
                if let Some(slot) = self.text_slot_mut(field) {
                    upsert(slot, text, overwrite);
                }
            }
        }
    }

    // -- Cleanup -------------------------------------------------------------------------

    /// Drop every text value found in `drop_values`; returns how many were removed.
    /// Ages are never matched because they are not strings.
    pub fn remove_values(&mut self, drop_values: &BTreeSet<String>) -> usize {
        let mut removed = 0;
        for field in TEXT_FIELDS {
            if let Some(slot) = self.text_slot_mut(field) {
                let before = slot.len();
                slot.retain(|value| !drop_values.contains(value));
                removed += before - slot.len();
            }
        }
        removed
    }

    /// Collapse every attribute to its distinct values, sorted when `sort` is set and in
    /// first-seen order otherwise.
    pub fn unique(&mut self, sort: bool) {
        for field in TEXT_FIELDS {
            if let Some(slot) = self.text_slot_mut(field) {
                distinct_in_place(slot, sort);
            }
        }
        distinct_in_place(&mut self.age, sort);
    }

    // -- Serialization -------------------------------------------------------------------

    /// Six-position JSON array. Ages are stringified and a single age is de-listed to a
    /// bare string; all other positions stay arrays even when they hold one value.
    #[must_use]
    pub fn to_serializable(&self) -> Value {
        let age = match self.age.as_slice() {
            [single] => Value::String(single.to_string()),
            many => Value::Array(
                many.iter()
                    .map(|age| Value::String(age.to_string()))
                    .collect(),
            ),
        };
        Value::Array(vec![
            string_array(&self.label),
            age,
            string_array(&self.tags),
            string_array(&self.location),
            string_array(&self.description),
            string_array(&self.source_file),
        ])
    }

    /// Inverse of [`Self::to_serializable`]; accepts `age` as a bare value or a list.
    /// Missing trailing positions are left empty.
    pub fn from_serialized(value: &Value) -> Result<Self> {
        let Value::Array(positions) = value else {
            return Err(BookmergeError::InvalidSnapshot {
                reason: format!("expected a list of attribute lists, found {value}"),
            });
        };
        if positions.len() > FIELDS.len() {
            return Err(BookmergeError::InvalidSnapshot {
                reason: format!(
                    "expected at most {} attribute positions, found {}",
                    FIELDS.len(),
                    positions.len()
                ),
            });
        }
        let mut record = Self::new();
        for (field, position) in FIELDS.iter().zip(positions) {
            record.set(*field, position.clone(), true)?;
        }
        Ok(record)
    }

    /// Position-wise union used by table merging: equal attributes are kept as-is,
    /// differing ones interleave `self` and `other` element by element up to the longer
    /// length, skipping values already taken.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            label: interleaved_union(&self.label, &other.label),
            age: interleaved_union(&self.age, &other.age),
            tags: interleaved_union(&self.tags, &other.tags),
            location: interleaved_union(&self.location, &other.location),
            description: interleaved_union(&self.description, &other.description),
            source_file: interleaved_union(&self.source_file, &other.source_file),
        }
    }

    // -- Slots ---------------------------------------------------------------------------

    fn text_slot(&self, field: Field) -> &[String] {
        match field {
            Field::Label => &self.label,
            Field::Tags => &self.tags,
            Field::Location => &self.location,
            Field::Description => &self.description,
            Field::SourceFile => &self.source_file,
            Field::Age => &[],
        }
    }

    fn text_slot_mut(&mut self, field: Field) -> Option<&mut Vec<String>> {
        match field {
            Field::Label => Some(&mut self.label),
            Field::Tags => Some(&mut self.tags),
            Field::Location => Some(&mut self.location),
            Field::Description => Some(&mut self.description),
            Field::SourceFile => Some(&mut self.source_file),
            Field::Age => None,
        }
    }
}

fn normalize(field: Field, value: &Value) -> Result<FieldValues> {
    if field.is_age() {
        // blank ages mean "unknown", not a parse failure
        let ages = field_to_list(value)
            .iter()
            .map(AgeValue::from_json)
            .collect::<Result<Vec<_>>>()?;
        return Ok(FieldValues::Ages(ages));
    }
    let items: Vec<&Value> = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().filter(|item| !item.is_null()).collect(),
        scalar => vec![scalar],
    };
    Ok(FieldValues::Text(items.into_iter().map(text_of).collect()))
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_string(),
        other => other.to_string(),
    }
}

fn upsert<T: PartialEq>(slot: &mut Vec<T>, incoming: Vec<T>, overwrite: bool) {
    if overwrite || slot.is_empty() {
        *slot = incoming;
        return;
    }
    for value in incoming {
        if !slot.contains(&value) {
            slot.push(value);
        }
    }
}

fn distinct_in_place<T: Ord + Clone + std::hash::Hash>(slot: &mut Vec<T>, sort: bool) {
    if sort {
        let distinct: BTreeSet<T> = slot.drain(..).collect();
        slot.extend(distinct);
    } else {
        let mut seen = HashSet::new();
        slot.retain(|value| seen.insert(value.clone()));
    }
}

fn interleaved_union<T: Clone + PartialEq>(left: &[T], right: &[T]) -> Vec<T> {
    if left == right {
        return left.to_vec();
    }
    let mut merged: Vec<T> = Vec::with_capacity(left.len() + right.len());
    for index in 0..left.len().max(right.len()) {
        for candidate in [left.get(index), right.get(index)].into_iter().flatten() {
            if !merged.contains(candidate) {
                merged.push(candidate.clone());
            }
        }
    }
    merged
}

fn string_array(values: &[String]) -> Value {
    Value::Array(values.iter().cloned().map(Value::String).collect())
}
