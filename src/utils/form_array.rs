//! Repeating-group form decoding
//!
//! Decodes indexed groups such as `BankDetails[0].BankId`,
//! `BankDetails[1].BankId`, ... out of a flat key/value form map. Decoding
//! walks indices from zero and stops at the first index whose sentinel key is
//! missing, so gaps end the group.

use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormArrayError {
    #[error("{prefix}[{index}].{field} is required")]
    MissingField {
        prefix: String,
        index: usize,
        field: &'static str,
    },

    #[error("{prefix}[{index}].{field} has an invalid value '{value}'")]
    InvalidValue {
        prefix: String,
        index: usize,
        field: &'static str,
        value: String,
    },
}

impl FormArrayError {
    pub fn prefix(&self) -> &str {
        match self {
            FormArrayError::MissingField { prefix, .. }
            | FormArrayError::InvalidValue { prefix, .. } => prefix,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            FormArrayError::MissingField { index, .. }
            | FormArrayError::InvalidValue { index, .. } => *index,
        }
    }
}

/// Fields of one record of a repeating group, keyed by field name
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFields {
    prefix: String,
    index: usize,
    fields: HashMap<String, String>,
}

impl GroupFields {
    pub fn index(&self) -> usize {
        self.index
    }

    /// True when every field of the record is empty.
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|v| v.trim().is_empty())
    }

    /// Trimmed value, `None` when absent or blank.
    pub fn optional(&self, field: &str) -> Option<String> {
        self.fields
            .get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn required(&self, field: &'static str) -> Result<String, FormArrayError> {
        self.optional(field)
            .ok_or_else(|| FormArrayError::MissingField {
                prefix: self.prefix.clone(),
                index: self.index,
                field,
            })
    }

    pub fn parse_required<T: FromStr>(&self, field: &'static str) -> Result<T, FormArrayError> {
        let raw = self.required(field)?;
        self.parse(field, raw)
    }

    pub fn parse_optional<T: FromStr>(
        &self,
        field: &'static str,
    ) -> Result<Option<T>, FormArrayError> {
        self.optional(field)
            .map(|raw| self.parse(field, raw))
            .transpose()
    }

    /// Checkbox value. Browsers post `true,false` for a checked box paired
    /// with a hidden input, so only the first value counts.
    pub fn flag(&self, field: &str) -> bool {
        self.optional(field)
            .and_then(|v| v.split(',').next().map(|s| s.trim().to_ascii_lowercase()))
            .map_or(false, |v| matches!(v.as_str(), "true" | "on" | "1" | "yes"))
    }

    fn parse<T: FromStr>(&self, field: &'static str, raw: String) -> Result<T, FormArrayError> {
        raw.parse().map_err(|_| FormArrayError::InvalidValue {
            prefix: self.prefix.clone(),
            index: self.index,
            field,
            value: raw,
        })
    }
}

/// A record type decodable from a repeating form group
pub trait FormGroup: Sized {
    /// Key prefix, e.g. `BankDetails`
    const PREFIX: &'static str;
    /// Field whose presence marks that a record exists at an index
    const SENTINEL: &'static str;

    fn from_group(group: &GroupFields) -> Result<Self, FormArrayError>;
}

/// Extract the raw records of the `prefix` group, at most `max` of them.
pub fn decode_repeating_group(
    form: &HashMap<String, String>,
    prefix: &str,
    sentinel: &str,
    max: usize,
) -> Vec<GroupFields> {
    let mut groups = Vec::new();

    for index in 0..max {
        let key_prefix = format!("{}[{}].", prefix, index);
        if !form.contains_key(&format!("{}{}", key_prefix, sentinel)) {
            break;
        }

        let fields = form
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&key_prefix)
                    .map(|field| (field.to_string(), value.clone()))
            })
            .collect();

        groups.push(GroupFields {
            prefix: prefix.to_string(),
            index,
            fields,
        });
    }

    groups
}

/// Decode every non-blank record of `T`'s group.
pub fn decode_form_group<T: FormGroup>(
    form: &HashMap<String, String>,
    max: usize,
) -> Result<Vec<T>, FormArrayError> {
    decode_repeating_group(form, T::PREFIX, T::SENTINEL, max)
        .iter()
        .filter(|group| !group.is_blank())
        .map(T::from_group)
        .collect()
}
