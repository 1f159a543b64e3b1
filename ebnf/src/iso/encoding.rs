use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use super::{Definition, DefinitionsList, Primary, Term};

/// The JSON shape of a [`Primary`]: one field per variant, exactly one of
/// which is present.
#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    optional_sequence: Option<DefinitionsList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    repeated_sequence: Option<DefinitionsList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    special_sequence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grouped_sequence: Option<DefinitionsList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    terminal: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    empty: bool,
}

impl From<Primary> for PrimaryRepr {
    fn from(primary: Primary) -> Self {
        let mut repr = PrimaryRepr::default();
        match primary {
            Primary::OptionalSequence(list) => repr.optional_sequence = Some(list),
            Primary::RepeatedSequence(list) => repr.repeated_sequence = Some(list),
            Primary::SpecialSequence(text) => repr.special_sequence = Some(text),
            Primary::GroupedSequence(list) => repr.grouped_sequence = Some(list),
            Primary::MetaIdentifier(name) => repr.meta_identifier = Some(name),
            Primary::Terminal(text) => repr.terminal = Some(text),
            Primary::Empty => repr.empty = true,
        }
        repr
    }
}

impl TryFrom<PrimaryRepr> for Primary {
    type Error = String;

    fn try_from(repr: PrimaryRepr) -> Result<Self, Self::Error> {
        let mut variants = Vec::new();
        if let Some(list) = repr.optional_sequence {
            variants.push(Primary::OptionalSequence(list));
        }
        if let Some(list) = repr.repeated_sequence {
            variants.push(Primary::RepeatedSequence(list));
        }
        if let Some(text) = repr.special_sequence {
            variants.push(Primary::SpecialSequence(text));
        }
        if let Some(list) = repr.grouped_sequence {
            variants.push(Primary::GroupedSequence(list));
        }
        if let Some(name) = repr.meta_identifier {
            variants.push(Primary::MetaIdentifier(name));
        }
        if let Some(text) = repr.terminal {
            variants.push(Primary::Terminal(text));
        }
        if repr.empty {
            variants.push(Primary::Empty);
        }

        match variants.len() {
            1 => Ok(variants.remove(0)),
            n => Err(format!(
                "primary must populate exactly one variant, found {}",
                n
            )),
        }
    }
}

impl From<DefinitionsList> for Vec<Definition> {
    fn from(list: DefinitionsList) -> Self {
        list.0
    }
}

impl TryFrom<Vec<Definition>> for DefinitionsList {
    type Error = String;

    fn try_from(definitions: Vec<Definition>) -> Result<Self, Self::Error> {
        if definitions.is_empty() {
            return Err("definitions list must hold at least one definition".to_owned());
        }
        Ok(DefinitionsList(definitions))
    }
}

impl From<Definition> for Vec<Term> {
    fn from(definition: Definition) -> Self {
        definition.0
    }
}

impl TryFrom<Vec<Term>> for Definition {
    type Error = String;

    fn try_from(terms: Vec<Term>) -> Result<Self, Self::Error> {
        if terms.is_empty() {
            return Err("definition must hold at least one term".to_owned());
        }
        Ok(Definition(terms))
    }
}
