//! Common FHIR data types
//!
//! Small value shapes reused across resource definitions. Every field is
//! optional unless FHIR itself requires it (`Extension.url`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A coded value from a terminology system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coding {
    /// Terminology system URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Code within the system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Human-readable representation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// A concept expressed by one or more codings plus optional text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coding: Option<Vec<Coding>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    /// The first coding, if any
    pub fn first_coding(&self) -> Option<&Coding> {
        self.coding.as_deref().and_then(<[Coding]>::first)
    }

    /// Code of the first coding, if any
    pub fn first_code(&self) -> Option<&str> {
        self.first_coding().and_then(|coding| coding.code.as_deref())
    }
}

/// Business identifier attached to a resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Identifier type (e.g. MR, SS, DL)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub identifier_type: Option<CodeableConcept>,
}

/// Family name, which exporters emit either as a string or as a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FamilyName {
    Single(String),
    Multiple(Vec<String>),
}

impl FamilyName {
    /// Single representative value
    ///
    /// A list yields its first element. Empty strings and empty lists yield `None`.
    pub fn representative(&self) -> Option<&str> {
        let value = match self {
            FamilyName::Single(name) => Some(name.as_str()),
            FamilyName::Multiple(names) => names.first().map(String::as_str),
        };
        value.filter(|name| !name.is_empty())
    }
}

/// A person's name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub name_use: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<FamilyName>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<Vec<String>>,
}

/// Contact point (phone, email, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telecom {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub telecom_use: Option<String>,
}

/// Postal address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, rename = "postalCode", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Language preference of a patient
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Communication {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<CodeableConcept>,
}

/// Human-readable narrative of a resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub div: Option<String>,
}

/// Typed payload of an extension node (`value[x]`)
#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionValue {
    CodeableConcept(CodeableConcept),
    String(String),
    Code(String),
    Decimal(f64),
    /// Addresses inside extensions (e.g. birth place) are kept as raw objects
    Address(Map<String, Value>),
}

/// Extension node
///
/// Extensions form a tree: each node carries a URL, at most one typed value,
/// and any number of child extensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExtensionWire", into = "ExtensionWire")]
pub struct Extension {
    pub url: String,
    pub value: Option<ExtensionValue>,
    pub extension: Vec<Extension>,
}

impl Extension {
    /// Find a direct child extension by URL
    pub fn child(&self, url: &str) -> Option<&Extension> {
        self.extension.iter().find(|child| child.url == url)
    }
}

/// Wire representation of [`Extension`], one optional field per `value[x]` type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtensionWire {
    url: String,

    #[serde(default, rename = "valueCodeableConcept", skip_serializing_if = "Option::is_none")]
    value_codeable_concept: Option<CodeableConcept>,

    #[serde(default, rename = "valueString", skip_serializing_if = "Option::is_none")]
    value_string: Option<String>,

    #[serde(default, rename = "valueCode", skip_serializing_if = "Option::is_none")]
    value_code: Option<String>,

    #[serde(default, rename = "valueDecimal", skip_serializing_if = "Option::is_none")]
    value_decimal: Option<f64>,

    #[serde(default, rename = "valueAddress", skip_serializing_if = "Option::is_none")]
    value_address: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    extension: Option<Vec<Extension>>,
}

/// Raised when an extension node carries more than one `value[x]`
#[derive(Debug)]
pub struct MultipleExtensionValues(String);

impl fmt::Display for MultipleExtensionValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "extension '{}' carries more than one value[x]", self.0)
    }
}

impl TryFrom<ExtensionWire> for Extension {
    type Error = MultipleExtensionValues;

    fn try_from(wire: ExtensionWire) -> Result<Self, Self::Error> {
        let candidates = [
            wire.value_codeable_concept.map(ExtensionValue::CodeableConcept),
            wire.value_string.map(ExtensionValue::String),
            wire.value_code.map(ExtensionValue::Code),
            wire.value_decimal.map(ExtensionValue::Decimal),
            wire.value_address.map(ExtensionValue::Address),
        ];
        let mut values = candidates.into_iter().flatten();
        let value = values.next();
        if values.next().is_some() {
            return Err(MultipleExtensionValues(wire.url));
        }

        Ok(Self {
            url: wire.url,
            value,
            extension: wire.extension.unwrap_or_default(),
        })
    }
}

impl From<Extension> for ExtensionWire {
    fn from(extension: Extension) -> Self {
        let mut wire = ExtensionWire {
            url: extension.url,
            extension: if extension.extension.is_empty() {
                None
            } else {
                Some(extension.extension)
            },
            ..Default::default()
        };
        match extension.value {
            Some(ExtensionValue::CodeableConcept(concept)) => {
                wire.value_codeable_concept = Some(concept)
            }
            Some(ExtensionValue::String(value)) => wire.value_string = Some(value),
            Some(ExtensionValue::Code(value)) => wire.value_code = Some(value),
            Some(ExtensionValue::Decimal(value)) => wire.value_decimal = Some(value),
            Some(ExtensionValue::Address(value)) => wire.value_address = Some(value),
            None => {}
        }
        wire
    }
}
