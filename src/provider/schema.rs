//! Declarative description of resource fields, as presented to the host.

use std::fmt;

/// The value shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    /// An ordered list of strings.
    StringList,
}

/// Whether the host supplies a field or the resource computes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDirection {
    Input,
    Computed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: FieldKind,
    pub direction: FieldDirection,
    pub required: bool,
    /// A change to this field replaces the resource instead of updating it.
    pub force_new: bool,
    /// The host must not display or log this value.
    pub sensitive: bool,
}

impl FieldSchema {
    /// A required string input that forces replacement.
    pub const fn input(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind: FieldKind::String,
            direction: FieldDirection::Input,
            required: true,
            force_new: true,
            sensitive: false,
        }
    }

    pub const fn computed(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind: FieldKind::String,
            direction: FieldDirection::Computed,
            required: false,
            force_new: false,
            sensitive: false,
        }
    }

    pub const fn list(mut self) -> Self {
        self.kind = FieldKind::StringList;
        self
    }

    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldSchema],
}

impl ResourceSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields
            .iter()
            .filter(|field| field.direction == FieldDirection::Input)
    }

    pub fn computed(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields
            .iter()
            .filter(|field| field.direction == FieldDirection::Computed)
    }
}

impl fmt::Display for ResourceSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}
