//! The fixed set of fields a deps declaration may carry

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Which field set applies to a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FieldLevel {
    /// A whole entity: `block` and `elems` are allowed
    Top,
    /// An entry of `elems`: no `block`, no `elems`
    Element,
}

/// Value shape a field must conform to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    String,
    ArrayOfStrings,
    StringOrArray,
    BooleanOrString,
    Mods,
    /// Nested declaration validated with `level`; `arrays` allows a list of them
    Declaration { level: FieldLevel, arrays: bool },
    IncludeLiteral,
}

impl Shape {
    /// Short human description, used by `depslint fields`
    pub fn describe(&self) -> &'static str {
        match self {
            Shape::String => "string",
            Shape::ArrayOfStrings => "array of strings",
            Shape::StringOrArray => "string or array of strings",
            Shape::BooleanOrString => "boolean or string",
            Shape::Mods => "array of strings or object of modifiers",
            Shape::Declaration {
                level: FieldLevel::Top,
                arrays: false,
            } => "string or declaration",
            Shape::Declaration {
                level: FieldLevel::Top,
                arrays: true,
            } => "string, declaration or array of declarations",
            Shape::Declaration {
                level: FieldLevel::Element,
                arrays: false,
            } => "string or element declaration",
            Shape::Declaration {
                level: FieldLevel::Element,
                arrays: true,
            } => "string, element declaration or array of element declarations",
            Shape::IncludeLiteral => "false",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub shape: Option<Shape>,
}

/// Fields shared by both levels, in documentation order
const ELEMENT_FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "elem",
        shape: Some(Shape::StringOrArray),
    },
    FieldRule {
        name: "mod",
        shape: Some(Shape::String),
    },
    FieldRule {
        name: "mods",
        shape: Some(Shape::Mods),
    },
    FieldRule {
        name: "val",
        shape: Some(Shape::BooleanOrString),
    },
    FieldRule {
        name: "tech",
        shape: Some(Shape::String),
    },
    FieldRule {
        name: "mustDeps",
        shape: Some(DEPS),
    },
    FieldRule {
        name: "shouldDeps",
        shape: Some(DEPS),
    },
    FieldRule {
        name: "noDeps",
        shape: Some(DEPS),
    },
    FieldRule {
        name: "include",
        shape: Some(Shape::IncludeLiteral),
    },
];

/// Fields only a whole-entity declaration may carry
const ENTITY_FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "block",
        shape: Some(Shape::Declaration {
            level: FieldLevel::Top,
            arrays: false,
        }),
    },
    FieldRule {
        name: "elems",
        shape: Some(Shape::Declaration {
            level: FieldLevel::Element,
            arrays: true,
        }),
    },
];

/// Dependency lists hold whole-entity declarations
const DEPS: Shape = Shape::Declaration {
    level: FieldLevel::Top,
    arrays: true,
};

/// Immutable lookup table for one level
pub struct FieldSet {
    rules: Vec<FieldRule>,
    index: HashMap<&'static str, usize>,
}

impl FieldSet {
    fn build(groups: &[&[FieldRule]]) -> Self {
        let rules: Vec<FieldRule> = groups.iter().flat_map(|g| g.iter().copied()).collect();
        let index = rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (rule.name, i))
            .collect();
        Self { rules, index }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    /// `None` when the field is illegal here, `Some(None)` when legal but unchecked
    pub fn lookup(&self, field: &str) -> Option<Option<Shape>> {
        self.index.get(field).map(|&i| self.rules[i].shape)
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }
}

static TOP_LEVEL: Lazy<FieldSet> =
    Lazy::new(|| FieldSet::build(&[ENTITY_FIELDS, ELEMENT_FIELDS]));

static ELEMENT_LEVEL: Lazy<FieldSet> =
    Lazy::new(|| FieldSet::build(&[ELEMENT_FIELDS]));

/// Field set for a nesting level
pub fn field_set(level: FieldLevel) -> &'static FieldSet {
    match level {
        FieldLevel::Top => &TOP_LEVEL,
        FieldLevel::Element => &ELEMENT_LEVEL,
    }
}
