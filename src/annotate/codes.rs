// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::sync::OnceLock;

use crate::error::Error;

/// Semantic tag families.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Family {
    /// Zone, sector, block, section, row, room, floor.
    Location,
    /// Price, additional price.
    Pricing,
    /// Seat, table, unit.
    ///
    /// Inventory codes mark leaves and never define a group.
    Inventory,
    /// Date, gate, entrance.
    Logistics,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Family::Location => "location",
            Family::Pricing => "pricing",
            Family::Inventory => "inventory",
            Family::Logistics => "logistics",
        };

        write!(f, "{}", name)
    }
}

/// A single registered code.
#[derive(Clone, PartialEq, Debug)]
pub struct Code {
    /// A single character used inside identifiers.
    pub code: char,
    /// A human field name, used in `field-<name>` attributes.
    pub field: String,
    #[allow(missing_docs)]
    pub family: Family,
}

const STANDARD_VERSION: u32 = 1;

const STANDARD: &[(char, &str, Family)] = &[
    ('Z', "zone", Family::Location),
    ('S', "sector", Family::Location),
    ('B', "block", Family::Location),
    ('J', "section", Family::Location),
    ('R', "row", Family::Location),
    ('r', "room", Family::Location),
    ('F', "floor", Family::Location),
    ('P', "price", Family::Pricing),
    ('A', "additional_price", Family::Pricing),
    ('s', "seat", Family::Inventory),
    ('t', "table", Family::Inventory),
    ('U', "unit", Family::Inventory),
    ('D', "date", Family::Logistics),
    ('G', "gate", Family::Logistics),
    ('E', "entrance", Family::Logistics),
];

/// A versioned bijection between single-character codes and field names.
#[derive(Clone, PartialEq, Debug)]
pub struct CodeTable {
    version: u32,
    codes: Vec<Code>,
}

impl CodeTable {
    /// Starts a new table.
    pub fn builder(version: u32) -> CodeTableBuilder {
        CodeTableBuilder {
            table: CodeTable {
                version,
                codes: Vec::new(),
            },
        }
    }

    /// Returns the standard vocabulary.
    pub fn standard() -> &'static CodeTable {
        static TABLE: OnceLock<CodeTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            // The list is checked by the `standard_is_bijection` test.
            CodeTable {
                version: STANDARD_VERSION,
                codes: STANDARD.iter().map(|&(code, field, family)| Code {
                    code,
                    field: field.to_string(),
                    family,
                }).collect(),
            }
        })
    }

    /// Returns the table version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Finds a code entry by its character.
    pub fn by_code(&self, code: char) -> Option<&Code> {
        self.codes.iter().find(|c| c.code == code)
    }

    /// Finds a code entry by its field name.
    pub fn by_field(&self, field: &str) -> Option<&Code> {
        self.codes.iter().find(|c| c.field == field)
    }

    /// Returns `true` if the code belongs to the inventory family.
    pub fn is_filler(&self, code: char) -> bool {
        self.by_code(code).map(|c| c.family == Family::Inventory).unwrap_or(false)
    }

    /// Returns all codes concatenated, in registration order.
    pub fn alphabet(&self) -> String {
        self.codes.iter().map(|c| c.code).collect()
    }

    /// Returns an iterator over all entries.
    pub fn iter(&self) -> impl Iterator<Item = &Code> {
        self.codes.iter()
    }
}

impl Default for CodeTable {
    fn default() -> CodeTable {
        CodeTable::standard().clone()
    }
}


/// A [`CodeTable`] builder.
///
/// [`CodeTable`]: struct.CodeTable.html
pub struct CodeTableBuilder {
    table: CodeTable,
}

impl CodeTableBuilder {
    /// Registers a new code.
    ///
    /// Fails on a duplicated code or field name, so an entry never shadows another one.
    pub fn register(mut self, code: char, field: &str, family: Family) -> Result<Self, Error> {
        if self.table.by_code(code).is_some() {
            return Err(Error::DuplicateCode(code));
        }

        if self.table.by_field(field).is_some() {
            return Err(Error::DuplicateField(field.to_string()));
        }

        self.table.codes.push(Code {
            code,
            field: field.to_string(),
            family,
        });

        Ok(self)
    }

    /// Finishes the table.
    pub fn build(self) -> CodeTable {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_is_bijection() {
        let mut builder = CodeTable::builder(STANDARD_VERSION);
        for &(code, field, family) in STANDARD {
            builder = builder.register(code, field, family).unwrap();
        }

        assert_eq!(&builder.build(), CodeTable::standard());
    }

    #[test]
    fn duplicate_code() {
        let res = CodeTable::builder(1)
            .register('F', "floor", Family::Location).unwrap()
            .register('F', "fee", Family::Pricing);
        assert_eq!(res.err(), Some(Error::DuplicateCode('F')));
    }

    #[test]
    fn duplicate_field() {
        let res = CodeTable::builder(1)
            .register('F', "floor", Family::Location).unwrap()
            .register('L', "floor", Family::Location);
        assert_eq!(res.err(), Some(Error::DuplicateField("floor".to_string())));
    }

    #[test]
    fn lookup() {
        let table = CodeTable::standard();
        assert_eq!(table.by_code('s').map(|c| c.field.as_str()), Some("seat"));
        assert_eq!(table.by_field("row").map(|c| c.code), Some('R'));
        assert!(table.is_filler('t'));
        assert!(!table.is_filler('R'));
        assert_eq!(table.alphabet(), "ZSBJRrFPAstUDGE");
    }
}
