//! Chemical elements supported by the bundled basis sets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChemError;

/// First- and second-row elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    H = 1,
    He = 2,
    Li = 3,
    Be = 4,
    B = 5,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    Ne = 10,
}

const ALL: [Element; 10] = [
    Element::H,
    Element::He,
    Element::Li,
    Element::Be,
    Element::B,
    Element::C,
    Element::N,
    Element::O,
    Element::F,
    Element::Ne,
];

impl Element {
    pub fn atomic_number(self) -> u32 {
        self as u32
    }

    pub fn from_atomic_number(z: u32) -> Option<Self> {
        ALL.iter().copied().find(|e| e.atomic_number() == z)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Element::H => "H",
            Element::He => "He",
            Element::Li => "Li",
            Element::Be => "Be",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Ne => "Ne",
        }
    }

    /// Nuclear charge in atomic units.
    pub fn nuclear_charge(self) -> f64 {
        self.atomic_number() as f64
    }

    /// Whether the element has a 2s2p valence shell.
    pub fn has_second_shell(self) -> bool {
        self.atomic_number() > 2
    }
}

impl FromStr for Element {
    type Err = ChemError;

    /// Accepts symbols in any case (`"h"`, `"HE"`), symbols with a numeric
    /// label suffix (`"H1"`), and bare atomic numbers (`"1"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(z) = trimmed.parse::<u32>() {
            return Element::from_atomic_number(z)
                .ok_or_else(|| ChemError::UnknownElement(s.to_string()));
        }
        let symbol: String = trimmed.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
        ALL.iter()
            .copied()
            .find(|e| e.symbol().eq_ignore_ascii_case(&symbol))
            .ok_or_else(|| ChemError::UnknownElement(s.to_string()))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbols() {
        assert_eq!("H".parse::<Element>().unwrap(), Element::H);
        assert_eq!("he".parse::<Element>().unwrap(), Element::He);
        assert_eq!("LI".parse::<Element>().unwrap(), Element::Li);
        assert_eq!("H1".parse::<Element>().unwrap(), Element::H);
        assert_eq!("8".parse::<Element>().unwrap(), Element::O);
    }

    #[test]
    fn test_unknown_element() {
        assert!(matches!("Xx".parse::<Element>(), Err(ChemError::UnknownElement(_))));
        assert!(matches!("26".parse::<Element>(), Err(ChemError::UnknownElement(_))));
        assert!(matches!("".parse::<Element>(), Err(ChemError::UnknownElement(_))));
    }

    #[test]
    fn test_atomic_numbers() {
        assert_eq!(Element::C.atomic_number(), 6);
        assert_eq!(Element::from_atomic_number(10), Some(Element::Ne));
        assert!(!Element::He.has_second_shell());
        assert!(Element::Li.has_second_shell());
    }
}
