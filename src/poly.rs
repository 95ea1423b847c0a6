//! Univariate polynomials and their reader.
//!
//! Multivariate expressions are represented recursively: a polynomial in `y`
//! whose coefficients are polynomials in `x`, and so on.

pub mod reader;
pub mod univariate;

use std::fmt::{self, Display, Formatter};

use smartstring::{LazyCompact, SmartString};

use crate::error::ConfigError;

/// The name of a polynomial variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    name: SmartString<LazyCompact>,
}

impl Variable {
    /// Create a variable. The name must start with a letter or `_` and continue
    /// with letters, digits or `_`.
    pub fn new(name: &str) -> Result<Variable, ConfigError> {
        let mut chars = name.chars();
        let valid = match chars.next() {
            Some(c) if c.is_alphabetic() || c == '_' => {
                chars.all(|c| c.is_alphanumeric() || c == '_')
            }
            _ => false,
        };

        if !valid {
            return Err(ConfigError::InvalidVariable {
                name: name.to_owned(),
            });
        }

        Ok(Variable { name: name.into() })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod test {
    use crate::error::ConfigError;

    use super::Variable;

    #[test]
    fn names() {
        assert_eq!(Variable::new("x_1").unwrap().name(), "x_1");
        assert!(Variable::new("_t").is_ok());
        assert_eq!(
            Variable::new("1x"),
            Err(ConfigError::InvalidVariable { name: "1x".into() })
        );
        assert!(Variable::new("").is_err());
        assert!(Variable::new("x y").is_err());
    }
}
