/// Options that control how ring elements are printed.
///
/// With the default options, printed text parses back with the standard readers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// The character written between a coefficient and a variable.
    pub multiplication_operator: char,
    /// Write a space around the `+` and `-` that separate terms.
    pub spaced_sums: bool,
}

impl PrintOptions {
    /// Default options with a custom multiplication operator.
    pub fn with_multiplication_operator(multiplication_operator: char) -> PrintOptions {
        PrintOptions {
            multiplication_operator,
            ..Default::default()
        }
    }

    pub fn spaced() -> PrintOptions {
        PrintOptions {
            spaced_sums: true,
            ..Default::default()
        }
    }
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            multiplication_operator: '*',
            spaced_sums: false,
        }
    }
}
