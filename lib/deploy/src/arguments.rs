//! Constructor argument data for the deployment modules.
//!
//! Built-in values can be replaced from a TOML file:
//!
//! ```toml
//! [[foundation]]
//! type = "string"
//! value = "Kindlink Foundation"
//! ```
use std::path::Path;

use eyre::WrapErr;
use serde::Deserialize;

use crate::constructor::{AbiValue, ConstructorArgument};

/// Display name the Foundation program is deployed with by default.
pub const FOUNDATION_NAME: &str = "Kindlink Foundation";

/// Argument handed to the Foundation constructor.
#[must_use]
pub fn foundation_argument() -> ConstructorArgument {
    ConstructorArgument::single(AbiValue::String(FOUNDATION_NAME.to_owned()))
}

/// Argument handed to the Kindlink constructor, which takes none.
#[must_use]
pub fn kindlink_argument() -> Option<ConstructorArgument> {
    None
}

/// Argument overrides, one optional entry per module.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Arguments {
    foundation: Option<ConstructorArgument>,
    kindlink: Option<ConstructorArgument>,
}

impl Arguments {
    /// Reads overrides from the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// May fail if the file cannot be read or does not parse.
    pub fn load<P: AsRef<Path>>(path: P) -> eyre::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).wrap_err_with(|| {
            format!("failed to read argument file {}", path.display())
        })?;
        Self::parse(&contents).wrap_err_with(|| {
            format!("failed to parse argument file {}", path.display())
        })
    }

    /// Parses overrides from TOML text.
    ///
    /// # Errors
    ///
    /// May fail if `contents` is not valid TOML or has unknown keys.
    pub fn parse(contents: &str) -> eyre::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// The Foundation argument, overridden or built in.
    #[must_use]
    pub fn foundation(&self) -> ConstructorArgument {
        self.foundation.clone().unwrap_or_else(foundation_argument)
    }

    /// The Kindlink argument, overridden or built in.
    #[must_use]
    pub fn kindlink(&self) -> Option<ConstructorArgument> {
        self.kindlink.clone().or_else(kindlink_argument)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn falls_back_to_built_in_values() {
        let arguments = Arguments::default();

        assert_eq!(arguments.foundation(), foundation_argument());
        assert_eq!(arguments.kindlink(), None);
    }

    #[test]
    fn reads_foundation_override() {
        let arguments = Arguments::parse(
            r#"
            [[foundation]]
            type = "string"
            value = "Open Hands"
            "#,
        )
        .unwrap();

        assert_eq!(
            arguments.foundation(),
            ConstructorArgument::single(AbiValue::String(
                "Open Hands".to_owned()
            ))
        );
    }

    #[test]
    fn rejects_unknown_modules() {
        let err = Arguments::parse(
            r#"
            [[treasury]]
            type = "bool"
            value = true
            "#,
        )
        .unwrap_err();

        assert!(format!("{err:#}").contains("treasury"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[foundation]]\ntype = \"bool\"\nvalue = false")
            .unwrap();

        let arguments = Arguments::load(file.path()).unwrap();

        assert_eq!(
            arguments.foundation(),
            ConstructorArgument::single(AbiValue::Bool(false))
        );
    }
}
