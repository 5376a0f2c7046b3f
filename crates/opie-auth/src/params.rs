// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

use std::path::PathBuf;

/// Parsed PAM module arguments.
///
/// Arguments follow the usual `key=value` convention of PAM control
/// files, e.g. `auth required pam_opie.so config=/etc/opie.json debug`.
/// A repeated key keeps the last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleArgs {
    /// Path from the `config=` argument.
    pub config_path: Option<PathBuf>,
    /// Whether the `debug` flag was given.
    pub debug: bool,
}

impl ModuleArgs {
    /// Parses the module argument list.
    ///
    /// Unknown arguments are ignored; PAM configurations commonly carry
    /// flags aimed at other consumers of the same line.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            if arg == "debug" {
                parsed.debug = true;
            } else if let Some((key, value)) = arg.split_once('=') {
                if key == "config" && !value.is_empty() {
                    parsed.config_path = Some(PathBuf::from(value));
                }
            }
        }
        parsed
    }
}
