// src/munge/parse.rs
use anyhow::{bail, Result};

use crate::fetch::table::collapse_ws;

/// Split a raw performer label on the `"<name>[@<group>]"` convention.
///
/// - no `@`: the label is both name and group,
/// - one `@`: name left of it, group right of it,
/// - more than one `@`: the label is malformed and rejected.
///
/// Whitespace inside each segment is collapsed to single spaces.
pub fn split_name_group(raw: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = raw.split('@').collect();
    match parts.as_slice() {
        [single] => {
            let name = collapse_ws(single);
            Ok((name.clone(), name))
        }
        [name, group] => Ok((collapse_ws(name), collapse_ws(group))),
        _ => bail!(
            "malformed performer label {:?}: more than one '@' separator",
            raw
        ),
    }
}
