use std::{collections::BTreeSet, path::PathBuf};

const CODE_PREFIX_LENGTH: usize = 5;
const DEFAULT_CODE: &str = "VIEW";

pub(crate) fn get_toml_config_file(dir: &str, name: &str) -> Option<PathBuf> {
    let mut path_buf = get_base_dir(dir)?;
    path_buf.push("config");
    path_buf.push(format!("{name}.toml"));
    Some(path_buf)
}

pub fn get_base_dir(dir: &str) -> Option<PathBuf> {
    let mut path_buf = PathBuf::new();
    if dir.starts_with("~/") {
        if let Some(home_dir) = dirs::home_dir() {
            path_buf.push(home_dir);
            path_buf.push(dir.strip_prefix("~/")?);
        }
    } else {
        path_buf.push(dir);
    }
    Some(path_buf)
}

/// Codes may only contain `A-Z`, `a-z`, `0-9` and `_`.
pub fn is_code_safe(code: &str) -> bool {
    code.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Derives a code from a name: its first safe characters, upper-cased, with a
/// numeric suffix when the code is taken.
pub fn generate_code(existing: &BTreeSet<String>, name: &str) -> String {
    let mut prefix: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .take(CODE_PREFIX_LENGTH)
        .collect::<String>()
        .to_ascii_uppercase();

    if prefix.is_empty() {
        prefix = DEFAULT_CODE.to_string();
    }

    if !existing.contains(&prefix) {
        return prefix;
    }

    (2..)
        .map(|n| format!("{prefix}{n}"))
        .find(|code| !existing.contains(code))
        .unwrap_or(prefix)
}
