use std::{env, iter::Peekable, path::PathBuf, str::Chars};

use crate::error::{PathError, PathResult};

/// Returns the user's home directory from `HOME`, falling back to `/root`.
pub fn home_dir() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/root"))
}

/// Returns `XDG_CONFIG_HOME`, or `$HOME/.config` when unset.
pub fn xdg_config_home() -> PathBuf {
    env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Resolves a path that may contain `~`, `$VAR` or `${VAR}`.
///
/// Relative results are joined onto the current working directory.
///
/// # Errors
///
/// * [`PathError::Empty`] if the path is empty
/// * [`PathError::MissingEnvVar`] if a referenced variable is not set
/// * [`PathError::UnclosedVariable`] for a `${` without a closing brace
/// * [`PathError::CurrentDir`] if the current directory cannot be determined
pub fn resolve_path(path: &str) -> PathResult<PathBuf> {
    let path = path.trim();
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let expanded = PathBuf::from(expand_variables(path)?);
    if expanded.is_absolute() {
        return Ok(expanded);
    }

    env::current_dir()
        .map(|cwd| cwd.join(expanded))
        .map_err(|err| PathError::CurrentDir { source: err })
}

fn expand_variables(input: &str) -> PathResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '~' if out.is_empty() => out.push_str(&home_dir().to_string_lossy()),
            '$' if chars.peek() == Some(&'{') => {
                chars.next();
                let name = braced_name(&mut chars)?;
                out.push_str(&lookup(&name, input)?);
            }
            '$' => {
                let name = bare_name(&mut chars);
                if name.is_empty() {
                    out.push('$');
                } else {
                    out.push_str(&lookup(&name, input)?);
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

fn braced_name(chars: &mut Peekable<Chars>) -> PathResult<String> {
    let mut name = String::new();
    for c in chars.by_ref() {
        if c == '}' {
            return Ok(name);
        }
        name.push(c);
    }
    Err(PathError::UnclosedVariable {
        input: format!("${{{name}"),
    })
}

fn bare_name(chars: &mut Peekable<Chars>) -> String {
    let mut name = String::new();
    while let Some(c) = chars.next_if(|c| c.is_alphanumeric() || *c == '_') {
        name.push(c);
    }
    name
}

fn lookup(name: &str, input: &str) -> PathResult<String> {
    match name {
        "HOME" => Ok(home_dir().to_string_lossy().into_owned()),
        "XDG_CONFIG_HOME" => Ok(xdg_config_home().to_string_lossy().into_owned()),
        _ => {
            env::var(name).map_err(|_| {
                PathError::MissingEnvVar {
                    var: name.to_string(),
                    input: input.to_string(),
                }
            })
        }
    }
}
