//! Drops arguments the command does not declare, so stray flags are ignored
//! instead of rejected.

use std::collections::HashMap;
use std::ffi::OsString;

use clap::Command;

/// Keeps the program name plus every recognized option (and the value of
/// options that take one); anything else is discarded.
pub fn retain_recognized<I>(command: &Command, raw: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let known = KnownOptions::from_command(command);
    let mut raw = raw.into_iter();
    let mut kept = Vec::new();
    if let Some(program) = raw.next() {
        kept.push(program);
    }

    while let Some(token) = raw.next() {
        let Some(text) = token.to_str() else {
            continue;
        };
        if text == "--" {
            break;
        }
        let wants_value = if let Some(long) = text.strip_prefix("--") {
            let (name, inline) = match long.split_once('=') {
                Some((name, _)) => (name, true),
                None => (long, false),
            };
            match known.longs.get(name) {
                Some(takes_value) => *takes_value && !inline,
                None => continue,
            }
        } else if let Some(shorts) = text.strip_prefix('-').filter(|s| !s.is_empty()) {
            match known.short_cluster(shorts) {
                Some(wants_value) => wants_value,
                None => continue,
            }
        } else {
            continue;
        };

        kept.push(token);
        if wants_value {
            if let Some(value) = raw.next() {
                kept.push(value);
            }
        }
    }
    kept
}

struct KnownOptions {
    longs: HashMap<String, bool>,
    shorts: HashMap<char, bool>,
}

impl KnownOptions {
    fn from_command(command: &Command) -> Self {
        let mut command = command.clone();
        // Materializes the generated --help/--version arguments.
        command.build();
        let mut longs = HashMap::new();
        let mut shorts = HashMap::new();
        for arg in command.get_arguments() {
            let takes_value = arg.get_action().takes_values();
            if let Some(long) = arg.get_long() {
                longs.insert(long.to_string(), takes_value);
            }
            if let Some(short) = arg.get_short() {
                shorts.insert(short, takes_value);
            }
        }
        Self { longs, shorts }
    }

    /// `Some(wants_value)` when every flag in a cluster such as `-vv` is known.
    fn short_cluster(&self, cluster: &str) -> Option<bool> {
        let mut chars = cluster.chars().peekable();
        while let Some(flag) = chars.next() {
            let takes_value = *self.shorts.get(&flag)?;
            if takes_value {
                return Some(chars.peek().is_none());
            }
        }
        Some(false)
    }
}
