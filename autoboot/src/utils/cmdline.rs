// Command-line argument parsing for the boot helper
//
// Features:
// - Whitespace-separated arguments
// - Key-value pairs (key=value)
// - Flag detection (--flag)
// - Unknown parameter skipping (error-tolerant)

use alloc::string::String;
use alloc::vec::Vec;

/// Arguments longer than this are dropped while parsing
const MAX_ARG_LEN: usize = 256;

pub struct CmdLine {
    args: Vec<String>,
}

impl CmdLine {
    /// Parse a whitespace-separated command line
    pub fn parse(cmdline: &str) -> Self {
        Self::from_args(cmdline.split_ascii_whitespace())
    }

    /// Build from already-split arguments (e.g. process arguments)
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args = args
            .into_iter()
            .map(|arg| String::from(arg.as_ref().trim()))
            .filter(|arg| !arg.is_empty() && arg.len() < MAX_ARG_LEN)
            .collect();
        Self { args }
    }

    /// Get argument at index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(|s| s.as_str())
    }

    /// Check if flag exists
    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|arg| arg == flag)
    }

    /// Get value for option with key=value format
    pub fn get_key_value(&self, key: &str) -> Option<&str> {
        self.args.iter().find_map(|arg| {
            let (k, v) = arg.split_once('=')?;
            (k == key).then_some(v)
        })
    }

    /// Get value for option (--flag value format)
    pub fn get_option(&self, opt: &str) -> Option<&str> {
        self.args
            .windows(2)
            .find(|pair| pair[0] == opt)
            .map(|pair| pair[1].as_str())
    }

    /// Arguments that are neither flags, flag values nor key=value pairs
    pub fn positional(&self, value_options: &[&str]) -> Vec<&str> {
        let mut positional = Vec::new();
        let mut skip_next = false;
        for arg in &self.args {
            if skip_next {
                skip_next = false;
                continue;
            }
            if arg.starts_with('-') {
                skip_next = value_options.iter().any(|opt| opt == arg);
                continue;
            }
            if !arg.contains('=') {
                positional.push(arg.as_str());
            }
        }
        positional
    }

    /// Get number of arguments
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Skip unknown parameters - returns filtered args
    /// Known parameters: flags starting with - or -- and key=value pairs
    pub fn filter_known(&self, allowed_flags: &[&str], allowed_keys: &[&str]) -> Vec<&str> {
        self.args
            .iter()
            .filter(|arg| {
                if arg.starts_with('-') {
                    return allowed_flags.iter().any(|f| f == arg);
                }
                if let Some((key, _)) = arg.split_once('=') {
                    return allowed_keys.iter().any(|k| *k == key);
                }
                false
            })
            .map(|s| s.as_str())
            .collect()
    }
}
