use crate::plan::CollectorSelector;
use crate::util::constants::DEFAULT_STEP_LIMIT;
use crate::util::log::{trace, warn};
use std::default::Default;

/// Every option is read from a `GREENTEA_`-prefixed environment variable when `Options` are
/// created with `Default`, e.g. `GREENTEA_STEP_LIMIT=500`.
pub const ENV_PREFIX: &str = "GREENTEA_";

macro_rules! options {
    ($($name:ident: $type:ty[$validator:expr] = $default:expr),*,) => [
        options!($($name: $type[$validator] = $default),*);
    ];
    ($($name:ident: $type:ty[$validator:expr] = $default:expr),*) => [
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct Options {
            $(pub $name: $type),*
        }
        impl Options {
            /// Options with every default, ignoring the environment.
            pub fn builtin() -> Self {
                Options {
                    $($name: $default),*
                }
            }

            /// Set option `s` (in snake case) from a string. Returns whether the value was set.
            /// An unknown key, or a value that does not parse or validate, leaves the options
            /// unchanged.
            pub fn set_from_str(&mut self, s: &str, val: &str) -> bool {
                match s {
                    // Parse the given value from str (by env vars or by calling set_from_str) to the right type
                    $(stringify!($name) => if let Ok(ref val) = val.parse::<$type>() {
                        let validate_fn = $validator;
                        let is_valid = validate_fn(val);
                        if is_valid {
                            // Only set value if valid.
                            self.$name = val.clone();
                        } else {
                            warn!("Unable to set {}={:?}. Invalid value. Default value will be used.", s, val);
                        }
                        is_valid
                    } else {
                        warn!("Unable to set {}={:?}. Cannot parse value. Default value will be used.", s, val);
                        false
                    })*
                    _ => {
                        warn!("Unknown option {}", s);
                        false
                    }
                }
            }

            /// Read every option that has a `GREENTEA_` environment variable.
            pub fn read_env_var_settings(&mut self) {
                for (key, val) in std::env::vars() {
                    // strip the prefix, and get the lower case string
                    if let Some(rest_of_key) = key.strip_prefix(ENV_PREFIX) {
                        let lowercase: &str = &rest_of_key.to_lowercase();
                        match lowercase {
                            $(stringify!($name) => { self.set_from_str(lowercase, &val); },)*
                            _ => {}
                        }
                    }
                }
            }
        }
        impl Default for Options {
            fn default() -> Self {
                let mut options = Options::builtin();
                options.read_env_var_settings();
                options
            }
        }
    ]
}

options! {
    // The collector to trace with.
    collector:   CollectorSelector [always_valid]         = CollectorSelector::GreenTea,
    // A run taking more steps than this is stopped with a panic. It should never be reached: a
    // trace takes at most one step per root, per object and per field.
    step_limit:  usize             [|v: &usize| *v > 0]   = DEFAULT_STEP_LIMIT,
    // Sweep once the trace is done.
    sweep:       bool              [always_valid]         = true,
}

impl Options {
    /// Set an option named in camel case, e.g. `stepLimit`.
    pub fn set_from_camelcase_str(&mut self, s: &str, val: &str) -> bool {
        trace!("Trying to process option pair: ({}, {})", s, val);

        let mut sr = String::with_capacity(s.len());
        for c in s.chars() {
            if c.is_uppercase() {
                sr.push('_');
                for c in c.to_lowercase() {
                    sr.push(c);
                }
            } else {
                sr.push(c)
            }
        }

        let result = self.set_from_str(sr.as_str(), val);

        if result {
            trace!("Validation passed");
        } else {
            trace!("Validation failed")
        }
        result
    }
}

fn always_valid<T>(_: &T) -> bool {
    true
}
