//! Mount options
//!
//! Parsed from the comma separated mount data string, e.g. `"color,max_output=4096"`.

use crate::config::{MAX_OUTPUT_SIZE, MAX_OUTPUT_SIZE_LIMIT, MIN_OUTPUT_SIZE};
use crate::pr_err;
use crate::vfs::FsError;

/// Options accepted in the mount data string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountOptions {
    /// Wrap the `procs` heading in ANSI green
    pub color: bool,
    /// Rendering budget of one `procs` file, in bytes
    pub max_output: usize,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            color: false,
            max_output: MAX_OUTPUT_SIZE,
        }
    }
}

impl MountOptions {
    /// Parse a comma-separated option string; unknown keys are rejected.
    pub fn parse(data: &str) -> Result<Self, FsError> {
        let mut options = Self::default();

        for opt in data.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match opt.split_once('=') {
                None if opt == "color" => options.color = true,
                Some(("max_output", value)) => {
                    options.max_output = value.parse().map_err(|_| {
                        pr_err!("userfs: bad max_output value '{}'", value);
                        FsError::InvalidArgument
                    })?;
                    if !(MIN_OUTPUT_SIZE..=MAX_OUTPUT_SIZE_LIMIT).contains(&options.max_output) {
                        pr_err!(
                            "userfs: max_output {} outside {}..={}",
                            options.max_output,
                            MIN_OUTPUT_SIZE,
                            MAX_OUTPUT_SIZE_LIMIT
                        );
                        return Err(FsError::InvalidArgument);
                    }
                }
                _ => {
                    pr_err!("userfs: unknown mount option '{}'", opt);
                    return Err(FsError::InvalidArgument);
                }
            }
        }

        Ok(options)
    }
}
