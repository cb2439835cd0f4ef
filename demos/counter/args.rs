// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use anyhow::Result;
use clap::{
    Arg,
    ArgMatches,
    Command,
};

//======================================================================================================================
// Program Arguments
//======================================================================================================================

/// Program Arguments
#[derive(Debug)]
pub struct ProgramArguments {
    /// Slot registry capacity.
    capacity: usize,
    /// Delay injected by each task invocation, in milliseconds.
    delay_ms: u64,
    /// Bound for the increment/decrement task pair.
    bound: u64,
}

impl ProgramArguments {
    /// Parses the program arguments from the command line interface.
    pub fn new(app_name: &'static str, app_author: &'static str, app_about: &'static str) -> Result<Self> {
        let matches: ArgMatches = Command::new(app_name)
            .author(app_author)
            .about(app_about)
            .arg(
                Arg::new("capacity")
                    .long("capacity")
                    .value_parser(clap::value_parser!(usize))
                    .required(false)
                    .value_name("SLOTS")
                    .default_value("16")
                    .help("Sets slot registry capacity"),
            )
            .arg(
                Arg::new("delay")
                    .long("delay")
                    .value_parser(clap::value_parser!(u64))
                    .required(false)
                    .value_name("MS")
                    .default_value("250")
                    .help("Sets per-invocation delay in milliseconds"),
            )
            .arg(
                Arg::new("bound")
                    .long("bound")
                    .value_parser(clap::value_parser!(u64))
                    .required(false)
                    .value_name("N")
                    .default_value("5")
                    .help("Sets bound for the increment/decrement task pair"),
            )
            .get_matches();

        // Slot registry capacity.
        let capacity: usize = *matches
            .get_one::<usize>("capacity")
            .ok_or(anyhow::anyhow!("missing capacity"))?;
        if capacity == 0 {
            anyhow::bail!("capacity must be at least one slot");
        }

        // Per-invocation delay.
        let delay_ms: u64 = *matches.get_one::<u64>("delay").ok_or(anyhow::anyhow!("missing delay"))?;

        // Increment/decrement bound.
        let bound: u64 = *matches.get_one::<u64>("bound").ok_or(anyhow::anyhow!("missing bound"))?;

        Ok(Self {
            capacity,
            delay_ms,
            bound,
        })
    }

    /// Returns the `capacity` command line argument.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the `delay` command line argument.
    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Returns the `bound` command line argument.
    pub fn bound(&self) -> u64 {
        self.bound
    }
}
