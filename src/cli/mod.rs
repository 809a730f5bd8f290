// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the iamlens command-line interface.
//!
//! Four subcommands: `search` filters a dataset file, `encode` and `decode`
//! convert between state JSON and permalink tokens, and `compare` expands a
//! permalink into the group comparison of its selection.

pub mod display;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "iamlens",
    about = "Search IAM catalogs and work with permalink state tokens",
    version
)]
pub struct Cli {
    /// Engine config (JSON). Defaults apply to anything left out
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which catalog a dataset file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    /// GCP role_permissions.json (permission -> roles)
    Roles,
    /// AWS managed policies keyed by name
    Policies,
    /// AWS IAM actions keyed by service:Action
    Actions,
}

impl Kind {
    /// Prefix the views of this catalog use in permalink state.
    pub fn state_prefix(self) -> &'static str {
        match self {
            Kind::Roles => "roles",
            Kind::Policies => "policies",
            Kind::Actions => "actions",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter a dataset by id, name and attribute substrings
    Search {
        /// Path to the dataset JSON
        dataset: String,

        #[arg(short, long, value_enum, default_value = "roles")]
        kind: Kind,

        /// Substring of the identifier
        #[arg(long)]
        id: Option<String>,

        /// Substring of the display name
        #[arg(long)]
        name: Option<String>,

        /// Substring of any permission / action
        #[arg(short, long)]
        attribute: Option<String>,

        /// Maximum number of results to print
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Encode state JSON into a permalink token
    Encode {
        /// State JSON. Read from stdin when omitted
        json: Option<String>,

        /// Emit the legacy tagged format instead
        #[arg(long)]
        legacy: bool,
    },

    /// Decode a permalink token into pretty-printed JSON
    Decode {
        token: String,
    },

    /// Compare the selected entries of a permalink
    Compare {
        /// Path to the dataset JSON
        dataset: String,

        /// Permalink token
        token: String,

        #[arg(short, long, value_enum, default_value = "roles")]
        kind: Kind,

        /// State prefix of the selection. Defaults to the kind's name
        #[arg(long)]
        prefix: Option<String>,
    },
}
