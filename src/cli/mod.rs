//! Command-line interface
//!
//! Argument parsing for the node binary.

use clap::Parser;

/// A minimal peer-to-peer blockchain node
#[derive(Debug, Parser)]
#[command(name = "cadence-chain", version, about)]
pub struct Opt {
    /// Address this node listens on
    #[arg(long, default_value = "127.0.0.1:3000")]
    pub listen: String,

    /// Run as a validator: generate a signing key and seal a block every
    /// tick
    #[arg(long)]
    pub validator: bool,

    /// Known node addresses to bootstrap the peer mesh from (repeatable)
    #[arg(long = "bootstrap", value_name = "ADDR")]
    pub bootstrap: Vec<String>,
}
