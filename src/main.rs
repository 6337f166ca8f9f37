use cadence_chain::{Node, NodeConfig, Opt, Result};
use clap::Parser;
use log::{error, info, LevelFilter};
use std::process;
use std::sync::Arc;

fn main() {
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let opt = Opt::parse();

    if let Err(e) = run(opt) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run(opt: Opt) -> Result<()> {
    let config = if opt.validator {
        let config = NodeConfig::validator(opt.listen)?;
        if let Some(key) = &config.private_key {
            info!("validator enabled, address: {}", key.public().address());
        }
        config
    } else {
        NodeConfig::new(opt.listen)
    };

    let node = Arc::new(Node::new(config)?);
    node.start(&opt.bootstrap)
}
