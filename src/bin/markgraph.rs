//! Command-line driver: loads a plain net, builds its marking graph and
//! reports on it.
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command, value_parser};
use log::debug;

use markgraph::analysis::ReachabilityBuilder;
use markgraph::config::ExplorationConfig;
use markgraph::net::FiringRule;
use markgraph::net::io::{Format, read_net};

fn make_options_parser() -> Command {
    Command::new("markgraph")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds the reachability graph of a place/transition net")
        .arg(
            Arg::new("net")
                .value_name("NET")
                .help("Net definition (.json or .ron)")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Override the format guessed from the file extension")
                .value_parser(["json", "ron"]),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML exploration config")
                .default_value("markgraph.toml")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("state-limit")
                .long("state-limit")
                .value_name("N")
                .help("Stop after discovering N markings")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("coverability")
                .long("coverability")
                .help("Abort when a marking strictly covers an earlier one")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dot")
                .long("dot")
                .value_name("FILE")
                .help("Write the marking graph in DOT format")
                .value_parser(value_parser!(PathBuf)),
        )
}

fn run() -> Result<()> {
    let matches = make_options_parser().get_matches();

    let net_path = matches
        .get_one::<PathBuf>("net")
        .context("missing net path")?;
    let format = match matches.get_one::<String>("format").map(String::as_str) {
        Some("ron") => Format::Ron,
        Some(_) => Format::Json,
        None => Format::from_path(net_path),
    };

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ExplorationConfig::load_from_file(path)?,
        None => ExplorationConfig::default(),
    };
    if let Some(limit) = matches.get_one::<usize>("state-limit") {
        config.state_limit = Some(*limit);
    }
    if matches.get_flag("coverability") {
        config.coverability_check = true;
    }
    debug!("exploration config: {config:?}");

    let net = read_net(net_path, format)
        .with_context(|| format!("Failed to load net from {:?}", net_path))?;
    let graph = ReachabilityBuilder::new(&net)
        .with_config(config)
        .try_build(net.initial_marking())?;

    println!("markings: {}", graph.count());
    println!("edges:    {}", graph.edge_count());
    let dead = graph.dead_nodes();
    println!("dead:     {}", dead.len());
    for id in dead {
        println!("  {id:?} {:?}", graph.marking(id));
    }

    if let Some(path) = matches.get_one::<PathBuf>("dot") {
        let dot = graph.dot(|t| net.transition_name(t));
        std::fs::write(path, dot).with_context(|| format!("Failed to write {:?}", path))?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let env = env_logger::Env::new()
        .filter("MG_LOG")
        .write_style("MG_LOG_STYLE");
    env_logger::init_from_env(env);

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
