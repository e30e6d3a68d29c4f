//! netpath: print the path between two objects of a topology
//!
//! # Usage
//!
//! ```bash
//! # Routers and zones on the path from network n1 to network n2
//! netpath topology.json any:[network:n1] any:[network:n2]
//!
//! # With custom configuration
//! netpath -c /path/to/config.json topology.json router:r1 any:[network:n2]
//!
//! # With environment overrides
//! NETPATH_LOG_LEVEL=debug netpath -c config.json topology.json a b
//! ```

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

use netpath::config::{create_default_config, load_config_with_env, load_topology, Config, LogConfig};
use netpath::diag::Diagnostics;
use netpath::pathwalk::CallAt;
use netpath::topology::{PathStore, Topology};

/// Command-line arguments
struct Args {
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Generate default configuration at this path
    generate_config: Option<PathBuf>,
    /// Call visitor at zones instead of routers
    at_zone: bool,
    /// Topology description, source and destination
    positional: Vec<String>,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut config_path = None;
        let mut generate_config = None;
        let mut at_zone = false;
        let mut positional = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-c" | "--config" => {
                    if let Some(path) = args.next() {
                        config_path = Some(PathBuf::from(path));
                    }
                }
                "-g" | "--generate-config" => {
                    if let Some(path) = args.next() {
                        generate_config = Some(PathBuf::from(path));
                    }
                }
                "--zone" => {
                    at_zone = true;
                }
                "-h" | "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                "-v" | "--version" => {
                    println!("netpath v{}", netpath::VERSION);
                    std::process::exit(0);
                }
                _ if arg.starts_with('-') => {
                    eprintln!("Unknown argument: {arg}");
                    print_help();
                    std::process::exit(1);
                }
                _ => positional.push(arg),
            }
        }

        Self {
            config_path,
            generate_config,
            at_zone,
            positional,
        }
    }
}

fn print_help() {
    println!(
        r"netpath v{}

Print routers and zones on the path between two objects of a topology.

USAGE:
    netpath [OPTIONS] TOPOLOGY SOURCE DESTINATION

ARGS:
    TOPOLOGY        JSON topology description
    SOURCE          Name of a zone, router or interface
    DESTINATION     Name of a zone, router or interface

OPTIONS:
    -c, --config <PATH>            Configuration file path
    -g, --generate-config <PATH>   Generate default configuration and exit
    --zone                         Walk the path zone by zone
    -h, --help                     Print help information
    -v, --version                  Print version information

ENVIRONMENT:
    NETPATH_LOG_LEVEL      Override log level (trace, debug, info, warn, error)
    NETPATH_CONCURRENCY    Override number of concurrent analysis units
",
        netpath::VERSION
    );
}

/// Initialize logging
fn init_logging(config: &LogConfig) {
    let level = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.target)
        .with_writer(std::io::stderr);

    match (config.format.as_str(), config.timestamps) {
        ("json", true) => subscriber.json().init(),
        ("json", false) => subscriber.json().without_time().init(),
        (_, true) => subscriber.init(),
        (_, false) => subscriber.without_time().init(),
    }
}

/// Find the path store of a named zone, router or interface
fn resolve(topology: &Topology, name: &str) -> Result<PathStore> {
    if let Some(zone) = topology.find_zone(name) {
        return Ok(zone.into());
    }
    if let Some(router) = topology.find_router(name) {
        return Ok(router.into());
    }
    if let Some(intf) = topology.find_interface(name) {
        return Ok(topology.path_node_of_interface(intf));
    }
    bail!("Unknown object '{name}'")
}

/// Name of the zone or router an endpoint stands for
fn endpoint_name(topology: &Topology, store: PathStore) -> &str {
    match store {
        PathStore::Intf(intf) => topology.store_name(PathStore::Router(topology.intf_router(intf))),
        other => topology.store_name(other),
    }
}

fn main() -> Result<()> {
    let start_time = Instant::now();
    let args = Args::parse();

    if let Some(path) = &args.generate_config {
        create_default_config(path)?;
        println!("Generated default configuration at {path:?}");
        return Ok(());
    }

    let [topology_path, src_name, dst_name] = args.positional.as_slice() else {
        print_help();
        std::process::exit(1);
    };

    let config = match &args.config_path {
        Some(path) => load_config_with_env(path)
            .with_context(|| format!("Failed to load configuration from {path:?}"))?,
        None => Config::default_config(),
    };
    init_logging(&config.log);
    info!("netpath v{} starting", netpath::VERSION);

    let mut topology = load_topology(topology_path)
        .with_context(|| format!("Failed to load topology from {topology_path}"))?;

    let mut diag = Diagnostics::new();
    topology.prepare_traversal(&config.engine, &mut diag)?;
    if diag.has_errors() {
        bail!("Aborted with {} error(s)", diag.error_count());
    }

    let src = resolve(&topology, src_name)?;
    let dst = resolve(&topology, dst_name)?;
    let at = if args.at_zone { CallAt::Zone } else { CallAt::Router };

    let mut hops = Vec::new();
    topology.single_path_walk(src, dst, at, |i, o| hops.push((i, o)))?;

    let mut used = BTreeSet::new();
    used.insert(endpoint_name(&topology, src).to_string());
    used.insert(endpoint_name(&topology, dst).to_string());
    for intf in hops.into_iter().flat_map(|(i, o)| [i, o]).flatten() {
        used.insert(topology.store_name(PathStore::Router(topology.intf_router(intf))).to_string());
        used.insert(topology.store_name(PathStore::Zone(topology.intf_zone(intf))).to_string());
    }

    let used: Vec<String> = used.into_iter().collect();
    println!("{}", serde_json::to_string_pretty(&used)?);

    debug!("Finished in {:?}", start_time.elapsed());
    Ok(())
}
