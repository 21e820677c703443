//! Subcommands and their results.

use std::cmp::Ordering;
use std::fmt;

use anyhow::Context;
use clap::Subcommand;
use nodecore::NodeAddress;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show family, IP, port, flags and the raw buffer of an address.
    Inspect {
        /// `ip:port`, `[ipv6]:port` or a bare IP.
        addr: String,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Compare two addresses in key order.
    Compare { a: String, b: String },
    /// Print addresses in key order, one per line.
    Sort {
        #[arg(required = true)]
        addrs: Vec<String>,
    },
}

/// Everything `inspect` knows about an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub address: String,
    pub family: String,
    pub ip: String,
    pub port: u16,
    pub is_virtual: bool,
    pub is_any: bool,
    pub is_local: bool,
    /// Address buffer as lowercase hex.
    pub bytes: String,
}

impl From<&NodeAddress> for Report {
    fn from(addr: &NodeAddress) -> Self {
        Self {
            address: addr.print(),
            family: addr.family().to_string(),
            ip: addr.ip_string(),
            port: addr.port(),
            is_virtual: addr.is_virtual(),
            is_any: addr.is_any(),
            is_local: addr.is_local(),
            bytes: addr.as_bytes().iter().map(|b| format!("{:02x}", b)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Inspect { report: Report, json: bool },
    Compare {
        a: NodeAddress,
        b: NodeAddress,
        ordering: Ordering,
    },
    Sort(Vec<NodeAddress>),
}

fn parse(addr: &str) -> anyhow::Result<NodeAddress> {
    addr.parse::<NodeAddress>()
        .with_context(|| format!("cannot parse node address {:?}", addr))
}

impl Command {
    pub fn execute(&self) -> anyhow::Result<CommandResult> {
        match self {
            Command::Inspect { addr, json } => {
                let node = parse(addr)?;
                debug!(node = %node, "inspecting");
                Ok(CommandResult::Inspect {
                    report: Report::from(&node),
                    json: *json,
                })
            }
            Command::Compare { a, b } => {
                let (a, b) = (parse(a)?, parse(b)?);
                Ok(CommandResult::Compare {
                    a,
                    b,
                    ordering: a.cmp(&b),
                })
            }
            Command::Sort { addrs } => {
                let mut nodes = addrs
                    .iter()
                    .map(|s| parse(s))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                nodes.sort();
                debug!(count = nodes.len(), "sorted");
                Ok(CommandResult::Sort(nodes))
            }
        }
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Inspect { report, json: true } => {
                let text = serde_json::to_string_pretty(report).map_err(|_| fmt::Error)?;
                write!(f, "{}", text)
            }
            CommandResult::Inspect { report, json: false } => {
                writeln!(f, "address: {}", report.address)?;
                writeln!(f, "family:  {}", report.family)?;
                writeln!(f, "ip:      {}", report.ip)?;
                writeln!(f, "port:    {}", report.port)?;
                writeln!(
                    f,
                    "flags:   virtual={} any={} local={}",
                    report.is_virtual, report.is_any, report.is_local
                )?;
                write!(f, "bytes:   {}", report.bytes)
            }
            CommandResult::Compare { a, b, ordering } => {
                let op = match ordering {
                    Ordering::Less => "<",
                    Ordering::Equal => "==",
                    Ordering::Greater => ">",
                };
                write!(f, "{} {} {}", a, op, b)
            }
            CommandResult::Sort(nodes) => {
                let lines: Vec<String> = nodes.iter().map(NodeAddress::print).collect();
                write!(f, "{}", lines.join("\n"))
            }
        }
    }
}
