use anyhow::Result;
use common::types::Address;
use reader::sources::{DebateReads, FactoryReads};
use reader::BatchReader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Stats,
    Debates { active_only: bool },
    Summaries { addresses: Vec<Address> },
    Authors { max_results: Option<usize>, addresses: Vec<Address> },
    Participants { max_results: Option<usize>, addresses: Vec<Address> },
    Creators { addresses: Vec<Address> },
    Aggregate { addresses: Vec<Address> },
    Agents { addresses: Vec<Address> },
}

const USAGE: &str = "usage: cli <stats|debates [--active]|summaries [addr..]|authors [--max N] [addr..]|participants [--max N] [addr..]|creators [addr..]|aggregate [addr..]|agents <addr..>>";

pub fn parse_args<I>(mut args: I) -> std::result::Result<Command, String>
where
    I: Iterator<Item = String>,
{
    // Drop argv[0].
    let _ = args.next();

    let Some(cmd) = args.next() else {
        return Err(USAGE.to_string());
    };
    let rest: Vec<String> = args.collect();

    match cmd.as_str() {
        "stats" => Ok(Command::Stats),
        "debates" => Ok(Command::Debates {
            active_only: rest.iter().any(|a| a == "--active"),
        }),
        "summaries" => Ok(Command::Summaries {
            addresses: parse_addresses(&rest)?,
        }),
        "authors" => {
            let (max_results, rest) = parse_max(rest)?;
            Ok(Command::Authors {
                max_results,
                addresses: parse_addresses(&rest)?,
            })
        }
        "participants" => {
            let (max_results, rest) = parse_max(rest)?;
            Ok(Command::Participants {
                max_results,
                addresses: parse_addresses(&rest)?,
            })
        }
        "creators" => Ok(Command::Creators {
            addresses: parse_addresses(&rest)?,
        }),
        "aggregate" => Ok(Command::Aggregate {
            addresses: parse_addresses(&rest)?,
        }),
        "agents" => {
            let addresses = parse_addresses(&rest)?;
            if addresses.is_empty() {
                return Err("agents: at least one address is required".to_string());
            }
            Ok(Command::Agents { addresses })
        }
        other => Err(format!("unknown command: {other}\n{USAGE}")),
    }
}

fn parse_max(mut rest: Vec<String>) -> std::result::Result<(Option<usize>, Vec<String>), String> {
    let Some(pos) = rest.iter().position(|a| a == "--max") else {
        return Ok((None, rest));
    };
    rest.remove(pos);
    if pos >= rest.len() {
        return Err("--max requires a value".to_string());
    }
    let value = rest.remove(pos);
    let max = value
        .parse::<usize>()
        .map_err(|_| format!("--max: not a number: {value}"))?;
    Ok((Some(max), rest))
}

fn parse_addresses(raw: &[String]) -> std::result::Result<Vec<Address>, String> {
    raw.iter()
        .map(|s| s.parse::<Address>().map_err(|e| e.to_string()))
        .collect()
}

pub async fn run_command<S>(
    reader: &BatchReader<S>,
    defaults: &common::config::Reader,
    cmd: Command,
) -> Result<()>
where
    S: FactoryReads + DebateReads,
{
    match cmd {
        Command::Stats => show_stats(reader).await,
        Command::Debates { active_only } => show_debates(reader, active_only).await,
        Command::Summaries { addresses } => show_summaries(reader, addresses).await,
        Command::Authors {
            max_results,
            addresses,
        } => show_authors(reader, addresses, max_results.unwrap_or(defaults.max_authors)).await,
        Command::Participants {
            max_results,
            addresses,
        } => {
            show_participants(
                reader,
                addresses,
                max_results.unwrap_or(defaults.max_participants),
            )
            .await
        }
        Command::Creators { addresses } => show_creators(reader, addresses).await,
        Command::Aggregate { addresses } => show_aggregate(reader, addresses).await,
        Command::Agents { addresses } => show_agents(reader, &addresses).await,
    }
}

/// Empty address list on a debate command means "every debate the factory
/// knows about".
async fn resolve_debates<S>(reader: &BatchReader<S>, addresses: Vec<Address>) -> Result<Vec<Address>>
where
    S: FactoryReads + DebateReads,
{
    if addresses.is_empty() {
        reader.all_debates().await
    } else {
        Ok(addresses)
    }
}

async fn show_stats<S>(reader: &BatchReader<S>) -> Result<()>
where
    S: FactoryReads + DebateReads,
{
    let s = reader.platform_stats().await?;
    println!(
        "Debates: total={} active={} resolving={} resolved={} undetermined={}",
        s.total_debates, s.active_debates, s.resolving_debates, s.resolved_debates,
        s.undetermined_debates
    );
    Ok(())
}

async fn show_debates<S>(reader: &BatchReader<S>, active_only: bool) -> Result<()>
where
    S: FactoryReads + DebateReads,
{
    let debates = if active_only {
        reader.active_debates().await?
    } else {
        reader.all_debates().await?
    };
    for d in debates {
        println!("{d}");
    }
    Ok(())
}

async fn show_summaries<S>(reader: &BatchReader<S>, addresses: Vec<Address>) -> Result<()>
where
    S: FactoryReads + DebateReads,
{
    let debates = resolve_debates(reader, addresses).await?;
    for row in reader.debate_summaries(&debates).await? {
        println!(
            "{}  {:<12}  a={} b={} bounty={} args={}/{} creator={} ends={}",
            row.address,
            row.status.as_str(),
            row.total_side_a,
            row.total_side_b,
            row.total_bounty,
            row.argument_count_a,
            row.argument_count_b,
            row.creator,
            row.end_date
        );
    }
    Ok(())
}

async fn show_authors<S>(reader: &BatchReader<S>, addresses: Vec<Address>, max: usize) -> Result<()>
where
    S: FactoryReads + DebateReads,
{
    let debates = resolve_debates(reader, addresses).await?;
    for author in reader.argument_authors(&debates, max).await? {
        println!("{author}");
    }
    Ok(())
}

async fn show_participants<S>(
    reader: &BatchReader<S>,
    addresses: Vec<Address>,
    max: usize,
) -> Result<()>
where
    S: FactoryReads + DebateReads,
{
    let debates = resolve_debates(reader, addresses).await?;
    println!("Participants (first-seen order):");
    for row in reader.participant_details(&debates, max).await? {
        println!(
            "{:>28}  args={:>4}  {}",
            row.amount_staked, row.arguments_written, row.address
        );
    }
    Ok(())
}

async fn show_creators<S>(reader: &BatchReader<S>, addresses: Vec<Address>) -> Result<()>
where
    S: FactoryReads + DebateReads,
{
    let debates = resolve_debates(reader, addresses).await?;
    for creator in reader.debate_creators(&debates).await? {
        println!("{creator}");
    }
    Ok(())
}

async fn show_aggregate<S>(reader: &BatchReader<S>, addresses: Vec<Address>) -> Result<()>
where
    S: FactoryReads + DebateReads,
{
    let debates = resolve_debates(reader, addresses).await?;
    let agg = reader.aggregate_stats(&debates).await?;
    println!("Aggregate over {} debates:", debates.len());
    println!("  total_volume={}", agg.total_volume);
    println!("  total_bounties={}", agg.total_bounties);
    println!("  total_arguments={}", agg.total_arguments);
    println!("  unique_participants={}", agg.unique_participants);
    Ok(())
}

async fn show_agents<S>(reader: &BatchReader<S>, addresses: &[Address]) -> Result<()>
where
    S: FactoryReads + DebateReads,
{
    for row in reader.agent_stats_batch(addresses).await? {
        println!(
            "{}  won={}/{}  bets={}  winnings={}  claimed={}  net={}  win_rate_bps={}",
            row.address,
            row.debates_won,
            row.debates_participated,
            row.total_bets,
            row.total_winnings,
            row.total_claimed,
            row.net_profit,
            row.win_rate_bps
        );
    }
    Ok(())
}
