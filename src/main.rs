use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use ipmath::{
    aggregate_prefix_length, exclude_from_range_and_split_into_prefixes,
    find_best_fit, Asn, DisjointRangeSet, Ipv4, Ipv6, ParseError, Range, Steppable,
};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "ipmath", about = "Exact range arithmetic over IPv4, IPv6 and ASN spaces")]
struct Cli {
    /// Address family; detected from the first range when omitted.
    #[arg(long, global = true, value_enum)]
    family: Option<Family>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` wins.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split a range into its minimal list of CIDR prefixes.
    Split {
        /// Range as `start-end`, `start/len` or a single value.
        range: String,
    },
    /// List the prefixes of a pool left free after excluding assigned ranges.
    Free {
        /// Pool to carve from.
        range: String,
        /// Assigned range to subtract (repeatable).
        #[arg(short = 'x', long = "exclude")]
        exclude: Vec<String>,
    },
    /// Find the tightest free prefix able to host a block of the given length.
    Fit {
        /// Requested prefix length.
        #[arg(short, long)]
        prefix_length: u32,
        /// Candidate free ranges.
        #[arg(required = true)]
        candidates: Vec<String>,
    },
    /// Normalize ranges into a disjoint, coalesced set.
    Merge {
        /// Ranges to combine.
        #[arg(required = true)]
        ranges: Vec<String>,
    },
    /// Approximate one prefix length equivalent to several allocated blocks.
    Aggregate {
        /// Prefix lengths of the allocated blocks.
        #[arg(required = true)]
        lengths: Vec<u32>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Family {
    Ipv4,
    Ipv6,
    Asn,
}

impl Family {
    fn detect(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.contains(':') {
            Family::Ipv6
        } else if trimmed
            .get(..2)
            .map_or(false, |tag| tag.eq_ignore_ascii_case("as"))
        {
            Family::Asn
        } else {
            Family::Ipv4
        }
    }
}

macro_rules! dispatch {
    ($family:expr, $func:ident ( $($arg:expr),* )) => {
        match $family {
            Family::Ipv4 => $func::<Ipv4>($($arg),*),
            Family::Ipv6 => $func::<Ipv6>($($arg),*),
            Family::Asn => $func::<Asn>($($arg),*),
        }
    };
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let pick = |sample: &str| cli.family.unwrap_or_else(|| Family::detect(sample));

    match &cli.command {
        Commands::Split { range } => dispatch!(pick(range.as_str()), run_split(range)),
        Commands::Free { range, exclude } => {
            dispatch!(pick(range.as_str()), run_free(range, exclude))
        }
        Commands::Fit {
            prefix_length,
            candidates,
        } => dispatch!(pick(candidates[0].as_str()), run_fit(candidates, *prefix_length)),
        Commands::Merge { ranges } => dispatch!(pick(ranges[0].as_str()), run_merge(ranges)),
        Commands::Aggregate { lengths } => {
            dispatch!(cli.family.unwrap_or(Family::Ipv4), run_aggregate(lengths))
        }
    }
}

fn parse_range<V>(text: &str) -> Result<Range<V>>
where
    V: Steppable + FromStr<Err = ParseError>,
{
    text.parse()
        .with_context(|| format!("invalid range '{}'", text))
}

fn parse_ranges<V>(texts: &[String]) -> Result<Vec<Range<V>>>
where
    V: Steppable + FromStr<Err = ParseError>,
{
    texts.iter().map(|text| parse_range(text)).collect()
}

fn run_split<V>(text: &str) -> Result<()>
where
    V: Steppable + FromStr<Err = ParseError>,
{
    let range: Range<V> = parse_range(text)?;
    debug!(%range, size = %range.size(), "splitting");
    for prefix in range.prefixes() {
        println!("{}", prefix);
    }
    Ok(())
}

fn run_free<V>(text: &str, exclude: &[String]) -> Result<()>
where
    V: Steppable + FromStr<Err = ParseError>,
{
    let pool: Range<V> = parse_range(text)?;
    let taken: Vec<Range<V>> = parse_ranges(exclude)?;
    let free = exclude_from_range_and_split_into_prefixes(&pool, &taken)
        .with_context(|| format!("failed to plan free space in {}", pool))?;

    if free.is_empty() {
        println!("No free space left in {}.", pool);
    }
    for prefix in free {
        println!("{}\tsize={}", prefix, prefix.size());
    }
    Ok(())
}

fn run_fit<V>(texts: &[String], prefix_length: u32) -> Result<()>
where
    V: Steppable + FromStr<Err = ParseError>,
{
    let candidates: Vec<Range<V>> = parse_ranges(texts)?;
    let best = find_best_fit(&candidates, prefix_length).context("best-fit search failed")?;

    match best {
        Some(best) => {
            let allocation = Range::prefix_containing(best.start(), prefix_length)?;
            println!("best-fit\t{}", best);
            println!("allocate\t{}", allocation);
        }
        None => println!("No candidate can hold a /{} block.", prefix_length),
    }
    Ok(())
}

fn run_merge<V>(texts: &[String]) -> Result<()>
where
    V: Steppable + FromStr<Err = ParseError>,
{
    let set: DisjointRangeSet<V> = parse_ranges::<V>(texts)?.into_iter().collect();
    for member in &set {
        println!("{}", member);
    }
    Ok(())
}

fn run_aggregate<V: Steppable>(lengths: &[u32]) -> Result<()> {
    let aggregate = aggregate_prefix_length::<V>(lengths).context("invalid prefix length")?;
    println!("/{}", aggregate);
    Ok(())
}
