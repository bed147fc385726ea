// Tooling crate: unwrap/expect/panic acceptable outside the library crates.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod scan;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use library::print::{db_selection_print, print_stats, print_unique_tags};
use library::{
    Database, DatabaseSelection, FilterItem, LibraryContext, LineResponse, MemoryDatabase, QueryShape,
    SongFilter, UniqueTagKind, Window,
};
use tag::config::{default_tag_mask, parse_tag_mask};
use tag::{TagMask, TagType};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Query a music folder through the song database", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    library: LibraryArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LibraryArgs {
    /// Directory containing music files (Artist/Album/track structure)
    #[arg(long, global = true, default_value = ".")]
    music_dir: PathBuf,
    /// Mount another folder into the library: `URI=DIR`
    #[arg(long = "mount", value_name = "URI=DIR", global = true)]
    mounts: Vec<String>,
    /// Tag types to keep while scanning (comma separated, `all` or `none`)
    #[arg(long, global = true)]
    metadata_to_use: Option<String>,
}

#[derive(Args)]
struct FilterArgs {
    /// Exact match: `TAG=VALUE`, where TAG is a tag name, `any`, `file` or `base`
    #[arg(long = "filter", value_name = "TAG=VALUE")]
    filters: Vec<String>,
    /// Case-insensitive substring match, same syntax as --filter
    #[arg(long = "search", value_name = "TAG=VALUE")]
    searches: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List directories, songs and playlists below a URI
    Find {
        /// Directory to start from; empty is the library root
        #[arg(long, default_value = "")]
        uri: String,
        /// Report only the direct children of --uri
        #[arg(long)]
        non_recursive: bool,
        #[command(flatten)]
        filter: FilterArgs,
        /// Sort songs by this tag
        #[arg(long)]
        sort: Option<TagType>,
        /// Positions to report: `START:END`, `START:` or `N`
        #[arg(long, default_value = "0:")]
        window: Window,
        /// Print every field instead of just the URI
        #[arg(long)]
        full: bool,
        /// Print only the last URI component
        #[arg(long)]
        base: bool,
    },
    /// List distinct values of a tag (or `file` for every song URI)
    List {
        /// Tag name or `file`
        what: String,
        /// Tag types to group under each value
        #[arg(long = "group")]
        groups: Vec<TagType>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print song, artist and album counts plus total play time
    Stats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = open_library(&cli.library)?;
    let mut response = LineResponse::new(std::io::stdout().lock());

    match cli.command {
        Commands::Find {
            uri,
            non_recursive,
            filter,
            sort,
            window,
            full,
            base,
        } => {
            let filter = build_filter(&filter)?;
            let selection = DatabaseSelection::new(&uri, !non_recursive, filter.as_ref());
            let shape = QueryShape {
                sort,
                window,
                base,
                full,
            };
            db_selection_print(&ctx, &mut response, &selection, &shape)?;
        }
        Commands::List {
            what,
            groups,
            filter,
        } => {
            let filter = build_filter(&filter)?;
            let kind = parse_unique_kind(&what)?;
            let group_mask: TagMask = groups.into_iter().collect();
            print_unique_tags(&ctx, &mut response, kind, group_mask, filter.as_ref())?;
        }
        Commands::Stats => {
            let stats = ctx.database()?.stats(&DatabaseSelection::all())?;
            print_stats(&mut response, &stats)?;
        }
    }

    response.into_inner().flush()?;
    let leaked = ctx.shutdown();
    tracing::debug!(leaked, "library closed");
    Ok(())
}

fn open_library(args: &LibraryArgs) -> Result<LibraryContext> {
    let enabled = match &args.metadata_to_use {
        Some(value) => parse_tag_mask(value)?,
        None => default_tag_mask(),
    };

    let ctx = LibraryContext::new();
    let db = scan::scan_into(ctx.pool(), enabled, &args.music_dir)
        .with_context(|| format!("scanning {}", args.music_dir.display()))?;

    for spec in &args.mounts {
        let (uri, dir) = spec
            .split_once('=')
            .with_context(|| format!("mount must be URI=DIR, got {spec}"))?;
        let inner = scan::scan_into(ctx.pool(), enabled, Path::new(dir))
            .with_context(|| format!("scanning {dir}"))?;
        db.mount(uri, Arc::new(inner))?;
        tracing::info!(uri, dir, "mounted");
    }

    Ok(ctx.with_database(Arc::new(db)))
}

fn parse_unique_kind(what: &str) -> Result<UniqueTagKind> {
    if what.eq_ignore_ascii_case("file") {
        return Ok(UniqueTagKind::File);
    }
    Ok(UniqueTagKind::Tag(what.parse()?))
}

fn build_filter(args: &FilterArgs) -> Result<Option<SongFilter>> {
    let exact = args.filters.iter().map(|f| parse_filter_item(f));
    let folded = args
        .searches
        .iter()
        .map(|f| parse_filter_item(f).map(FilterItem::fold_case));
    let filter = exact.chain(folded).collect::<Result<SongFilter>>()?;
    Ok((!filter.is_empty()).then_some(filter))
}

/// `TAG=VALUE` → filter item. `any`, `file` and `base` are pseudo tags.
fn parse_filter_item(spec: &str) -> Result<FilterItem> {
    let Some((name, value)) = spec.split_once('=') else {
        bail!("filter must be TAG=VALUE, got {spec}");
    };
    let item = match name.to_ascii_lowercase().as_str() {
        "any" => FilterItem::any_tag(value),
        "file" => FilterItem::uri(value),
        "base" => FilterItem::base(value),
        _ => FilterItem::tag(name.parse()?, value),
    };
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use library::FilterKind;

    #[test]
    fn filter_item_pseudo_tags() {
        assert_eq!(parse_filter_item("any=x").unwrap().kind(), FilterKind::AnyTag);
        assert_eq!(parse_filter_item("FILE=a/b").unwrap().kind(), FilterKind::Uri);
        assert_eq!(parse_filter_item("base=a").unwrap().kind(), FilterKind::Base);
        let item = parse_filter_item("artist=Portishead").unwrap();
        assert_eq!(item.kind(), FilterKind::Tag(TagType::Artist));
        assert_eq!(item.value(), "Portishead");
    }

    #[test]
    fn filter_item_value_may_contain_equals() {
        assert_eq!(parse_filter_item("title=a=b").unwrap().value(), "a=b");
    }

    #[test]
    fn filter_item_rejects_bad_input() {
        assert!(parse_filter_item("artist").is_err());
        assert!(parse_filter_item("nosuchtag=x").is_err());
    }

    #[test]
    fn empty_filter_args_give_no_filter() {
        let args = FilterArgs {
            filters: vec![],
            searches: vec![],
        };
        assert!(build_filter(&args).unwrap().is_none());
    }

    #[test]
    fn unique_kind_parses_file_and_tags() {
        assert_eq!(parse_unique_kind("file").unwrap(), UniqueTagKind::File);
        assert_eq!(
            parse_unique_kind("Album").unwrap(),
            UniqueTagKind::Tag(TagType::Album)
        );
        assert!(parse_unique_kind("bogus").is_err());
    }

    #[test]
    fn cli_parses_find() {
        let cli = Cli::try_parse_from([
            "xtask", "find", "--sort", "Track", "--window", "0:2", "--filter", "album=Dummy",
        ])
        .unwrap();
        match cli.command {
            Commands::Find { sort, window, .. } => {
                assert_eq!(sort, Some(TagType::Track));
                assert_eq!(window, Window::new(0, 2));
            }
            _ => panic!("expected find"),
        }
    }
}
