use std::sync::Arc;

use clap::Parser;
use cli::{Args, Commands};
use logging::setup_logging;
use progress::{spawn_event_handler, ProgressGuard};
use repomd_core::Result;
use repomd_events::{ChannelSink, EventSinkHandle, NullSink};
use state::AppState;
use utils::{progress_enabled, COLOR, PROGRESS};

mod cli;
mod groups;
mod logging;
mod mirrors;
mod progress;
mod query;
mod sources;
mod state;
mod updates;
mod utils;

fn create_sink() -> (EventSinkHandle, Option<ProgressGuard>) {
    if progress_enabled() {
        let (sink, receiver) = ChannelSink::new();
        (Arc::new(sink), Some(spawn_event_handler(receiver)))
    } else {
        (Arc::new(NullSink), None)
    }
}

fn run(args: &Args, state: &AppState) -> Result<()> {
    match &args.command {
        Commands::Sources => sources::list_sources(state),
        Commands::Resolve {
            names,
        } => query::resolve(state, names),
        Commands::Search {
            terms,
            details,
        } => query::search(state, terms, *details),
        Commands::Group {
            groups,
        } => query::search_group(state, groups),
        Commands::Pkgid {
            pkgids,
        } => query::search_pkgid(state, pkgids),
        Commands::File {
            paths,
        } => query::search_file(state, paths),
        Commands::Provides {
            capabilities,
        } => query::what_provides(state, capabilities),
        Commands::Packages => query::list_packages(state),
        Commands::Find {
            package_ids,
        } => query::find_packages(state, package_ids),
        Commands::Changelog {
            pkgid,
            limit,
        } => query::changelog(state, pkgid, *limit),
        Commands::Files {
            pkgid,
        } => query::list_files(state, pkgid),
        Commands::Categories => groups::list_categories(state),
        Commands::Groups {
            category,
        } => groups::list_groups(state, category.as_deref()),
        Commands::GroupPackages {
            group,
        } => groups::list_group_packages(state, group),
        Commands::Updates {
            package,
        } => updates::list_updates(state, package.as_deref()),
        Commands::Mirrors {
            threshold,
        } => mirrors::list_mirrors(state, *threshold),
        Commands::Clean {
            kind,
        } => sources::clean_sources(state, kind.as_deref()),
    }
}

fn handle_cli() -> Result<()> {
    let args = Args::parse();

    if args.no_color {
        if let Ok(mut color) = COLOR.write() {
            *color = false;
        }
    }
    if args.no_progress || args.quiet || args.json {
        if let Ok(mut progress) = PROGRESS.write() {
            *progress = false;
        }
    }

    setup_logging(&args);

    let (events, guard) = create_sink();
    let result = AppState::from_args(&args, events).and_then(|state| run(&args, &state));

    // the sink is gone with the state, so the handler thread can drain and exit
    if let Some(guard) = guard {
        guard.finish();
    }
    result
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
