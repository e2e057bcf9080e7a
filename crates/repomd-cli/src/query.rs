use nu_ansi_term::Color::{Blue, Cyan, Green, LightRed, Yellow};
use repomd_core::{MdError, Package, PackageId, Result};
use tracing::{debug, info};

use crate::{
    state::AppState,
    utils::{format_date, pretty_package_size, Colored},
};

fn print_packages(packages: &[Package]) {
    for package in packages {
        info!(
            name = package.name,
            evr = package.evr(),
            arch = package.arch,
            repo = package.repo_id,
            pkgid = package.pkgid,
            summary = package.summary,
            size = package.size,
            "{}-{}.{} [{}] {} ({})",
            Colored(Blue, &package.name),
            Colored(LightRed, package.evr()),
            package.arch,
            Colored(Green, &package.repo_id),
            package.summary.as_deref().unwrap_or("-"),
            pretty_package_size(package),
        );
    }

    info!("{} packages found", Colored(Yellow, packages.len()));
}

pub fn resolve(state: &AppState, names: &[String]) -> Result<()> {
    let packages = state.query_all("resolve", |md, progress| md.resolve(names, progress))?;
    print_packages(&packages);
    Ok(())
}

pub fn search(state: &AppState, terms: &[String], details: bool) -> Result<()> {
    debug!(terms = ?terms, details = details, "searching packages");
    let packages = if details {
        state.query_all("search_details", |md, progress| md.search_details(terms, progress))?
    } else {
        state.query_all("search_name", |md, progress| md.search_name(terms, progress))?
    };
    print_packages(&packages);
    Ok(())
}

pub fn search_group(state: &AppState, groups: &[String]) -> Result<()> {
    let packages =
        state.query_all("search_group", |md, progress| md.search_group(groups, progress))?;
    print_packages(&packages);
    Ok(())
}

pub fn search_pkgid(state: &AppState, pkgids: &[String]) -> Result<()> {
    let packages =
        state.query_all("search_pkgid", |md, progress| md.search_pkgid(pkgids, progress))?;
    print_packages(&packages);
    Ok(())
}

/// Prints the owners of `paths`, as packages when a primary source can
/// resolve their pkgids.
pub fn search_file(state: &AppState, paths: &[String]) -> Result<()> {
    let pkgids = state.query_all("search_file", |md, progress| md.search_file(paths, progress))?;
    if pkgids.is_empty() {
        info!("No package owns {}", paths.join(", "));
        return Ok(());
    }

    match state.query_all("search_pkgid", |md, progress| md.search_pkgid(&pkgids, progress)) {
        Ok(packages) if !packages.is_empty() => print_packages(&packages),
        Ok(_) | Err(MdError::Failed(_)) => {
            for pkgid in &pkgids {
                info!(pkgid = pkgid, "{}", Colored(Cyan, pkgid));
            }
        }
        Err(err) => return Err(err),
    }
    Ok(())
}

pub fn what_provides(state: &AppState, capabilities: &[String]) -> Result<()> {
    let packages = state.query_all("what_provides", |md, progress| {
        md.what_provides(capabilities, progress)
    })?;
    print_packages(&packages);
    Ok(())
}

pub fn list_packages(state: &AppState) -> Result<()> {
    let packages = state.query_all("get_packages", |md, progress| md.get_packages(progress))?;
    print_packages(&packages);
    Ok(())
}

pub fn find_packages(state: &AppState, package_ids: &[String]) -> Result<()> {
    let mut packages = Vec::new();
    for package_id in package_ids {
        let repo = PackageId::parse(package_id)?.data;
        packages.extend(state.query_repos(&[repo], "find_package", |md, progress| {
            md.find_package(package_id, progress)
        })?);
    }
    print_packages(&packages);
    Ok(())
}

pub fn changelog(state: &AppState, pkgid: &str, limit: Option<usize>) -> Result<()> {
    let changesets =
        state.query_all("get_changelog", |md, progress| md.get_changelog(pkgid, progress))?;

    let shown = limit.unwrap_or(changesets.len());
    for changeset in changesets.iter().take(shown) {
        info!(
            date = changeset.date,
            author = changeset.author,
            version = changeset.version,
            description = changeset.description,
            "* {} {} {}\n{}\n",
            Colored(Yellow, format_date(changeset.date)),
            changeset.author.as_deref().unwrap_or("unknown"),
            Colored(LightRed, changeset.version.as_deref().unwrap_or("")),
            changeset.description.as_deref().unwrap_or("").trim_end(),
        );
    }

    if changesets.is_empty() {
        info!("No changelog for {}", Colored(Cyan, pkgid));
    }
    Ok(())
}

pub fn list_files(state: &AppState, pkgid: &str) -> Result<()> {
    let package = Package {
        pkgid: Some(pkgid.to_string()),
        ..Default::default()
    };
    let files = state.query_all("get_files", |md, progress| md.get_files(&package, progress))?;
    for file in &files {
        info!(file = file, "{file}");
    }
    debug!("{} files", files.len());
    Ok(())
}
