use nu_ansi_term::Color::{Blue, Cyan, Green, LightRed, Yellow};
use repomd_config::source::MdKind;
use repomd_core::{MdError, MdInfo, PackageId, Result, Update, Updateinfo};
use tracing::info;

use crate::{state::AppState, utils::Colored};

/// Updateinfo sources of `repos`.
fn updateinfo_sources(state: &AppState, repos: &[&str]) -> Result<Vec<Updateinfo>> {
    let sources = repos
        .iter()
        .filter_map(|repo| state.config().find_source(repo, MdKind::Updateinfo))
        .map(|source| Ok(Updateinfo::new(MdInfo::from_config(source)?)))
        .collect::<Result<Vec<_>>>()?;

    if sources.is_empty() {
        return Err(MdError::Failed("no updateinfo source is configured".to_string()));
    }
    Ok(sources)
}

fn print_update(update: &Update) {
    info!(
        id = update.id,
        kind = ?update.kind,
        state = ?update.state,
        issued = update.issued,
        reboot = update.reboot_suggested,
        "{} [{:?}/{:?}] {} {}{}",
        Colored(Blue, &update.id),
        update.kind,
        update.state,
        update.title.as_deref().unwrap_or("-"),
        Colored(Yellow, update.issued.as_deref().unwrap_or("")),
        if update.reboot_suggested {
            format!(" {}", Colored(LightRed, "reboot suggested"))
        } else {
            String::new()
        },
    );
    for reference in &update.references {
        info!(
            "  {:?} {} {}",
            reference.kind,
            reference.id.as_deref().unwrap_or("-"),
            Colored(Cyan, reference.url.as_deref().unwrap_or("")),
        );
    }
    for package in &update.packages {
        info!("  {}", Colored(Green, package));
    }
}

/// Lists advisories, optionally only those shipping `package_id`.
pub fn list_updates(state: &AppState, package_id: Option<&str>) -> Result<()> {
    let repos = match package_id {
        Some(package_id) => vec![PackageId::parse(package_id)?.data],
        None => state.repositories(),
    };

    let mut count = 0;
    for mut md in updateinfo_sources(state, &repos)? {
        let updates = match package_id {
            Some(package_id) => md.get_detail_for_package(package_id, &mut state.progress())?,
            None => md.get_detail(&mut state.progress())?,
        };
        for update in &updates {
            print_update(update);
        }
        count += updates.len();
    }

    info!("{} advisories", Colored(Yellow, count));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use repomd_config::config::Config;
    use repomd_events::NullSink;

    use super::*;

    fn state() -> AppState {
        let config = Config::parse(
            r#"
[[source]]
repo = "fedora"
kind = "primary"
path = "/var/cache/repomd/fedora/primary.xml"

[[source]]
repo = "updates"
kind = "updateinfo"
path = "/var/cache/repomd/updates/updateinfo.xml"
"#,
        )
        .unwrap();
        AppState::new(config, None, Arc::new(NullSink))
    }

    #[test]
    fn test_updateinfo_sources_per_repository() {
        let state = state();
        let sources = updateinfo_sources(&state, &state.repositories()).unwrap();
        assert_eq!(sources.len(), 1);
    }

    #[test]
    fn test_updateinfo_sources_missing() {
        let state = state();
        assert!(matches!(
            updateinfo_sources(&state, &["fedora"]),
            Err(MdError::Failed(_))
        ));
    }

    #[test]
    fn test_invalid_package_id() {
        let state = state();
        assert!(list_updates(&state, Some("zsh")).is_err());
    }
}
