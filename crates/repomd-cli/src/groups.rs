use nu_ansi_term::Color::{Blue, Cyan, Green, Yellow};
use repomd_config::source::MdKind;
use repomd_core::{Category, Comps, MdError, MdInfo, MetadataSource, Result};
use tracing::info;

use crate::{state::AppState, utils::Colored};

/// Comps sources of the selected repositories.
fn comps_sources(state: &AppState) -> Result<Vec<Comps>> {
    let icon_dir = state.icon_dir()?;
    let sources = state
        .repositories()
        .into_iter()
        .filter_map(|repo| state.config().find_source(repo, MdKind::Comps))
        .map(|source| Ok(Comps::new(MdInfo::from_config(source)?, &icon_dir)))
        .collect::<Result<Vec<_>>>()?;

    if sources.is_empty() {
        return Err(MdError::Failed("no comps source is configured".to_string()));
    }
    Ok(sources)
}

fn print_category(category: &Category) {
    info!(
        id = category.id,
        parent_id = category.parent_id,
        name = category.name,
        icon = category.icon,
        "{} {} - {} [{}]",
        Colored(Blue, &category.id),
        category
            .parent_id
            .as_deref()
            .map(|parent| format!("({})", Colored(Cyan, parent)))
            .unwrap_or_default(),
        category.name.as_deref().unwrap_or("-"),
        category.icon.as_deref().unwrap_or("-"),
    );
}

pub fn list_categories(state: &AppState) -> Result<()> {
    for mut comps in comps_sources(state)? {
        let categories = comps.get_categories(&mut state.progress())?;
        for category in &categories {
            print_category(category);
        }
    }
    Ok(())
}

pub fn list_groups(state: &AppState, category: Option<&str>) -> Result<()> {
    for mut comps in comps_sources(state)? {
        match category {
            Some(category) => {
                for group in comps.get_groups_for_category(category, &mut state.progress())? {
                    print_category(&group);
                }
            }
            None => {
                for group in comps.get_groups(&mut state.progress())? {
                    info!(
                        id = group.id,
                        name = group.name,
                        visible = group.visible,
                        packages = group.packages.len(),
                        "{} - {} ({} packages){}",
                        Colored(Blue, &group.id),
                        group.name.as_deref().unwrap_or("-"),
                        group.packages.len(),
                        if group.visible { "" } else { " [hidden]" },
                    );
                }
            }
        }
    }
    Ok(())
}

pub fn list_group_packages(state: &AppState, group: &str) -> Result<()> {
    for mut comps in comps_sources(state)? {
        let names = comps.get_packages_for_group(group, &mut state.progress())?;
        for name in &names {
            info!(name = name, group = group, "{}", Colored(Green, name));
        }
        info!("{} packages in {}", Colored(Yellow, names.len()), Colored(Cyan, group));
    }
    Ok(())
}
