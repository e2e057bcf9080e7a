use nu_ansi_term::Color::{Blue, Green, Red};
use repomd_config::source::MdKind;
use repomd_core::{MdInfo, Result};
use tracing::{info, warn};

use crate::{state::AppState, utils::Colored};

pub fn list_sources(state: &AppState) -> Result<()> {
    for source in state.sources() {
        let path = source.resolved_path()?;
        let status = if path.exists() {
            Colored(Green, "present")
        } else {
            Colored(Red, "missing")
        };

        info!(
            repo = source.repo,
            kind = source.kind.as_str(),
            path = %path.display(),
            checksum = source.checksum,
            "[{}] {} {} ({status})",
            Colored(Green, &source.repo),
            Colored(Blue, source.kind),
            path.display(),
        );
    }
    Ok(())
}

pub fn clean_sources(state: &AppState, kind: Option<&str>) -> Result<()> {
    let kind = kind.map(MdKind::from_text);
    if kind == Some(MdKind::Unknown) {
        warn!("unknown metadata kind, nothing to clean");
        return Ok(());
    }

    for source in state.sources() {
        if kind.is_some_and(|kind| kind != source.kind) {
            continue;
        }

        MdInfo::from_config(source)?.clean()?;
        info!(
            "Cleaned {} metadata of {}",
            Colored(Blue, source.kind),
            Colored(Green, &source.repo)
        );
    }
    Ok(())
}
