use nu_ansi_term::Color::{Cyan, Green};
use repomd_config::source::MdKind;
use repomd_core::{MdError, MdInfo, Metalink, Mirrorlist, Result};
use tracing::info;

use crate::{state::AppState, utils::Colored};

pub fn list_mirrors(state: &AppState, threshold: Option<u32>) -> Result<()> {
    let threshold = threshold.unwrap_or_else(|| state.config().metalink_threshold());
    let mut found = false;

    for source in state.sources() {
        let uris = match source.kind {
            MdKind::Metalink => {
                Metalink::new(MdInfo::from_config(source)?).get_uris(
                    threshold,
                    state.config(),
                    &mut state.progress(),
                )?
            }
            MdKind::Mirrorlist => {
                Mirrorlist::new(MdInfo::from_config(source)?)
                    .get_uris(state.config(), &mut state.progress())?
            }
            _ => continue,
        };

        found = true;
        for uri in &uris {
            info!(
                repo = source.repo,
                kind = source.kind.as_str(),
                uri = uri,
                "[{}] {}",
                Colored(Green, &source.repo),
                Colored(Cyan, uri)
            );
        }
    }

    if !found {
        return Err(MdError::Failed(
            "no metalink or mirrorlist source is configured".to_string(),
        ));
    }
    Ok(())
}
