//! Export command implementation

use herald_core::error::HeraldResult;
use herald_core::HeraldConfig;

use super::load;

/// Print the default-scope payload
pub async fn execute(config: &HeraldConfig, pretty: bool) -> HeraldResult<()> {
    let loaded = load(config).await?;
    let mut data = loaded.tree.data();
    let single = config.effective_single_server(None);
    if let Some(owner) = loaded.owner {
        // Single-server mode on the owner guild installs the owner command
        // with the rest of the tree
        if single.is_some() && single == config.owner_server {
            data.push(owner.data());
        }
    }

    let json = if pretty {
        serde_json::to_string_pretty(&data)?
    } else {
        serde_json::to_string(&data)?
    };
    println!("{}", json);
    Ok(())
}
