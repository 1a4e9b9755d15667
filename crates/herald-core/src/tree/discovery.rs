//! Directory scanning

use std::path::{Path, PathBuf};

use futures::FutureExt;
use futures::future::{BoxFuture, try_join_all};
use tracing::debug;

use super::builder::{CommandTreeBuilder, join_key};
use super::{DEBUG_FOLDER, RESERVED_PREFIX};
use crate::error::HeraldResult;

/// One thing the main pass turns into a top-level command
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum LoadUnit {
    /// A definition file
    Leaf {
        name: String,
        subfolder: String,
        file: PathBuf,
    },
    /// A folder loaded as a group command
    Group { name: String, dir: PathBuf },
}

impl CommandTreeBuilder {
    /// Whether the main pass skips an entry
    pub(super) fn is_excluded(&self, name: &str) -> bool {
        if name.starts_with(RESERVED_PREFIX) && !(name == DEBUG_FOLDER && self.settings.debug) {
            return true;
        }
        self.settings.special_folders.iter().any(|s| s == name)
    }

    /// Collect load units under `dir`, in directory order
    ///
    /// Subdirectories that are walked (rather than turned into groups) are
    /// scanned concurrently.
    pub(super) fn discover<'a>(
        &'a self,
        dir: &'a Path,
        subfolder: &'a str,
    ) -> BoxFuture<'a, HeraldResult<Vec<LoadUnit>>> {
        async move {
            let entries = self.source.read_dir(dir).await?;

            let mut scans = Vec::new();
            for entry in entries {
                if self.is_excluded(&entry.name) {
                    debug!(entry = %entry.name, "Skipping reserved entry");
                    continue;
                }

                let path = dir.join(&entry.name);
                if entry.is_dir {
                    if self.settings.folders_as_groups && entry.name != DEBUG_FOLDER {
                        scans.push(
                            futures::future::ready(Ok(vec![LoadUnit::Group {
                                name: entry.name.clone(),
                                dir: path,
                            }]))
                            .boxed(),
                        );
                    } else {
                        let nested = join_key(subfolder, &entry.name);
                        scans.push(
                            async move {
                                self.discover(&path, &nested).await
                            }
                            .boxed(),
                        );
                    }
                } else if let Some(stem) = self.definition_stem(&entry.name) {
                    scans.push(
                        futures::future::ready(Ok(vec![LoadUnit::Leaf {
                            name: stem.to_string(),
                            subfolder: subfolder.to_string(),
                            file: path,
                        }]))
                        .boxed(),
                    );
                }
            }

            Ok(try_join_all(scans).await?.into_iter().flatten().collect())
        }
        .boxed()
    }
}
