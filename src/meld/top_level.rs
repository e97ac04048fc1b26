//! Top-level accumulator for method arguments and responses
//!
//! Top-level entries are matched by their metadata alone, so the same header
//! or cookie observed with different value shapes melds into one entry.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::Melder;
use super::error::MeldError;
use crate::hash::{ContentAddressedMap, Hash, hash_data_meta};
use crate::models::{Data, DataMeta, Method};

/// Counters reported by a method meld
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeldStats {
    /// Cookie fields dropped because the cookie cap was reached
    pub cookies_discarded: usize,
}

impl MeldStats {
    fn add(&mut self, other: MeldStats) {
        self.cookies_discarded += other.cookies_discarded;
    }
}

struct Accumulator<'a> {
    melder: &'a Melder,
    entries: BTreeMap<Hash, Data>,
    cookies: BTreeSet<String>,
    cookies_discarded: usize,
}

impl Accumulator<'_> {
    fn add(&mut self, meta: &DataMeta, data: Data) -> Result<(), MeldError> {
        let meta_key = hash_data_meta(meta);
        if let Some(existing) = self.entries.get_mut(&meta_key) {
            return self.melder.meld_into(existing, data);
        }

        if let Some(name) = meta.cookie_name() {
            if !self.cookies.contains(name) {
                if self.cookies.len() >= self.melder.options.max_num_cookies {
                    debug!(cookie = name, "dropping cookie over the cap");
                    self.cookies_discarded += 1;
                    return Ok(());
                }
                self.cookies.insert(name.to_string());
            }
        }
        self.entries.insert(meta_key, data);
        Ok(())
    }
}

/// Pair each entry with its metadata, in metadata order.
fn sorted_by_meta(map: ContentAddressedMap) -> Result<Vec<(DataMeta, Data)>, MeldError> {
    let mut entries = Vec::with_capacity(map.len());
    for (key, data) in map.into_entries() {
        let meta = match &data.meta {
            Some(meta) if meta.http.is_some() => meta.clone(),
            _ => return Err(MeldError::MissingMeta { key }),
        };
        entries.push((meta, data));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

impl Melder {
    /// Meld a top-level argument or response map into `dst`.
    ///
    /// Returns the number of cookie fields discarded by the cookie cap.
    /// `dst` is only replaced when the whole meld succeeds.
    pub fn meld_top_level_data_map(
        &self,
        dst: &mut ContentAddressedMap,
        src: ContentAddressedMap,
    ) -> Result<usize, MeldError> {
        let dst_entries = sorted_by_meta(dst.clone())?;
        let src_entries = sorted_by_meta(src)?;

        let mut acc = Accumulator {
            melder: self,
            entries: BTreeMap::new(),
            cookies: BTreeSet::new(),
            cookies_discarded: 0,
        };
        for (meta, data) in dst_entries.into_iter().chain(src_entries) {
            acc.add(&meta, data).map_err(|e| e.in_field(meta.to_string()))?;
        }

        if acc.cookies_discarded > 0 {
            warn!(
                discarded = acc.cookies_discarded,
                max = self.options.max_num_cookies,
                "cookie cap reached, some cookies were not recorded"
            );
        }
        *dst = acc.entries.into_values().collect();
        Ok(acc.cookies_discarded)
    }

    /// Meld the arguments and responses of `src` into `dst`.
    ///
    /// Either both maps are updated or neither is.
    pub fn meld_method(&self, dst: &mut Method, src: Method) -> Result<MeldStats, MeldError> {
        let mut stats = MeldStats::default();
        let mut args = dst.args.clone();
        let mut responses = dst.responses.clone();

        stats.add(MeldStats {
            cookies_discarded: self.meld_top_level_data_map(&mut args, src.args)?,
        });
        stats.add(MeldStats {
            cookies_discarded: self.meld_top_level_data_map(&mut responses, src.responses)?,
        });

        dst.args = args;
        dst.responses = responses;
        Ok(stats)
    }
}
