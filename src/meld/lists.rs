//! List melding

use super::Melder;
use super::error::MeldError;
use crate::models::{Data, List};

impl Melder {
    /// Collapse both lists into a single representative element.
    pub(crate) fn meld_list(&self, dst: &mut List, src: List) -> Result<(), MeldError> {
        let mut representative: Option<Data> = None;
        let existing = std::mem::take(&mut dst.elems);

        for (index, elem) in existing.into_iter().enumerate() {
            self.fold_elem(&mut representative, elem)
                .map_err(|e| e.at_index(index))?;
        }
        for (index, elem) in src.elems.into_iter().enumerate() {
            self.fold_elem(&mut representative, elem)
                .map_err(|e| e.at_index(index))?;
        }

        dst.elems = representative.into_iter().collect();
        Ok(())
    }

    fn fold_elem(&self, representative: &mut Option<Data>, elem: Data) -> Result<(), MeldError> {
        match representative {
            Some(acc) => self.meld_into(acc, elem),
            None => {
                *representative = Some(elem);
                Ok(())
            }
        }
    }
}
