//! At-most-once insertion of the SDK script element.

use std::rc::Rc;

use tracing::{debug, info};

use crate::error::GateError;
use crate::sdk::{HostDocument, ScriptErrorHook, ScriptTag};

/// Result of [`ScriptLoader::ensure_script_present`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptInsertion {
    /// A new element was inserted.
    Inserted,
    /// An element with the same id already existed.
    AlreadyPresent,
}

/// Inserts the SDK `<script>` element unless one with the same id exists.
#[derive(Clone)]
pub struct ScriptLoader {
    document: Rc<dyn HostDocument>,
    tag: ScriptTag,
}

impl ScriptLoader {
    /// Loader for `tag` on `document`.
    #[must_use]
    pub fn new(document: Rc<dyn HostDocument>, tag: ScriptTag) -> Self {
        Self { document, tag }
    }

    /// Make sure the script element exists. Returns without waiting for the load.
    ///
    /// `on_error` is only attached when this call inserts the element.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::LoadFailure`] when the element cannot be inserted.
    pub fn ensure_script_present(
        &self,
        on_error: ScriptErrorHook,
    ) -> Result<ScriptInsertion, GateError> {
        if self.document.script_present(&self.tag.id) {
            debug!(id = %self.tag.id, "sdk script already present");
            return Ok(ScriptInsertion::AlreadyPresent);
        }
        self.document
            .insert_script(&self.tag, on_error)
            .map_err(|reason| GateError::LoadFailure { reason })?;
        info!(id = %self.tag.id, src = %self.tag.src, "inserted sdk script");
        Ok(ScriptInsertion::Inserted)
    }

    /// Document the loader writes to.
    #[must_use]
    pub fn document(&self) -> &Rc<dyn HostDocument> {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SdkConfig;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Page {
        ids: RefCell<Vec<String>>,
    }

    impl HostDocument for Page {
        fn script_present(&self, id: &str) -> bool {
            self.ids.borrow().iter().any(|existing| existing == id)
        }

        fn insert_script(&self, tag: &ScriptTag, _on_error: ScriptErrorHook) -> Result<(), String> {
            self.ids.borrow_mut().push(tag.id.clone());
            Ok(())
        }

        fn announce(&self, _event: &str) {}
    }

    #[test]
    fn second_call_reuses_the_element() -> Result<(), GateError> {
        let page = Rc::new(Page::default());
        let tag = SdkConfig::with_app_id(Some("1")).script_tag();
        let loader = ScriptLoader::new(page.clone(), tag);

        assert_eq!(
            loader.ensure_script_present(Box::new(|_| {}))?,
            ScriptInsertion::Inserted
        );
        assert_eq!(
            loader.ensure_script_present(Box::new(|_| {}))?,
            ScriptInsertion::AlreadyPresent
        );
        assert_eq!(page.ids.borrow().len(), 1);
        Ok(())
    }
}
