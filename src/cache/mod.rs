pub(crate) mod doc_snapshot;

pub(crate) use doc_snapshot::{load_doc_snapshot, save_doc_snapshot};
