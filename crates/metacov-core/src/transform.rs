use crate::errors::CovError;
use crate::types::Record;

/// A network-aware feature transformation consumed as an opaque capability.
///
/// Implementations convert metabolite-level records into pathway/reaction
/// level records in a single fit-and-apply call. The transform is re-fit from
/// scratch on every invocation; no state is carried across calls. The output
/// must contain exactly one record per input record.
pub trait PathwayTransform: Send + Sync {
    /// Fits the transform on the given records and labels and returns the
    /// derived pathway-level records.
    fn fit_transform(&self, records: &[Record], labels: &[String])
        -> Result<Vec<Record>, CovError>;
}
