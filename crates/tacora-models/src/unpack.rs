//! Columnar to row conversion.

use tacora_types::Result;

use crate::validate::Columnar;

/// Converts a columnar response into one record per row.
pub trait Unpack: Columnar {
    /// The row type.
    type Record;

    /// Builds one record from every index of the present columns.
    ///
    /// Records come out in column order and are independent copies, so later
    /// pruning does not affect them.
    ///
    /// # Errors
    ///
    /// Returns an error, and no records, if the columns differ in length or a
    /// value cannot be converted.
    fn unpack(&self) -> Result<Vec<Self::Record>>;
}
