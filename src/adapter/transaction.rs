//! Update transaction contract

use std::io::Write;

use crate::error::Result;

/// The three steps of a read-modify-write run by
/// [`FileAdapter::ensure_update`](super::FileAdapter::ensure_update)
///
/// All steps run while the target's lock is held. An error from any step
/// aborts the update before the file is written.
pub trait UpdateTransaction {
    /// Receive one existing line (terminator stripped), in file order
    fn read_line(&mut self, line: &str) -> Result<()>;

    /// Apply the change once every line has been read
    fn mutate(&mut self) -> Result<()>;

    /// Serialize the complete new content
    fn write_to(&mut self, out: &mut dyn Write) -> Result<()>;
}
