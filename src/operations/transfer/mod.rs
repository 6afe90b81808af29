mod copy_selected;
mod shape_transfer;
mod snap;

pub use copy_selected::CopySelected;
pub use shape_transfer::{Direction, Layer, TransferShape};
pub use snap::{nearest_index, SnapToNearest};
