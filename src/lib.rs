pub mod io;
pub mod maker;
pub mod utils;

pub use maker::{decode, decode_block, DecodedBlock};
pub use maker::{CleanSummary, MakerNoteReport};
pub use maker::{MakerError, MakerResult, RawBlock, TagDefinitions};
pub use io::byte_order::ByteOrder;
