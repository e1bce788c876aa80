pub mod asset_state;
pub mod cursor;
pub mod error;

pub use asset_state::{
    AssetDetail, AssetSummary, decode_asset_detail, decode_asset_page, encode_asset_detail,
    encode_asset_page,
};
pub use cursor::ByteCursor;
pub use error::{CodecError, CodecErrorKind};
