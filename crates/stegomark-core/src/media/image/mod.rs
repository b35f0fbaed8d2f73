pub mod distributor;
pub mod lsb_codec;

pub use distributor::BitDistributor;
pub use lsb_codec::{AddressSpace, BitAddresses, LsbCodec, LsbReader, LsbWriter};
