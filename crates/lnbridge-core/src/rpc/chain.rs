//! Chain notifier service (`ChainNotifier` prefix).

use serde::{Deserialize, Serialize};

/// Block epoch; used both as the registration request and as the update.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockEpoch {
    pub hash: Option<Vec<u8>>,
    pub height: Option<u32>,
}

streaming!(
    RegisterBlockEpochNtfn = "ChainNotifierRegisterBlockEpochNtfn",
    BlockEpoch => BlockEpoch
);
